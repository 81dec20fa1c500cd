// ==========================================
// 教务管理系统 - 教师班次资格解析引擎
// ==========================================
// 职责: 计算某教师可被分配的班次子集
// 输入: 教师有效模块分配 + 可分配班次 + 课程编码索引
// 输出: EligibilityOutcome（可选班次 + 解析失败课程 + 未映射班次）
// 红线:
// - 单个课程模块查询失败不阻断整体，只缩小结果并记录
// - 输出保持班次目录原始顺序
// ==========================================

use crate::backend::{AcademicGateway, BackendError, BackendResult};
use crate::config::config_manager::config_keys;
use crate::config::CampusConfigReader;
use crate::domain::{Batch, CourseCodeIndex, CourseModuleSet, FacultyModuleAssignment, MatchBasis};
use crate::engine::course_module_cache::CourseModuleCache;
use crate::engine::eligibility_core::{EligibilityCore, EligibilityCriteria};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

/// 课程模块解析失败
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedCourse {
    pub course_id: i64,
    /// 因此被排除的班次
    pub batch_ids: Vec<i64>,
    pub reason: String,
}

/// 一次解析的结果（可能是部分结果）
#[derive(Debug, Clone)]
pub struct EligibilityOutcome {
    pub eligible: Vec<Batch>,
    pub failed_courses: Vec<FailedCourse>,
    /// 课程编码在课程目录中不存在的班次
    pub unmapped_batch_ids: Vec<i64>,
    pub criteria: EligibilityCriteria,
}

impl EligibilityOutcome {
    pub fn empty(criteria: EligibilityCriteria) -> Self {
        Self {
            eligible: Vec::new(),
            failed_courses: Vec::new(),
            unmapped_batch_ids: Vec::new(),
            criteria,
        }
    }

    /// 存在课程解析失败时，结果可能偏小
    pub fn is_partial(&self) -> bool {
        !self.failed_courses.is_empty()
    }

    pub fn basis(&self) -> MatchBasis {
        self.criteria.basis
    }

    pub fn eligible_ids(&self) -> Vec<i64> {
        self.eligible.iter().map(|b| b.id).collect()
    }

    pub fn contains(&self, batch_id: i64) -> bool {
        self.eligible.iter().any(|b| b.id == batch_id)
    }
}

// ==========================================
// EligibilityResolver - 资格解析引擎
// ==========================================
// 持有会话级课程模块缓存；不直接修改表单状态
pub struct EligibilityResolver<C>
where
    C: CampusConfigReader,
{
    gateway: AcademicGateway,
    config: Arc<C>,
    cache: CourseModuleCache,
}

impl<C> EligibilityResolver<C>
where
    C: CampusConfigReader,
{
    /// 创建新的 EligibilityResolver 实例
    ///
    /// # 参数
    /// - gateway: 后端网关（课程模块查询）
    /// - config: 配置读取器
    pub fn new(gateway: AcademicGateway, config: Arc<C>) -> Self {
        Self {
            gateway,
            config,
            cache: CourseModuleCache::new(),
        }
    }

    pub fn cache(&self) -> &CourseModuleCache {
        &self.cache
    }

    /// 会话结束时调用
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// 解析教师可选班次
    ///
    /// # 参数
    /// - faculty_id: 教师 ID（仅用于日志）
    /// - assignments: 教师有效模块分配（可为空）
    /// - batches: 可分配班次（目录顺序）
    /// - index: 课程编码索引
    ///
    /// # 返回
    /// - EligibilityOutcome: 不返回错误，课程级失败记录在 failed_courses
    #[instrument(skip(self, assignments, batches, index), fields(assignments = assignments.len(), batches = batches.len()))]
    pub async fn resolve(
        &self,
        faculty_id: i64,
        assignments: &[FacultyModuleAssignment],
        batches: &[Batch],
        index: &CourseCodeIndex,
    ) -> EligibilityOutcome {
        // === 步骤 1: 推导判定条件 ===
        let name_fallback = self.name_fallback_enabled().await;
        let criteria = EligibilityCore::derive_criteria(assignments, name_fallback);

        // === 步骤 2: 无分配直接返回空 ===
        if criteria.is_empty() {
            tracing::info!(faculty_id, "教师无有效模块分配，无可选班次");
            return EligibilityOutcome::empty(criteria);
        }

        // === 步骤 3: 按课程分组，未映射班次单独记录 ===
        let (course_ids, unmapped_batch_ids) = EligibilityCore::collect_course_ids(batches, index);
        if !unmapped_batch_ids.is_empty() {
            tracing::warn!(
                faculty_id,
                unmapped = ?unmapped_batch_ids,
                "班次课程编码无法映射到课程，已视为不具备资格"
            );
        }

        // === 步骤 4: 并发解析课程模块（经缓存） ===
        let concurrency = self.course_fetch_concurrency().await;
        let results: Vec<(i64, BackendResult<Arc<CourseModuleSet>>)> = stream::iter(course_ids)
            .map(|course_id| async move { (course_id, self.course_module_set(course_id).await) })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let mut resolved = HashMap::with_capacity(results.len());
        let mut failed_courses = Vec::new();
        for (course_id, result) in results {
            match result {
                Ok(modules) => {
                    resolved.insert(course_id, modules);
                }
                Err(e) => {
                    tracing::warn!(faculty_id, course_id, error = %e, "课程模块解析失败，相关班次已排除");
                    failed_courses.push(FailedCourse {
                        course_id,
                        batch_ids: batches
                            .iter()
                            .filter(|b| index.course_id(&b.course_code) == Some(course_id))
                            .map(|b| b.id)
                            .collect(),
                        reason: e.raw_message(),
                    });
                }
            }
        }
        failed_courses.sort_by_key(|f| f.course_id);

        // === 步骤 5: 稳定过滤 ===
        let eligible = EligibilityCore::filter_batches(batches, index, &resolved, &criteria);

        tracing::info!(
            faculty_id,
            basis = %criteria.basis,
            eligible = eligible.len(),
            failed_courses = failed_courses.len(),
            "班次资格解析完成"
        );

        EligibilityOutcome {
            eligible,
            failed_courses,
            unmapped_batch_ids,
            criteria,
        }
    }

    /// 课程模块集合（经缓存）
    pub async fn course_module_set(&self, course_id: i64) -> BackendResult<Arc<CourseModuleSet>> {
        let gateway = &self.gateway;
        self.cache
            .get_or_fetch(course_id, move || async move {
                let modules = gateway.course_modules(course_id).await?;
                Ok::<_, BackendError>(CourseModuleSet::from_modules(&modules))
            })
            .await
    }

    async fn name_fallback_enabled(&self) -> bool {
        match self.config.get_name_fallback_enabled().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "读取名称兜底配置失败，使用默认值");
                config_keys::DEFAULT_NAME_FALLBACK_ENABLED
            }
        }
    }

    async fn course_fetch_concurrency(&self) -> usize {
        match self.config.get_course_fetch_concurrency().await {
            Ok(v) => v.max(1),
            Err(e) => {
                tracing::warn!(error = %e, "读取并发配置失败，使用默认值");
                config_keys::DEFAULT_COURSE_FETCH_CONCURRENCY
            }
        }
    }
}

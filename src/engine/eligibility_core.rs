// ==========================================
// 教务管理系统 - Eligibility Core 纯函数库
// ==========================================
// 职责: 教师-班次资格判定的纯逻辑
//       (判定条件推导、交集判定、课程分组、稳定过滤)
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::{
    Batch, CourseCodeIndex, CourseModuleSet, FacultyModuleAssignment, MatchBasis,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// 教师侧判定条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityCriteria {
    pub module_ids: HashSet<i64>,
    pub module_names: HashSet<String>,
    pub basis: MatchBasis,
}

impl EligibilityCriteria {
    pub fn empty() -> Self {
        Self {
            module_ids: HashSet::new(),
            module_names: HashSet::new(),
            basis: MatchBasis::Nothing,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.basis == MatchBasis::Nothing
    }
}

// ==========================================
// EligibilityCore - 纯函数工具类
// ==========================================
pub struct EligibilityCore;

impl EligibilityCore {
    /// 由教师模块分配推导判定条件
    ///
    /// # 规则
    /// 1. 只统计 is_active 的分配
    /// 2. 存在任一模块 ID → 按 ID 判定（名称集合不参与）
    /// 3. 无 ID 且允许兜底 → 按名称判定（trim + lowercase）
    /// 4. 否则 → Nothing（不具备任何班次资格）
    pub fn derive_criteria(
        assignments: &[FacultyModuleAssignment],
        name_fallback_enabled: bool,
    ) -> EligibilityCriteria {
        let mut module_ids = HashSet::new();
        let mut module_names = HashSet::new();

        for assignment in assignments.iter().filter(|a| a.is_active) {
            if let Some(id) = assignment.module.id {
                module_ids.insert(id);
            }
            if let Some(key) = assignment.module.name_key() {
                module_names.insert(key);
            }
        }

        let basis = if !module_ids.is_empty() {
            MatchBasis::ModuleId
        } else if name_fallback_enabled && !module_names.is_empty() {
            MatchBasis::ModuleName
        } else {
            MatchBasis::Nothing
        };

        if basis != MatchBasis::ModuleName {
            module_names.clear();
        }

        EligibilityCriteria {
            module_ids,
            module_names,
            basis,
        }
    }

    /// 课程模块集合是否与判定条件相交
    pub fn is_eligible(criteria: &EligibilityCriteria, course_modules: &CourseModuleSet) -> bool {
        match criteria.basis {
            MatchBasis::ModuleId => criteria
                .module_ids
                .iter()
                .any(|id| course_modules.ids.contains(id)),
            MatchBasis::ModuleName => criteria
                .module_names
                .iter()
                .any(|name| course_modules.names.contains(name)),
            MatchBasis::Nothing => false,
        }
    }

    /// 收集候选班次涉及的课程 ID（按首次出现顺序去重）
    ///
    /// # 返回
    /// - (course_ids, unmapped_batch_ids): 课程编码无法映射的班次单独列出
    pub fn collect_course_ids(batches: &[Batch], index: &CourseCodeIndex) -> (Vec<i64>, Vec<i64>) {
        let mut seen = HashSet::new();
        let mut course_ids = Vec::new();
        let mut unmapped = Vec::new();

        for batch in batches {
            match index.course_id(&batch.course_code) {
                Some(course_id) => {
                    if seen.insert(course_id) {
                        course_ids.push(course_id);
                    }
                }
                None => unmapped.push(batch.id),
            }
        }

        (course_ids, unmapped)
    }

    /// 稳定过滤：保持班次目录原始顺序
    ///
    /// 未映射课程、课程模块未解析成功的班次一律视为不具备资格
    pub fn filter_batches(
        batches: &[Batch],
        index: &CourseCodeIndex,
        resolved: &HashMap<i64, Arc<CourseModuleSet>>,
        criteria: &EligibilityCriteria,
    ) -> Vec<Batch> {
        if criteria.is_empty() {
            return Vec::new();
        }

        batches
            .iter()
            .filter(|batch| {
                index
                    .course_id(&batch.course_code)
                    .and_then(|course_id| resolved.get(&course_id))
                    .map(|modules| Self::is_eligible(criteria, modules))
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    /// 当前已选班次若不在可选列表中则清空（0 表示未选）
    pub fn retain_selection(selected_batch_id: i64, eligible: &[Batch]) -> i64 {
        if selected_batch_id != 0 && eligible.iter().any(|b| b.id == selected_batch_id) {
            selected_batch_id
        } else {
            0
        }
    }
}

// ==========================================
// 教务管理系统 - 后端网关（数据访问边界）
// ==========================================
// 职责: 调用后端接口并把原始报文一次性归一化为领域类型
// - 教师: 只保留 is_active
// - 班次: 状态无法识别的记录丢弃并告警；只保留可分配班次
// - 模块分配: 只保留 is_active
// ==========================================

use crate::backend::backend_trait::AcademicBackend;
use crate::backend::error::BackendResult;
use crate::domain::{
    AssignFacultyRequest, Batch, Course, CourseCodeIndex, FacultyBatchAssignment,
    FacultyModuleAssignment, FacultyProfile, ModuleRef,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::instrument;

/// 表单打开时加载的基础数据快照
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub faculty: Vec<FacultyProfile>,
    pub batches: Vec<Batch>,
    pub courses: Vec<Course>,
    pub course_index: CourseCodeIndex,
    pub loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn find_faculty(&self, faculty_id: i64) -> Option<&FacultyProfile> {
        self.faculty.iter().find(|f| f.id == faculty_id)
    }

    pub fn find_batch(&self, batch_id: i64) -> Option<&Batch> {
        self.batches.iter().find(|b| b.id == batch_id)
    }
}

/// 后端网关
#[derive(Clone)]
pub struct AcademicGateway {
    backend: Arc<dyn AcademicBackend>,
}

impl AcademicGateway {
    pub fn new(backend: Arc<dyn AcademicBackend>) -> Self {
        Self { backend }
    }

    /// 并发加载教师、班次、课程三份目录；任一失败即整体失败
    #[instrument(skip(self))]
    pub async fn load_catalogs(&self) -> BackendResult<CatalogSnapshot> {
        let (faculty, batches, courses) = futures::try_join!(
            self.backend.list_active_faculty(),
            self.backend.list_active_batches(),
            self.backend.list_courses(),
        )?;

        let faculty: Vec<FacultyProfile> = faculty
            .into_iter()
            .map(FacultyProfile::from)
            .filter(|f| f.is_active)
            .collect();

        let mut assignable = Vec::with_capacity(batches.len());
        for dto in batches {
            let batch_id = dto.id;
            match Batch::try_from(dto) {
                Ok(batch) if batch.is_assignable() => assignable.push(batch),
                Ok(_) => {}
                Err(e) => tracing::warn!(batch_id, error = %e, "班次记录无法识别，已跳过"),
            }
        }

        let courses: Vec<Course> = courses.into_iter().map(Course::from).collect();
        let course_index = CourseCodeIndex::build(&courses);

        tracing::info!(
            faculty = faculty.len(),
            batches = assignable.len(),
            courses = courses.len(),
            "基础数据加载完成"
        );

        Ok(CatalogSnapshot {
            faculty,
            batches: assignable,
            courses,
            course_index,
            loaded_at: Utc::now(),
        })
    }

    /// 教师的有效模块分配
    #[instrument(skip(self))]
    pub async fn active_module_assignments(
        &self,
        faculty_id: i64,
    ) -> BackendResult<Vec<FacultyModuleAssignment>> {
        let dtos = self.backend.list_active_module_assignments(faculty_id).await?;
        Ok(dtos
            .into_iter()
            .map(|dto| dto.into_domain(faculty_id))
            .filter(|a| a.is_active)
            .collect())
    }

    /// 课程模块（已归一化）
    pub async fn course_modules(&self, course_id: i64) -> BackendResult<Vec<ModuleRef>> {
        let dtos = self.backend.list_course_modules(course_id).await?;
        Ok(dtos.into_iter().map(ModuleRef::from).collect())
    }

    /// 提交教师-班次分配
    #[instrument(skip(self))]
    pub async fn assign_faculty_to_batch(
        &self,
        request: &AssignFacultyRequest,
    ) -> BackendResult<FacultyBatchAssignment> {
        let dto = self.backend.assign_faculty_to_batch(request).await?;
        Ok(dto.into())
    }
}

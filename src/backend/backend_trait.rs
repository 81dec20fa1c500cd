// ==========================================
// 教务管理系统 - 后端接口 Trait
// ==========================================
// 职责: 定义核心所依赖的外部后端接口（不包含实现）
// 实现者: InMemoryBackend（离线数据集）/ 外部 REST 客户端
// 红线: 返回值为后端原始报文结构，归一化统一交给 AcademicGateway
// ==========================================

use crate::backend::dto::{
    BatchDto, CourseDto, CourseModuleDto, FacultyBatchAssignmentDto, FacultyModuleAssignmentDto,
    FacultyProfileDto,
};
use crate::backend::error::BackendResult;
use crate::domain::AssignFacultyRequest;
use async_trait::async_trait;

/// 教师目录
#[async_trait]
pub trait FacultyDirectory: Send + Sync {
    /// GET 启用状态的教师档案
    async fn list_active_faculty(&self) -> BackendResult<Vec<FacultyProfileDto>>;
}

/// 班次目录
#[async_trait]
pub trait BatchCatalog: Send + Sync {
    /// GET 启用且未取消的班次
    async fn list_active_batches(&self) -> BackendResult<Vec<BatchDto>>;
}

/// 课程目录
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// GET 全部课程
    async fn list_courses(&self) -> BackendResult<Vec<CourseDto>>;

    /// GET 某课程的模块列表
    async fn list_course_modules(&self, course_id: i64) -> BackendResult<Vec<CourseModuleDto>>;
}

/// 教师模块分配查询
#[async_trait]
pub trait ModuleAssignmentLookup: Send + Sync {
    /// GET 教师模块分配（faculty_id, is_active=true）
    async fn list_active_module_assignments(
        &self,
        faculty_id: i64,
    ) -> BackendResult<Vec<FacultyModuleAssignmentDto>>;
}

/// 教师-班次分配写入
#[async_trait]
pub trait BatchAssignmentGateway: Send + Sync {
    /// POST 分配教师到班次
    async fn assign_faculty_to_batch(
        &self,
        request: &AssignFacultyRequest,
    ) -> BackendResult<FacultyBatchAssignmentDto>;
}

/// 完整后端 = 以上全部接口
pub trait AcademicBackend:
    FacultyDirectory + BatchCatalog + CourseCatalog + ModuleAssignmentLookup + BatchAssignmentGateway
{
}

impl<T> AcademicBackend for T where
    T: FacultyDirectory
        + BatchCatalog
        + CourseCatalog
        + ModuleAssignmentLookup
        + BatchAssignmentGateway
{
}

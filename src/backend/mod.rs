// ==========================================
// 教务管理系统 - 后端边界层
// ==========================================
// 职责: 定义外部 REST 后端的读取/写入接口（trait）、报文结构，
//       以及报文到领域类型的一次性归一化
// 红线: module / subject(旧) 字段差异只在本层处理，不外泄
// ==========================================

pub mod backend_trait;
pub mod dto;
pub mod error;
pub mod gateway;
pub mod memory;

pub use backend_trait::{
    AcademicBackend, BatchAssignmentGateway, BatchCatalog, CourseCatalog, FacultyDirectory,
    ModuleAssignmentLookup,
};
pub use dto::{
    AssignmentTargetDto, BatchDto, BackendFixture, CourseDto, CourseModuleDto,
    FacultyBatchAssignmentDto, FacultyModuleAssignmentDto, FacultyProfileDto, FacultyUserDto,
    ModuleBodyDto,
};
pub use error::{BackendError, BackendResult};
pub use gateway::{AcademicGateway, CatalogSnapshot};
pub use memory::InMemoryBackend;

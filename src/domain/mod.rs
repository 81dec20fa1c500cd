// ==========================================
// 教务管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assignment;
pub mod batch;
pub mod course;
pub mod faculty;
pub mod question;
pub mod types;

// 重导出核心类型
pub use assignment::{AssignFacultyRequest, FacultyBatchAssignment, FacultyModuleAssignment};
pub use batch::Batch;
pub use course::{Course, CourseCodeIndex, CourseModuleSet, ModuleRef};
pub use faculty::FacultyProfile;
pub use question::{AikenOption, AikenQuestion, StoredQuestion};
pub use types::{BatchStatus, MatchBasis, ViolationLevel};

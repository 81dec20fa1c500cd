// ==========================================
// 教务管理系统 - 引擎层
// ==========================================
// 职责: 实现资格解析规则,不直接调用表单/UI
// 红线: 单课程失败只缩小结果，不阻断整体
// ==========================================

pub mod course_module_cache;
pub mod eligibility;
pub mod eligibility_core;
pub mod events;

// 重导出核心引擎
pub use course_module_cache::{CacheStats, CourseModuleCache};
pub use eligibility::{EligibilityOutcome, EligibilityResolver, FailedCourse};
pub use eligibility_core::{EligibilityCore, EligibilityCriteria};
pub use events::{
    AssignmentEvent, AssignmentEventPublisher, AssignmentEventType, NoOpEventPublisher,
    RecordingEventPublisher,
};

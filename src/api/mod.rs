// ==========================================
// 教务管理系统 - API 层
// ==========================================
// 职责: 面向调用方（表单/CLI）的业务接口与错误分类
// ==========================================

pub mod assignment_api;
pub mod error;
pub mod question_bank_api;
pub mod validator;

pub use assignment_api::BatchAssignmentApi;
pub use error::{ApiError, ApiResult};
pub use question_bank_api::QuestionBankApi;
pub use validator::{is_duplicate_assignment_message, validate_assignment_request};

// ==========================================
// 教务管理系统 - 应用层
// ==========================================
// 职责: 组装 API 与会话，供调用方（CLI 等）使用
// ==========================================

pub mod session;
pub mod state;

// 重导出
pub use session::{AssignmentFormSession, ResolutionTicket};
pub use state::{get_default_db_path, AppState};

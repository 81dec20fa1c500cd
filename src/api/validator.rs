// ==========================================
// 教务管理系统 - 提交前校验
// ==========================================
// 职责: 分配请求的本地校验（不发请求）与重复分配识别
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::AssignFacultyRequest;
use crate::i18n::t;

const DUPLICATE_MARKERS: [&str; 2] = ["already assigned", "already exists"];

/// 教师、班次均须已选择（id > 0）
pub fn validate_assignment_request(request: &AssignFacultyRequest) -> ApiResult<()> {
    if request.faculty_id <= 0 {
        return Err(ApiError::InvalidInput(t("assignment.faculty_required")));
    }
    if request.batch_id <= 0 {
        return Err(ApiError::InvalidInput(t("assignment.batch_required")));
    }
    Ok(())
}

/// 后端消息是否表示重复分配（大小写不敏感）
pub fn is_duplicate_assignment_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    DUPLICATE_MARKERS.iter().any(|marker| lower.contains(marker))
}

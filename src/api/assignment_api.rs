// ==========================================
// 教务管理系统 - 教师班次分配 API
// ==========================================
// 职责: 校验并提交 {faculty_id, batch_id}，成功后发布事件
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::validate_assignment_request;
use crate::backend::AcademicGateway;
use crate::domain::{AssignFacultyRequest, FacultyBatchAssignment};
use crate::engine::{AssignmentEvent, AssignmentEventPublisher};
use tracing::{info, instrument, warn};

/// 教师班次分配API
pub struct BatchAssignmentApi {
    gateway: AcademicGateway,
    publisher: Arc<dyn AssignmentEventPublisher>,
}

impl BatchAssignmentApi {
    pub fn new(gateway: AcademicGateway, publisher: Arc<dyn AssignmentEventPublisher>) -> Self {
        Self { gateway, publisher }
    }

    /// 提交分配
    ///
    /// # 参数
    /// - session_id: 表单会话 ID（写入事件）
    /// - request: 分配请求
    ///
    /// # 返回
    /// - Ok(FacultyBatchAssignment): 后端创建的分配记录
    /// - Err(ApiError::InvalidInput): 本地校验失败，未发请求
    /// - Err(ApiError::DuplicateAssignment): 重复分配
    /// - Err(ApiError::Backend): 其他后端失败（原始消息）
    #[instrument(skip(self))]
    pub async fn submit(
        &self,
        session_id: &str,
        request: &AssignFacultyRequest,
    ) -> ApiResult<FacultyBatchAssignment> {
        validate_assignment_request(request)?;

        let assignment = self
            .gateway
            .assign_faculty_to_batch(request)
            .await
            .map_err(|e| {
                let err = ApiError::from(e);
                warn!(error = %err, "分配提交失败");
                err
            })?;

        info!(assignment_id = assignment.id, "分配提交成功");

        // 事件发布失败不影响已成功的分配
        let event = AssignmentEvent::faculty_assigned(
            session_id,
            request.faculty_id,
            request.batch_id,
            assignment.id,
        );
        if let Err(e) = self.publisher.publish(event) {
            warn!(error = %e, "分配事件发布失败");
        }

        Ok(assignment)
    }

    pub fn publish_closed(&self, session_id: &str) {
        if let Err(e) = self.publisher.publish(AssignmentEvent::form_closed(session_id)) {
            warn!(error = %e, "关闭事件发布失败");
        }
    }
}

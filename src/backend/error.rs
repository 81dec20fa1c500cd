// ==========================================
// 教务管理系统 - 后端边界错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 后端调用错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("后端请求失败: {0}")]
    Request(String),

    #[error("后端拒绝请求: {0}")]
    Conflict(String),

    #[error("资源未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("报文解析失败: {0}")]
    Decode(String),

    #[error("后端不可用: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// 后端原始消息（不带本层前缀）
    pub fn raw_message(&self) -> String {
        match self {
            BackendError::Request(msg)
            | BackendError::Conflict(msg)
            | BackendError::Decode(msg)
            | BackendError::Unavailable(msg) => msg.clone(),
            BackendError::NotFound { entity, id } => format!("{} {} not found", entity, id),
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

/// Result 类型别名
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_message_strips_prefix() {
        let err = BackendError::Conflict("Faculty already assigned".to_string());
        assert_eq!(err.raw_message(), "Faculty already assigned");
        assert!(err.to_string().contains("后端拒绝请求"));
    }
}

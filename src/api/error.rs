// ==========================================
// 教务管理系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把下层错误转换为用户可读的消息
// 分类:
// - CatalogLoad: 基础数据加载失败（阻断提交）
// - InvalidInput: 提交前校验失败（不发请求）
// - DuplicateAssignment: 重复分配（友好提示）
// - Backend: 其他后端失败（原样透出）
// ==========================================

use crate::api::validator::is_duplicate_assignment_message;
use crate::backend::BackendError;
use crate::i18n::{t, t_with_args};
use crate::importer::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 表单级错误
    // ==========================================
    #[error("{0}")]
    CatalogLoad(String),

    #[error("表单未就绪: {0}")]
    NotReady(String),

    // ==========================================
    // 提交错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    DuplicateAssignment(String),

    #[error("{0}")]
    Backend(String),

    // ==========================================
    // 题库错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("题库导入失败: {0}")]
    Import(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// 基础数据加载失败
    pub fn catalog_load(err: &BackendError) -> Self {
        ApiError::CatalogLoad(t_with_args(
            "catalog.load_failed",
            &[("reason", &err.raw_message())],
        ))
    }

    /// 用户可见消息
    pub fn user_message(&self) -> String {
        match self {
            ApiError::CatalogLoad(msg)
            | ApiError::DuplicateAssignment(msg)
            | ApiError::Backend(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

// ==========================================
// 从 BackendError 转换（提交失败分类）
// ==========================================
impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        let raw = err.raw_message();
        if is_duplicate_assignment_message(&raw) {
            ApiError::DuplicateAssignment(t("assignment.duplicate"))
        } else {
            ApiError::Backend(raw)
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::Internal(msg),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => {
                ApiError::NotFound(t_with_args("import.file_not_found", &[("path", &path)]))
            }
            ImportError::BankNotFound(bank_id) => ApiError::NotFound(t_with_args(
                "import.bank_not_found",
                &[("bank", &bank_id.to_string())],
            )),
            ImportError::EmptyFile(path) => {
                ApiError::Import(t_with_args("import.empty_file", &[("path", &path)]))
            }
            other => ApiError::Import(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

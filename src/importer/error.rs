// ==========================================
// 教务管理系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 单题校验问题不是错误，记录在 ImportReport.violations
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("文件过大: {size} 字节，上限 {limit} 字节")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("文件编码错误: {0}（仅支持 UTF-8）")]
    InvalidEncoding(String),

    #[error("文件中没有任何题目: {0}")]
    EmptyFile(String),

    // ===== 题库错误 =====
    #[error("题库不存在: bank_id={0}")]
    BankNotFound(i64),

    #[error("题库写入失败: {0}")]
    StoreError(String),

    // ===== 报告错误 =====
    #[error("导入报告导出失败: {0}")]
    ReportExportError(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::InvalidData => ImportError::InvalidEncoding(err.to_string()),
            _ => ImportError::FileReadError(err.to_string()),
        }
    }
}

// 实现 From<RepositoryError>
impl From<RepositoryError> for ImportError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } if entity == "QuestionBank" => id
                .parse::<i64>()
                .map(ImportError::BankNotFound)
                .unwrap_or_else(|_| ImportError::StoreError(format!("题库 {} 不存在", id))),
            other => ImportError::StoreError(other.to_string()),
        }
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::ReportExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

// ==========================================
// 教务管理系统 - 导入层
// ==========================================
// 职责: AIKEN 格式题目导入题库
// 流程: 解析 → 校验 → 落库 → 报告
// ==========================================

// 模块声明
pub mod aiken_importer;
pub mod aiken_parser;
pub mod aiken_validator;
pub mod error;
pub mod importer_trait;
pub mod report;

// 重导出核心类型
pub use aiken_importer::AikenImporter;
pub use aiken_parser::{AikenParser, RawAikenAnswer, RawAikenBlock, RawAikenOption};
pub use aiken_validator::{AikenValidator, ValidatedBlock};
pub use error::{ImportError, ImportResult};
pub use report::{AikenViolation, ImportBatchRecord, ImportReport};

// 重导出 Trait 接口
pub use importer_trait::QuestionBankStore;

// ==========================================
// 教务管理系统 - 导入报告
// ==========================================
// 职责: 汇总一次导入的结果与逐题问题，支持 CSV 导出
// ==========================================

use crate::domain::ViolationLevel;
use crate::importer::error::ImportResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 单题问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AikenViolation {
    /// 题目序号（1-based）
    pub question_index: usize,
    /// 源文件行号（1-based）
    pub line_number: usize,
    pub level: ViolationLevel,
    pub field: String,
    pub message: String,
}

/// 导入批次（入库记录）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportBatchRecord {
    pub import_batch_id: String,
    pub bank_id: i64,
    pub source_name: String,
    pub total_questions: usize,
    pub imported_questions: usize,
    pub failed_questions: usize,
    pub imported_at: DateTime<Utc>,
}

/// 导入报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch: ImportBatchRecord,
    pub violations: Vec<AikenViolation>,
}

impl ImportReport {
    pub fn error_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.level == ViolationLevel::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.level == ViolationLevel::Warning)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// 导出问题清单（CSV，含表头）
    pub fn to_csv(&self) -> ImportResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["question_index", "line_number", "level", "field", "message"])?;
        for v in &self.violations {
            writer.write_record([
                v.question_index.to_string(),
                v.line_number.to_string(),
                v.level.to_string(),
                v.field.clone(),
                v.message.clone(),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| crate::importer::error::ImportError::ReportExportError(e.to_string()))?;
        String::from_utf8(bytes)
            .map_err(|e| crate::importer::error::ImportError::ReportExportError(e.to_string()))
    }
}

// ==========================================
// 教务管理系统 - 题库题目
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AikenOption {
    pub letter: char,
    pub text: String,
}

/// 通过校验的 AIKEN 单选题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AikenQuestion {
    pub question_text: String,
    pub options: Vec<AikenOption>,
    pub answer: char,
    /// 题目在源文件中的起始行（1-based）
    pub source_line: usize,
}

impl AikenQuestion {
    pub fn correct_option(&self) -> Option<&AikenOption> {
        self.options.iter().find(|o| o.letter == self.answer)
    }
}

/// 已入库题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredQuestion {
    pub question_id: String,
    pub bank_id: i64,
    pub import_batch_id: String,
    pub question_text: String,
    pub options: Vec<AikenOption>,
    pub answer: char,
    pub created_at: DateTime<Utc>,
}

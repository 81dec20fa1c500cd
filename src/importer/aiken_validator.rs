// ==========================================
// 教务管理系统 - AIKEN 题目校验器
// ==========================================
// 职责: 把 RawAikenBlock 转换为 AikenQuestion，并收集问题
// 规则:
// - 题干不能为空
// - 选项数量 ∈ [min_options, max_options]
// - 选项字母从 A 开始连续
// - 选项文本不能为空；重复文本仅告警
// - ANSWER 必须存在、为单个字母、且指向已有选项
// 任一 ERROR → 本题不入库
// ==========================================

use crate::domain::{AikenOption, AikenQuestion, ViolationLevel};
use crate::importer::aiken_parser::RawAikenBlock;
use crate::importer::report::AikenViolation;
use std::collections::HashSet;

/// 单题校验结果
#[derive(Debug, Clone)]
pub struct ValidatedBlock {
    pub question: Option<AikenQuestion>,
    pub violations: Vec<AikenViolation>,
}

#[derive(Debug, Clone, Copy)]
pub struct AikenValidator {
    min_options: usize,
    max_options: usize,
}

impl AikenValidator {
    pub fn new(min_options: usize, max_options: usize) -> Self {
        Self {
            min_options,
            max_options: max_options.max(min_options),
        }
    }

    pub fn validate(&self, block: &RawAikenBlock) -> ValidatedBlock {
        let mut violations = Vec::new();
        let mut push = |line: usize, level: ViolationLevel, field: &str, message: String| {
            violations.push(AikenViolation {
                question_index: block.index,
                line_number: line,
                level,
                field: field.to_string(),
                message,
            });
        };

        let question_text = block.question_text();
        if question_text.trim().is_empty() {
            push(
                block.start_line,
                ViolationLevel::Error,
                "question",
                "题干为空".to_string(),
            );
        }

        let option_count = block.options.len();
        if option_count < self.min_options || option_count > self.max_options {
            push(
                block.options.first().map(|o| o.line).unwrap_or(block.start_line),
                ViolationLevel::Error,
                "options",
                format!(
                    "选项数量 {} 不在允许范围 [{}, {}]",
                    option_count, self.min_options, self.max_options
                ),
            );
        }

        let mut seen_texts: HashSet<String> = HashSet::new();
        for (pos, option) in block.options.iter().enumerate() {
            let expected = char::from_u32('A' as u32 + pos as u32).unwrap_or('?');
            if option.letter != expected {
                push(
                    option.line,
                    ViolationLevel::Error,
                    "options",
                    format!("选项字母应为 {}，实际为 {}", expected, option.letter),
                );
            }
            if option.text.is_empty() {
                push(
                    option.line,
                    ViolationLevel::Error,
                    "options",
                    format!("选项 {} 内容为空", option.letter),
                );
            } else if !seen_texts.insert(option.text.to_lowercase()) {
                push(
                    option.line,
                    ViolationLevel::Warning,
                    "options",
                    format!("选项 {} 与前面的选项内容重复", option.letter),
                );
            }
        }

        let answer = match &block.answer {
            None => {
                let line = block
                    .options
                    .last()
                    .map(|o| o.line)
                    .unwrap_or(block.start_line);
                push(
                    line,
                    ViolationLevel::Error,
                    "answer",
                    "缺少 ANSWER 行".to_string(),
                );
                None
            }
            Some(raw) => {
                let mut chars = raw.value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => {
                        let letter = c.to_ascii_uppercase();
                        if block.options.iter().any(|o| o.letter == letter) {
                            Some(letter)
                        } else {
                            push(
                                raw.line,
                                ViolationLevel::Error,
                                "answer",
                                format!("答案 {} 不在选项中", letter),
                            );
                            None
                        }
                    }
                    _ => {
                        push(
                            raw.line,
                            ViolationLevel::Error,
                            "answer",
                            format!("答案格式错误: '{}'", raw.value),
                        );
                        None
                    }
                }
            }
        };

        let has_error = violations.iter().any(|v| v.level == ViolationLevel::Error);
        let question = match answer {
            Some(answer) if !has_error => Some(AikenQuestion {
                question_text,
                options: block
                    .options
                    .iter()
                    .map(|o| AikenOption {
                        letter: o.letter,
                        text: o.text.clone(),
                    })
                    .collect(),
                answer,
                source_line: block.start_line,
            }),
            _ => None,
        };

        ValidatedBlock {
            question,
            violations,
        }
    }
}

impl Default for AikenValidator {
    fn default() -> Self {
        Self::new(2, 6)
    }
}

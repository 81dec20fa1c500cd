// ==========================================
// 教务管理系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 班次状态 (Batch Status)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与后端一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Active,    // 进行中
    Completed, // 已结课
    Cancelled, // 已取消
}

impl BatchStatus {
    /// 从后端字符串解析（大小写不敏感，未知值视为 ACTIVE 以外的不可分配状态）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(BatchStatus::Active),
            "COMPLETED" => Some(BatchStatus::Completed),
            "CANCELLED" | "CANCELED" => Some(BatchStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Active => write!(f, "ACTIVE"),
            BatchStatus::Completed => write!(f, "COMPLETED"),
            BatchStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

// ==========================================
// 匹配依据 (Match Basis)
// ==========================================
// 模块 ID 优先；仅当教师分配记录全部缺少 ID 时才按名称匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchBasis {
    ModuleId,   // 按模块 ID
    ModuleName, // 按模块名称（兜底）
    Nothing,    // 无任何分配
}

impl fmt::Display for MatchBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchBasis::ModuleId => write!(f, "MODULE_ID"),
            MatchBasis::ModuleName => write!(f, "MODULE_NAME"),
            MatchBasis::Nothing => write!(f, "NOTHING"),
        }
    }
}

// ==========================================
// 校验级别 (Violation Level)
// ==========================================
// ERROR: 题目不入库; WARNING: 入库但提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationLevel {
    Warning,
    Error,
}

impl fmt::Display for ViolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationLevel::Warning => write!(f, "WARNING"),
            ViolationLevel::Error => write!(f, "ERROR"),
        }
    }
}

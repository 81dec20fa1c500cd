// ==========================================
// 教务管理系统 - 班次
// ==========================================
// 说明: 班次通过课程 *编码* 引用课程（后端有意冗余），
//       解析课程模块前需经 course_code -> course_id 索引
// ==========================================

use crate::domain::types::BatchStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: i64,
    pub code: String,
    pub course_code: String,
    pub course_name: Option<String>,
    pub centre_name: Option<String>,
    pub mode: Option<String>,
    pub status: BatchStatus,
    pub is_active: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Batch {
    /// 是否可作为分配候选（启用且未取消）
    pub fn is_assignable(&self) -> bool {
        self.is_active && self.status != BatchStatus::Cancelled
    }
}

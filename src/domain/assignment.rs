// ==========================================
// 教务管理系统 - 分配记录
// ==========================================

use crate::domain::course::ModuleRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 教师-模块授课分配（只有 is_active 的记录参与资格判定）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyModuleAssignment {
    pub faculty_id: i64,
    pub module: ModuleRef,
    pub is_active: bool,
    pub assigned_at: Option<DateTime<Utc>>,
}

/// 教师-班次分配请求
///
/// 0 表示未选择；表单重置后两项均回到 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssignFacultyRequest {
    pub faculty_id: i64,
    pub batch_id: i64,
}

impl AssignFacultyRequest {
    pub fn new(faculty_id: i64, batch_id: i64) -> Self {
        Self { faculty_id, batch_id }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 后端创建成功后返回的教师-班次分配
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyBatchAssignment {
    pub id: i64,
    pub faculty_id: i64,
    pub batch_id: i64,
    pub assigned_at: Option<DateTime<Utc>>,
}

// ==========================================
// 教务管理系统 - 教师档案
// ==========================================

use serde::{Deserialize, Serialize};

/// 教师档案（只读）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyProfile {
    pub id: i64,
    pub employee_code: String,
    pub designation: Option<String>,
    pub full_name: String,
    pub is_active: bool,
}

impl FacultyProfile {
    /// 下拉框显示文本: "姓名 (工号)"
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.full_name, self.employee_code)
    }
}

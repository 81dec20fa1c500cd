// ==========================================
// 教务管理系统 - 课程与模块
// ==========================================
// 职责: 课程、模块引用的规范形态，以及课程编码索引
// 说明: 后端存在 module / subject(旧) 两套字段，进入本层前已在
//       backend::dto 边界统一为 ModuleRef，此处不再区分来源
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 课程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub name: String,
}

/// 规范化后的模块引用
///
/// 旧数据可能只有名称没有 ID，因此两者都是可选的
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModuleRef {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl ModuleRef {
    pub fn new(id: Option<i64>, name: Option<String>) -> Self {
        Self { id, name }
    }

    /// 名称比较键: 去首尾空白 + 小写；空名称返回 None
    pub fn name_key(&self) -> Option<String> {
        self.name.as_deref().and_then(normalize_module_name)
    }
}

/// 模块名称归一化（trim + lowercase）
pub fn normalize_module_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// 某课程讲授的模块集合
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CourseModuleSet {
    pub ids: HashSet<i64>,
    pub names: HashSet<String>,
}

impl CourseModuleSet {
    pub fn from_modules<'a, I>(modules: I) -> Self
    where
        I: IntoIterator<Item = &'a ModuleRef>,
    {
        let mut set = Self::default();
        for module in modules {
            if let Some(id) = module.id {
                set.ids.insert(id);
            }
            if let Some(key) = module.name_key() {
                set.names.insert(key);
            }
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.names.is_empty()
    }
}

/// 课程编码 -> 课程 ID 索引
///
/// 班次只携带 course_code，需要通过此索引找到 course_id
#[derive(Debug, Clone, Default)]
pub struct CourseCodeIndex {
    by_code: HashMap<String, i64>,
}

impl CourseCodeIndex {
    pub fn build(courses: &[Course]) -> Self {
        let by_code = courses
            .iter()
            .map(|c| (c.code.trim().to_string(), c.id))
            .collect();
        Self { by_code }
    }

    pub fn course_id(&self, course_code: &str) -> Option<i64> {
        self.by_code.get(course_code.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

// ==========================================
// 教务管理系统 - 配置层
// ==========================================
// 职责: 系统配置读取，config_kv 表覆写默认值
// 存储: config_kv 表
// ==========================================

pub mod campus_config_trait;
pub mod config_manager;

// 重导出核心配置管理器
pub use campus_config_trait::{CampusConfigReader, StaticConfig};
pub use config_manager::{config_keys, ConfigManager};

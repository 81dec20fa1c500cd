// ==========================================
// 教务管理系统 - 配置管理器
// ==========================================
// 职责: 配置查询、覆写、快照
// 存储: config_kv 表 (key-value + scope)，缺失键使用内置默认值
// ==========================================

use crate::config::campus_config_trait::{ConfigResult, CampusConfigReader};
use crate::db::{init_schema, open_sqlite_connection};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键与默认值
// ==========================================
pub mod config_keys {
    pub const NAME_FALLBACK_ENABLED: &str = "eligibility.name_fallback_enabled";
    pub const COURSE_FETCH_CONCURRENCY: &str = "eligibility.course_fetch_concurrency";
    pub const AIKEN_MIN_OPTIONS: &str = "aiken.min_options";
    pub const AIKEN_MAX_OPTIONS: &str = "aiken.max_options";
    pub const AIKEN_MAX_FILE_BYTES: &str = "aiken.max_file_bytes";

    pub const DEFAULT_NAME_FALLBACK_ENABLED: bool = true;
    pub const DEFAULT_COURSE_FETCH_CONCURRENCY: usize = 4;
    pub const DEFAULT_AIKEN_MIN_OPTIONS: usize = 2;
    pub const DEFAULT_AIKEN_MAX_OPTIONS: usize = 6;
    pub const DEFAULT_AIKEN_MAX_FILE_BYTES: u64 = 1024 * 1024;
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（必要时建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            init_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        tracing::info!(key, value, "配置已更新");
        Ok(())
    }

    /// 所有 global 配置的快照（JSON，键有序）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn
            .prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }

    /// 读取并解析数值配置，缺失时返回默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key)? {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| format!("配置值格式错误 (key: {}, value: {}): {}", key, raw, e).into()),
            None => Ok(default),
        }
    }

    fn get_bool_or_default(&self, key: &str, default: bool) -> ConfigResult<bool> {
        match self.get_config_value(key)? {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(format!("配置值格式错误 (key: {}, value: {}): 期望布尔值", key, raw).into()),
            },
            None => Ok(default),
        }
    }
}

#[async_trait]
impl CampusConfigReader for ConfigManager {
    async fn get_name_fallback_enabled(&self) -> ConfigResult<bool> {
        self.get_bool_or_default(
            config_keys::NAME_FALLBACK_ENABLED,
            config_keys::DEFAULT_NAME_FALLBACK_ENABLED,
        )
    }

    async fn get_course_fetch_concurrency(&self) -> ConfigResult<usize> {
        let value = self.get_parsed_or_default(
            config_keys::COURSE_FETCH_CONCURRENCY,
            config_keys::DEFAULT_COURSE_FETCH_CONCURRENCY,
        )?;
        // 0 会让并发流永远不前进
        Ok(value.max(1))
    }

    async fn get_aiken_min_options(&self) -> ConfigResult<usize> {
        self.get_parsed_or_default(
            config_keys::AIKEN_MIN_OPTIONS,
            config_keys::DEFAULT_AIKEN_MIN_OPTIONS,
        )
    }

    async fn get_aiken_max_options(&self) -> ConfigResult<usize> {
        self.get_parsed_or_default(
            config_keys::AIKEN_MAX_OPTIONS,
            config_keys::DEFAULT_AIKEN_MAX_OPTIONS,
        )
    }

    async fn get_aiken_max_file_bytes(&self) -> ConfigResult<u64> {
        self.get_parsed_or_default(
            config_keys::AIKEN_MAX_FILE_BYTES,
            config_keys::DEFAULT_AIKEN_MAX_FILE_BYTES,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_memory_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_missing() {
        let manager = in_memory_manager();

        assert!(manager.get_name_fallback_enabled().await.unwrap());
        assert_eq!(manager.get_course_fetch_concurrency().await.unwrap(), 4);
        assert_eq!(manager.get_aiken_min_options().await.unwrap(), 2);
        assert_eq!(manager.get_aiken_max_options().await.unwrap(), 6);
        assert_eq!(manager.get_aiken_max_file_bytes().await.unwrap(), 1024 * 1024);
    }

    #[tokio::test]
    async fn test_overrides_and_snapshot() {
        let manager = in_memory_manager();
        manager
            .set_global_config_value(config_keys::NAME_FALLBACK_ENABLED, "off")
            .unwrap();
        manager
            .set_global_config_value(config_keys::COURSE_FETCH_CONCURRENCY, "0")
            .unwrap();
        manager
            .set_global_config_value(config_keys::AIKEN_MAX_OPTIONS, "8")
            .unwrap();

        assert!(!manager.get_name_fallback_enabled().await.unwrap());
        assert_eq!(manager.get_course_fetch_concurrency().await.unwrap(), 1);
        assert_eq!(manager.get_aiken_max_options().await.unwrap(), 8);

        let snapshot: BTreeMap<String, String> =
            serde_json::from_str(&manager.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot.get(config_keys::AIKEN_MAX_OPTIONS).map(String::as_str), Some("8"));
        assert_eq!(snapshot.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_value_is_error() {
        let manager = in_memory_manager();
        manager
            .set_global_config_value(config_keys::AIKEN_MIN_OPTIONS, "two")
            .unwrap();
        manager
            .set_global_config_value(config_keys::NAME_FALLBACK_ENABLED, "maybe")
            .unwrap();

        let err = manager.get_aiken_min_options().await.unwrap_err();
        assert!(err.to_string().contains(config_keys::AIKEN_MIN_OPTIONS));
        assert!(manager.get_name_fallback_enabled().await.is_err());
    }
}

// ==========================================
// 教务管理系统 - 配置读取 Trait
// ==========================================
// 职责: 定义资格解析与题库导入所需的配置读取接口
// 实现者: ConfigManager（config_kv 表）/ StaticConfig（内置默认值）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::config_manager::config_keys;
use async_trait::async_trait;
use std::error::Error;

pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[async_trait]
pub trait CampusConfigReader: Send + Sync {
    // ===== 资格解析 =====

    /// 教师分配记录全部缺少模块 ID 时是否允许按名称匹配
    ///
    /// # 默认值
    /// - true
    async fn get_name_fallback_enabled(&self) -> ConfigResult<bool>;

    /// 单次解析中课程模块并发查询上限
    ///
    /// # 默认值
    /// - 4
    async fn get_course_fetch_concurrency(&self) -> ConfigResult<usize>;

    // ===== AIKEN 导入 =====

    /// 每题最少选项数
    ///
    /// # 默认值
    /// - 2
    async fn get_aiken_min_options(&self) -> ConfigResult<usize>;

    /// 每题最多选项数
    ///
    /// # 默认值
    /// - 6
    async fn get_aiken_max_options(&self) -> ConfigResult<usize>;

    /// 导入文件大小上限（字节）
    ///
    /// # 默认值
    /// - 1048576
    async fn get_aiken_max_file_bytes(&self) -> ConfigResult<u64>;
}

/// 内置默认配置（无数据库场景）
#[derive(Debug, Clone)]
pub struct StaticConfig {
    pub name_fallback_enabled: bool,
    pub course_fetch_concurrency: usize,
    pub aiken_min_options: usize,
    pub aiken_max_options: usize,
    pub aiken_max_file_bytes: u64,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            name_fallback_enabled: config_keys::DEFAULT_NAME_FALLBACK_ENABLED,
            course_fetch_concurrency: config_keys::DEFAULT_COURSE_FETCH_CONCURRENCY,
            aiken_min_options: config_keys::DEFAULT_AIKEN_MIN_OPTIONS,
            aiken_max_options: config_keys::DEFAULT_AIKEN_MAX_OPTIONS,
            aiken_max_file_bytes: config_keys::DEFAULT_AIKEN_MAX_FILE_BYTES,
        }
    }
}

#[async_trait]
impl CampusConfigReader for StaticConfig {
    async fn get_name_fallback_enabled(&self) -> ConfigResult<bool> {
        Ok(self.name_fallback_enabled)
    }

    async fn get_course_fetch_concurrency(&self) -> ConfigResult<usize> {
        Ok(self.course_fetch_concurrency)
    }

    async fn get_aiken_min_options(&self) -> ConfigResult<usize> {
        Ok(self.aiken_min_options)
    }

    async fn get_aiken_max_options(&self) -> ConfigResult<usize> {
        Ok(self.aiken_max_options)
    }

    async fn get_aiken_max_file_bytes(&self) -> ConfigResult<u64> {
        Ok(self.aiken_max_file_bytes)
    }
}

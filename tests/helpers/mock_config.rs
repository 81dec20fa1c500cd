// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use campus_admin::config::campus_config_trait::ConfigResult;
use campus_admin::config::CampusConfigReader;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub name_fallback_enabled: bool,
    pub course_fetch_concurrency: usize,
    pub aiken_min_options: usize,
    pub aiken_max_options: usize,
    pub aiken_max_file_bytes: u64,
    /// 为 true 时所有读取都返回错误
    pub broken: bool,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            name_fallback_enabled: true,
            course_fetch_concurrency: 4,
            aiken_min_options: 2,
            aiken_max_options: 6,
            aiken_max_file_bytes: 1024 * 1024,
            broken: false,
        }
    }

    pub fn without_name_fallback() -> Self {
        let mut config = Self::default();
        config.name_fallback_enabled = false;
        config
    }

    pub fn broken() -> Self {
        let mut config = Self::default();
        config.broken = true;
        config
    }

    fn check(&self) -> ConfigResult<()> {
        if self.broken {
            return Err("config_kv 不可读".into());
        }
        Ok(())
    }
}

#[async_trait]
impl CampusConfigReader for MockConfig {
    async fn get_name_fallback_enabled(&self) -> ConfigResult<bool> {
        self.check()?;
        Ok(self.name_fallback_enabled)
    }

    async fn get_course_fetch_concurrency(&self) -> ConfigResult<usize> {
        self.check()?;
        Ok(self.course_fetch_concurrency)
    }

    async fn get_aiken_min_options(&self) -> ConfigResult<usize> {
        self.check()?;
        Ok(self.aiken_min_options)
    }

    async fn get_aiken_max_options(&self) -> ConfigResult<usize> {
        self.check()?;
        Ok(self.aiken_max_options)
    }

    async fn get_aiken_max_file_bytes(&self) -> ConfigResult<u64> {
        self.check()?;
        Ok(self.aiken_max_file_bytes)
    }
}

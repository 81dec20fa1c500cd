// ==========================================
// 教务管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::QuestionBankApi;
use crate::app::session::AssignmentFormSession;
use crate::backend::{AcademicBackend, AcademicGateway};
use crate::config::config_manager::ConfigManager;
use crate::db::open_sqlite_connection;
use crate::engine::{AssignmentEventPublisher, NoOpEventPublisher};
use crate::repository::QuestionRepository;

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器（config_kv）
    pub config: Arc<ConfigManager>,

    /// 题库API
    pub question_bank_api: Arc<QuestionBankApi<ConfigManager>>,

    /// 后端网关
    pub gateway: AcademicGateway,

    /// 分配事件发布者
    pub publisher: Arc<dyn AssignmentEventPublisher>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - backend: 后端实现
    pub fn new(db_path: String, backend: Arc<dyn AcademicBackend>) -> Result<Self, String> {
        Self::with_publisher(db_path, backend, Arc::new(NoOpEventPublisher))
    }

    pub fn with_publisher(
        db_path: String,
        backend: Arc<dyn AcademicBackend>,
        publisher: Arc<dyn AssignmentEventPublisher>,
    ) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法初始化ConfigManager: {}", e))?,
        );
        let question_repo = Arc::new(
            QuestionRepository::from_connection(conn)
                .map_err(|e| format!("无法初始化QuestionRepository: {}", e))?,
        );
        let question_bank_api = Arc::new(QuestionBankApi::new(question_repo, config.clone()));

        Ok(Self {
            db_path,
            config,
            question_bank_api,
            gateway: AcademicGateway::new(backend),
            publisher,
        })
    }

    /// 新建一个分配表单会话（独立缓存）
    pub fn new_assignment_session(&self) -> AssignmentFormSession<ConfigManager> {
        AssignmentFormSession::new(
            self.gateway.clone(),
            self.config.clone(),
            self.publisher.clone(),
        )
    }
}

/// 获取默认数据库路径
///
/// # 返回
/// - CAMPUS_ADMIN_DB_PATH 环境变量（若设置）
/// - 否则: 用户数据目录/campus-admin/campus_admin.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("CAMPUS_ADMIN_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./campus_admin.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("campus-admin");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("campus_admin.db");
        }
    }

    path.to_string_lossy().to_string()
}

// ==========================================
// 集成测试辅助模块
// ==========================================
#![allow(dead_code)]

pub mod fixture_builder;
pub mod mock_config;

use std::sync::Arc;

use campus_admin::backend::{AcademicBackend, AcademicGateway, InMemoryBackend};
use campus_admin::engine::RecordingEventPublisher;
use campus_admin::AssignmentFormSession;
use mock_config::MockConfig;

/// 会话测试环境（保留后端句柄以便检查调用次数）
pub struct SessionEnv {
    pub backend: Arc<InMemoryBackend>,
    pub publisher: RecordingEventPublisher,
    pub session: AssignmentFormSession<MockConfig>,
}

impl SessionEnv {
    pub fn new(backend: InMemoryBackend) -> Self {
        Self::with_config(backend, MockConfig::default())
    }

    pub fn with_config(backend: InMemoryBackend, config: MockConfig) -> Self {
        campus_admin::logging::init_test();
        let backend = Arc::new(backend);
        let dyn_backend: Arc<dyn AcademicBackend> = backend.clone();
        let publisher = RecordingEventPublisher::new();
        let session = AssignmentFormSession::new(
            AcademicGateway::new(dyn_backend),
            Arc::new(config),
            Arc::new(publisher.clone()),
        );
        Self {
            backend,
            publisher,
            session,
        }
    }
}

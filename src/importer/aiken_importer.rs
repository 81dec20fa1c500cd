// ==========================================
// 教务管理系统 - AIKEN 题库导入器
// ==========================================
// 职责: 整合导入流程，从文件到题库
// 流程: 读取 → 解析 → 校验 → 落库 → 报告
// ==========================================

use crate::config::CampusConfigReader;
use crate::importer::aiken_parser::AikenParser;
use crate::importer::aiken_validator::AikenValidator;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::QuestionBankStore;
use crate::importer::report::{ImportBatchRecord, ImportReport};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// AikenImporter
// ==========================================
pub struct AikenImporter<S, C>
where
    S: QuestionBankStore,
    C: CampusConfigReader,
{
    // 题库存储
    store: S,

    // 配置读取器
    config: Arc<C>,
}

impl<S, C> AikenImporter<S, C>
where
    S: QuestionBankStore,
    C: CampusConfigReader,
{
    pub fn new(store: S, config: Arc<C>) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 从文件导入
    ///
    /// # 错误
    /// - FileNotFound / FileTooLarge / InvalidEncoding
    /// - EmptyFile: 文件中没有任何题目
    /// - BankNotFound: 目标题库不存在
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn import_file<P: AsRef<Path> + Send>(
        &self,
        path: P,
        bank_id: i64,
    ) -> ImportResult<ImportReport> {
        let path = path.as_ref();
        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ImportError::FileNotFound(path.display().to_string())
            } else {
                ImportError::from(e)
            }
        })?;

        let limit = self.max_file_bytes().await?;
        if metadata.len() > limit {
            return Err(ImportError::FileTooLarge {
                size: metadata.len(),
                limit,
            });
        }

        let bytes = tokio::fs::read(path).await?;
        let text = String::from_utf8(bytes)
            .map_err(|e| ImportError::InvalidEncoding(format!("{}: {}", source_name, e)))?;

        self.import_text(&text, bank_id, &source_name).await
    }

    /// 从文本导入（source_name 仅用于报告）
    #[instrument(skip(self, text), fields(import_batch_id))]
    pub async fn import_text(
        &self,
        text: &str,
        bank_id: i64,
        source_name: &str,
    ) -> ImportResult<ImportReport> {
        let import_batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("import_batch_id", import_batch_id.as_str());
        info!(bank_id, source_name, "开始导入 AIKEN 题目");

        if !self.store.bank_exists(bank_id).await? {
            return Err(ImportError::BankNotFound(bank_id));
        }

        // === 步骤 1: 解析 ===
        let blocks = AikenParser::parse(text);
        if blocks.is_empty() {
            return Err(ImportError::EmptyFile(source_name.to_string()));
        }
        debug!(blocks = blocks.len(), "解析完成");

        // === 步骤 2: 校验 ===
        let validator = self.validator().await?;
        let mut questions = Vec::new();
        let mut violations = Vec::new();
        for block in &blocks {
            let checked = validator.validate(block);
            violations.extend(checked.violations);
            if let Some(question) = checked.question {
                questions.push(question);
            }
        }

        let total = blocks.len();
        let failed = total - questions.len();
        if failed > 0 {
            warn!(failed, total, "部分题目未通过校验");
        }

        // === 步骤 3: 落库 ===
        let batch = ImportBatchRecord {
            import_batch_id,
            bank_id,
            source_name: source_name.to_string(),
            total_questions: total,
            imported_questions: questions.len(),
            failed_questions: failed,
            imported_at: Utc::now(),
        };
        // 批次行与题目同一事务写入，写入数必须与批次计数一致
        let imported = self.store.save_import(&batch, &questions).await?;
        if imported != batch.imported_questions {
            return Err(ImportError::StoreError(format!(
                "导入批次 {} 应写入 {} 题，实际写入 {} 题",
                batch.import_batch_id, batch.imported_questions, imported
            )));
        }

        info!(
            import_batch_id = %batch.import_batch_id,
            total,
            imported,
            failed,
            "AIKEN 导入完成"
        );

        Ok(ImportReport { batch, violations })
    }

    async fn validator(&self) -> ImportResult<AikenValidator> {
        let min = self
            .config
            .get_aiken_min_options()
            .await
            .map_err(|e| config_error(crate::config::config_keys::AIKEN_MIN_OPTIONS, e))?;
        let max = self
            .config
            .get_aiken_max_options()
            .await
            .map_err(|e| config_error(crate::config::config_keys::AIKEN_MAX_OPTIONS, e))?;
        Ok(AikenValidator::new(min, max))
    }

    async fn max_file_bytes(&self) -> ImportResult<u64> {
        self.config
            .get_aiken_max_file_bytes()
            .await
            .map_err(|e| config_error(crate::config::config_keys::AIKEN_MAX_FILE_BYTES, e))
    }
}

fn config_error(key: &str, err: Box<dyn std::error::Error + Send + Sync>) -> ImportError {
    ImportError::ConfigReadError {
        key: key.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticConfig;
    use crate::domain::AikenQuestion;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        saved: Mutex<Vec<(ImportBatchRecord, Vec<AikenQuestion>)>>,
        // 模拟只写入部分题目的存储
        write_limit: Option<usize>,
    }

    #[async_trait]
    impl QuestionBankStore for MemoryStore {
        async fn bank_exists(&self, bank_id: i64) -> ImportResult<bool> {
            Ok(bank_id == 1)
        }

        async fn save_import(
            &self,
            batch: &ImportBatchRecord,
            questions: &[AikenQuestion],
        ) -> ImportResult<usize> {
            self.saved
                .lock()
                .unwrap()
                .push((batch.clone(), questions.to_vec()));
            Ok(self
                .write_limit
                .map_or(questions.len(), |limit| limit.min(questions.len())))
        }
    }

    fn importer() -> AikenImporter<MemoryStore, StaticConfig> {
        AikenImporter::new(MemoryStore::default(), Arc::new(StaticConfig::default()))
    }

    #[tokio::test]
    async fn test_import_text_mixed() {
        let importer = importer();
        let text = "Q1?\nA. a\nB. b\nANSWER: A\n\nQ2?\nA. a\nB. b\nANSWER: Z\n";

        let report = importer.import_text(text, 1, "quiz.txt").await.unwrap();

        assert_eq!(report.batch.total_questions, 2);
        assert_eq!(report.batch.imported_questions, 1);
        assert_eq!(report.batch.failed_questions, 1);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.violations[0].question_index, 2);
        assert_eq!(report.violations[0].line_number, 9);

        let saved = importer.store().saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].1[0].question_text, "Q1?");
    }

    #[tokio::test]
    async fn test_import_counts_always_add_up() {
        let importer = importer();
        let text = "Q1?\nA. a\nB. b\nANSWER: A\n\nQ2?\nA. a\nANSWER: A\n\nQ3?\nA. x\nB. y\nANSWER: B\n";

        let report = importer.import_text(text, 1, "quiz.txt").await.unwrap();

        let batch = &report.batch;
        assert_eq!(batch.total_questions, 3);
        assert_eq!(batch.imported_questions, 2);
        assert_eq!(
            batch.imported_questions + batch.failed_questions,
            batch.total_questions
        );
        let saved = importer.store().saved.lock().unwrap();
        assert_eq!(saved[0].0.imported_questions, saved[0].1.len());
    }

    #[tokio::test]
    async fn test_import_short_write_is_error() {
        let store = MemoryStore {
            write_limit: Some(1),
            ..MemoryStore::default()
        };
        let importer = AikenImporter::new(store, Arc::new(StaticConfig::default()));
        let text = "Q1?\nA. a\nB. b\nANSWER: A\n\nQ2?\nA. a\nB. b\nANSWER: B\n";

        let err = importer.import_text(text, 1, "quiz.txt").await.unwrap_err();
        assert!(matches!(err, ImportError::StoreError(_)));
    }

    #[tokio::test]
    async fn test_import_text_empty_is_error() {
        let err = importer().import_text("\n\n  \n", 1, "empty.txt").await.unwrap_err();
        assert!(matches!(err, ImportError::EmptyFile(_)));
    }

    #[tokio::test]
    async fn test_import_unknown_bank() {
        let err = importer()
            .import_text("Q?\nA. a\nB. b\nANSWER: A", 9, "quiz.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::BankNotFound(9)));
    }

    #[tokio::test]
    async fn test_import_file_too_large() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, "Q?\nA. a\nB. b\nANSWER: A\n").unwrap();

        let config = StaticConfig {
            aiken_max_file_bytes: 4,
            ..StaticConfig::default()
        };
        let importer = AikenImporter::new(MemoryStore::default(), Arc::new(config));
        let err = importer.import_file(&path, 1).await.unwrap_err();
        assert!(matches!(err, ImportError::FileTooLarge { limit: 4, .. }));
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let err = importer()
            .import_file("/nonexistent/quiz.txt", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }
}

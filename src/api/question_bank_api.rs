// ==========================================
// 教务管理系统 - 题库 API
// ==========================================
// 职责: 题库创建、AIKEN 导入、题目查询、报告导出
// ==========================================

use std::path::Path;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::CampusConfigReader;
use crate::domain::StoredQuestion;
use crate::importer::{AikenImporter, ImportReport};
use crate::repository::{QuestionBankEntity, QuestionRepository};

/// 题库API
pub struct QuestionBankApi<C>
where
    C: CampusConfigReader,
{
    repo: Arc<QuestionRepository>,
    importer: AikenImporter<Arc<QuestionRepository>, C>,
}

impl<C> QuestionBankApi<C>
where
    C: CampusConfigReader,
{
    pub fn new(repo: Arc<QuestionRepository>, config: Arc<C>) -> Self {
        Self {
            importer: AikenImporter::new(repo.clone(), config),
            repo,
        }
    }

    /// 创建题库
    pub fn create_bank(&self, name: &str) -> ApiResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("题库名称不能为空".to_string()));
        }
        Ok(self.repo.create_bank(name)?)
    }

    pub fn list_banks(&self) -> ApiResult<Vec<QuestionBankEntity>> {
        Ok(self.repo.list_banks()?)
    }

    /// 导入 AIKEN 文件
    ///
    /// # 返回
    /// - Ok(ImportReport): 含逐题问题；部分题目失败不视为错误
    /// - Err(ApiError): 文件不可读、空文件、题库不存在等
    pub async fn import_aiken_file(&self, path: &Path, bank_id: i64) -> ApiResult<ImportReport> {
        if bank_id <= 0 {
            return Err(ApiError::InvalidInput(format!("无效的题库ID: {}", bank_id)));
        }
        Ok(self.importer.import_file(path, bank_id).await?)
    }

    /// 导入 AIKEN 文本（粘贴内容）
    pub async fn import_aiken_text(
        &self,
        text: &str,
        bank_id: i64,
        source_name: &str,
    ) -> ApiResult<ImportReport> {
        if bank_id <= 0 {
            return Err(ApiError::InvalidInput(format!("无效的题库ID: {}", bank_id)));
        }
        Ok(self.importer.import_text(text, bank_id, source_name).await?)
    }

    pub fn list_questions(&self, bank_id: i64) -> ApiResult<Vec<StoredQuestion>> {
        Ok(self.repo.list_by_bank(bank_id)?)
    }

    pub fn count_questions(&self, bank_id: i64) -> ApiResult<usize> {
        Ok(self.repo.count_by_bank(bank_id)?)
    }

    /// 导出问题清单到 CSV 文件
    pub fn write_report_csv(&self, report: &ImportReport, path: &Path) -> ApiResult<()> {
        let csv = report.to_csv()?;
        std::fs::write(path, csv)
            .map_err(|e| ApiError::Import(format!("报告写入失败 {}: {}", path.display(), e)))
    }
}

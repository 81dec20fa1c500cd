// ==========================================
// 教务管理系统 - 题库导入 Trait
// ==========================================
// 职责: 定义导入流水线的输出端口（不包含实现）
// 实现者: QuestionRepository（SQLite）
// ==========================================

use crate::domain::AikenQuestion;
use crate::importer::error::ImportResult;
use crate::importer::report::ImportBatchRecord;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait QuestionBankStore: Send + Sync {
    /// 题库是否存在
    async fn bank_exists(&self, bank_id: i64) -> ImportResult<bool>;

    /// 在一个事务内写入导入批次与题目
    ///
    /// # 返回
    /// - 实际写入题目数
    async fn save_import(
        &self,
        batch: &ImportBatchRecord,
        questions: &[AikenQuestion],
    ) -> ImportResult<usize>;
}

#[async_trait]
impl<T> QuestionBankStore for Arc<T>
where
    T: QuestionBankStore + ?Sized,
{
    async fn bank_exists(&self, bank_id: i64) -> ImportResult<bool> {
        (**self).bank_exists(bank_id).await
    }

    async fn save_import(
        &self,
        batch: &ImportBatchRecord,
        questions: &[AikenQuestion],
    ) -> ImportResult<usize> {
        (**self).save_import(batch, questions).await
    }
}

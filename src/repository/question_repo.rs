// ==========================================
// 教务管理系统 - 题库仓储
// ==========================================
// 职责: question_bank / question_import_batch / question / question_option
// 红线: 一次导入在单个事务内完成，失败整体回滚
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::{AikenOption, AikenQuestion, StoredQuestion};
use crate::importer::error::ImportResult;
use crate::importer::importer_trait::QuestionBankStore;
use crate::importer::report::ImportBatchRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// 题库实体
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBankEntity {
    pub bank_id: i64,
    pub name: String,
    pub created_at: String,
}

pub struct QuestionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl QuestionRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        init_schema(&*repo.get_conn()?)?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 题库
    // ==========================================

    pub fn create_bank(&self, name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute("INSERT INTO question_bank (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_bank(&self, bank_id: i64) -> RepositoryResult<Option<QuestionBankEntity>> {
        let conn = self.get_conn()?;
        let bank = conn
            .query_row(
                "SELECT bank_id, name, created_at FROM question_bank WHERE bank_id = ?1",
                params![bank_id],
                |row| {
                    Ok(QuestionBankEntity {
                        bank_id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(bank)
    }

    pub fn list_banks(&self) -> RepositoryResult<Vec<QuestionBankEntity>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT bank_id, name, created_at FROM question_bank ORDER BY bank_id")?;
        let banks = stmt
            .query_map([], |row| {
                Ok(QuestionBankEntity {
                    bank_id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(banks)
    }

    // ==========================================
    // 题目
    // ==========================================

    pub fn count_by_bank(&self, bank_id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM question WHERE bank_id = ?1",
            params![bank_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// 按导入顺序返回题库内题目（含选项）
    pub fn list_by_bank(&self, bank_id: i64) -> RepositoryResult<Vec<StoredQuestion>> {
        let conn = self.get_conn()?;

        let mut option_stmt = conn.prepare(
            r#"
            SELECT o.question_id, o.letter, o.text
            FROM question_option o
            JOIN question q ON q.question_id = o.question_id
            WHERE q.bank_id = ?1
            ORDER BY o.question_id, o.letter
            "#,
        )?;
        let mut options: HashMap<String, Vec<AikenOption>> = HashMap::new();
        let rows = option_stmt.query_map(params![bank_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        for row in rows {
            let (question_id, letter, text) = row?;
            options.entry(question_id).or_default().push(AikenOption {
                letter: parse_letter("letter", &letter)?,
                text,
            });
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT q.question_id, q.bank_id, q.import_batch_id, q.question_text,
                   q.answer, q.created_at
            FROM question q
            JOIN question_import_batch b ON b.import_batch_id = q.import_batch_id
            WHERE q.bank_id = ?1
            ORDER BY b.imported_at, q.source_line
            "#,
        )?;
        let rows = stmt.query_map(params![bank_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, DateTime<Utc>>(5)?,
            ))
        })?;

        let mut questions = Vec::new();
        for row in rows {
            let (question_id, bank_id, import_batch_id, question_text, answer, created_at) = row?;
            let options = options.remove(&question_id).unwrap_or_default();
            questions.push(StoredQuestion {
                question_id,
                bank_id,
                import_batch_id,
                question_text,
                options,
                answer: parse_letter("answer", &answer)?,
                created_at,
            });
        }
        Ok(questions)
    }

    pub fn list_import_batches(&self, bank_id: i64) -> RepositoryResult<Vec<ImportBatchRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT import_batch_id, bank_id, source_name, total_questions,
                   imported_questions, failed_questions, imported_at
            FROM question_import_batch
            WHERE bank_id = ?1
            ORDER BY imported_at
            "#,
        )?;
        let batches = stmt
            .query_map(params![bank_id], |row| {
                Ok(ImportBatchRecord {
                    import_batch_id: row.get(0)?,
                    bank_id: row.get(1)?,
                    source_name: row.get(2)?,
                    total_questions: row.get::<_, i64>(3)? as usize,
                    imported_questions: row.get::<_, i64>(4)? as usize,
                    failed_questions: row.get::<_, i64>(5)? as usize,
                    imported_at: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(batches)
    }

    /// 单事务写入导入批次与题目
    pub fn insert_import(
        &self,
        batch: &ImportBatchRecord,
        questions: &[AikenQuestion],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let bank_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM question_bank WHERE bank_id = ?1)",
            params![batch.bank_id],
            |row| row.get(0),
        )?;
        if !bank_exists {
            return Err(RepositoryError::NotFound {
                entity: "QuestionBank".to_string(),
                id: batch.bank_id.to_string(),
            });
        }

        tx.execute(
            r#"
            INSERT INTO question_import_batch (
              import_batch_id, bank_id, source_name, total_questions,
              imported_questions, failed_questions, imported_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                batch.import_batch_id,
                batch.bank_id,
                batch.source_name,
                batch.total_questions as i64,
                questions.len() as i64,
                batch.failed_questions as i64,
                batch.imported_at,
            ],
        )?;

        {
            let mut insert_question = tx.prepare(
                r#"
                INSERT INTO question (
                  question_id, bank_id, import_batch_id, question_text,
                  answer, source_line, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;
            let mut insert_option = tx.prepare(
                "INSERT INTO question_option (question_id, letter, text) VALUES (?1, ?2, ?3)",
            )?;

            for question in questions {
                let question_id = Uuid::new_v4().to_string();
                insert_question.execute(params![
                    question_id,
                    batch.bank_id,
                    batch.import_batch_id,
                    question.question_text,
                    question.answer.to_string(),
                    question.source_line as i64,
                    batch.imported_at,
                ])?;
                for option in &question.options {
                    insert_option.execute(params![
                        question_id,
                        option.letter.to_string(),
                        option.text,
                    ])?;
                }
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        debug!(
            import_batch_id = %batch.import_batch_id,
            count = questions.len(),
            "题目已写入题库"
        );
        Ok(questions.len())
    }
}

fn parse_letter(field: &str, value: &str) -> RepositoryResult<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(RepositoryError::FieldValueError {
            field: field.to_string(),
            message: format!("应为单个字母: '{}'", value),
        }),
    }
}

#[async_trait]
impl QuestionBankStore for QuestionRepository {
    async fn bank_exists(&self, bank_id: i64) -> ImportResult<bool> {
        Ok(self.find_bank(bank_id)?.is_some())
    }

    async fn save_import(
        &self,
        batch: &ImportBatchRecord,
        questions: &[AikenQuestion],
    ) -> ImportResult<usize> {
        Ok(self.insert_import(batch, questions)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> QuestionRepository {
        let conn = Connection::open_in_memory().unwrap();
        QuestionRepository::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    fn question(text: &str, line: usize) -> AikenQuestion {
        AikenQuestion {
            question_text: text.to_string(),
            options: vec![
                AikenOption {
                    letter: 'A',
                    text: "yes".to_string(),
                },
                AikenOption {
                    letter: 'B',
                    text: "no".to_string(),
                },
            ],
            answer: 'B',
            source_line: line,
        }
    }

    fn batch(bank_id: i64) -> ImportBatchRecord {
        ImportBatchRecord {
            import_batch_id: Uuid::new_v4().to_string(),
            bank_id,
            source_name: "quiz.txt".to_string(),
            total_questions: 2,
            imported_questions: 2,
            failed_questions: 0,
            imported_at: Utc::now(),
        }
    }

    #[test]
    fn test_insert_and_list() {
        let repo = repo();
        let bank_id = repo.create_bank("Rust 基础").unwrap();

        let inserted = repo
            .insert_import(&batch(bank_id), &[question("Q1", 1), question("Q2", 5)])
            .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(repo.count_by_bank(bank_id).unwrap(), 2);
        let stored = repo.list_by_bank(bank_id).unwrap();
        assert_eq!(stored[0].question_text, "Q1");
        assert_eq!(stored[1].question_text, "Q2");
        assert_eq!(stored[0].answer, 'B');
        assert_eq!(stored[0].options.len(), 2);
        assert_eq!(repo.list_import_batches(bank_id).unwrap().len(), 1);
    }

    #[test]
    fn test_insert_into_missing_bank() {
        let repo = repo();
        let err = repo.insert_import(&batch(42), &[question("Q1", 1)]).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
        assert_eq!(repo.count_by_bank(42).unwrap(), 0);
    }

    #[test]
    fn test_duplicate_bank_name() {
        let repo = repo();
        repo.create_bank("数学").unwrap();
        let err = repo.create_bank("数学").unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }
}

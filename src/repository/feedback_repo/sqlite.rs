use super::core::FeedbackRepository;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::feedback::FeedbackRecord;
use crate::domain::types::{RecommendationCategory, RecommendationStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

// ==========================================
// SqliteFeedbackRepository - feedback_log 表
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
pub struct SqliteFeedbackRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteFeedbackRepository {
    /// 使用共享连接 (调用方负责建表)
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 打开数据库文件并确保表结构存在
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 全部记录数
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM feedback_log", [], |row| row.get(0))?;
        Ok(n.max(0) as usize)
    }

    fn map_row(row: &Row) -> SqliteResult<FeedbackRecord> {
        let category: String = row.get(2)?;
        let status: String = row.get(3)?;
        let ts_str: String = row.get(4)?;

        let category = category.parse::<RecommendationCategory>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::from(e))
        })?;
        let status = status.parse::<RecommendationStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::from(e))
        })?;
        let timestamp = NaiveDateTime::parse_from_str(&ts_str, TS_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

        Ok(FeedbackRecord {
            feedback_id: row.get(0)?,
            recommendation_id: row.get(1)?,
            category,
            status,
            timestamp,
            note: row.get(5)?,
        })
    }
}

impl FeedbackRepository for SqliteFeedbackRepository {
    fn append(&self, record: &FeedbackRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO feedback_log (
                feedback_id, recommendation_id, category, status, feedback_ts, note
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.feedback_id,
                record.recommendation_id,
                record.category.as_str(),
                record.status.as_str(),
                record.timestamp.format(TS_FORMAT).to_string(),
                record.note,
            ],
        )?;
        Ok(())
    }

    fn query_by_category(
        &self,
        category: RecommendationCategory,
    ) -> RepositoryResult<Vec<FeedbackRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT feedback_id, recommendation_id, category, status, feedback_ts, note
            FROM feedback_log
            WHERE category = ?1
            ORDER BY seq ASC
            "#,
        )?;

        let records = stmt
            .query_map(params![category.as_str()], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }
}

use super::core::FeedbackRepository;
use crate::domain::feedback::FeedbackRecord;
use crate::domain::types::RecommendationCategory;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::sync::{Mutex, MutexGuard};

// ==========================================
// InMemoryFeedbackRepository - 进程内反馈日志
// ==========================================
#[derive(Default)]
pub struct InMemoryFeedbackRepository {
    records: Mutex<Vec<FeedbackRecord>>,
}

impl InMemoryFeedbackRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Vec<FeedbackRecord>>> {
        self.records
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 当前记录总数
    pub fn len(&self) -> RepositoryResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> RepositoryResult<bool> {
        Ok(self.lock()?.is_empty())
    }
}

impl FeedbackRepository for InMemoryFeedbackRepository {
    fn append(&self, record: &FeedbackRecord) -> RepositoryResult<()> {
        let mut records = self.lock()?;
        if records.iter().any(|r| r.feedback_id == record.feedback_id) {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "feedback_id={}",
                record.feedback_id
            )));
        }
        records.push(record.clone());
        Ok(())
    }

    fn query_by_category(
        &self,
        category: RecommendationCategory,
    ) -> RepositoryResult<Vec<FeedbackRecord>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect())
    }
}

use crate::domain::feedback::FeedbackRecord;
use crate::domain::types::RecommendationCategory;
use crate::repository::error::RepositoryResult;

// ==========================================
// FeedbackRepository - 反馈日志接口
// ==========================================
// 由调用方注入, 引擎不持有全局日志
pub trait FeedbackRepository: Send + Sync {
    /// 追加一条反馈
    fn append(&self, record: &FeedbackRecord) -> RepositoryResult<()>;

    /// 按类别查询, 按追加顺序返回
    fn query_by_category(
        &self,
        category: RecommendationCategory,
    ) -> RepositoryResult<Vec<FeedbackRecord>>;
}

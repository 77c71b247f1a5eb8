// ==========================================
// 项目组合财务健康分析 - 建议反馈 API
// ==========================================
// 职责: 记录用户对建议的处理决定, 按类别统计
// 红线: 只追加; pending 不是决定, 不允许写入
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::feedback::{FeedbackRecord, FeedbackSummary};
use crate::domain::recommendation::Recommendation;
use crate::domain::types::{RecommendationCategory, RecommendationStatus};
use crate::numeric::round;
use crate::repository::FeedbackRepository;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct FeedbackApi {
    repo: Arc<dyn FeedbackRepository>,
}

impl FeedbackApi {
    pub fn new(repo: Arc<dyn FeedbackRepository>) -> Self {
        Self { repo }
    }

    /// 记录对某条建议的决定
    pub fn record_decision(
        &self,
        recommendation: &Recommendation,
        status: RecommendationStatus,
        note: Option<String>,
    ) -> ApiResult<FeedbackRecord> {
        self.record_decision_by_id(&recommendation.id, recommendation.category, status, note)
    }

    /// 按建议 id 记录决定 (调用方只持有 id 和类别时使用)
    pub fn record_decision_by_id(
        &self,
        recommendation_id: &str,
        category: RecommendationCategory,
        status: RecommendationStatus,
        note: Option<String>,
    ) -> ApiResult<FeedbackRecord> {
        if !status.is_decision() {
            return Err(ApiError::InvalidStateTransition {
                from: RecommendationStatus::Pending.to_string(),
                to: status.to_string(),
            });
        }
        if recommendation_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("recommendation_id 不能为空".to_string()));
        }

        let record = FeedbackRecord {
            feedback_id: Uuid::new_v4().to_string(),
            recommendation_id: recommendation_id.to_string(),
            category,
            status,
            timestamp: Utc::now().naive_utc(),
            note: note.filter(|n| !n.trim().is_empty()),
        };
        self.repo.append(&record)?;

        tracing::info!(
            feedback_id = %record.feedback_id,
            recommendation_id = %record.recommendation_id,
            category = %category,
            status = %status,
            "建议反馈已记录"
        );
        Ok(record)
    }

    /// 某类别的全部反馈 (追加顺序)
    pub fn feedback_for_category(
        &self,
        category: RecommendationCategory,
    ) -> ApiResult<Vec<FeedbackRecord>> {
        Ok(self.repo.query_by_category(category)?)
    }

    /// 某类别的反馈统计
    pub fn summary(&self, category: RecommendationCategory) -> ApiResult<FeedbackSummary> {
        let records = self.repo.query_by_category(category)?;
        Ok(summarize(&records))
    }
}

fn summarize(records: &[FeedbackRecord]) -> FeedbackSummary {
    let mut summary = FeedbackSummary {
        total: records.len(),
        ..FeedbackSummary::default()
    };
    for record in records {
        match record.status {
            RecommendationStatus::Acknowledged => summary.acknowledged += 1,
            RecommendationStatus::Accepted => summary.accepted += 1,
            RecommendationStatus::Rejected => summary.rejected += 1,
            RecommendationStatus::Deferred => summary.deferred += 1,
            RecommendationStatus::Pending => {}
        }
    }

    let decided = summary.accepted + summary.rejected;
    summary.acceptance_rate = if decided == 0 {
        0.0
    } else {
        round(summary.accepted as f64 / decided as f64, 3)
    };
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryFeedbackRepository;

    fn api() -> FeedbackApi {
        FeedbackApi::new(Arc::new(InMemoryFeedbackRepository::new()))
    }

    #[test]
    fn test_pending_is_not_a_decision() {
        let api = api();
        let result = api.record_decision_by_id(
            "rec-1",
            RecommendationCategory::Budget,
            RecommendationStatus::Pending,
            None,
        );
        assert!(matches!(result, Err(ApiError::InvalidStateTransition { .. })));
        assert_eq!(api.summary(RecommendationCategory::Budget).unwrap().total, 0);
    }

    #[test]
    fn test_record_and_summarize() {
        let api = api();
        for status in [
            RecommendationStatus::Accepted,
            RecommendationStatus::Accepted,
            RecommendationStatus::Rejected,
            RecommendationStatus::Deferred,
            RecommendationStatus::Acknowledged,
        ] {
            api.record_decision_by_id("rec-1", RecommendationCategory::Vendor, status, None)
                .unwrap();
        }
        api.record_decision_by_id(
            "rec-2",
            RecommendationCategory::Risk,
            RecommendationStatus::Rejected,
            Some("  ".to_string()),
        )
        .unwrap();

        let vendor = api.summary(RecommendationCategory::Vendor).unwrap();
        assert_eq!(vendor.total, 5);
        assert_eq!(vendor.accepted, 2);
        assert_eq!(vendor.rejected, 1);
        assert_eq!(vendor.deferred, 1);
        assert_eq!(vendor.acknowledged, 1);
        assert!((vendor.acceptance_rate - 0.667).abs() < 1e-9);

        let risk = api.feedback_for_category(RecommendationCategory::Risk).unwrap();
        assert_eq!(risk.len(), 1);
        assert_eq!(risk[0].note, None);
    }

    #[test]
    fn test_acceptance_rate_without_decisions() {
        let api = api();
        api.record_decision_by_id(
            "rec-9",
            RecommendationCategory::Timeline,
            RecommendationStatus::Deferred,
            None,
        )
        .unwrap();
        let summary = api.summary(RecommendationCategory::Timeline).unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.acceptance_rate, 0.0);
    }

    #[test]
    fn test_feedback_ids_are_unique() {
        let api = api();
        let a = api
            .record_decision_by_id("rec-1", RecommendationCategory::Budget, RecommendationStatus::Accepted, None)
            .unwrap();
        let b = api
            .record_decision_by_id("rec-1", RecommendationCategory::Budget, RecommendationStatus::Accepted, None)
            .unwrap();
        assert_ne!(a.feedback_id, b.feedback_id);
    }
}

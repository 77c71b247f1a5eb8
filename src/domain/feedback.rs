// ==========================================
// 项目组合财务健康分析 - 建议反馈记录
// ==========================================
// 红线: 只追加, 不修改不删除
// 说明: 反馈暂不回灌生成器权重 (预留扩展点)
// ==========================================

use crate::domain::types::{RecommendationCategory, RecommendationStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub feedback_id: String,
    pub recommendation_id: String,
    pub category: RecommendationCategory,
    pub status: RecommendationStatus,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub note: Option<String>,
}

/// 单一类别的反馈统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSummary {
    pub total: usize,
    pub acknowledged: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub deferred: usize,
    /// accepted / (accepted + rejected), 无决定时为 0
    pub acceptance_rate: f64,
}

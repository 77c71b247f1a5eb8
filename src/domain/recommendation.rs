// ==========================================
// 项目组合财务健康分析 - 决策建议领域模型
// ==========================================
// 红线: 建议只通过 id 弱引用项目, 不持有项目对象
// 红线: 所有建议必须可解释 (supporting_data + risks)
// ==========================================

use crate::domain::types::{RecommendationCategory, RecommendationStatus};
use serde::{Deserialize, Serialize};

// ==========================================
// Recommendation - 决策建议
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub project_id: String,
    #[serde(rename = "type")]
    pub recommendation_type: String, // 建议类型, 如 budget_reallocation
    pub title: String,
    pub description: String,
    pub impact_amount: f64,
    pub confidence_score: f64, // 0~1
    pub action_required: bool,
    pub priority: f64, // 0~100
    pub category: RecommendationCategory,
    pub related_projects: Vec<String>,
    pub supporting_data: Vec<SupportingMetric>,
    pub risks: Vec<String>,
    pub status: RecommendationStatus,
}

// ==========================================
// SupportingMetric - 支撑数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportingMetric {
    pub label: String,
    pub value: f64,
    pub unit: MetricUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricUnit {
    Currency,
    Percent,
    Ratio,
    Days,
    Score,
    Count,
}

impl SupportingMetric {
    pub fn new(label: impl Into<String>, value: f64, unit: MetricUnit) -> Self {
        Self {
            label: label.into(),
            value: crate::numeric::round_money(value),
            unit,
        }
    }
}

// ==========================================
// RecommendationConfig - 生成配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub min_confidence: f64,
    pub max_recommendations: usize,
    pub include_low_priority: bool,
    pub categories: Vec<RecommendationCategory>,
    pub user_context: Option<UserContext>,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            max_recommendations: 10,
            include_low_priority: false,
            categories: RecommendationCategory::ALL.to_vec(),
            user_context: None,
        }
    }
}

/// 展示上下文 (租户名称用于标题前缀)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub tenant_name: String,
}

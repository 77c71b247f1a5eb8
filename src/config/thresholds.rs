// ==========================================
// 项目组合财务健康分析 - 引擎阈值配置
// ==========================================
// 职责: 预测器/建议引擎的可调参数与默认值, 以及调用配置校验
// ==========================================

use crate::config::error::{ensure_range, ConfigError, ConfigResult};
use crate::config::evm_bands::EvmStatusBands;
use crate::domain::recommendation::RecommendationConfig;
use crate::domain::types::{RecommendationCategory, RiskLevel, Trend};
use crate::engine::rules::{
    default_escalation_condition, default_risk_rules, symmetric_trend_rules, validate_condition,
    validate_rules, Rule, RuleCondition,
};
use serde::{Deserialize, Serialize};

// ==========================================
// AnalyticsConfig - 全量分析配置
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub evm_bands: EvmStatusBands,
    pub forecast: ForecastConfig,
    pub recommendation: RecommendationThresholds,
}

impl AnalyticsConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.evm_bands.validate()?;
        self.forecast.validate()?;
        self.recommendation.validate()?;
        Ok(())
    }
}

// ==========================================
// ForecastConfig - 预测器参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// 三种估计器权重: [进度比估计, 线性外推, 燃烧率外推]
    pub blend_weights: [f64; 3],
    pub improving_multiplier: f64,
    pub stable_multiplier: f64,
    pub declining_multiplier: f64,
    /// 趋势判定带宽 (预算占比, 以 0 为中心对称)
    pub trend_band_ratio: f64,
    /// 趋势判定使用的最近历史点数
    pub trend_window: usize,
    /// 有历史时进入完整趋势计算的最少点数
    pub min_trend_points: usize,
    /// 历史点数达到该值时历史置信加成饱和
    pub history_saturation_points: usize,
    /// 无法混合估计时的兜底置信度
    pub fallback_confidence: f64,
    pub max_confidence: f64,
    pub risk_rules: Vec<Rule<RiskLevel>>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            blend_weights: [0.3, 0.4, 0.3],
            improving_multiplier: 0.95,
            stable_multiplier: 1.0,
            declining_multiplier: 1.1,
            trend_band_ratio: 0.02,
            trend_window: 5,
            min_trend_points: 3,
            history_saturation_points: 12,
            fallback_confidence: 0.3,
            max_confidence: 0.95,
            risk_rules: default_risk_rules(),
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        for (idx, w) in self.blend_weights.iter().enumerate() {
            ensure_range(&format!("forecast.blend_weights[{}]", idx), *w, 0.0, 1.0)?;
        }
        let sum: f64 = self.blend_weights.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::OutOfRange {
                field: "forecast.blend_weights(sum)".to_string(),
                value: sum,
                min: 1.0,
                max: 1.0,
            });
        }

        ensure_range("forecast.improving_multiplier", self.improving_multiplier, 0.5, 1.0)?;
        ensure_range("forecast.stable_multiplier", self.stable_multiplier, 0.5, 1.5)?;
        ensure_range("forecast.declining_multiplier", self.declining_multiplier, 1.0, 2.0)?;
        ensure_range("forecast.trend_band_ratio", self.trend_band_ratio, 0.0, 1.0)?;
        ensure_range("forecast.fallback_confidence", self.fallback_confidence, 0.0, self.max_confidence)?;
        ensure_range("forecast.max_confidence", self.max_confidence, 0.0, 0.95)?;

        if self.trend_window == 0 {
            return Err(ConfigError::OutOfRange {
                field: "forecast.trend_window".to_string(),
                value: 0.0,
                min: 1.0,
                max: f64::MAX,
            });
        }
        if self.history_saturation_points == 0 {
            return Err(ConfigError::OutOfRange {
                field: "forecast.history_saturation_points".to_string(),
                value: 0.0,
                min: 1.0,
                max: f64::MAX,
            });
        }

        validate_rules(&self.risk_rules)
    }

    /// 趋势乘数
    pub fn trend_multiplier(&self, trend: Trend) -> f64 {
        match trend {
            Trend::Improving => self.improving_multiplier,
            Trend::Stable => self.stable_multiplier,
            Trend::Declining => self.declining_multiplier,
        }
    }

    /// 趋势分带规则表
    pub fn trend_rules(&self) -> Vec<Rule<Trend>> {
        symmetric_trend_rules(self.trend_band_ratio)
    }
}

// ==========================================
// RecommendationThresholds - 建议生成阈值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationThresholds {
    // ===== 预算 =====
    pub surplus_ratio: f64,             // 结余 > 预算 * 该比例 视为可调出
    pub donor_min_spend_progress: f64,  // 调出方最低支出进度
    pub transfer_share: f64,            // 最多调出结余的比例
    pub materiality_floor: f64,         // 调拨金额重要性门槛
    pub overrun_review_ratio: f64,      // 超支强制复核比例
    pub reallocation_confidence: f64,
    pub overrun_confidence: f64,

    // ===== 供应商 =====
    pub vendor_min_projects: usize,
    pub vendor_min_combined_spend: f64,
    pub vendor_savings_rate: f64,
    pub commitment_min_amount: f64,
    pub commitment_actual_ratio: f64,
    pub consolidation_confidence: f64,
    pub commitment_confidence: f64,

    // ===== 进度 =====
    pub timeline_gap: f64,
    pub ahead_priority_boost: f64,
    pub deadline_window_days: i64,
    pub deadline_min_spend_progress: f64,
    pub ahead_confidence: f64,
    pub behind_confidence: f64,
    pub deadline_confidence: f64,

    // ===== 风险 =====
    pub escalation_condition: RuleCondition,
    pub escalation_min_priority: f64,

    // ===== 优化 =====
    pub healthy_min_health: f64,
    pub struggling_max_health: f64,
    pub struggling_variance_ratio: f64, // 负数, 如 -0.1
    pub knowledge_transfer_confidence: f64,
    pub portfolio_min_projects: usize,
    pub portfolio_health_floor: f64,
    pub portfolio_review_confidence: f64,

    // ===== 后处理 =====
    pub low_priority_cutoff: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            surplus_ratio: 0.2,
            donor_min_spend_progress: 0.5,
            transfer_share: 0.5,
            materiality_floor: 10_000.0,
            overrun_review_ratio: 0.15,
            reallocation_confidence: 0.75,
            overrun_confidence: 0.9,

            vendor_min_projects: 3,
            vendor_min_combined_spend: 500_000.0,
            vendor_savings_rate: 0.08,
            commitment_min_amount: 50_000.0,
            commitment_actual_ratio: 2.0,
            consolidation_confidence: 0.6,
            commitment_confidence: 0.65,

            timeline_gap: 0.2,
            ahead_priority_boost: 10.0,
            deadline_window_days: 30,
            deadline_min_spend_progress: 0.8,
            ahead_confidence: 0.7,
            behind_confidence: 0.6,
            deadline_confidence: 0.7,

            escalation_condition: default_escalation_condition(),
            escalation_min_priority: 80.0,

            healthy_min_health: 80.0,
            struggling_max_health: 50.0,
            struggling_variance_ratio: -0.1,
            knowledge_transfer_confidence: 0.55,
            portfolio_min_projects: 3,
            portfolio_health_floor: 60.0,
            portfolio_review_confidence: 0.8,

            low_priority_cutoff: 30.0,
        }
    }
}

impl RecommendationThresholds {
    pub fn validate(&self) -> ConfigResult<()> {
        ensure_range("recommendation.surplus_ratio", self.surplus_ratio, 0.0, 1.0)?;
        ensure_range("recommendation.donor_min_spend_progress", self.donor_min_spend_progress, 0.0, 1.0)?;
        ensure_range("recommendation.transfer_share", self.transfer_share, 0.0, 1.0)?;
        ensure_range("recommendation.materiality_floor", self.materiality_floor, 0.0, f64::MAX)?;
        ensure_range("recommendation.overrun_review_ratio", self.overrun_review_ratio, 0.0, 10.0)?;
        ensure_range("recommendation.vendor_min_combined_spend", self.vendor_min_combined_spend, 0.0, f64::MAX)?;
        ensure_range("recommendation.vendor_savings_rate", self.vendor_savings_rate, 0.0, 1.0)?;
        ensure_range("recommendation.commitment_min_amount", self.commitment_min_amount, 0.0, f64::MAX)?;
        ensure_range("recommendation.commitment_actual_ratio", self.commitment_actual_ratio, 1.0, f64::MAX)?;
        ensure_range("recommendation.timeline_gap", self.timeline_gap, 0.0, 1.0)?;
        ensure_range("recommendation.ahead_priority_boost", self.ahead_priority_boost, 0.0, 100.0)?;
        ensure_range("recommendation.deadline_min_spend_progress", self.deadline_min_spend_progress, 0.0, 1.0)?;
        ensure_range("recommendation.escalation_min_priority", self.escalation_min_priority, 0.0, 100.0)?;
        ensure_range("recommendation.healthy_min_health", self.healthy_min_health, 0.0, 100.0)?;
        ensure_range("recommendation.struggling_max_health", self.struggling_max_health, 0.0, 100.0)?;
        ensure_range("recommendation.struggling_variance_ratio", self.struggling_variance_ratio, -10.0, 0.0)?;
        ensure_range("recommendation.portfolio_health_floor", self.portfolio_health_floor, 0.0, 100.0)?;
        ensure_range("recommendation.low_priority_cutoff", self.low_priority_cutoff, 0.0, 100.0)?;

        for (field, value) in [
            ("recommendation.reallocation_confidence", self.reallocation_confidence),
            ("recommendation.overrun_confidence", self.overrun_confidence),
            ("recommendation.consolidation_confidence", self.consolidation_confidence),
            ("recommendation.commitment_confidence", self.commitment_confidence),
            ("recommendation.ahead_confidence", self.ahead_confidence),
            ("recommendation.behind_confidence", self.behind_confidence),
            ("recommendation.deadline_confidence", self.deadline_confidence),
            ("recommendation.knowledge_transfer_confidence", self.knowledge_transfer_confidence),
            ("recommendation.portfolio_review_confidence", self.portfolio_review_confidence),
        ] {
            ensure_range(field, value, 0.0, 1.0)?;
        }

        if self.deadline_window_days < 0 {
            return Err(ConfigError::OutOfRange {
                field: "recommendation.deadline_window_days".to_string(),
                value: self.deadline_window_days as f64,
                min: 0.0,
                max: f64::MAX,
            });
        }

        validate_condition(&self.escalation_condition)
    }
}

// ==========================================
// RecommendationConfig 校验
// ==========================================

/// 校验调用方传入的建议生成配置
pub fn validate_recommendation_config(config: &RecommendationConfig) -> ConfigResult<()> {
    ensure_range("min_confidence", config.min_confidence, 0.0, 1.0)?;

    if config.max_recommendations == 0 {
        return Err(ConfigError::OutOfRange {
            field: "max_recommendations".to_string(),
            value: 0.0,
            min: 1.0,
            max: f64::MAX,
        });
    }

    if config.categories.is_empty() {
        return Err(ConfigError::InvalidCategory(
            "类别集合不能为空".to_string(),
        ));
    }

    Ok(())
}

/// 解析类别名称列表; 任一名称无效即拒绝
pub fn parse_categories<S: AsRef<str>>(names: &[S]) -> ConfigResult<Vec<RecommendationCategory>> {
    let mut categories = Vec::with_capacity(names.len());
    for name in names {
        let category = name
            .as_ref()
            .parse::<RecommendationCategory>()
            .map_err(ConfigError::InvalidCategory)?;
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    Ok(categories)
}

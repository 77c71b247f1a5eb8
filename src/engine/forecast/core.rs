use super::trend;
use crate::config::error::ConfigResult;
use crate::config::thresholds::ForecastConfig;
use crate::domain::forecast::PredictiveMetrics;
use crate::domain::project::{HistoricalDataPoint, ProgressSnapshot, ProjectFinancialRecord};
use crate::domain::types::Trend;
use crate::engine::progress;
use crate::engine::rules::{classify_risk, RuleFacts};
use crate::numeric::{finite_or, round_index, round_money, safe_div, safe_number};
use chrono::{Duration, NaiveDate};

/// 置信度基础值
const BASE_CONFIDENCE: f64 = 0.5;
/// 时间进度加成上限
const TIME_CONFIDENCE_WEIGHT: f64 = 0.2;
/// 历史数据量加成上限
const HISTORY_CONFIDENCE_WEIGHT: f64 = 0.2;
/// 执行中且已有支出
const ACTIVE_SPEND_BONUS: f64 = 0.1;
/// 健康分达标加成
const HEALTH_BONUS: f64 = 0.05;
const HEALTH_BONUS_THRESHOLD: f64 = 70.0;
/// 90% 区间: 下界/上界对不确定度的放大系数 (超支方向更宽)
const INTERVAL_LOW_FACTOR: f64 = 0.2;
const INTERVAL_HIGH_FACTOR: f64 = 0.3;
/// 置信度硬上限 (配置只能收紧)
const CONFIDENCE_CEILING: f64 = 0.95;

// ==========================================
// PredictiveForecaster - 成本预测引擎
// ==========================================
pub struct PredictiveForecaster {
    config: ForecastConfig,
}

impl PredictiveForecaster {
    /// 使用指定配置构造 (先校验)
    pub fn new(config: ForecastConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    fn confidence_cap(&self) -> f64 {
        finite_or(self.config.max_confidence, CONFIDENCE_CEILING).clamp(0.0, CONFIDENCE_CEILING)
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 以指定日期为时点预测 (内部计算进度快照)
    pub fn predict_at(
        &self,
        project: &ProjectFinancialRecord,
        as_of: NaiveDate,
        history: Option<&[HistoricalDataPoint]>,
    ) -> PredictiveMetrics {
        let snapshot = progress::snapshot(project, as_of);
        self.predict(project, &snapshot, history)
    }

    /// 预测单个项目
    ///
    /// # 参数
    /// - `project`: 项目记录
    /// - `snapshot`: 进度快照 (与 EVM 共用)
    /// - `history`: 历史支出序列 (由旧到新), 可选
    ///
    /// # 返回
    /// PredictiveMetrics, 结构完整且数值有限
    pub fn predict(
        &self,
        project: &ProjectFinancialRecord,
        snapshot: &ProgressSnapshot,
        history: Option<&[HistoricalDataPoint]>,
    ) -> PredictiveMetrics {
        let history = history.unwrap_or(&[]);
        let budget = safe_number(project.budget).max(0.0);
        let spend = safe_number(project.total_spend).max(0.0);
        let health = safe_number(project.health_score);

        let time_progress = snapshot.time_progress;
        let spend_progress = snapshot.spend_progress;
        let burn_rate = spend / snapshot.days_elapsed.max(1) as f64;

        // 1. 趋势
        let trend = trend::classify(history, budget, snapshot, health, &self.config);
        let multiplier = self.config.trend_multiplier(trend);

        // 2. EAC 与置信度
        let (predicted_eac, confidence) = if spend_progress > 0.0 && time_progress > 0.0 {
            let blended = self.blend_eac(budget, spend, time_progress, spend_progress, burn_rate, snapshot.days_remaining);
            let confidence = self.confidence(project, spend, time_progress, history.len());
            (blended * multiplier, confidence)
        } else {
            // 任一进度为 0 时混合估计在 0 附近数值不稳定, 直接以预算兜底
            tracing::debug!(
                project_id = %project.id,
                time_progress,
                spend_progress,
                "进度为 0, 跳过混合估计"
            );
            (budget, self.config.fallback_confidence)
        };

        let confidence = round_index(finite_or(confidence, 0.0).clamp(0.0, self.confidence_cap()));
        let predicted_eac = finite_or(predicted_eac, budget);

        // 3. 非对称 90% 区间
        let uncertainty = 1.0 - confidence;
        let eac_low = predicted_eac * (1.0 - uncertainty * INTERVAL_LOW_FACTOR);
        let eac_high = predicted_eac * (1.0 + uncertainty * INTERVAL_HIGH_FACTOR);

        // 4. 偏差与风险
        let projected_variance = budget - predicted_eac;
        let variance_ratio = safe_div(projected_variance, budget, 0.0);
        let risk_level = classify_risk(
            &self.config.risk_rules,
            &RuleFacts::for_risk(variance_ratio, health, trend),
        );

        // 5. 预计完工日期 / 预算耗尽天数
        let predicted_completion =
            self.predicted_completion(project.end_date, snapshot.total_days, multiplier);
        let days_until_budget_exhaustion =
            self.days_until_exhaustion(budget, spend, burn_rate, projected_variance);

        let metrics = PredictiveMetrics {
            predicted_eac: round_money(finite_or(predicted_eac, budget)),
            etc: round_money(finite_or((predicted_eac - spend).max(0.0), 0.0)),
            eac_low: round_money(finite_or(eac_low, budget)),
            eac_high: round_money(finite_or(eac_high, budget)),
            confidence,
            predicted_completion,
            burn_rate: round_money(finite_or(burn_rate, 0.0)),
            projected_variance: round_money(finite_or(projected_variance, 0.0)),
            risk_level,
            trend,
            days_until_budget_exhaustion,
        };

        tracing::debug!(
            project_id = %project.id,
            predicted_eac = metrics.predicted_eac,
            confidence = metrics.confidence,
            risk = %metrics.risk_level,
            trend = %metrics.trend,
            "成本预测完成"
        );

        metrics
    }

    // ==========================================
    // 估计器
    // ==========================================

    /// 三估计器加权混合 (未乘趋势乘数)
    ///
    /// - a: 进度比估计, budget / (time / spend)
    /// - b: 线性外推, spend + 剩余计划工作量 / 伪 CPI
    /// - c: 燃烧率外推, spend + burn_rate * 剩余日历天数
    fn blend_eac(
        &self,
        budget: f64,
        spend: f64,
        time_progress: f64,
        spend_progress: f64,
        burn_rate: f64,
        days_remaining: i64,
    ) -> f64 {
        let pseudo_cpi = safe_div(time_progress, spend_progress, 1.0);
        let pseudo_cpi = if pseudo_cpi > 0.0 { pseudo_cpi } else { 1.0 };

        let by_ratio = budget / pseudo_cpi;
        let by_linear = spend + budget * (1.0 - time_progress) / pseudo_cpi;
        let by_burn = spend + burn_rate * days_remaining.max(0) as f64;

        let [w_ratio, w_linear, w_burn] = self.config.blend_weights;
        let blended = w_ratio * by_ratio + w_linear * by_linear + w_burn * by_burn;

        finite_or(blended, budget)
    }

    /// 置信度 (混合估计路径)
    fn confidence(
        &self,
        project: &ProjectFinancialRecord,
        spend: f64,
        time_progress: f64,
        history_len: usize,
    ) -> f64 {
        let mut confidence = BASE_CONFIDENCE;

        confidence += TIME_CONFIDENCE_WEIGHT * time_progress.clamp(0.0, 1.0);

        let saturation = self.config.history_saturation_points.max(1) as f64;
        confidence += HISTORY_CONFIDENCE_WEIGHT * (history_len as f64 / saturation).min(1.0);

        if project.status.is_active() && spend > 0.0 {
            confidence += ACTIVE_SPEND_BONUS;
        }

        if project.health_score >= HEALTH_BONUS_THRESHOLD {
            confidence += HEALTH_BONUS;
        }

        confidence.min(self.confidence_cap())
    }

    /// 预计完工: 计划结束日按趋势乘数平移 (恶化顺延, 改善提前)
    fn predicted_completion(&self, end_date: NaiveDate, total_days: i64, multiplier: f64) -> NaiveDate {
        let shift = finite_or(total_days as f64 * (multiplier - 1.0), 0.0).round() as i64;
        end_date
            .checked_add_signed(Duration::days(shift))
            .unwrap_or(end_date)
    }

    /// 预算耗尽天数
    ///
    /// 仅当燃烧率 > 0 且预计超支时给出; 已无剩余预算为 0
    fn days_until_exhaustion(
        &self,
        budget: f64,
        spend: f64,
        burn_rate: f64,
        projected_variance: f64,
    ) -> Option<i64> {
        if !(burn_rate > 0.0 && projected_variance < 0.0) {
            return None;
        }

        let remaining = budget - spend;
        if remaining <= 0.0 {
            return Some(0);
        }

        let days = (remaining / burn_rate).ceil();
        if days.is_finite() {
            Some(days as i64)
        } else {
            None
        }
    }

    /// 趋势乘数 (供外部展示)
    pub fn trend_multiplier(&self, trend: Trend) -> f64 {
        self.config.trend_multiplier(trend)
    }
}

impl Default for PredictiveForecaster {
    fn default() -> Self {
        Self {
            config: ForecastConfig::default(),
        }
    }
}

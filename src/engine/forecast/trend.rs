use crate::config::thresholds::ForecastConfig;
use crate::domain::project::{HistoricalDataPoint, ProgressSnapshot};
use crate::domain::types::Trend;
use crate::engine::rules::classify_trend;
use crate::numeric::safe_number;

/// 健康分基准 (代理信号中高于该值视为正向)
const HEALTH_PIVOT: f64 = 70.0;
/// 健康分对代理信号的影响系数
const HEALTH_SIGNAL_WEIGHT: f64 = 0.05;

/// 趋势判定
///
/// - 历史点数 <= 1: 恒为 Stable
/// - 历史点数 >= min_trend_points: 最近 trend_window 个点的
///   (计划支出 - 实际支出) 均值 / 预算, 与 ±band 比较
/// - 其余 (点数不足): 以当前偏差率与健康分构造代理信号, 同一分带规则
pub(super) fn classify(
    history: &[HistoricalDataPoint],
    budget: f64,
    snapshot: &ProgressSnapshot,
    health_score: f64,
    config: &ForecastConfig,
) -> Trend {
    if history.len() <= 1 {
        return Trend::Stable;
    }

    let rules = config.trend_rules();
    let signal = if history.len() >= config.min_trend_points {
        history_signal(history, budget, config.trend_window)
    } else {
        proxy_signal(snapshot, health_score)
    };

    classify_trend(&rules, signal)
}

/// 历史偏差信号: 正值表示实际支出低于计划 (改善)
fn history_signal(history: &[HistoricalDataPoint], budget: f64, window: usize) -> f64 {
    if budget <= 0.0 {
        return 0.0;
    }

    let start = history.len().saturating_sub(window.max(1));
    let recent = &history[start..];
    if recent.is_empty() {
        return 0.0;
    }

    let total_deviation: f64 = recent
        .iter()
        .map(|p| safe_number(p.budget) - safe_number(p.spend))
        .sum();
    let avg_deviation = total_deviation / recent.len() as f64;

    safe_number(avg_deviation / budget)
}

/// 代理信号: 时间进度领先支出比例的幅度 + 健康分修正
fn proxy_signal(snapshot: &ProgressSnapshot, health_score: f64) -> f64 {
    let pacing = snapshot.time_progress - snapshot.spend_ratio;
    let health_adjust = (safe_number(health_score) - HEALTH_PIVOT) / 100.0 * HEALTH_SIGNAL_WEIGHT;
    safe_number(pacing + health_adjust)
}

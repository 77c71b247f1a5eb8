use crate::domain::types::Severity;
use crate::numeric::{round_money, safe_number};

/// 影响金额分量上限
const IMPACT_COMPONENT_CAP: f64 = 50.0;

/// 建议优先级 (0~100)
///
/// min(50, log10(max(1, impact)) * 10) + max(0, (100 - health) / 2)
pub fn priority_score(impact: f64, health_score: f64) -> f64 {
    let impact = safe_number(impact).abs().max(1.0);
    let impact_component = (impact.log10() * 10.0).min(IMPACT_COMPONENT_CAP);
    let health_component = ((100.0 - safe_number(health_score)) / 2.0).max(0.0);

    round_money((impact_component + health_component).clamp(0.0, 100.0))
}

/// 异常严重度对应的固定优先级
pub fn severity_priority(severity: Severity) -> f64 {
    match severity {
        Severity::Critical => 90.0,
        Severity::High => 75.0,
        Severity::Medium => 55.0,
        Severity::Low => 35.0,
    }
}

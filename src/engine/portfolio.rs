// ==========================================
// 项目组合财务健康分析 - 组合汇总
// ==========================================
// 职责: 单项目预测 -> 组合级预算/EAC/风险汇总
// 输入: (项目记录, 预测指标) 列表
// 输出: PortfolioSummary
// ==========================================

use crate::domain::forecast::PredictiveMetrics;
use crate::domain::portfolio::{PortfolioSummary, RiskDistribution};
use crate::domain::project::ProjectFinancialRecord;
use crate::domain::types::RiskLevel;
use crate::numeric::{round_money, safe_number};

/// 高风险项目占比超过该值时组合整体为 High
const HIGH_RISK_SHARE: f64 = 0.3;

// ==========================================
// PortfolioAggregator - 组合汇总器
// ==========================================
pub struct PortfolioAggregator {
    // 无状态
}

impl PortfolioAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// 汇总组合
    ///
    /// 整体风险 (取最坏):
    /// - 任一项目 Critical -> Critical
    /// - High 项目占比 > 30% -> High
    /// - 存在 High 项目, 或组合净偏差 < 0 -> Medium
    /// - 其余 Low
    pub fn summarize(
        &self,
        entries: &[(&ProjectFinancialRecord, &PredictiveMetrics)],
    ) -> PortfolioSummary {
        let mut distribution = RiskDistribution::default();
        let mut total_budget = 0.0;
        let mut total_eac = 0.0;
        let mut at_risk_projects = Vec::new();

        for (project, metrics) in entries {
            total_budget += safe_number(project.budget).max(0.0);
            total_eac += safe_number(metrics.predicted_eac);
            distribution.record(metrics.risk_level);

            if metrics.risk_level >= RiskLevel::High {
                at_risk_projects.push(project.id.clone());
            }
        }

        let net_projected_variance = total_budget - total_eac;
        let overall_risk = overall_risk(&distribution, entries.len(), net_projected_variance);

        tracing::info!(
            projects = entries.len(),
            total_budget,
            total_eac,
            overall_risk = %overall_risk,
            at_risk = at_risk_projects.len(),
            "组合汇总完成"
        );

        PortfolioSummary {
            project_count: entries.len(),
            total_budget: round_money(total_budget),
            total_predicted_eac: round_money(total_eac),
            net_projected_variance: round_money(net_projected_variance),
            risk_distribution: distribution,
            overall_risk,
            at_risk_projects,
        }
    }
}

impl Default for PortfolioAggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn overall_risk(distribution: &RiskDistribution, count: usize, net_variance: f64) -> RiskLevel {
    if count == 0 {
        return RiskLevel::Low;
    }
    if distribution.critical > 0 {
        return RiskLevel::Critical;
    }
    if distribution.high as f64 / count as f64 > HIGH_RISK_SHARE {
        return RiskLevel::High;
    }
    if distribution.high > 0 || net_variance < 0.0 {
        return RiskLevel::Medium;
    }
    RiskLevel::Low
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ProjectStatus, Trend};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn project(id: &str, budget: f64) -> ProjectFinancialRecord {
        ProjectFinancialRecord {
            id: id.to_string(),
            name: id.to_string(),
            budget,
            total_spend: 0.0,
            total_commitments: 0.0,
            total_actuals: 0.0,
            variance: budget,
            spend_percentage: 0.0,
            start_date: d(2026, 1, 1),
            end_date: d(2026, 12, 31),
            status: ProjectStatus::Active,
            health_score: 100.0,
            currency: "USD".to_string(),
            percent_complete: None,
        }
    }

    fn metrics(eac: f64, risk: RiskLevel) -> PredictiveMetrics {
        PredictiveMetrics {
            predicted_eac: eac,
            etc: 0.0,
            eac_low: eac,
            eac_high: eac,
            confidence: 0.8,
            predicted_completion: d(2026, 12, 31),
            burn_rate: 0.0,
            projected_variance: 0.0,
            risk_level: risk,
            trend: Trend::Stable,
            days_until_budget_exhaustion: None,
        }
    }

    fn summarize(rows: &[(ProjectFinancialRecord, PredictiveMetrics)]) -> PortfolioSummary {
        let entries: Vec<_> = rows.iter().map(|(p, m)| (p, m)).collect();
        PortfolioAggregator::new().summarize(&entries)
    }

    #[test]
    fn test_empty_portfolio() {
        let s = summarize(&[]);
        assert_eq!(s.project_count, 0);
        assert_eq!(s.total_budget, 0.0);
        assert_eq!(s.overall_risk, RiskLevel::Low);
        assert!(s.at_risk_projects.is_empty());
    }

    #[test]
    fn test_any_critical_dominates() {
        let s = summarize(&[
            (project("A", 100.0), metrics(90.0, RiskLevel::Low)),
            (project("B", 100.0), metrics(90.0, RiskLevel::Low)),
            (project("C", 100.0), metrics(150.0, RiskLevel::Critical)),
        ]);
        assert_eq!(s.overall_risk, RiskLevel::Critical);
        assert_eq!(s.at_risk_projects, vec!["C".to_string()]);
        assert_eq!(s.risk_distribution.critical, 1);
        assert_eq!(s.risk_distribution.low, 2);
    }

    #[test]
    fn test_high_share_threshold() {
        // 1/3 > 30%
        let s = summarize(&[
            (project("A", 100.0), metrics(90.0, RiskLevel::Low)),
            (project("B", 100.0), metrics(90.0, RiskLevel::Low)),
            (project("C", 100.0), metrics(95.0, RiskLevel::High)),
        ]);
        assert_eq!(s.overall_risk, RiskLevel::High);

        // 1/4 <= 30% -> medium
        let s = summarize(&[
            (project("A", 100.0), metrics(90.0, RiskLevel::Low)),
            (project("B", 100.0), metrics(90.0, RiskLevel::Low)),
            (project("C", 100.0), metrics(90.0, RiskLevel::Low)),
            (project("D", 100.0), metrics(95.0, RiskLevel::High)),
        ]);
        assert_eq!(s.overall_risk, RiskLevel::Medium);
    }

    #[test]
    fn test_net_overrun_is_medium() {
        let s = summarize(&[
            (project("A", 100_000.0), metrics(90_000.0, RiskLevel::Low)),
            (project("B", 100_000.0), metrics(115_000.0, RiskLevel::Medium)),
        ]);
        assert_eq!(s.total_budget, 200_000.0);
        assert_eq!(s.total_predicted_eac, 205_000.0);
        assert_eq!(s.net_projected_variance, -5_000.0);
        assert_eq!(s.overall_risk, RiskLevel::Medium);
    }

    #[test]
    fn test_healthy_portfolio_is_low() {
        let s = summarize(&[
            (project("A", 100_000.0), metrics(90_000.0, RiskLevel::Low)),
            (project("B", 100_000.0), metrics(95_000.0, RiskLevel::Medium)),
        ]);
        assert_eq!(s.overall_risk, RiskLevel::Low);
        assert_eq!(s.net_projected_variance, 15_000.0);
    }
}

// ==========================================
// 项目组合财务健康分析 - 项目富化
// ==========================================
// 职责: 承诺/实际明细 -> 财务汇总 + 健康分
// 输入: ProjectInput (原始项目数据)
// 输出: ProjectFinancialRecord
// ==========================================

use crate::domain::project::{ProjectFinancialRecord, ProjectInput};
use crate::domain::types::ProjectStatus;
use crate::engine::progress::snapshot_from_parts;
use crate::numeric::{round, round_money, safe_number};
use chrono::NaiveDate;

/// 超支扣分上限
const OVERRUN_PENALTY_CAP: f64 = 50.0;
/// 支出接近预算 (>90%) 的固定扣分
const NEAR_LIMIT_PENALTY: f64 = 10.0;
/// 支出节奏快于时间进度的容忍度
const PACING_TOLERANCE: f64 = 0.1;
const PACING_PENALTY_CAP: f64 = 30.0;
const ON_HOLD_PENALTY: f64 = 10.0;

// ==========================================
// ProjectEnricher - 项目富化
// ==========================================
pub struct ProjectEnricher {
    // 无状态
}

impl ProjectEnricher {
    pub fn new() -> Self {
        Self {}
    }

    /// 富化单个项目
    ///
    /// total_spend = 承诺合计 + 实际合计; 非有限明细金额按 0 计
    pub fn enrich(&self, input: &ProjectInput, as_of: NaiveDate) -> ProjectFinancialRecord {
        let budget = safe_number(input.budget).max(0.0);
        let total_commitments: f64 = input.commitments.iter().copied().map(safe_number).sum();
        let total_actuals: f64 = input.actuals.iter().copied().map(safe_number).sum();
        let total_spend = total_commitments + total_actuals;

        let snapshot =
            snapshot_from_parts(input.start_date, input.end_date, budget, total_spend, as_of);

        let spend_percentage = snapshot.spend_ratio * 100.0;
        let health_score = self.health_score(
            budget,
            total_spend,
            snapshot.spend_ratio,
            snapshot.time_progress,
            input.status,
        );

        ProjectFinancialRecord {
            id: input.id.clone(),
            name: input.name.clone(),
            budget: round_money(budget),
            total_spend: round_money(total_spend),
            total_commitments: round_money(total_commitments),
            total_actuals: round_money(total_actuals),
            variance: round_money(budget - total_spend),
            spend_percentage: round_money(spend_percentage),
            start_date: input.start_date,
            end_date: input.end_date,
            status: input.status,
            health_score,
            currency: input.currency.clone(),
            percent_complete: input.percent_complete.map(crate::numeric::clamp01),
        }
    }

    /// 批量富化 (保持输入顺序)
    pub fn enrich_all(&self, inputs: &[ProjectInput], as_of: NaiveDate) -> Vec<ProjectFinancialRecord> {
        inputs.iter().map(|input| self.enrich(input, as_of)).collect()
    }

    /// 健康分 (0~100)
    ///
    /// 规则 (可解释):
    /// - 超支: 每超 1% 扣 2 分, 最多扣 50; 支出在 90%~100% 扣 10
    /// - 预算为 0 但已有支出: 按最大超支扣分
    /// - 支出节奏领先时间进度超过 10%: 按领先幅度 * 50 扣分, 最多扣 30
    /// - 暂停项目: 扣 10
    pub fn health_score(
        &self,
        budget: f64,
        spend: f64,
        spend_ratio: f64,
        time_progress: f64,
        status: ProjectStatus,
    ) -> f64 {
        let mut penalty = 0.0;

        let spend_pct = spend_ratio * 100.0;
        if budget <= 0.0 {
            if spend > 0.0 {
                penalty += OVERRUN_PENALTY_CAP;
            }
        } else if spend_pct > 100.0 {
            penalty += ((spend_pct - 100.0) * 2.0).min(OVERRUN_PENALTY_CAP);
        } else if spend_pct > 90.0 {
            penalty += NEAR_LIMIT_PENALTY;
        }

        let pacing_gap = spend_ratio - time_progress;
        if pacing_gap > PACING_TOLERANCE {
            penalty += (pacing_gap * 50.0).min(PACING_PENALTY_CAP);
        }

        if status == ProjectStatus::OnHold {
            penalty += ON_HOLD_PENALTY;
        }

        round((100.0 - penalty).clamp(0.0, 100.0), 2)
    }
}

impl Default for ProjectEnricher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(budget: f64, commitments: Vec<f64>, actuals: Vec<f64>) -> ProjectInput {
        ProjectInput {
            id: "P1".to_string(),
            name: "Data Center Refresh".to_string(),
            budget,
            commitments,
            actuals,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            status: ProjectStatus::Active,
            currency: "USD".to_string(),
            percent_complete: None,
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()
    }

    #[test]
    fn test_empty_spend_round_trip() {
        let enricher = ProjectEnricher::new();
        let record = enricher.enrich(&input(250_000.0, vec![], vec![]), as_of());

        assert_eq!(record.total_spend, 0.0);
        assert_eq!(record.variance, 250_000.0);
        assert_eq!(record.spend_percentage, 0.0);
        assert_eq!(record.health_score, 100.0);
    }

    #[test]
    fn test_totals_and_variance() {
        let enricher = ProjectEnricher::new();
        let record = enricher.enrich(
            &input(100_000.0, vec![20_000.0, 5_000.0], vec![15_000.0, f64::NAN]),
            as_of(),
        );

        assert_eq!(record.total_commitments, 25_000.0);
        assert_eq!(record.total_actuals, 15_000.0);
        assert_eq!(record.total_spend, 40_000.0);
        assert_eq!(record.variance, 60_000.0);
        assert_eq!(record.spend_percentage, 40.0);
        assert_eq!(record.health_score, 100.0);
    }

    #[test]
    fn test_overrun_penalty() {
        let enricher = ProjectEnricher::new();
        // 120% 支出, 时间进度 100%: 超支扣 40, 节奏领先 0.2 扣 10
        let score = enricher.health_score(100.0, 120.0, 1.2, 1.0, ProjectStatus::Active);
        assert_eq!(score, 50.0);

        // 严重超支封顶
        let score = enricher.health_score(100.0, 400.0, 4.0, 1.0, ProjectStatus::Active);
        assert_eq!(score, 20.0);
    }

    #[test]
    fn test_on_hold_and_zero_budget() {
        let enricher = ProjectEnricher::new();
        assert_eq!(
            enricher.health_score(100.0, 0.0, 0.0, 0.5, ProjectStatus::OnHold),
            90.0
        );
        assert_eq!(
            enricher.health_score(0.0, 10.0, 0.0, 0.5, ProjectStatus::Active),
            50.0
        );
    }
}

// ==========================================
// 引擎层集成测试
// ==========================================
// 测试目标: 通过公开接口组合 EVM 计算器 / 预测器 / 组合汇总
// ==========================================

mod test_helpers;

use portfolio_health::domain::types::{EacMethod, EvmStatus, RiskLevel, Trend};
use portfolio_health::domain::{EvmInput, HistoricalDataPoint};
use portfolio_health::engine::{
    progress, EvmCalculator, EvmOptions, PortfolioAggregator, PredictiveForecaster,
    ProjectEnricher,
};
use test_helpers::{as_of, date, project};

#[test]
fn test_evm_reference_case() {
    let calc = EvmCalculator::default();
    let input = EvmInput {
        budget: 100_000.0,
        planned_progress: 0.5,
        earned_progress: 0.4,
        actual_cost: 45_000.0,
    };

    let typical = calc.compute(&input, &EvmOptions::default());
    assert_eq!(typical.cpi, 0.889);
    assert_eq!(typical.spi, 0.8);
    assert_eq!(typical.eac, 112_485.94);

    let extended = calc.compute_extended(&input, &EvmOptions::with_method(EacMethod::Atypical));
    assert_eq!(extended.metrics.eac, 105_000.0);
    assert_eq!(extended.composite_index, 0.8);
    assert_eq!(extended.percent_complete, 40.0);
    assert_eq!(extended.percent_planned, 50.0);
    assert_ne!(extended.status, EvmStatus::Excellent);
}

#[test]
fn test_reported_completion_drives_earned_value() {
    let enricher = ProjectEnricher::new();
    let mut input = project("P1", 100_000.0, 0.0, 45_000.0);
    input.percent_complete = Some(0.6);

    let record = enricher.enrich(&input, as_of());
    let snapshot = progress::snapshot(&record, as_of());
    let evm = EvmCalculator::default().compute_for_project(&record, &snapshot, &EvmOptions::default());

    assert_eq!(evm.metrics.bcwp, 60_000.0);
    assert_eq!(evm.metrics.acwp, 45_000.0);
    assert!(evm.metrics.cpi > 1.0);
}

#[test]
fn test_declining_history_raises_forecast() {
    let enricher = ProjectEnricher::new();
    let record = enricher.enrich(&project("P1", 100_000.0, 0.0, 50_000.0), as_of());
    let snapshot = progress::snapshot(&record, as_of());
    let forecaster = PredictiveForecaster::default();

    let history: Vec<HistoricalDataPoint> = (1..=4)
        .map(|m| HistoricalDataPoint {
            date: date(2026, m, 28),
            spend: 12_000.0,
            budget: 8_000.0,
            cumulative_spend: 12_000.0 * m as f64,
        })
        .collect();

    let baseline = forecaster.predict(&record, &snapshot, None);
    let declining = forecaster.predict(&record, &snapshot, Some(&history));

    assert_eq!(baseline.trend, Trend::Stable);
    assert_eq!(declining.trend, Trend::Declining);
    assert!(declining.predicted_eac > baseline.predicted_eac);
    assert!(declining.predicted_completion > baseline.predicted_completion);
    assert!(declining.confidence > baseline.confidence);
}

#[test]
fn test_portfolio_summary_from_forecasts() {
    let enricher = ProjectEnricher::new();
    let forecaster = PredictiveForecaster::default();

    let records = enricher.enrich_all(
        &[
            project("A", 200_000.0, 0.0, 100_000.0),
            project("B", 100_000.0, 0.0, 90_000.0),
        ],
        as_of(),
    );
    let forecasts: Vec<_> = records
        .iter()
        .map(|r| forecaster.predict(r, &progress::snapshot(r, as_of()), None))
        .collect();
    let entries: Vec<_> = records.iter().zip(forecasts.iter()).collect();

    let summary = PortfolioAggregator::new().summarize(&entries);
    assert_eq!(summary.project_count, 2);
    assert_eq!(summary.total_budget, 300_000.0);
    let eac_sum: f64 = forecasts.iter().map(|f| f.predicted_eac).sum();
    assert!((summary.total_predicted_eac - eac_sum).abs() < 0.01);
    assert_eq!(summary.at_risk_projects, vec!["B".to_string()]);
    assert_eq!(summary.overall_risk, RiskLevel::Critical);
}

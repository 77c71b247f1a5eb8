// ==========================================
// AnalyticsApi 集成测试
// ==========================================
// 测试目标: 富化 -> 快照 -> EVM -> 预测 -> 建议 -> 汇总 全链路
// ==========================================

mod test_helpers;

use portfolio_health::api::{AnalyticsApi, AnalyticsRequest, ApiError};
use portfolio_health::domain::types::{EacMethod, RiskLevel, Severity};
use portfolio_health::domain::RecommendationConfig;
use std::collections::HashMap;
use test_helpers::{anomaly, as_of, project};

/// 三个项目的组合:
/// - A: 预算 400k, 支出 220k (结余, 进度过半, 可调出)
/// - B: 预算 100k, 支出 120k (超支 20k)
/// - C: 预算 300k, 支出 150k (正常)
fn request() -> AnalyticsRequest {
    AnalyticsRequest {
        as_of: as_of(),
        projects: vec![
            project("A", 400_000.0, 100_000.0, 120_000.0),
            project("B", 100_000.0, 30_000.0, 90_000.0),
            project("C", 300_000.0, 0.0, 150_000.0),
        ],
        anomalies: vec![
            anomaly("B", Severity::Critical, 0.85, 20_000.0),
            anomaly("B", Severity::Medium, 0.6, 4_000.0),
        ],
        history: HashMap::new(),
        recommendation_config: RecommendationConfig::default(),
        eac_method: EacMethod::Typical,
    }
}

#[test]
fn test_full_pipeline() {
    portfolio_health::logging::init_test();
    let api = AnalyticsApi::default();
    let analysis = api.analyze_portfolio(&request()).expect("分析应成功");

    // 项目顺序与请求一致
    let ids: Vec<&str> = analysis.projects.iter().map(|p| p.project.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);

    let b = &analysis.projects[1];
    assert_eq!(b.project.total_spend, 120_000.0);
    assert_eq!(b.project.variance, -20_000.0);
    assert_eq!(b.project.health_score, 30.0);
    assert_eq!(b.snapshot.spend_progress, 1.0);
    assert!(b.evm.metrics.cpi < 1.0);
    assert!(b.predictive.risk_level >= RiskLevel::High);
    assert!(b.predictive.predicted_eac > b.project.budget);

    // EVM 与预测共用同一快照
    for p in &analysis.projects {
        assert_eq!(p.snapshot.as_of, as_of());
        assert!(p.predictive.eac_low <= p.predictive.predicted_eac);
        assert!(p.predictive.predicted_eac <= p.predictive.eac_high);
    }

    // 组合汇总
    let summary = &analysis.summary;
    assert_eq!(summary.project_count, 3);
    assert_eq!(summary.total_budget, 800_000.0);
    assert!(summary.at_risk_projects.contains(&"B".to_string()));
    assert!(summary.overall_risk >= RiskLevel::Medium);
}

#[test]
fn test_recommendations_from_pipeline() {
    let api = AnalyticsApi::default();
    let analysis = api.analyze_portfolio(&request()).unwrap();
    let recs = &analysis.recommendations;

    assert!(!recs.is_empty());
    assert!(recs.len() <= 10);
    assert!(recs.windows(2).all(|w| w[0].priority >= w[1].priority));
    assert!(recs.iter().all(|r| r.confidence_score >= 0.5));

    let realloc = recs
        .iter()
        .find(|r| r.recommendation_type == "budget_reallocation")
        .expect("B 应从 A 获得预算调拨建议");
    assert_eq!(realloc.project_id, "B");
    assert_eq!(realloc.related_projects, vec!["A".to_string()]);
    assert_eq!(realloc.impact_amount, 20_000.0);

    let review = recs
        .iter()
        .find(|r| r.recommendation_type == "budget_overrun_review")
        .expect("B 超支 20% 应触发复核");
    assert_eq!(review.project_id, "B");
    assert!(review.action_required);

    let escalation = recs
        .iter()
        .find(|r| r.recommendation_type == "risk_escalation")
        .expect("critical 异常应触发升级");
    assert_eq!(escalation.project_id, "B");
    assert!(escalation.priority >= 80.0);
}

#[test]
fn test_analysis_is_deterministic() {
    let api = AnalyticsApi::default();
    let first = api.analyze_portfolio(&request()).unwrap();
    let second = api.analyze_portfolio(&request()).unwrap();

    let ids = |a: &portfolio_health::api::PortfolioAnalysis| {
        a.recommendations.iter().map(|r| r.id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.summary, second.summary);
}

#[test]
fn test_request_from_json_uses_defaults() {
    let raw = r#"{
        "as_of": "2026-07-01",
        "projects": [
            {
                "id": "P1",
                "name": "ERP Rollout",
                "budget": 250000,
                "actuals": [50000, 25000],
                "start_date": "2026-01-01",
                "end_date": "2026-12-31"
            }
        ]
    }"#;

    let request: AnalyticsRequest = serde_json::from_str(raw).unwrap();
    assert_eq!(request.eac_method, EacMethod::Typical);
    assert!(request.anomalies.is_empty());
    assert_eq!(request.recommendation_config.max_recommendations, 10);

    let analysis = AnalyticsApi::default().analyze_portfolio(&request).unwrap();
    let p1 = &analysis.projects[0];
    assert_eq!(p1.project.total_spend, 75_000.0);
    assert_eq!(p1.project.currency, "USD");
    assert_eq!(analysis.summary.project_count, 1);

    // 输出可以完整序列化
    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["projects"][0]["project"]["id"], "P1");
    assert!(json["summary"]["overall_risk"].is_string());
}

#[test]
fn test_empty_portfolio() {
    let request = AnalyticsRequest {
        projects: vec![],
        anomalies: vec![],
        ..request()
    };
    let analysis = AnalyticsApi::default().analyze_portfolio(&request).unwrap();

    assert!(analysis.projects.is_empty());
    assert!(analysis.recommendations.is_empty());
    assert_eq!(analysis.summary.project_count, 0);
    assert_eq!(analysis.summary.overall_risk, RiskLevel::Low);
}

#[test]
fn test_invalid_recommendation_config_is_rejected() {
    let mut request = request();
    request.recommendation_config.min_confidence = 1.5;

    let result = AnalyticsApi::default().analyze_portfolio(&request);
    assert!(matches!(result, Err(ApiError::Config(_))));
}

#[test]
fn test_eac_method_is_passed_through() {
    let mut request = request();
    request.eac_method = EacMethod::Atypical;

    let analysis = AnalyticsApi::default().analyze_portfolio(&request).unwrap();
    for p in &analysis.projects {
        assert_eq!(p.evm.eac_method, EacMethod::Atypical);
        assert_eq!(p.evm.metrics.eac, p.evm.eac_atypical);
    }
}

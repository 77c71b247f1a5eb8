use super::core::{Draft, ProjectAnalysisInput, RecommendationEngine};
use super::priority::priority_score;
use crate::domain::recommendation::{MetricUnit, SupportingMetric};
use crate::domain::types::RecommendationCategory;

// ==========================================
// 优化类建议
// ==========================================
// knowledge_transfer: 困难项目 <- 最健康的同侪项目
// portfolio_review: 组合整体健康偏低
// ==========================================

/// 组合级建议使用的项目 id
pub(super) const PORTFOLIO_PROJECT_ID: &str = "portfolio";
/// 经验传递影响: 超支额的比例
const TRANSFER_OVERRUN_SHARE: f64 = 0.10;
/// 经验传递影响: 未超支时预算的比例
const TRANSFER_BUDGET_SHARE: f64 = 0.05;

impl RecommendationEngine {
    pub(super) fn optimization_recommendations(&self, inputs: &[ProjectAnalysisInput<'_>]) -> Vec<Draft> {
        let t = &self.thresholds;
        let mut drafts = Vec::new();

        let open: Vec<&ProjectAnalysisInput<'_>> = inputs
            .iter()
            .filter(|p| !p.project.status.is_closed())
            .collect();

        let is_healthy = |p: &ProjectAnalysisInput<'_>| p.health() >= t.healthy_min_health && p.variance() >= 0.0;
        let is_struggling = |p: &ProjectAnalysisInput<'_>| {
            p.health() < t.struggling_max_health
                || p.variance() < p.budget() * t.struggling_variance_ratio
        };

        // 最健康的同侪: 健康分最高, 并列取先出现者
        let mentor = open
            .iter()
            .copied()
            .filter(|p| is_healthy(*p))
            .fold(None::<&ProjectAnalysisInput<'_>>, |best, p| match best {
                Some(b) if b.health() >= p.health() => Some(b),
                _ => Some(p),
            });

        if let Some(mentor) = mentor {
            for p in open.iter().copied().filter(|p| is_struggling(*p)) {
                if p.id() == mentor.id() {
                    continue;
                }

                let variance = p.variance();
                let impact = if variance < 0.0 {
                    variance.abs() * TRANSFER_OVERRUN_SHARE
                } else {
                    p.budget() * TRANSFER_BUDGET_SHARE
                };

                drafts.push(Draft {
                    kind: "knowledge_transfer",
                    discriminator: None,
                    category: RecommendationCategory::Optimization,
                    project_id: p.id().to_string(),
                    related_projects: vec![mentor.id().to_string()],
                    title: format!(
                        "Pair {} with {} for cost-control practices",
                        p.project.name, mentor.project.name
                    ),
                    description: format!(
                        "{} (health {:.0}) could adopt cost-control practices from {} (health {:.0}).",
                        p.project.name,
                        p.health(),
                        mentor.project.name,
                        mentor.health()
                    ),
                    impact_amount: impact,
                    confidence_score: t.knowledge_transfer_confidence,
                    action_required: false,
                    priority: priority_score(impact, p.health()),
                    supporting_data: vec![
                        SupportingMetric::new("health_score", p.health(), MetricUnit::Score),
                        SupportingMetric::new("peer_health_score", mentor.health(), MetricUnit::Score),
                        SupportingMetric::new("variance", variance, MetricUnit::Currency),
                    ],
                    risks: vec!["Practices may not transfer across project types".to_string()],
                });
            }
        }

        if inputs.len() >= t.portfolio_min_projects {
            let mean_health = inputs.iter().map(|p| p.health()).sum::<f64>() / inputs.len() as f64;

            if mean_health < t.portfolio_health_floor {
                let total_overrun: f64 = inputs.iter().map(|p| (-p.variance()).max(0.0)).sum();
                let over_budget = inputs.iter().filter(|p| p.variance() < 0.0).count();

                drafts.push(Draft {
                    kind: "portfolio_review",
                    discriminator: None,
                    category: RecommendationCategory::Optimization,
                    project_id: PORTFOLIO_PROJECT_ID.to_string(),
                    related_projects: inputs.iter().map(|p| p.id().to_string()).collect(),
                    title: "Conduct a portfolio-wide financial review".to_string(),
                    description: format!(
                        "Average project health is {:.1} across {} projects; {} are over budget \
                         by a combined {:.2}.",
                        mean_health,
                        inputs.len(),
                        over_budget,
                        total_overrun
                    ),
                    impact_amount: total_overrun,
                    confidence_score: t.portfolio_review_confidence,
                    action_required: true,
                    priority: priority_score(total_overrun, mean_health),
                    supporting_data: vec![
                        SupportingMetric::new("average_health", mean_health, MetricUnit::Score),
                        SupportingMetric::new("project_count", inputs.len() as f64, MetricUnit::Count),
                        SupportingMetric::new("over_budget_projects", over_budget as f64, MetricUnit::Count),
                        SupportingMetric::new("total_overrun", total_overrun, MetricUnit::Currency),
                    ],
                    risks: vec!["A review pauses discretionary spend across the portfolio".to_string()],
                });
            }
        }

        drafts
    }
}

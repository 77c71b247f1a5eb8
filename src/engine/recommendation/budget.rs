use super::core::{Draft, ProjectAnalysisInput, RecommendationEngine};
use super::priority::priority_score;
use crate::domain::recommendation::{MetricUnit, SupportingMetric};
use crate::domain::types::RecommendationCategory;
use crate::numeric::floor_money;

// ==========================================
// 预算类建议
// ==========================================
// budget_reallocation: 结余项目 -> 超支项目
// budget_overrun_review: 超支超过阈值, 必须复核
// ==========================================

impl RecommendationEngine {
    pub(super) fn budget_recommendations(&self, inputs: &[ProjectAnalysisInput<'_>]) -> Vec<Draft> {
        let t = &self.thresholds;
        let mut drafts = Vec::new();

        let donors: Vec<&ProjectAnalysisInput<'_>> = inputs
            .iter()
            .filter(|p| {
                p.is_active()
                    && p.snapshot.spend_progress > t.donor_min_spend_progress
                    && p.variance() > p.budget() * t.surplus_ratio
            })
            .collect();

        let recipients: Vec<&ProjectAnalysisInput<'_>> = inputs
            .iter()
            .filter(|p| p.is_active() && p.variance() < 0.0)
            .collect();

        for recipient in &recipients {
            let deficit = recipient.variance().abs();

            for donor in &donors {
                if donor.id() == recipient.id() {
                    continue;
                }

                let surplus = donor.variance();
                // 向下取整到分, 不超过调出上限与缺口
                let impact = floor_money((surplus * t.transfer_share).min(deficit));
                if impact < t.materiality_floor {
                    continue;
                }

                drafts.push(Draft {
                    kind: "budget_reallocation",
                    discriminator: None,
                    category: RecommendationCategory::Budget,
                    project_id: recipient.id().to_string(),
                    related_projects: vec![donor.id().to_string()],
                    title: format!(
                        "Reallocate budget from {} to {}",
                        donor.project.name, recipient.project.name
                    ),
                    description: format!(
                        "{} is over budget by {:.2}; {} has {:.2} unspent at {:.0}% spend progress. \
                         Transfer up to {:.2} to cover the deficit.",
                        recipient.project.name,
                        deficit,
                        donor.project.name,
                        surplus,
                        donor.snapshot.spend_progress * 100.0,
                        impact
                    ),
                    impact_amount: impact,
                    confidence_score: t.reallocation_confidence,
                    action_required: false,
                    priority: priority_score(impact, recipient.health()),
                    supporting_data: vec![
                        SupportingMetric::new("recipient_deficit", deficit, MetricUnit::Currency),
                        SupportingMetric::new("donor_surplus", surplus, MetricUnit::Currency),
                        SupportingMetric::new(
                            "donor_spend_progress",
                            donor.snapshot.spend_progress * 100.0,
                            MetricUnit::Percent,
                        ),
                    ],
                    risks: vec![
                        "Donor project may need its surplus for late-stage costs".to_string(),
                        "Reallocation may require governance approval".to_string(),
                    ],
                });
            }
        }

        for p in inputs {
            let budget = p.budget();
            let overrun = -p.variance();
            if budget <= 0.0 || overrun <= budget * t.overrun_review_ratio {
                continue;
            }

            let overrun_pct = overrun / budget * 100.0;
            drafts.push(Draft {
                kind: "budget_overrun_review",
                discriminator: None,
                category: RecommendationCategory::Budget,
                project_id: p.id().to_string(),
                related_projects: Vec::new(),
                title: format!("Review budget overrun on {}", p.project.name),
                description: format!(
                    "{} has spent {:.2} against a budget of {:.2} ({:.1}% over). \
                     Confirm scope and approve a revised baseline or corrective plan.",
                    p.project.name,
                    p.spend(),
                    budget,
                    overrun_pct
                ),
                impact_amount: overrun,
                confidence_score: t.overrun_confidence,
                action_required: true,
                priority: priority_score(overrun, p.health()),
                supporting_data: vec![
                    SupportingMetric::new("overrun", overrun, MetricUnit::Currency),
                    SupportingMetric::new("overrun_percent", overrun_pct, MetricUnit::Percent),
                    SupportingMetric::new("health_score", p.health(), MetricUnit::Score),
                ],
                risks: vec!["Further spend without a revised baseline compounds the overrun".to_string()],
            });
        }

        drafts
    }
}

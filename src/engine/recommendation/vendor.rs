use super::core::{Draft, ProjectAnalysisInput, RecommendationEngine};
use super::priority::priority_score;
use crate::domain::recommendation::{MetricUnit, SupportingMetric};
use crate::domain::types::RecommendationCategory;
use crate::numeric::safe_number;

// ==========================================
// 供应商类建议
// ==========================================
// vendor_consolidation: 执行中项目数量与合计支出达到规模
// commitment_review: 承诺远大于实际发生
// ==========================================

impl RecommendationEngine {
    pub(super) fn vendor_recommendations(&self, inputs: &[ProjectAnalysisInput<'_>]) -> Vec<Draft> {
        let t = &self.thresholds;
        let mut drafts = Vec::new();

        let active: Vec<&ProjectAnalysisInput<'_>> = inputs.iter().filter(|p| p.is_active()).collect();
        let combined_spend: f64 = active.iter().map(|p| p.spend()).sum();

        if active.len() >= t.vendor_min_projects && combined_spend > t.vendor_min_combined_spend {
            // 首个最大支出项目作为牵头项目
            let lead = active.iter().copied().fold(None::<&ProjectAnalysisInput<'_>>, |best, p| {
                match best {
                    Some(b) if b.spend() >= p.spend() => Some(b),
                    _ => Some(p),
                }
            });

            if let Some(lead) = lead {
                let impact = combined_spend * t.vendor_savings_rate;
                let related: Vec<String> = active
                    .iter()
                    .filter(|p| p.id() != lead.id())
                    .map(|p| p.id().to_string())
                    .collect();
                let avg_health =
                    active.iter().map(|p| p.health()).sum::<f64>() / active.len() as f64;

                drafts.push(Draft {
                    kind: "vendor_consolidation",
                    discriminator: None,
                    category: RecommendationCategory::Vendor,
                    project_id: lead.id().to_string(),
                    related_projects: related,
                    title: "Consolidate vendors across active projects".to_string(),
                    description: format!(
                        "{} active projects have a combined spend of {:.2}. Negotiating \
                         consolidated contracts could save about {:.0}% ({:.2}).",
                        active.len(),
                        combined_spend,
                        t.vendor_savings_rate * 100.0,
                        impact
                    ),
                    impact_amount: impact,
                    confidence_score: t.consolidation_confidence,
                    action_required: false,
                    priority: priority_score(impact, avg_health),
                    supporting_data: vec![
                        SupportingMetric::new("active_projects", active.len() as f64, MetricUnit::Count),
                        SupportingMetric::new("combined_spend", combined_spend, MetricUnit::Currency),
                        SupportingMetric::new(
                            "estimated_savings_rate",
                            t.vendor_savings_rate * 100.0,
                            MetricUnit::Percent,
                        ),
                    ],
                    risks: vec![
                        "Savings estimate assumes overlapping vendor categories".to_string(),
                        "Consolidation increases dependency on fewer suppliers".to_string(),
                    ],
                });
            }
        }

        for p in inputs {
            let commitments = safe_number(p.project.total_commitments).max(0.0);
            let actuals = safe_number(p.project.total_actuals);

            if commitments <= t.commitment_min_amount {
                continue;
            }
            let lopsided = actuals <= 0.0 || commitments / actuals > t.commitment_actual_ratio;
            if !lopsided {
                continue;
            }

            let impact = (commitments - actuals.max(0.0)).max(0.0);
            let mut supporting_data = vec![
                SupportingMetric::new("total_commitments", commitments, MetricUnit::Currency),
                SupportingMetric::new("total_actuals", actuals, MetricUnit::Currency),
            ];
            if actuals > 0.0 {
                supporting_data.push(SupportingMetric::new(
                    "commitment_to_actual_ratio",
                    commitments / actuals,
                    MetricUnit::Ratio,
                ));
            }

            drafts.push(Draft {
                kind: "commitment_review",
                discriminator: None,
                category: RecommendationCategory::Vendor,
                project_id: p.id().to_string(),
                related_projects: Vec::new(),
                title: format!("Review open commitments on {}", p.project.name),
                description: format!(
                    "{} has {:.2} committed against {:.2} invoiced. Verify that open purchase \
                     orders are still required.",
                    p.project.name, commitments, actuals
                ),
                impact_amount: impact,
                confidence_score: t.commitment_confidence,
                action_required: false,
                priority: priority_score(impact, p.health()),
                supporting_data,
                risks: vec!["Cancelling commitments may incur vendor penalties".to_string()],
            });
        }

        drafts
    }
}

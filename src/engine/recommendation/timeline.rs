use super::core::{Draft, ProjectAnalysisInput, RecommendationEngine};
use super::priority::priority_score;
use crate::domain::recommendation::{MetricUnit, SupportingMetric};
use crate::domain::types::RecommendationCategory;

// ==========================================
// 进度类建议 (仅执行中项目)
// ==========================================
// spend_ahead_of_schedule / spend_behind_schedule: 支出进度与时间进度偏离
// deadline_risk: 临近结束但支出进度不足
// ==========================================

impl RecommendationEngine {
    pub(super) fn timeline_recommendations(&self, inputs: &[ProjectAnalysisInput<'_>]) -> Vec<Draft> {
        let t = &self.thresholds;
        let mut drafts = Vec::new();

        for p in inputs.iter().filter(|p| p.is_active()) {
            let spend_progress = p.snapshot.spend_progress;
            let time_progress = p.snapshot.time_progress;
            let gap = spend_progress - time_progress;
            let budget = p.budget();
            let pacing_data = || {
                vec![
                    SupportingMetric::new("spend_progress", spend_progress * 100.0, MetricUnit::Percent),
                    SupportingMetric::new("time_progress", time_progress * 100.0, MetricUnit::Percent),
                    SupportingMetric::new("gap", gap * 100.0, MetricUnit::Percent),
                ]
            };

            if gap > t.timeline_gap {
                let impact = gap.abs() * budget;
                drafts.push(Draft {
                    kind: "spend_ahead_of_schedule",
                    discriminator: None,
                    category: RecommendationCategory::Timeline,
                    project_id: p.id().to_string(),
                    related_projects: Vec::new(),
                    title: format!("Spending ahead of schedule on {}", p.project.name),
                    description: format!(
                        "{} has consumed {:.0}% of its budget at {:.0}% of its timeline. \
                         Check for front-loaded costs or scope creep.",
                        p.project.name,
                        spend_progress * 100.0,
                        time_progress * 100.0
                    ),
                    impact_amount: impact,
                    confidence_score: t.ahead_confidence,
                    action_required: false,
                    priority: priority_score(impact, p.health()) + t.ahead_priority_boost,
                    supporting_data: pacing_data(),
                    risks: vec!["Budget may run out before delivery completes".to_string()],
                });
            } else if -gap > t.timeline_gap {
                let impact = gap.abs() * budget;
                drafts.push(Draft {
                    kind: "spend_behind_schedule",
                    discriminator: None,
                    category: RecommendationCategory::Timeline,
                    project_id: p.id().to_string(),
                    related_projects: Vec::new(),
                    title: format!("Spending behind schedule on {}", p.project.name),
                    description: format!(
                        "{} has consumed {:.0}% of its budget at {:.0}% of its timeline. \
                         Confirm delivery is on track and invoices are being recorded.",
                        p.project.name,
                        spend_progress * 100.0,
                        time_progress * 100.0
                    ),
                    impact_amount: impact,
                    confidence_score: t.behind_confidence,
                    action_required: false,
                    priority: priority_score(impact, p.health()),
                    supporting_data: pacing_data(),
                    risks: vec![
                        "Underspend may indicate delayed delivery".to_string(),
                        "Unrecorded invoices may surface late".to_string(),
                    ],
                });
            }

            let days_until_end = p.snapshot.days_until_end;
            if (0..=t.deadline_window_days).contains(&days_until_end)
                && spend_progress < t.deadline_min_spend_progress
            {
                let impact = p.variance().max(0.0);
                drafts.push(Draft {
                    kind: "deadline_risk",
                    discriminator: None,
                    category: RecommendationCategory::Timeline,
                    project_id: p.id().to_string(),
                    related_projects: Vec::new(),
                    title: format!("Deadline approaching on {}", p.project.name),
                    description: format!(
                        "{} ends in {} days with only {:.0}% of its budget spent. \
                         Confirm remaining deliverables or plan an extension.",
                        p.project.name,
                        days_until_end,
                        spend_progress * 100.0
                    ),
                    impact_amount: impact,
                    confidence_score: t.deadline_confidence,
                    action_required: false,
                    priority: priority_score(impact, p.health()),
                    supporting_data: vec![
                        SupportingMetric::new("days_until_end", days_until_end as f64, MetricUnit::Days),
                        SupportingMetric::new("spend_progress", spend_progress * 100.0, MetricUnit::Percent),
                        SupportingMetric::new("remaining_budget", impact, MetricUnit::Currency),
                    ],
                    risks: vec!["Unspent budget may lapse at project close".to_string()],
                });
            }
        }

        drafts
    }
}

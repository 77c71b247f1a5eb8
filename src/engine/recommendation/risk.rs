use super::core::{Draft, ProjectAnalysisInput, RecommendationEngine};
use super::priority::{priority_score, severity_priority};
use crate::domain::anomaly::AnomalyObservation;
use crate::domain::recommendation::{MetricUnit, SupportingMetric};
use crate::domain::types::{AnomalyType, RecommendationCategory, Severity};
use crate::engine::rules::{evaluate, RuleFacts};
use crate::numeric::{clamp01, safe_number};

// ==========================================
// 风险类建议
// ==========================================
// risk_escalation: 单项目异常命中升级条件
// variance_outlier_review: 每个偏差离群异常单独复核
// ==========================================

/// 未知项目的健康分按中值处理
const UNKNOWN_PROJECT_HEALTH: f64 = 50.0;

impl RecommendationEngine {
    pub(super) fn risk_recommendations(
        &self,
        inputs: &[ProjectAnalysisInput<'_>],
        anomalies: &[AnomalyObservation],
    ) -> Vec<Draft> {
        let mut drafts = Vec::new();

        for (project_id, group) in group_by_project(anomalies) {
            let project = inputs.iter().find(|p| p.id() == project_id);

            if evaluate(
                &self.thresholds.escalation_condition,
                &RuleFacts::for_anomalies(group.iter().copied()),
            ) {
                drafts.push(self.escalation(project_id, project, &group));
            }

            for (ordinal, anomaly) in group
                .iter()
                .filter(|a| a.anomaly_type == AnomalyType::VarianceOutlier)
                .enumerate()
            {
                drafts.push(variance_outlier_review(project_id, project, anomaly, ordinal));
            }
        }

        drafts
    }

    fn escalation(
        &self,
        project_id: &str,
        project: Option<&ProjectAnalysisInput<'_>>,
        group: &[&AnomalyObservation],
    ) -> Draft {
        let impact = project.map(|p| p.spend()).unwrap_or(0.0);
        let health = project.map(|p| p.health()).unwrap_or(UNKNOWN_PROJECT_HEALTH);
        let confidence = group
            .iter()
            .map(|a| clamp01(a.confidence))
            .fold(0.0, f64::max);
        let critical = group.iter().filter(|a| a.severity == Severity::Critical).count();
        let high = group.iter().filter(|a| a.severity == Severity::High).count();
        let name = project.map(|p| p.project.name.as_str()).unwrap_or(project_id);

        Draft {
            kind: "risk_escalation",
            discriminator: None,
            category: RecommendationCategory::Risk,
            project_id: project_id.to_string(),
            related_projects: Vec::new(),
            title: format!("Escalate financial risk on {}", name),
            description: format!(
                "{} anomalies detected on {} ({} critical, {} high). \
                 Escalate to the portfolio owner for investigation.",
                group.len(),
                name,
                critical,
                high
            ),
            impact_amount: impact,
            confidence_score: confidence,
            action_required: true,
            priority: priority_score(impact, health).max(self.thresholds.escalation_min_priority),
            supporting_data: vec![
                SupportingMetric::new("anomaly_count", group.len() as f64, MetricUnit::Count),
                SupportingMetric::new("critical_anomalies", critical as f64, MetricUnit::Count),
                SupportingMetric::new("high_anomalies", high as f64, MetricUnit::Count),
                SupportingMetric::new("project_spend", impact, MetricUnit::Currency),
            ],
            risks: group.iter().map(|a| a.description.clone()).collect(),
        }
    }
}

fn variance_outlier_review(
    project_id: &str,
    project: Option<&ProjectAnalysisInput<'_>>,
    anomaly: &AnomalyObservation,
    ordinal: usize,
) -> Draft {
    let impact = anomaly.amount();
    let name = project.map(|p| p.project.name.as_str()).unwrap_or(project_id);
    let mut supporting_data = vec![SupportingMetric::new(
        "anomaly_confidence",
        clamp01(anomaly.confidence) * 100.0,
        MetricUnit::Percent,
    )];
    if impact > 0.0 {
        supporting_data.push(SupportingMetric::new("amount", impact, MetricUnit::Currency));
    }
    if let Some(z) = anomaly.detail_number("z_score") {
        supporting_data.push(SupportingMetric::new("z_score", safe_number(z), MetricUnit::Ratio));
    }

    let description = match &anomaly.recommendation {
        Some(hint) => format!("{} {}", anomaly.description, hint),
        None => anomaly.description.clone(),
    };

    Draft {
        kind: "variance_outlier_review",
        discriminator: Some(ordinal),
        category: RecommendationCategory::Risk,
        project_id: project_id.to_string(),
        related_projects: Vec::new(),
        title: format!("Review {} variance outlier on {}", anomaly.severity, name),
        description,
        impact_amount: impact,
        confidence_score: anomaly.confidence,
        action_required: anomaly.severity >= Severity::High,
        priority: severity_priority(anomaly.severity),
        supporting_data,
        risks: vec!["Outlier may reflect a miscoded or duplicated transaction".to_string()],
    }
}

/// 按项目分组, 保持首次出现顺序
fn group_by_project(anomalies: &[AnomalyObservation]) -> Vec<(&str, Vec<&AnomalyObservation>)> {
    let mut groups: Vec<(&str, Vec<&AnomalyObservation>)> = Vec::new();
    for anomaly in anomalies {
        match groups.iter_mut().find(|(id, _)| *id == anomaly.project_id) {
            Some((_, group)) => group.push(anomaly),
            None => groups.push((anomaly.project_id.as_str(), vec![anomaly])),
        }
    }
    groups
}

use crate::config::error::ConfigResult;
use crate::config::thresholds::{validate_recommendation_config, RecommendationThresholds};
use crate::domain::anomaly::AnomalyObservation;
use crate::domain::project::{ProgressSnapshot, ProjectFinancialRecord};
use crate::domain::recommendation::{Recommendation, RecommendationConfig, SupportingMetric};
use crate::domain::types::{RecommendationCategory, RecommendationStatus};
use crate::engine::progress;
use crate::numeric::{clamp01, round_index, round_money, safe_number};
use chrono::NaiveDate;
use std::collections::HashSet;
use uuid::Uuid;

// ==========================================
// ProjectAnalysisInput - 单项目分析输入
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ProjectAnalysisInput<'a> {
    pub project: &'a ProjectFinancialRecord,
    pub snapshot: ProgressSnapshot,
}

impl<'a> ProjectAnalysisInput<'a> {
    /// 使用已有快照 (与 EVM/预测共用)
    pub fn new(project: &'a ProjectFinancialRecord, snapshot: ProgressSnapshot) -> Self {
        Self { project, snapshot }
    }

    /// 以指定日期计算快照
    pub fn at(project: &'a ProjectFinancialRecord, as_of: NaiveDate) -> Self {
        Self {
            project,
            snapshot: progress::snapshot(project, as_of),
        }
    }

    pub(super) fn id(&self) -> &str {
        &self.project.id
    }

    pub(super) fn budget(&self) -> f64 {
        safe_number(self.project.budget).max(0.0)
    }

    pub(super) fn spend(&self) -> f64 {
        safe_number(self.project.total_spend).max(0.0)
    }

    /// budget - spend (负数为超支)
    pub(super) fn variance(&self) -> f64 {
        self.budget() - self.spend()
    }

    pub(super) fn health(&self) -> f64 {
        safe_number(self.project.health_score).clamp(0.0, 100.0)
    }

    pub(super) fn is_active(&self) -> bool {
        self.project.status.is_active()
    }
}

// ==========================================
// Draft - 建议草稿 (各生成器产出, 统一转换)
// ==========================================
pub(super) struct Draft {
    pub kind: &'static str,
    /// 同一 (类型, 项目) 下多条建议的区分序号
    pub discriminator: Option<usize>,
    pub category: RecommendationCategory,
    pub project_id: String,
    pub related_projects: Vec<String>,
    pub title: String,
    pub description: String,
    pub impact_amount: f64,
    pub confidence_score: f64,
    pub action_required: bool,
    pub priority: f64,
    pub supporting_data: Vec<SupportingMetric>,
    pub risks: Vec<String>,
}

impl Draft {
    pub(super) fn into_recommendation(self) -> Recommendation {
        Recommendation {
            id: recommendation_id(
                self.kind,
                &self.project_id,
                &self.related_projects,
                self.discriminator,
            ),
            project_id: self.project_id,
            recommendation_type: self.kind.to_string(),
            title: self.title,
            description: self.description,
            impact_amount: round_money(safe_number(self.impact_amount).max(0.0)),
            confidence_score: round_index(clamp01(self.confidence_score)),
            action_required: self.action_required,
            priority: round_money(safe_number(self.priority).clamp(0.0, 100.0)),
            category: self.category,
            related_projects: self.related_projects,
            supporting_data: self.supporting_data,
            risks: self.risks,
            status: RecommendationStatus::Pending,
        }
    }
}

/// 确定性建议 id: UUIDv5(类型|项目|关联项目[|序号])
pub(super) fn recommendation_id(
    kind: &str,
    project_id: &str,
    related: &[String],
    discriminator: Option<usize>,
) -> String {
    let mut key = format!("{}|{}|{}", kind, project_id, related.join(","));
    if let Some(n) = discriminator {
        key.push_str(&format!("|{}", n));
    }
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
}

// ==========================================
// RecommendationEngine - 决策建议引擎
// ==========================================
pub struct RecommendationEngine {
    pub(super) thresholds: RecommendationThresholds,
}

impl RecommendationEngine {
    pub fn new(thresholds: RecommendationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RecommendationThresholds {
        &self.thresholds
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成决策建议
    ///
    /// # 参数
    /// - `inputs`: 项目分析输入 (顺序决定同优先级建议的相对顺序)
    /// - `anomalies`: 外部异常观测
    /// - `config`: 生成配置
    ///
    /// # 返回
    /// - Ok: 去重/过滤/排序/截断后的建议列表
    /// - Err: 配置非法 (ConfigError)
    pub fn generate(
        &self,
        inputs: &[ProjectAnalysisInput<'_>],
        anomalies: &[AnomalyObservation],
        config: &RecommendationConfig,
    ) -> ConfigResult<Vec<Recommendation>> {
        validate_recommendation_config(config)?;
        self.thresholds.validate()?;

        let mut drafts = Vec::new();
        for category in RecommendationCategory::ALL {
            let produced = match category {
                RecommendationCategory::Budget => self.budget_recommendations(inputs),
                RecommendationCategory::Vendor => self.vendor_recommendations(inputs),
                RecommendationCategory::Timeline => self.timeline_recommendations(inputs),
                RecommendationCategory::Risk => self.risk_recommendations(inputs, anomalies),
                RecommendationCategory::Optimization => self.optimization_recommendations(inputs),
            };
            tracing::debug!(category = %category, count = produced.len(), "建议生成器完成");
            drafts.extend(produced);
        }

        let generated = drafts.len();
        let recommendations = self.post_process(
            drafts.into_iter().map(Draft::into_recommendation).collect(),
            config,
        );

        tracing::info!(
            projects = inputs.len(),
            anomalies = anomalies.len(),
            generated,
            returned = recommendations.len(),
            "决策建议生成完成"
        );

        Ok(recommendations)
    }

    // ==========================================
    // 后处理
    // ==========================================

    /// 去重 -> 类别过滤 -> 置信度过滤 -> 低优先级过滤 -> 排序 -> 截断 -> 租户前缀
    fn post_process(
        &self,
        recommendations: Vec<Recommendation>,
        config: &RecommendationConfig,
    ) -> Vec<Recommendation> {
        let mut seen = HashSet::new();
        let mut kept: Vec<Recommendation> = recommendations
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .filter(|r| config.categories.contains(&r.category))
            .filter(|r| r.confidence_score >= config.min_confidence)
            .filter(|r| config.include_low_priority || r.priority >= self.thresholds.low_priority_cutoff)
            .collect();

        // 稳定排序: 同优先级保持生成顺序
        kept.sort_by(|a, b| b.priority.total_cmp(&a.priority));
        kept.truncate(config.max_recommendations);

        if let Some(tenant) = config
            .user_context
            .as_ref()
            .map(|ctx| ctx.tenant_name.trim())
            .filter(|name| !name.is_empty())
        {
            for r in kept.iter_mut() {
                r.title = format!("[{}] {}", tenant, r.title);
            }
        }

        kept
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(RecommendationThresholds::default())
    }
}

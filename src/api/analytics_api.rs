// ==========================================
// 项目组合财务健康分析 - 分析 API
// ==========================================
// 职责: 一次调用完成整批项目的分析流水线
// 流水线: 富化 -> 进度快照 -> EVM -> 预测 -> 建议 -> 组合汇总
// 说明: EVM 的 EAC 与预测器的混合 EAC 并列输出, 不做调和
// ==========================================

use crate::api::error::ApiResult;
use crate::config::thresholds::AnalyticsConfig;
use crate::config::ConfigManager;
use crate::domain::anomaly::AnomalyObservation;
use crate::domain::evm::ExtendedEvmMetrics;
use crate::domain::forecast::PredictiveMetrics;
use crate::domain::portfolio::PortfolioSummary;
use crate::domain::project::{HistoricalDataPoint, ProgressSnapshot, ProjectFinancialRecord, ProjectInput};
use crate::domain::recommendation::{Recommendation, RecommendationConfig};
use crate::domain::types::EacMethod;
use crate::engine::{
    progress, EvmCalculator, EvmOptions, PortfolioAggregator, PredictiveForecaster,
    ProjectAnalysisInput, ProjectEnricher, RecommendationEngine,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// 请求 / 响应
// ==========================================

/// 批量分析请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsRequest {
    /// 分析时点
    pub as_of: NaiveDate,
    pub projects: Vec<ProjectInput>,
    #[serde(default)]
    pub anomalies: Vec<AnomalyObservation>,
    /// 项目 id -> 历史支出序列 (由旧到新)
    #[serde(default)]
    pub history: HashMap<String, Vec<HistoricalDataPoint>>,
    #[serde(default)]
    pub recommendation_config: RecommendationConfig,
    #[serde(default)]
    pub eac_method: EacMethod,
}

/// 单项目分析结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    pub project: ProjectFinancialRecord,
    pub snapshot: ProgressSnapshot,
    pub evm: ExtendedEvmMetrics,
    pub predictive: PredictiveMetrics,
}

/// 组合分析结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    pub as_of: NaiveDate,
    pub projects: Vec<ProjectAnalysis>,
    pub recommendations: Vec<Recommendation>,
    pub summary: PortfolioSummary,
}

// ==========================================
// AnalyticsApi - 分析 API
// ==========================================
pub struct AnalyticsApi {
    enricher: ProjectEnricher,
    evm: EvmCalculator,
    forecaster: PredictiveForecaster,
    recommender: RecommendationEngine,
    aggregator: PortfolioAggregator,
}

impl AnalyticsApi {
    /// 使用指定配置构造 (先整体校验)
    pub fn new(config: AnalyticsConfig) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self {
            enricher: ProjectEnricher::new(),
            evm: EvmCalculator::new(config.evm_bands)?,
            forecaster: PredictiveForecaster::new(config.forecast)?,
            recommender: RecommendationEngine::new(config.recommendation),
            aggregator: PortfolioAggregator::new(),
        })
    }

    /// 使用 config_kv 覆写后的配置构造
    pub fn from_config_manager(config_manager: &ConfigManager) -> ApiResult<Self> {
        let config = config_manager.load_analytics_config()?;
        Self::new(config)
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 分析整个组合
    ///
    /// # 返回
    /// - Ok(PortfolioAnalysis): 项目顺序与请求一致
    /// - Err(ApiError::Config): 建议生成配置非法
    pub fn analyze_portfolio(&self, request: &AnalyticsRequest) -> ApiResult<PortfolioAnalysis> {
        let as_of = request.as_of;
        let options = EvmOptions::with_method(request.eac_method);

        let records = self.enricher.enrich_all(&request.projects, as_of);

        let projects: Vec<ProjectAnalysis> = records
            .into_iter()
            .map(|project| {
                let history = request.history.get(&project.id).map(Vec::as_slice);
                self.analyze_record(project, as_of, history, &options)
            })
            .collect();

        let inputs: Vec<ProjectAnalysisInput<'_>> = projects
            .iter()
            .map(|a| ProjectAnalysisInput::new(&a.project, a.snapshot))
            .collect();
        let recommendations =
            self.recommender
                .generate(&inputs, &request.anomalies, &request.recommendation_config)?;

        let entries: Vec<(&ProjectFinancialRecord, &PredictiveMetrics)> = projects
            .iter()
            .map(|a| (&a.project, &a.predictive))
            .collect();
        let summary = self.aggregator.summarize(&entries);

        tracing::info!(
            as_of = %as_of,
            projects = projects.len(),
            recommendations = recommendations.len(),
            overall_risk = %summary.overall_risk,
            "组合分析完成"
        );

        Ok(PortfolioAnalysis {
            as_of,
            projects,
            recommendations,
            summary,
        })
    }

    /// 分析单个已富化项目 (EVM + 预测共用同一快照)
    pub fn analyze_record(
        &self,
        project: ProjectFinancialRecord,
        as_of: NaiveDate,
        history: Option<&[HistoricalDataPoint]>,
        options: &EvmOptions,
    ) -> ProjectAnalysis {
        let snapshot = progress::snapshot(&project, as_of);
        let evm = self.evm.compute_for_project(&project, &snapshot, options);
        let predictive = self.forecaster.predict(&project, &snapshot, history);

        ProjectAnalysis {
            project,
            snapshot,
            evm,
            predictive,
        }
    }
}

impl Default for AnalyticsApi {
    fn default() -> Self {
        Self {
            enricher: ProjectEnricher::new(),
            evm: EvmCalculator::default(),
            forecaster: PredictiveForecaster::default(),
            recommender: RecommendationEngine::default(),
            aggregator: PortfolioAggregator::new(),
        }
    }
}

// ==========================================
// 项目组合财务健康分析 - 领域模型层
// ==========================================
// 职责: 定义值对象、外部输入与领域类型
// 红线: 不含计算逻辑, 不含数据访问逻辑
// ==========================================

pub mod anomaly;
pub mod evm;
pub mod feedback;
pub mod forecast;
pub mod portfolio;
pub mod project;
pub mod recommendation;
pub mod types;

// 重导出核心类型
pub use anomaly::AnomalyObservation;
pub use evm::{EvmInput, EvmMetrics, ExtendedEvmMetrics};
pub use feedback::{FeedbackRecord, FeedbackSummary};
pub use forecast::PredictiveMetrics;
pub use portfolio::{PortfolioSummary, RiskDistribution};
pub use project::{HistoricalDataPoint, ProgressSnapshot, ProjectFinancialRecord, ProjectInput};
pub use recommendation::{
    MetricUnit, Recommendation, RecommendationConfig, SupportingMetric, UserContext,
};
pub use types::{
    AnomalyType, EacMethod, EvmStatus, ProjectStatus, RecommendationCategory,
    RecommendationStatus, RiskLevel, Severity, Trend,
};

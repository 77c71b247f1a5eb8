// ==========================================
// 项目组合财务健康分析 - 核心库
// ==========================================
// 职责: EVM 指标、成本预测、决策建议与组合汇总
// 系统定位: 决策支持 (建议只供参考, 由人工决定)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 数值安全层
pub mod numeric;

// 领域层 - 值对象与类型
pub mod domain;

// 引擎层 - 计算规则
pub mod engine;

// 配置层 - 阈值与覆写
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 数据仓储层 - 反馈日志
pub mod repository;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    EacMethod, EvmStatus, ProjectStatus, RecommendationCategory, RecommendationStatus, RiskLevel,
    Severity, Trend,
};

// 值对象
pub use domain::{
    AnomalyObservation, ExtendedEvmMetrics, FeedbackRecord, PortfolioSummary, PredictiveMetrics,
    ProjectFinancialRecord, ProjectInput, Recommendation, RecommendationConfig,
};

// 引擎
pub use engine::{
    EvmCalculator, PortfolioAggregator, PredictiveForecaster, ProjectEnricher, RecommendationEngine,
};

// API
pub use api::{AnalyticsApi, AnalyticsRequest, FeedbackApi, PortfolioAnalysis};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "项目组合财务健康分析";

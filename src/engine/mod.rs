// ==========================================
// 项目组合财务健康分析 - 引擎层
// ==========================================
// 职责: 纯计算引擎, 不做 I/O
// 红线: 引擎只读项目记录; 数据问题静默兜底, 只有配置错误返回 Err
// ==========================================
// 流水线: 富化 -> 进度快照 -> EVM -> 预测 -> 建议 -> 组合汇总
// ==========================================

pub mod enrichment;
pub mod evm;
pub mod forecast;
pub mod portfolio;
pub mod progress;
pub mod recommendation;
pub mod rules;

// 重导出核心引擎
pub use enrichment::ProjectEnricher;
pub use evm::{EvmCalculator, EvmOptions};
pub use forecast::PredictiveForecaster;
pub use portfolio::PortfolioAggregator;
pub use recommendation::{ProjectAnalysisInput, RecommendationEngine};
pub use rules::{Rule, RuleCondition, RuleFacts};

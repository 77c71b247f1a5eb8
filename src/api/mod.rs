// ==========================================
// 项目组合财务健康分析 - API 层
// ==========================================
// 职责: 面向调用方的分析/反馈接口, 组装各引擎与仓储
// ==========================================

pub mod analytics_api;
pub mod error;
pub mod feedback_api;

// 重导出核心类型
pub use analytics_api::{AnalyticsApi, AnalyticsRequest, PortfolioAnalysis, ProjectAnalysis};
pub use error::{ApiError, ApiResult};
pub use feedback_api::FeedbackApi;

// ==========================================
// 项目组合财务健康分析 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 建议反馈日志的追加与查询
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod feedback_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use feedback_repo::{FeedbackRepository, InMemoryFeedbackRepository, SqliteFeedbackRepository};

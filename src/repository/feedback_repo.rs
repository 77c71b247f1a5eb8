// ==========================================
// 项目组合财务健康分析 - 建议反馈日志仓储
// ==========================================
// 红线: 只追加; 同一进程内的并发追加必须串行化, 不能丢失
// 实现: 内存版 (Mutex) / SQLite 版 (feedback_log 表)
// ==========================================

mod core;
mod memory;
mod sqlite;

#[cfg(test)]
mod tests;

pub use core::FeedbackRepository;
pub use memory::InMemoryFeedbackRepository;
pub use sqlite::SqliteFeedbackRepository;

// ==========================================
// 项目组合财务健康分析 - 决策建议引擎
// ==========================================
// 职责: 五类建议生成 + 去重/过滤/排序/截断
// 输入: 项目分析输入 (记录 + 进度快照) + 外部异常观测 + 生成配置
// 输出: Vec<Recommendation> (按优先级降序)
// 红线: 唯一的错误路径是配置校验; 数据问题一律静默兜底
// 红线: 建议 id 由 (类型, 项目, 关联项目) 确定性生成, 重复调用结果一致
// ==========================================
// 生成顺序: budget -> vendor -> timeline -> risk -> optimization
// ==========================================

mod budget;
mod core;
mod optimization;
mod priority;
mod risk;
mod timeline;
mod vendor;


pub use core::{ProjectAnalysisInput, RecommendationEngine};
pub use priority::{priority_score, severity_priority};

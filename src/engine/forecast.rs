// ==========================================
// 项目组合财务健康分析 - 成本预测引擎
// ==========================================
// 职责: 混合 EAC 预测 + 置信区间 + 燃烧率 + 风险等级 + 趋势
// 输入: 项目记录 + 进度快照 + 可选历史支出序列
// 输出: PredictiveMetrics
// 红线: 输出结构总是完整, 数值总是有限
// ==========================================
// 注: 置信度与风险等级是规则启发式, 不是模型预测
// ==========================================

mod core;
mod trend;


pub use core::PredictiveForecaster;

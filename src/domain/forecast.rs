// ==========================================
// 项目组合财务健康分析 - 预测指标值对象
// ==========================================

use crate::domain::types::{RiskLevel, Trend};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 预测指标
///
/// 结构总是完整的: 所有数值字段都是有限值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveMetrics {
    pub predicted_eac: f64,
    pub etc: f64,
    pub eac_low: f64,  // 90% 区间下界
    pub eac_high: f64, // 90% 区间上界
    pub confidence: f64, // 0~0.95
    pub predicted_completion: NaiveDate,
    pub burn_rate: f64, // 日均支出
    pub projected_variance: f64, // budget - predicted_eac
    pub risk_level: RiskLevel,
    pub trend: Trend,
    /// 仅在燃烧率 > 0 且预计超支时给出; 已超支为 0
    pub days_until_budget_exhaustion: Option<i64>,
}

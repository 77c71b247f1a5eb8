// ==========================================
// 项目组合财务健康分析 - EVM 指标值对象
// ==========================================
// 每次调用重新计算, 无持久身份
// ==========================================

use crate::domain::types::{EacMethod, EvmStatus};
use serde::{Deserialize, Serialize};

/// EVM 计算输入
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvmInput {
    pub budget: f64,
    pub planned_progress: f64, // 计划进度 0~1
    pub earned_progress: f64,  // 挣值进度 0~1
    pub actual_cost: f64,
}

/// 核心 EVM 指标
///
/// 金额字段保留 2 位小数, 指数字段 (cpi/spi/tcpi) 保留 3 位
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvmMetrics {
    pub bcws: f64, // 计划价值 PV
    pub bcwp: f64, // 挣值 EV
    pub acwp: f64, // 实际成本 AC
    pub cpi: f64,
    pub spi: f64,
    pub cv: f64,
    pub sv: f64,
    pub tcpi: f64,
    pub eac: f64,
    pub etc: f64,
    pub vac: f64,
    pub bac: f64,
}

/// 扩展 EVM 指标
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtendedEvmMetrics {
    #[serde(flatten)]
    pub metrics: EvmMetrics,
    pub percent_complete: f64, // 挣值进度 %
    pub percent_planned: f64,  // 计划进度 %
    pub percent_spent: f64,    // ACWP / BAC %
    /// min(CPI, SPI), 用于状态分级
    pub composite_index: f64,
    /// CPI * SPI
    pub critical_ratio: f64,
    pub eac_typical: f64,
    pub eac_atypical: f64,
    pub eac_combined: f64,
    pub eac_method: EacMethod,
    pub status: EvmStatus,
}

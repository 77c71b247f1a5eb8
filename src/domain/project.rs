// ==========================================
// 项目组合财务健康分析 - 项目领域模型
// ==========================================
// 红线: ProjectFinancialRecord 由上游项目组合存储拥有, 引擎只读
// ==========================================

use crate::domain::types::ProjectStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ProjectInput - 原始项目输入
// ==========================================
// 用途: 富化前的项目数据 (承诺/实际按明细金额给出)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInput {
    pub id: String,
    pub name: String,
    pub budget: f64,
    #[serde(default)]
    pub commitments: Vec<f64>, // 承诺金额明细 (采购订单等)
    #[serde(default)]
    pub actuals: Vec<f64>, // 实际发生金额明细 (发票等)
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// 项目经理填报的完成比例 (0~1), 用作 EVM 挣值进度
    #[serde(default)]
    pub percent_complete: Option<f64>,
}

fn default_currency() -> String {
    "USD".to_string()
}

// ==========================================
// ProjectFinancialRecord - 项目财务记录 (富化后)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFinancialRecord {
    pub id: String,
    pub name: String,
    pub budget: f64,
    pub total_spend: f64,       // = total_commitments + total_actuals
    pub total_commitments: f64, // 承诺合计
    pub total_actuals: f64,     // 实际合计
    pub variance: f64,          // budget - total_spend (负数为超支)
    pub spend_percentage: f64,  // total_spend / budget * 100
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ProjectStatus,
    pub health_score: f64, // 0~100
    pub currency: String,
    #[serde(default)]
    pub percent_complete: Option<f64>,
}

// ==========================================
// HistoricalDataPoint - 历史支出序列点
// ==========================================
// 顺序: 由旧到新
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalDataPoint {
    pub date: NaiveDate,
    pub spend: f64,  // 当期实际支出
    pub budget: f64, // 当期计划支出
    pub cumulative_spend: f64,
}

// ==========================================
// ProgressSnapshot - 进度快照
// ==========================================
// 同一项目在同一时点只计算一次, EVM 与预测共用,
// 保证两种预测的输入口径不会悄悄分叉
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub as_of: NaiveDate,
    pub time_progress: f64,  // 0~1
    pub spend_progress: f64, // 0~1 (超支截断为 1)
    /// 未截断的支出比例 (spend / budget), 预算为 0 时为 0
    pub spend_ratio: f64,
    pub total_days: i64,     // >= 1
    pub days_elapsed: i64,   // >= 1 (用于燃烧率)
    pub days_remaining: i64, // >= 0
    /// 距结束日期天数 (可为负, 表示已过期)
    pub days_until_end: i64,
}

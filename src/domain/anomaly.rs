// ==========================================
// 项目组合财务健康分析 - 异常观测 (外部输入)
// ==========================================
// 由外部异常检测组件产出, 本模块只消费
// ==========================================

use crate::domain::types::{AnomalyType, Severity};
use crate::numeric::safe_number;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyObservation {
    pub project_id: String,
    pub anomaly_type: AnomalyType,
    pub severity: Severity,
    pub confidence: f64, // 0~1
    pub description: String,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub details: JsonValue, // 检测细节 (JSON 对象)
}

impl AnomalyObservation {
    /// 读取 details 中的数值字段; 缺失/非数值/非有限返回 None
    pub fn detail_number(&self, key: &str) -> Option<f64> {
        self.details
            .get(key)
            .and_then(JsonValue::as_f64)
            .filter(|v| v.is_finite())
    }

    /// 异常涉及金额 (details.amount 的绝对值), 缺失为 0
    pub fn amount(&self) -> f64 {
        safe_number(self.detail_number("amount").unwrap_or(0.0)).abs()
    }
}

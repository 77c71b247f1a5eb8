// ==========================================
// 项目组合财务健康分析 - 组合汇总值对象
// ==========================================

use crate::domain::types::RiskLevel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub project_count: usize,
    pub total_budget: f64,
    pub total_predicted_eac: f64,
    /// total_budget - total_predicted_eac (负数为组合整体预计超支)
    pub net_projected_variance: f64,
    pub risk_distribution: RiskDistribution,
    pub overall_risk: RiskLevel,
    /// 高风险/危险项目 id
    pub at_risk_projects: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl RiskDistribution {
    pub fn record(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Low => self.low += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::High => self.high += 1,
            RiskLevel::Critical => self.critical += 1,
        }
    }
}

// ==========================================
// 项目组合财务健康分析 - 领域类型定义
// ==========================================
// 序列化格式: snake_case (与上游项目组合存储一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 项目状态 (Project Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning, // 规划中
    #[default]
    Active, // 执行中
    OnHold,    // 暂停
    Completed, // 已完成
    Cancelled, // 已取消
}

impl ProjectStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ProjectStatus::Active)
    }

    /// 已关闭的项目 (不参与优化建议配对)
    pub fn is_closed(&self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Cancelled)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectStatus::Planning => write!(f, "planning"),
            ProjectStatus::Active => write!(f, "active"),
            ProjectStatus::OnHold => write!(f, "on_hold"),
            ProjectStatus::Completed => write!(f, "completed"),
            ProjectStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ==========================================
// 风险等级 (Risk Level)
// ==========================================
// 顺序: Low < Medium < High < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,      // 正常
    Medium,   // 关注
    High,     // 紧张
    Critical, // 危险
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

// ==========================================
// 趋势 (Trend)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Stable => write!(f, "stable"),
            Trend::Declining => write!(f, "declining"),
        }
    }
}

// ==========================================
// EVM 状态分级 (EVM Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvmStatus {
    Excellent,
    Good,
    Caution,
    Warning,
    Critical,
}

impl fmt::Display for EvmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvmStatus::Excellent => write!(f, "excellent"),
            EvmStatus::Good => write!(f, "good"),
            EvmStatus::Caution => write!(f, "caution"),
            EvmStatus::Warning => write!(f, "warning"),
            EvmStatus::Critical => write!(f, "critical"),
        }
    }
}

// ==========================================
// EAC 计算口径 (EAC Method)
// ==========================================
// 调用方必须显式选择, 不做推断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EacMethod {
    /// BAC / CPI: 既往绩效将持续
    #[default]
    Typical,
    /// ACWP + (BAC - BCWP): 既往偏差为一次性
    Atypical,
    /// ACWP + (BAC - BCWP) / (CPI * SPI): 成本与进度绩效共同作用
    Combined,
}

impl fmt::Display for EacMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EacMethod::Typical => write!(f, "typical"),
            EacMethod::Atypical => write!(f, "atypical"),
            EacMethod::Combined => write!(f, "combined"),
        }
    }
}

// ==========================================
// 异常严重度 (Anomaly Severity)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

// ==========================================
// 异常类型 (Anomaly Type)
// ==========================================
// 由外部异常检测组件产出, 未识别的类型统一落入 Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    VarianceOutlier,
    SpendSpike,
    CommitmentSurge,
    DuplicateCharge,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyType::VarianceOutlier => write!(f, "variance_outlier"),
            AnomalyType::SpendSpike => write!(f, "spend_spike"),
            AnomalyType::CommitmentSurge => write!(f, "commitment_surge"),
            AnomalyType::DuplicateCharge => write!(f, "duplicate_charge"),
            AnomalyType::Unknown => write!(f, "unknown"),
        }
    }
}

// ==========================================
// 建议类别 (Recommendation Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Budget,
    Vendor,
    Timeline,
    Risk,
    Optimization,
}

impl RecommendationCategory {
    /// 全部类别 (生成器执行顺序)
    pub const ALL: [RecommendationCategory; 5] = [
        RecommendationCategory::Budget,
        RecommendationCategory::Vendor,
        RecommendationCategory::Timeline,
        RecommendationCategory::Risk,
        RecommendationCategory::Optimization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationCategory::Budget => "budget",
            RecommendationCategory::Vendor => "vendor",
            RecommendationCategory::Timeline => "timeline",
            RecommendationCategory::Risk => "risk",
            RecommendationCategory::Optimization => "optimization",
        }
    }
}

impl fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecommendationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "budget" => Ok(RecommendationCategory::Budget),
            "vendor" => Ok(RecommendationCategory::Vendor),
            "timeline" => Ok(RecommendationCategory::Timeline),
            "risk" => Ok(RecommendationCategory::Risk),
            "optimization" => Ok(RecommendationCategory::Optimization),
            other => Err(other.to_string()),
        }
    }
}

// ==========================================
// 建议状态 (Recommendation Status)
// ==========================================
// 由外部评审流程变更; 引擎只产出 Pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
    #[default]
    Pending,
    Acknowledged,
    Accepted,
    Rejected,
    Deferred,
}

impl RecommendationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationStatus::Pending => "pending",
            RecommendationStatus::Acknowledged => "acknowledged",
            RecommendationStatus::Accepted => "accepted",
            RecommendationStatus::Rejected => "rejected",
            RecommendationStatus::Deferred => "deferred",
        }
    }

    /// 是否为评审决定 (可写入反馈日志)
    pub fn is_decision(&self) -> bool {
        !matches!(self, RecommendationStatus::Pending)
    }
}

impl fmt::Display for RecommendationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecommendationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(RecommendationStatus::Pending),
            "acknowledged" => Ok(RecommendationStatus::Acknowledged),
            "accepted" => Ok(RecommendationStatus::Accepted),
            "rejected" => Ok(RecommendationStatus::Rejected),
            "deferred" => Ok(RecommendationStatus::Deferred),
            other => Err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            "Budget".parse::<RecommendationCategory>(),
            Ok(RecommendationCategory::Budget)
        );
        assert_eq!(
            " optimization ".parse::<RecommendationCategory>(),
            Ok(RecommendationCategory::Optimization)
        );
        assert!("marketing".parse::<RecommendationCategory>().is_err());
    }

    #[test]
    fn test_unknown_anomaly_type_deserializes() {
        let t: AnomalyType = serde_json::from_str("\"weekend_posting\"").unwrap();
        assert_eq!(t, AnomalyType::Unknown);
        let t: AnomalyType = serde_json::from_str("\"variance_outlier\"").unwrap();
        assert_eq!(t, AnomalyType::VarianceOutlier);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&ProjectStatus::OnHold).unwrap(),
            "\"on_hold\""
        );
        assert!(!RecommendationStatus::Pending.is_decision());
        assert!(RecommendationStatus::Deferred.is_decision());
    }
}

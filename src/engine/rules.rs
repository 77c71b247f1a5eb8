// ==========================================
// 项目组合财务健康分析 - 规则表解释器
// ==========================================
// 职责: 趋势分带 / 风险等级 / 异常升级 的统一规则求值
// 规则以带标签的变体 (kind + 参数) 表达, 由同一个解释器求值,
// 规则表可序列化、可测试、可由配置覆写
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::anomaly::AnomalyObservation;
use crate::domain::types::{RiskLevel, Severity, Trend};
use crate::numeric::safe_number;
use serde::{Deserialize, Serialize};

// ==========================================
// RuleCondition - 规则条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleCondition {
    /// 预计偏差率 < threshold
    VarianceRatioBelow { threshold: f64 },
    /// 健康分 < threshold
    HealthBelow { threshold: f64 },
    /// 趋势等于
    TrendIs { trend: Trend },
    /// 信号值 > threshold
    SignalAbove { threshold: f64 },
    /// 信号值 < threshold
    SignalBelow { threshold: f64 },
    /// 某严重度异常数量 >= count
    SeverityCountAtLeast { severity: Severity, count: usize },
    /// 恒真 (兜底)
    Always,
    AnyOf { conditions: Vec<RuleCondition> },
    AllOf { conditions: Vec<RuleCondition> },
}

// ==========================================
// Rule - 条件 + 结论
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule<O> {
    pub outcome: O,
    pub condition: RuleCondition,
}

impl<O> Rule<O> {
    pub fn new(outcome: O, condition: RuleCondition) -> Self {
        Self { outcome, condition }
    }
}

// ==========================================
// RuleFacts - 求值事实
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleFacts {
    pub variance_ratio: f64,
    pub health_score: f64,
    pub trend: Option<Trend>,
    pub signal: f64,
    /// 按严重度计数: [low, medium, high, critical]
    pub severity_counts: [usize; 4],
}

impl RuleFacts {
    /// 风险等级判定事实
    pub fn for_risk(variance_ratio: f64, health_score: f64, trend: Trend) -> Self {
        Self {
            variance_ratio: safe_number(variance_ratio),
            health_score: safe_number(health_score),
            trend: Some(trend),
            ..Self::default()
        }
    }

    /// 趋势分带事实
    pub fn for_signal(signal: f64) -> Self {
        Self {
            signal: safe_number(signal),
            ..Self::default()
        }
    }

    /// 异常升级事实 (单个项目的异常集合)
    pub fn for_anomalies<'a, I>(anomalies: I) -> Self
    where
        I: IntoIterator<Item = &'a AnomalyObservation>,
    {
        let mut counts = [0usize; 4];
        for anomaly in anomalies {
            counts[severity_slot(anomaly.severity)] += 1;
        }
        Self {
            severity_counts: counts,
            ..Self::default()
        }
    }

    pub fn severity_count(&self, severity: Severity) -> usize {
        self.severity_counts[severity_slot(severity)]
    }
}

fn severity_slot(severity: Severity) -> usize {
    match severity {
        Severity::Low => 0,
        Severity::Medium => 1,
        Severity::High => 2,
        Severity::Critical => 3,
    }
}

// ==========================================
// 解释器
// ==========================================

/// 条件求值
pub fn evaluate(condition: &RuleCondition, facts: &RuleFacts) -> bool {
    match condition {
        RuleCondition::VarianceRatioBelow { threshold } => facts.variance_ratio < *threshold,
        RuleCondition::HealthBelow { threshold } => facts.health_score < *threshold,
        RuleCondition::TrendIs { trend } => facts.trend == Some(*trend),
        RuleCondition::SignalAbove { threshold } => facts.signal > *threshold,
        RuleCondition::SignalBelow { threshold } => facts.signal < *threshold,
        RuleCondition::SeverityCountAtLeast { severity, count } => {
            facts.severity_count(*severity) >= *count
        }
        RuleCondition::Always => true,
        RuleCondition::AnyOf { conditions } => conditions.iter().any(|c| evaluate(c, facts)),
        RuleCondition::AllOf { conditions } => conditions.iter().all(|c| evaluate(c, facts)),
    }
}

/// 按顺序求值, 首个命中的规则生效
pub fn first_match<O: Copy>(rules: &[Rule<O>], facts: &RuleFacts) -> Option<O> {
    rules
        .iter()
        .find(|rule| evaluate(&rule.condition, facts))
        .map(|rule| rule.outcome)
}

/// 风险等级判定 (无命中时为 Low)
pub fn classify_risk(rules: &[Rule<RiskLevel>], facts: &RuleFacts) -> RiskLevel {
    first_match(rules, facts).unwrap_or(RiskLevel::Low)
}

/// 趋势分带 (无命中时为 Stable)
pub fn classify_trend(rules: &[Rule<Trend>], signal: f64) -> Trend {
    first_match(rules, &RuleFacts::for_signal(signal)).unwrap_or(Trend::Stable)
}

// ==========================================
// 默认规则表
// ==========================================

/// 风险等级规则 (critical -> high -> medium -> low)
pub fn default_risk_rules() -> Vec<Rule<RiskLevel>> {
    use RuleCondition::*;
    vec![
        Rule::new(
            RiskLevel::Critical,
            AnyOf {
                conditions: vec![
                    VarianceRatioBelow { threshold: -0.20 },
                    HealthBelow { threshold: 30.0 },
                ],
            },
        ),
        Rule::new(
            RiskLevel::High,
            AnyOf {
                conditions: vec![
                    VarianceRatioBelow { threshold: -0.10 },
                    HealthBelow { threshold: 50.0 },
                    AllOf {
                        conditions: vec![
                            VarianceRatioBelow { threshold: -0.05 },
                            TrendIs { trend: Trend::Declining },
                        ],
                    },
                ],
            },
        ),
        Rule::new(
            RiskLevel::Medium,
            AnyOf {
                conditions: vec![
                    VarianceRatioBelow { threshold: 0.0 },
                    HealthBelow { threshold: 70.0 },
                    TrendIs { trend: Trend::Declining },
                ],
            },
        ),
        Rule::new(RiskLevel::Low, Always),
    ]
}

/// 趋势分带规则: 以 0 为中心对称, band 为预算占比
pub fn symmetric_trend_rules(band: f64) -> Vec<Rule<Trend>> {
    vec![
        Rule::new(Trend::Improving, RuleCondition::SignalAbove { threshold: band }),
        Rule::new(Trend::Declining, RuleCondition::SignalBelow { threshold: -band }),
    ]
}

/// 异常升级条件: >=1 个 critical 或 >=2 个 high
pub fn default_escalation_condition() -> RuleCondition {
    RuleCondition::AnyOf {
        conditions: vec![
            RuleCondition::SeverityCountAtLeast {
                severity: Severity::Critical,
                count: 1,
            },
            RuleCondition::SeverityCountAtLeast {
                severity: Severity::High,
                count: 2,
            },
        ],
    }
}

// ==========================================
// 规则表校验
// ==========================================

/// 校验条件中的阈值均为有限值, 组合条件非空
pub fn validate_condition(condition: &RuleCondition) -> ConfigResult<()> {
    match condition {
        RuleCondition::VarianceRatioBelow { threshold }
        | RuleCondition::HealthBelow { threshold }
        | RuleCondition::SignalAbove { threshold }
        | RuleCondition::SignalBelow { threshold } => {
            if !threshold.is_finite() {
                return Err(ConfigError::InvalidRules(format!(
                    "阈值必须为有限值: {:?}",
                    condition
                )));
            }
            Ok(())
        }
        RuleCondition::SeverityCountAtLeast { count, .. } => {
            if *count == 0 {
                return Err(ConfigError::InvalidRules(
                    "异常计数阈值必须 >= 1".to_string(),
                ));
            }
            Ok(())
        }
        RuleCondition::TrendIs { .. } | RuleCondition::Always => Ok(()),
        RuleCondition::AnyOf { conditions } | RuleCondition::AllOf { conditions } => {
            if conditions.is_empty() {
                return Err(ConfigError::InvalidRules("组合条件不能为空".to_string()));
            }
            conditions.iter().try_for_each(validate_condition)
        }
    }
}

/// 校验规则表
pub fn validate_rules<O>(rules: &[Rule<O>]) -> ConfigResult<()> {
    if rules.is_empty() {
        return Err(ConfigError::InvalidRules("规则表不能为空".to_string()));
    }
    rules
        .iter()
        .try_for_each(|rule| validate_condition(&rule.condition))
}

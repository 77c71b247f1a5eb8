// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的临时数据库、项目/异常测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use portfolio_health::domain::{AnomalyObservation, ProjectInput};
use portfolio_health::domain::types::{AnomalyType, ProjectStatus, Severity};
use serde_json::json;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库文件
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
///
/// 表结构由被测对象 (ConfigManager / SqliteFeedbackRepository) 自行创建
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();
    Ok((temp_file, db_path))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 标准分析时点 (年度项目的年中)
pub fn as_of() -> NaiveDate {
    date(2026, 7, 1)
}

/// 创建测试项目 (2026 全年, 执行中)
pub fn project(id: &str, budget: f64, commitments: f64, actuals: f64) -> ProjectInput {
    ProjectInput {
        id: id.to_string(),
        name: format!("Project {}", id),
        budget,
        commitments: if commitments > 0.0 { vec![commitments] } else { vec![] },
        actuals: if actuals > 0.0 { vec![actuals] } else { vec![] },
        start_date: date(2026, 1, 1),
        end_date: date(2026, 12, 31),
        status: ProjectStatus::Active,
        currency: "USD".to_string(),
        percent_complete: None,
    }
}

/// 创建带状态的测试项目
pub fn project_with_status(
    id: &str,
    budget: f64,
    actuals: f64,
    status: ProjectStatus,
) -> ProjectInput {
    ProjectInput {
        status,
        ..project(id, budget, 0.0, actuals)
    }
}

/// 创建测试异常观测
pub fn anomaly(project_id: &str, severity: Severity, confidence: f64, amount: f64) -> AnomalyObservation {
    AnomalyObservation {
        project_id: project_id.to_string(),
        anomaly_type: AnomalyType::VarianceOutlier,
        severity,
        confidence,
        description: format!("Variance outlier on {}", project_id),
        recommendation: None,
        details: json!({ "amount": amount }),
    }
}

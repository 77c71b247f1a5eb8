// ==========================================
// 项目组合财务健康分析 - 进度快照
// ==========================================
// 职责: 同一项目在同一时点的时间进度/支出进度只算一次,
//       EVM 计算器与预测器共用同一份快照
// ==========================================

use crate::domain::project::{ProgressSnapshot, ProjectFinancialRecord};
use crate::numeric::{clamp01, safe_div, safe_number};
use chrono::NaiveDate;

/// 由项目记录计算进度快照
pub fn snapshot(project: &ProjectFinancialRecord, as_of: NaiveDate) -> ProgressSnapshot {
    snapshot_from_parts(
        project.start_date,
        project.end_date,
        project.budget,
        project.total_spend,
        as_of,
    )
}

/// 由原始字段计算进度快照
///
/// 退化输入处理:
/// - 工期 <= 0 天: 按 1 天计
/// - 尚未开工: time_progress = 0, 燃烧率分母按 1 天计
/// - 预算 <= 0: spend_progress = spend_ratio = 0
pub fn snapshot_from_parts(
    start_date: NaiveDate,
    end_date: NaiveDate,
    budget: f64,
    spend: f64,
    as_of: NaiveDate,
) -> ProgressSnapshot {
    let total_days = (end_date - start_date).num_days().max(1);
    let raw_elapsed = (as_of - start_date).num_days();
    let bounded_elapsed = raw_elapsed.clamp(0, total_days);

    let time_progress = clamp01(bounded_elapsed as f64 / total_days as f64);

    let budget = safe_number(budget);
    let spend = safe_number(spend).max(0.0);
    let spend_ratio = if budget > 0.0 {
        safe_div(spend, budget, 0.0)
    } else {
        0.0
    };
    let spend_progress = spend_ratio.min(1.0).max(0.0);

    let days_until_end = (end_date - as_of).num_days();

    ProgressSnapshot {
        as_of,
        time_progress,
        spend_progress,
        spend_ratio,
        total_days,
        days_elapsed: raw_elapsed.max(1),
        days_remaining: days_until_end.max(0),
        days_until_end,
    }
}

// ==========================================
// 项目组合财务健康分析 - 配置层错误类型
// ==========================================
// 说明: 配置错误是唯一会拒绝调用的错误类别 (调用方误用),
//       数据质量问题与退化输入在数值层/公式内消化, 不走这里
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 参数校验错误 =====
    #[error("无效的建议类别: {0}")]
    InvalidCategory(String),

    #[error("配置项超出范围 (field={field}): value={value}, 允许区间=[{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("EVM 状态分级配置无效: {0}")]
    InvalidBands(String),

    #[error("规则表配置无效: {0}")]
    InvalidRules(String),

    #[error("配置值解析失败 (key={key}): {value}")]
    ParseError { key: String, value: String },

    // ===== 存储错误 =====
    #[error("配置存储访问失败: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("配置快照序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("锁获取失败: {0}")]
    LockError(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 校验数值在闭区间内 (非有限值一律拒绝)
pub fn ensure_range(field: &str, value: f64, min: f64, max: f64) -> ConfigResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

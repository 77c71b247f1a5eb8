// ==========================================
// 项目组合财务健康分析 - 配置管理器
// ==========================================
// 职责: 从 config_kv 表加载阈值覆写, 合并默认值并校验
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::thresholds::AnalyticsConfig;
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::domain::types::EvmStatus;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 全局作用域
pub const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例 (自动建表)
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 配置值 (UPSERT)
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 读取 global scope 全部配置
    fn read_global_values(&self) -> ConfigResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut values = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            values.insert(key, value);
        }
        Ok(values)
    }

    /// 加载分析配置: 默认值 + config_kv 覆写, 最后整体校验
    ///
    /// 未识别的键忽略 (记录 debug 日志); 已识别但无法解析或越界的值拒绝加载
    pub fn load_analytics_config(&self) -> ConfigResult<AnalyticsConfig> {
        let mut config = AnalyticsConfig::default();
        let values = self.read_global_values()?;

        for (key, value) in &values {
            if !apply_override(&mut config, key, value)? {
                tracing::debug!(key = %key, "忽略未识别的配置键");
            }
        }

        config.validate()?;
        tracing::info!(overrides = values.len(), "分析配置加载完成");
        Ok(config)
    }

    /// 获取当前生效配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 随分析结果一同归档, 便于复现某次建议的阈值口径
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let config = self.load_analytics_config()?;
        Ok(serde_json::to_string(&config)?)
    }
}

// ==========================================
// 覆写应用
// ==========================================

fn parse_f64(key: &str, value: &str) -> ConfigResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConfigError::ParseError {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn parse_usize(key: &str, value: &str) -> ConfigResult<usize> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::ParseError {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn parse_i64(key: &str, value: &str) -> ConfigResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::ParseError {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// 应用单个覆写; 返回 false 表示键未识别
fn apply_override(config: &mut AnalyticsConfig, key: &str, value: &str) -> ConfigResult<bool> {
    use config_keys::*;

    let forecast = &mut config.forecast;
    let rec = &mut config.recommendation;

    match key {
        // ===== EVM 分级 =====
        EVM_BAND_EXCELLENT => config.evm_bands.set_threshold(EvmStatus::Excellent, parse_f64(key, value)?),
        EVM_BAND_GOOD => config.evm_bands.set_threshold(EvmStatus::Good, parse_f64(key, value)?),
        EVM_BAND_CAUTION => config.evm_bands.set_threshold(EvmStatus::Caution, parse_f64(key, value)?),
        EVM_BAND_WARNING => config.evm_bands.set_threshold(EvmStatus::Warning, parse_f64(key, value)?),

        // ===== 预测 =====
        FORECAST_TREND_BAND_RATIO => forecast.trend_band_ratio = parse_f64(key, value)?,
        FORECAST_TREND_WINDOW => forecast.trend_window = parse_usize(key, value)?,
        FORECAST_FALLBACK_CONFIDENCE => forecast.fallback_confidence = parse_f64(key, value)?,
        FORECAST_IMPROVING_MULTIPLIER => forecast.improving_multiplier = parse_f64(key, value)?,
        FORECAST_DECLINING_MULTIPLIER => forecast.declining_multiplier = parse_f64(key, value)?,
        FORECAST_RISK_RULES => forecast.risk_rules = serde_json::from_str(value)?,

        // ===== 建议 =====
        REC_MATERIALITY_FLOOR => rec.materiality_floor = parse_f64(key, value)?,
        REC_SURPLUS_RATIO => rec.surplus_ratio = parse_f64(key, value)?,
        REC_OVERRUN_REVIEW_RATIO => rec.overrun_review_ratio = parse_f64(key, value)?,
        REC_VENDOR_MIN_COMBINED_SPEND => rec.vendor_min_combined_spend = parse_f64(key, value)?,
        REC_VENDOR_SAVINGS_RATE => rec.vendor_savings_rate = parse_f64(key, value)?,
        REC_COMMITMENT_MIN_AMOUNT => rec.commitment_min_amount = parse_f64(key, value)?,
        REC_TIMELINE_GAP => rec.timeline_gap = parse_f64(key, value)?,
        REC_DEADLINE_WINDOW_DAYS => rec.deadline_window_days = parse_i64(key, value)?,
        REC_PORTFOLIO_HEALTH_FLOOR => rec.portfolio_health_floor = parse_f64(key, value)?,
        REC_LOW_PRIORITY_CUTOFF => rec.low_priority_cutoff = parse_f64(key, value)?,
        REC_ESCALATION_CONDITION => rec.escalation_condition = serde_json::from_str(value)?,

        _ => return Ok(false),
    }

    Ok(true)
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // EVM 状态分级阈值
    pub const EVM_BAND_EXCELLENT: &str = "evm_band_excellent";
    pub const EVM_BAND_GOOD: &str = "evm_band_good";
    pub const EVM_BAND_CAUTION: &str = "evm_band_caution";
    pub const EVM_BAND_WARNING: &str = "evm_band_warning";

    // 预测
    pub const FORECAST_TREND_BAND_RATIO: &str = "forecast_trend_band_ratio";
    pub const FORECAST_TREND_WINDOW: &str = "forecast_trend_window";
    pub const FORECAST_FALLBACK_CONFIDENCE: &str = "forecast_fallback_confidence";
    pub const FORECAST_IMPROVING_MULTIPLIER: &str = "forecast_improving_multiplier";
    pub const FORECAST_DECLINING_MULTIPLIER: &str = "forecast_declining_multiplier";
    pub const FORECAST_RISK_RULES: &str = "forecast_risk_rules"; // 风险规则表 (JSON)

    // 建议
    pub const REC_MATERIALITY_FLOOR: &str = "rec_materiality_floor";
    pub const REC_SURPLUS_RATIO: &str = "rec_surplus_ratio";
    pub const REC_OVERRUN_REVIEW_RATIO: &str = "rec_overrun_review_ratio";
    pub const REC_VENDOR_MIN_COMBINED_SPEND: &str = "rec_vendor_min_combined_spend";
    pub const REC_VENDOR_SAVINGS_RATE: &str = "rec_vendor_savings_rate";
    pub const REC_COMMITMENT_MIN_AMOUNT: &str = "rec_commitment_min_amount";
    pub const REC_TIMELINE_GAP: &str = "rec_timeline_gap";
    pub const REC_DEADLINE_WINDOW_DAYS: &str = "rec_deadline_window_days";
    pub const REC_PORTFOLIO_HEALTH_FLOOR: &str = "rec_portfolio_health_floor";
    pub const REC_LOW_PRIORITY_CUTOFF: &str = "rec_low_priority_cutoff";
    pub const REC_ESCALATION_CONDITION: &str = "rec_escalation_condition"; // 升级条件 (JSON)
}

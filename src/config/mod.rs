// ==========================================
// 项目组合财务健康分析 - 配置层
// ==========================================
// 职责: 阈值/规则表默认值, 覆写加载, 调用配置校验
// 存储: config_kv 表 (可选, 仅用于覆写)
// ==========================================

pub mod config_manager;
pub mod error;
pub mod evm_bands;
pub mod thresholds;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use evm_bands::{EvmStatusBands, StatusBand};
pub use thresholds::{
    parse_categories, validate_recommendation_config, AnalyticsConfig, ForecastConfig,
    RecommendationThresholds,
};

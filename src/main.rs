// ==========================================
// 项目组合财务健康分析 - 命令行入口
// ==========================================
// 用法: portfolio-health <request.json>
// 环境变量:
// - PORTFOLIO_HEALTH_DB: 可选, 配置覆写所在的 SQLite 文件
// - RUST_LOG / PORTFOLIO_HEALTH_LOG_JSON: 见 logging::init
// 输出: PortfolioAnalysis (JSON, 标准输出)
// ==========================================

use anyhow::{bail, Context, Result};
use portfolio_health::api::{AnalyticsApi, AnalyticsRequest};
use portfolio_health::config::ConfigManager;
use portfolio_health::logging;

const DB_ENV: &str = "PORTFOLIO_HEALTH_DB";

fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", portfolio_health::APP_NAME, portfolio_health::VERSION);
    tracing::info!("==================================================");

    let Some(request_path) = std::env::args().nth(1) else {
        bail!("用法: portfolio-health <request.json>");
    };

    let raw = std::fs::read_to_string(&request_path)
        .with_context(|| format!("无法读取请求文件: {}", request_path))?;
    let request: AnalyticsRequest =
        serde_json::from_str(&raw).with_context(|| format!("请求文件格式错误: {}", request_path))?;

    let api = match std::env::var(DB_ENV) {
        Ok(db_path) if !db_path.trim().is_empty() => {
            tracing::info!("使用配置数据库: {}", db_path);
            let manager = ConfigManager::new(&db_path)
                .with_context(|| format!("无法打开配置数据库: {}", db_path))?;
            AnalyticsApi::from_config_manager(&manager)?
        }
        _ => AnalyticsApi::default(),
    };

    let analysis = api.analyze_portfolio(&request)?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

// ==========================================
// 项目组合财务健康分析 - EVM 状态分级表
// ==========================================
// 规则: composite = min(CPI, SPI), 按最低阈值降序逐档匹配, 首个命中生效
// 阈值是配置, 不是硬编码常量
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::EvmStatus;
use serde::{Deserialize, Serialize};

/// 单档分级
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusBand {
    pub status: EvmStatus,
    pub min_index: f64,
}

/// 分级表 (按 min_index 严格降序)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvmStatusBands {
    pub bands: Vec<StatusBand>,
    /// 低于所有档位时的状态
    pub floor_status: EvmStatus,
}

impl Default for EvmStatusBands {
    fn default() -> Self {
        Self {
            bands: vec![
                StatusBand { status: EvmStatus::Excellent, min_index: 1.05 },
                StatusBand { status: EvmStatus::Good, min_index: 0.95 },
                StatusBand { status: EvmStatus::Caution, min_index: 0.90 },
                StatusBand { status: EvmStatus::Warning, min_index: 0.80 },
            ],
            floor_status: EvmStatus::Critical,
        }
    }
}

impl EvmStatusBands {
    /// 构造并校验
    pub fn new(bands: Vec<StatusBand>, floor_status: EvmStatus) -> ConfigResult<Self> {
        let table = Self { bands, floor_status };
        table.validate()?;
        Ok(table)
    }

    /// 校验: 非空, 阈值有限且非负, 严格降序
    pub fn validate(&self) -> ConfigResult<()> {
        if self.bands.is_empty() {
            return Err(ConfigError::InvalidBands("分级表不能为空".to_string()));
        }

        let mut previous: Option<f64> = None;
        for band in &self.bands {
            if !band.min_index.is_finite() || band.min_index < 0.0 {
                return Err(ConfigError::InvalidBands(format!(
                    "{} 档阈值无效: {}",
                    band.status, band.min_index
                )));
            }
            if let Some(prev) = previous {
                if band.min_index >= prev {
                    return Err(ConfigError::InvalidBands(format!(
                        "阈值必须严格降序: {} 档 {} >= 上一档 {}",
                        band.status, band.min_index, prev
                    )));
                }
            }
            previous = Some(band.min_index);
        }

        Ok(())
    }

    /// 按综合指数分级
    pub fn classify(&self, composite: f64) -> EvmStatus {
        self.bands
            .iter()
            .find(|band| composite >= band.min_index)
            .map(|band| band.status)
            .unwrap_or(self.floor_status)
    }

    /// 覆写某一档阈值 (配置管理器使用)
    pub(crate) fn set_threshold(&mut self, status: EvmStatus, min_index: f64) {
        if let Some(band) = self.bands.iter_mut().find(|b| b.status == status) {
            band.min_index = min_index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands_classify() {
        let bands = EvmStatusBands::default();
        assert!(bands.validate().is_ok());
        assert_eq!(bands.classify(1.2), EvmStatus::Excellent);
        assert_eq!(bands.classify(1.05), EvmStatus::Excellent);
        assert_eq!(bands.classify(1.0), EvmStatus::Good);
        assert_eq!(bands.classify(0.92), EvmStatus::Caution);
        assert_eq!(bands.classify(0.8), EvmStatus::Warning);
        assert_eq!(bands.classify(0.79), EvmStatus::Critical);
        assert_eq!(bands.classify(0.0), EvmStatus::Critical);
    }

    #[test]
    fn test_bands_must_descend() {
        let result = EvmStatusBands::new(
            vec![
                StatusBand { status: EvmStatus::Good, min_index: 0.9 },
                StatusBand { status: EvmStatus::Excellent, min_index: 1.1 },
            ],
            EvmStatus::Critical,
        );
        assert!(matches!(result, Err(ConfigError::InvalidBands(_))));
    }

    #[test]
    fn test_bands_reject_non_finite() {
        let result = EvmStatusBands::new(
            vec![StatusBand { status: EvmStatus::Good, min_index: f64::NAN }],
            EvmStatus::Critical,
        );
        assert!(result.is_err());

        let empty = EvmStatusBands::new(vec![], EvmStatus::Critical);
        assert!(empty.is_err());
    }
}

// ==========================================
// 项目组合财务健康分析 - EVM 计算器
// ==========================================
// 职责: 单项目挣值管理指标计算 + 状态分级
// 输入: 预算 + 计划进度 + 挣值进度 + 实际成本
// 输出: EvmMetrics / ExtendedEvmMetrics
// 红线: 任何数值输入都不报错; 每个除法都有显式零值保护
// ==========================================

use crate::config::error::ConfigResult;
use crate::config::evm_bands::EvmStatusBands;
use crate::domain::evm::{EvmInput, EvmMetrics, ExtendedEvmMetrics};
use crate::domain::project::{ProgressSnapshot, ProjectFinancialRecord};
use crate::domain::types::{EacMethod, EvmStatus};
use crate::numeric::{clamp01, round_index, round_money, safe_number};
use serde::{Deserialize, Serialize};

/// EVM 计算选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EvmOptions {
    /// EAC 口径, 调用方显式指定 (默认 Typical)
    pub eac_method: EacMethod,
}

impl EvmOptions {
    pub fn with_method(eac_method: EacMethod) -> Self {
        Self { eac_method }
    }
}

/// 三种 EAC 口径的计算结果 (未舍入)
#[derive(Debug, Clone, Copy)]
struct EacEstimates {
    typical: f64,
    atypical: f64,
    combined: f64,
}

impl EacEstimates {
    fn select(&self, method: EacMethod) -> f64 {
        match method {
            EacMethod::Typical => self.typical,
            EacMethod::Atypical => self.atypical,
            EacMethod::Combined => self.combined,
        }
    }
}

// ==========================================
// EvmCalculator - EVM 计算器
// ==========================================
pub struct EvmCalculator {
    bands: EvmStatusBands,
}

impl EvmCalculator {
    /// 使用指定分级表构造 (先校验)
    pub fn new(bands: EvmStatusBands) -> ConfigResult<Self> {
        bands.validate()?;
        Ok(Self { bands })
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算核心 EVM 指标
    ///
    /// 规则:
    /// - 进度截断到 [0,1]; 预算、实际成本负数按 0
    /// - CPI: ACWP > 0 时 BCWP/ACWP, 否则 1.0 (尚无支出视为按预算执行)
    /// - SPI: BCWS > 0 时 BCWP/BCWS, 否则 1.0
    /// - 指数先舍入到 3 位, 舍入后的指数参与 EAC 计算
    /// - TCPI: BAC-ACWP > 0 时 (BAC-BCWP)/(BAC-ACWP), 否则 1.0
    pub fn compute(&self, input: &EvmInput, options: &EvmOptions) -> EvmMetrics {
        let (metrics, _) = self.compute_core(input, options);
        metrics
    }

    /// 计算扩展 EVM 指标 (含三种 EAC 与状态分级)
    pub fn compute_extended(&self, input: &EvmInput, options: &EvmOptions) -> ExtendedEvmMetrics {
        let (metrics, estimates) = self.compute_core(input, options);

        let bac = metrics.bac;
        let percent_spent = if bac > 0.0 {
            metrics.acwp / bac * 100.0
        } else {
            0.0
        };

        let composite_index = round_index(metrics.cpi.min(metrics.spi));
        let status = self.classify(composite_index);

        ExtendedEvmMetrics {
            metrics,
            percent_complete: round_money(clamp01(input.earned_progress) * 100.0),
            percent_planned: round_money(clamp01(input.planned_progress) * 100.0),
            percent_spent: round_money(percent_spent),
            composite_index,
            critical_ratio: round_index(metrics.cpi * metrics.spi),
            eac_typical: round_money(estimates.typical),
            eac_atypical: round_money(estimates.atypical),
            eac_combined: round_money(estimates.combined),
            eac_method: options.eac_method,
            status,
        }
    }

    /// 计算项目的扩展 EVM 指标 (基于共享进度快照)
    pub fn compute_for_project(
        &self,
        project: &ProjectFinancialRecord,
        snapshot: &ProgressSnapshot,
        options: &EvmOptions,
    ) -> ExtendedEvmMetrics {
        let input = EvmInput::from_project(project, snapshot);
        let extended = self.compute_extended(&input, options);

        tracing::debug!(
            project_id = %project.id,
            cpi = extended.metrics.cpi,
            spi = extended.metrics.spi,
            eac = extended.metrics.eac,
            status = %extended.status,
            "EVM 指标计算完成"
        );

        extended
    }

    /// 综合指数分级
    pub fn classify(&self, composite_index: f64) -> EvmStatus {
        self.bands.classify(composite_index)
    }

    // ==========================================
    // 指标计算
    // ==========================================

    fn compute_core(&self, input: &EvmInput, options: &EvmOptions) -> (EvmMetrics, EacEstimates) {
        let bac = round_money(safe_number(input.budget).max(0.0));
        let planned = clamp01(input.planned_progress);
        let earned = clamp01(input.earned_progress);

        let bcws = round_money(bac * planned);
        let bcwp = round_money(bac * earned);
        let acwp = round_money(safe_number(input.actual_cost).max(0.0));

        let cpi = if acwp > 0.0 {
            round_index(bcwp / acwp)
        } else {
            1.0
        };
        let spi = if bcws > 0.0 {
            round_index(bcwp / bcws)
        } else {
            1.0
        };

        let estimates = self.estimate_eac(bac, bcwp, acwp, cpi, spi);
        let eac = round_money(estimates.select(options.eac_method));

        let remaining_budget = bac - acwp;
        let tcpi = if remaining_budget > 0.0 {
            round_index((bac - bcwp) / remaining_budget)
        } else {
            1.0
        };

        let metrics = EvmMetrics {
            bcws,
            bcwp,
            acwp,
            cpi,
            spi,
            cv: round_money(bcwp - acwp),
            sv: round_money(bcwp - bcws),
            tcpi,
            eac,
            etc: round_money((eac - acwp).max(0.0)),
            vac: round_money(bac - eac),
            bac,
        };

        (metrics, estimates)
    }

    /// 三种 EAC 口径
    ///
    /// 分母为 0 (CPI=0 或 CPI*SPI=0) 时回落到 Atypical 口径
    fn estimate_eac(&self, bac: f64, bcwp: f64, acwp: f64, cpi: f64, spi: f64) -> EacEstimates {
        let atypical = acwp + (bac - bcwp);

        let typical = if cpi > 0.0 { bac / cpi } else { atypical };

        let performance = cpi * spi;
        let combined = if performance > 0.0 {
            acwp + (bac - bcwp) / performance
        } else {
            atypical
        };

        EacEstimates {
            typical: safe_number(typical),
            atypical: safe_number(atypical),
            combined: safe_number(combined),
        }
    }
}

impl Default for EvmCalculator {
    fn default() -> Self {
        Self {
            bands: EvmStatusBands::default(),
        }
    }
}

impl EvmInput {
    /// 项目记录 -> EVM 输入
    ///
    /// - 计划进度: 时间进度
    /// - 挣值进度: 项目填报的完成比例; 未填报时按时间进度 (视为按计划推进)
    /// - 实际成本: 总支出
    pub fn from_project(project: &ProjectFinancialRecord, snapshot: &ProgressSnapshot) -> Self {
        Self {
            budget: project.budget,
            planned_progress: snapshot.time_progress,
            earned_progress: project
                .percent_complete
                .map(clamp01)
                .unwrap_or(snapshot.time_progress),
            actual_cost: project.total_spend,
        }
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn reference_input() -> EvmInput {
        EvmInput {
            budget: 100_000.0,
            planned_progress: 0.5,
            earned_progress: 0.4,
            actual_cost: 45_000.0,
        }
    }

    #[test]
    fn test_reference_case() {
        let calc = EvmCalculator::default();
        let m = calc.compute(&reference_input(), &EvmOptions::default());

        assert_eq!(m.bcws, 50_000.0);
        assert_eq!(m.bcwp, 40_000.0);
        assert_eq!(m.acwp, 45_000.0);
        assert_eq!(m.cpi, 0.889);
        assert_eq!(m.spi, 0.8);
        assert_eq!(m.cv, -5_000.0);
        assert_eq!(m.sv, -10_000.0);
        assert_eq!(m.eac, 112_485.94);
        assert_eq!(m.etc, 67_485.94);
        assert_eq!(m.vac, -12_485.94);
        // (100000 - 40000) / (100000 - 45000)
        assert_eq!(m.tcpi, 1.091);
    }

    #[test]
    fn test_eac_methods() {
        let calc = EvmCalculator::default();
        let input = reference_input();

        let atypical = calc.compute(&input, &EvmOptions::with_method(EacMethod::Atypical));
        assert_eq!(atypical.eac, 105_000.0);

        let combined = calc.compute(&input, &EvmOptions::with_method(EacMethod::Combined));
        // 45000 + 60000 / (0.889 * 0.8)
        assert_eq!(combined.eac, round_money(45_000.0 + 60_000.0 / (0.889 * 0.8)));
    }

    #[test]
    fn test_zero_actual_cost_defaults() {
        let calc = EvmCalculator::default();
        let m = calc.compute(
            &EvmInput {
                budget: 50_000.0,
                planned_progress: 0.0,
                earned_progress: 0.0,
                actual_cost: 0.0,
            },
            &EvmOptions::default(),
        );

        assert_eq!(m.cpi, 1.0);
        assert_eq!(m.spi, 1.0);
        assert_eq!(m.eac, 50_000.0);
        assert_eq!(m.tcpi, 1.0);
    }

    #[test]
    fn test_zero_earned_with_spend_falls_back() {
        let calc = EvmCalculator::default();
        let m = calc.compute(
            &EvmInput {
                budget: 10_000.0,
                planned_progress: 0.3,
                earned_progress: 0.0,
                actual_cost: 2_000.0,
            },
            &EvmOptions::default(),
        );

        // CPI = 0 -> Typical 回落到 Atypical
        assert_eq!(m.cpi, 0.0);
        assert_eq!(m.eac, 12_000.0);
        assert!(m.eac.is_finite());
    }

    #[test]
    fn test_non_finite_and_out_of_range_inputs() {
        let calc = EvmCalculator::default();
        let m = calc.compute_extended(
            &EvmInput {
                budget: f64::NAN,
                planned_progress: 7.0,
                earned_progress: -3.0,
                actual_cost: f64::INFINITY,
            },
            &EvmOptions::default(),
        );

        for v in [
            m.metrics.bcws, m.metrics.bcwp, m.metrics.acwp, m.metrics.cpi, m.metrics.spi,
            m.metrics.cv, m.metrics.sv, m.metrics.tcpi, m.metrics.eac, m.metrics.etc,
            m.metrics.vac, m.percent_spent, m.composite_index, m.critical_ratio,
        ] {
            assert!(v.is_finite());
        }
        assert_eq!(m.percent_planned, 100.0);
        assert_eq!(m.percent_complete, 0.0);
    }

    #[test]
    fn test_extended_status() {
        let calc = EvmCalculator::default();
        let m = calc.compute_extended(&reference_input(), &EvmOptions::default());

        // min(0.889, 0.8) = 0.8 -> warning
        assert_eq!(m.composite_index, 0.8);
        assert_eq!(m.status, EvmStatus::Warning);
        assert_eq!(m.percent_spent, 45.0);
        assert_eq!(m.eac_typical, 112_485.94);
        assert_eq!(m.eac_atypical, 105_000.0);
        assert_eq!(m.eac_method, EacMethod::Typical);
    }

    #[test]
    fn test_repeated_compute_is_bit_identical() {
        let calc = EvmCalculator::default();
        let input = reference_input();
        for method in [EacMethod::Typical, EacMethod::Atypical, EacMethod::Combined] {
            let options = EvmOptions::with_method(method);
            let first = calc.compute_extended(&input, &options);
            let second = calc.compute_extended(&input, &options);

            let bits = |m: &ExtendedEvmMetrics| {
                [
                    m.metrics.bcws, m.metrics.bcwp, m.metrics.acwp, m.metrics.cpi,
                    m.metrics.spi, m.metrics.cv, m.metrics.sv, m.metrics.tcpi,
                    m.metrics.eac, m.metrics.etc, m.metrics.vac, m.metrics.bac,
                    m.percent_complete, m.percent_planned, m.percent_spent,
                    m.composite_index, m.critical_ratio, m.eac_typical,
                    m.eac_atypical, m.eac_combined,
                ]
                .map(f64::to_bits)
            };
            assert_eq!(bits(&first), bits(&second), "{:?}", method);
            assert_eq!(first.status, second.status);
            assert_eq!(first.eac_method, second.eac_method);
        }
    }

    #[test]
    fn test_invalid_bands_are_rejected() {
        use crate::config::error::ConfigError;
        use crate::config::evm_bands::StatusBand;

        let empty = EvmStatusBands {
            bands: vec![],
            floor_status: EvmStatus::Critical,
        };
        assert!(matches!(EvmCalculator::new(empty), Err(ConfigError::InvalidBands(_))));

        let unordered = EvmStatusBands {
            bands: vec![
                StatusBand { status: EvmStatus::Good, min_index: 0.9 },
                StatusBand { status: EvmStatus::Excellent, min_index: 1.1 },
            ],
            floor_status: EvmStatus::Critical,
        };
        assert!(EvmCalculator::new(unordered).is_err());

        let calc = EvmCalculator::new(EvmStatusBands::default()).unwrap();
        let m = calc.compute_extended(&reference_input(), &EvmOptions::default());
        assert_eq!(m.status, EvmStatus::Warning);
    }
}

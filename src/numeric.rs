// ==========================================
// 项目组合财务健康分析 - 数值安全层
// ==========================================
// 职责: 缺失/非有限值归零, 定精度舍入
// 红线: 任何对外返回的数值都必须是有限值
// ==========================================

/// 金额保留小数位
pub const MONEY_DECIMALS: u32 = 2;

/// 指数保留小数位
pub const INDEX_DECIMALS: u32 = 3;

/// 非有限值 (NaN / ±∞) 归零
pub fn safe_number(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// 可选值: 缺失或非有限值归零
pub fn safe_opt(x: Option<f64>) -> f64 {
    x.map(safe_number).unwrap_or(0.0)
}

/// 非有限值替换为指定兜底值
pub fn finite_or(x: f64, fallback: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        safe_number(fallback)
    }
}

/// 四舍五入到指定小数位 (half-up, 基于缩放整数运算)
///
/// 非有限输入返回 0
pub fn round(x: f64, decimals: u32) -> f64 {
    let x = safe_number(x);
    let factor = 10f64.powi(decimals as i32);
    let scaled = (x * factor).round();
    safe_number(scaled / factor)
}

/// 金额舍入 (2 位)
pub fn round_money(x: f64) -> f64 {
    round(x, MONEY_DECIMALS)
}

/// 金额向下取整到分, 结果保证不超过输入
///
/// 用于上限类金额 (舍入不能越过上限); 非有限输入返回 0
pub fn floor_money(x: f64) -> f64 {
    let x = safe_number(x);
    let cents = (x * 100.0).floor();
    let floored = cents / 100.0;
    if floored > x {
        safe_number((cents - 1.0) / 100.0)
    } else {
        safe_number(floored)
    }
}

/// 指数舍入 (3 位)
pub fn round_index(x: f64) -> f64 {
    round(x, INDEX_DECIMALS)
}

/// 截断到 [0, 1]; 非有限值视为 0
pub fn clamp01(x: f64) -> f64 {
    safe_number(x).clamp(0.0, 1.0)
}

/// 带零值保护的除法
///
/// 分母为 0 或结果非有限时返回 `fallback`
pub fn safe_div(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    let d = safe_number(denominator);
    if d == 0.0 {
        return fallback;
    }
    finite_or(safe_number(numerator) / d, fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_number() {
        assert_eq!(safe_number(f64::NAN), 0.0);
        assert_eq!(safe_number(f64::INFINITY), 0.0);
        assert_eq!(safe_number(f64::NEG_INFINITY), 0.0);
        assert_eq!(safe_number(-12.5), -12.5);
        assert_eq!(safe_opt(None), 0.0);
        assert_eq!(safe_opt(Some(f64::NAN)), 0.0);
        assert_eq!(safe_opt(Some(3.0)), 3.0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round(2.5, 0), 3.0);
        assert_eq!(round_money(112485.9392), 112485.94);
        assert_eq!(round_index(0.888888), 0.889);
        assert_eq!(round_index(0.8), 0.8);
        assert_eq!(round(f64::NAN, 2), 0.0);
    }

    #[test]
    fn test_floor_money_never_exceeds_input() {
        let cap = 0.5 * (100_000.0 - 54_999.99);
        assert_eq!(floor_money(cap), 22_500.0);
        assert!(floor_money(cap) <= cap);
        assert!(round_money(cap) > cap);

        assert_eq!(floor_money(20_000.0), 20_000.0);
        assert_eq!(floor_money(1_234.567), 1_234.56);
        assert_eq!(floor_money(f64::NAN), 0.0);
        for x in [0.1, 0.29, 1.005, 22_500.005, 99_999.999] {
            assert!(floor_money(x) <= x, "{}", x);
            assert_eq!(round_money(floor_money(x)), floor_money(x));
        }
    }

    #[test]
    fn test_safe_div_and_clamp() {
        assert_eq!(safe_div(10.0, 0.0, 1.0), 1.0);
        assert_eq!(safe_div(10.0, 4.0, 1.0), 2.5);
        assert_eq!(safe_div(f64::NAN, 4.0, 1.0), 0.0);
        assert_eq!(clamp01(1.7), 1.0);
        assert_eq!(clamp01(-0.2), 0.0);
        assert_eq!(clamp01(f64::NAN), 0.0);
        assert_eq!(finite_or(f64::INFINITY, 7.0), 7.0);
    }
}

//! 安全浮点运算与统计工具

/// 安全除法阈值
pub const SAFE_DIV_EPSILON: f64 = 1e-14;

/// 安全除法
///
/// 除数绝对值小于 [`SAFE_DIV_EPSILON`] 或结果非有限时返回 `fallback`。
#[inline]
pub fn safe_div(a: f64, b: f64, fallback: f64) -> f64 {
    if b.abs() < SAFE_DIV_EPSILON {
        fallback
    } else {
        let result = a / b;
        if result.is_finite() {
            result
        } else {
            fallback
        }
    }
}

/// 线性插值百分位数
///
/// 与常用数值库的默认定义一致：排序后在秩 `q/100 * (n-1)` 处线性插值。
/// 空输入返回 `None`，`q` 会被限制在 `[0, 100]`。
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_div() {
        assert_eq!(safe_div(1.0, 2.0, 0.0), 0.5);
        assert_eq!(safe_div(1.0, 0.0, -1.0), -1.0);
        assert_eq!(safe_div(1.0, 1e-20, 3.0), 3.0);
    }

    #[test]
    fn test_percentile() {
        let values = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 100.0), Some(5.0));
        assert_eq!(percentile(&values, 50.0), Some(3.0));
        // 秩 0.95 * 4 = 3.8
        assert!((percentile(&values, 95.0).unwrap() - 4.8).abs() < 1e-12);
        assert_eq!(percentile(&[], 50.0), None);
    }
}

//! 数学基础类型与常量
//!
//! 基于 nalgebra 的坐标类型别名，以及全局精度常量和模糊比较函数。

use nalgebra as na;

/// 3D点类型（nalgebra）
pub type Point3 = na::Point3<f64>;

/// 3D向量类型（nalgebra）
pub type Vector3 = na::Vector3<f64>;

/// 系统精度，所有模糊比较都以此为容差
pub const PRECISION: f64 = 1e-4;

/// 精度的倒数
pub const PRECISION_RANGE: f64 = 1e4;

/// 圆周率
pub const PI: f64 = std::f64::consts::PI;

/// 判断数值是否接近于0
#[inline]
pub fn fuzzy_is_null(value: f64) -> bool {
    value.abs() < PRECISION
}

/// 判断两个浮点数是否近似相等
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < PRECISION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_compare() {
        assert!(fuzzy_is_null(0.00005));
        assert!(!fuzzy_is_null(0.0002));
        assert!(approx_eq(1.0, 1.00009));
        assert!(!approx_eq(1.0, 1.0002));
        assert!(!approx_eq(f64::NAN, f64::NAN));
        assert!(approx_eq(PRECISION * PRECISION_RANGE, 1.0));
    }
}

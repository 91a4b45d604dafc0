//! 三维坐标点
//!
//! 所有几何数据的最小单元。点之间的相等判断使用 [`PRECISION`] 容差，
//! 各分量均为 NaN 的点（[`Point::nan`]）表示无效或未初始化的坐标。

use crate::math::{approx_eq, fuzzy_is_null, Point3, Vector3, PRECISION};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

/// 三维点
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    position: Point3,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }

    /// 平面点，z 为 0
    pub fn new_2d(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0)
    }

    /// 原点
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// 无效点
    pub fn nan() -> Self {
        Self::new(f64::NAN, f64::NAN, f64::NAN)
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn z(&self) -> f64 {
        self.position.z
    }

    pub fn set_x(&mut self, x: f64) {
        self.position.x = x;
    }

    pub fn set_y(&mut self, y: f64) {
        self.position.y = y;
    }

    pub fn set_z(&mut self, z: f64) {
        self.position.z = z;
    }

    pub fn set_value(&mut self, x: f64, y: f64, z: f64) {
        self.position = Point3::new(x, y, z);
    }

    /// 到原点的距离，无效点返回正无穷
    pub fn length(&self) -> f64 {
        if self.is_valid() {
            self.position.coords.norm()
        } else {
            f64::INFINITY
        }
    }

    /// 在 XY 平面上到原点的距离，无效点返回正无穷
    pub fn length_2d(&self) -> f64 {
        if self.is_valid() {
            self.position.coords.xy().norm()
        } else {
            f64::INFINITY
        }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (*self - *other).length()
    }

    pub fn distance_2d(&self, other: &Point) -> f64 {
        (*self - *other).length_2d()
    }

    /// 三个分量是否都是有限值
    pub fn is_valid(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
    }

    /// 是否（在精度范围内）为原点
    pub fn is_zero(&self) -> bool {
        self.position.iter().all(|c| fuzzy_is_null(*c))
    }

    /// 转换为 nalgebra 点
    pub fn to_point3(&self) -> Point3 {
        self.position
    }

    fn coords(&self) -> Vector3 {
        self.position.coords
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::nan()
    }
}

impl From<Point3> for Point {
    fn from(position: Point3) -> Self {
        Self { position }
    }
}

impl From<Point> for Point3 {
    fn from(point: Point) -> Self {
        point.position
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x(), other.x()) && approx_eq(self.y(), other.y()) && approx_eq(self.z(), other.z())
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.position.coords += rhs.coords();
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.position.coords -= rhs.coords();
    }
}

impl MulAssign<f64> for Point {
    fn mul_assign(&mut self, scale: f64) {
        self.position.coords *= scale;
    }
}

impl MulAssign<Point> for Point {
    fn mul_assign(&mut self, rhs: Point) {
        self.position.coords.component_mul_assign(&rhs.coords());
    }
}

impl DivAssign<f64> for Point {
    /// 除数接近 0 时保持不变
    fn div_assign(&mut self, scale: f64) {
        if !fuzzy_is_null(scale) {
            self.position.coords /= scale;
        }
    }
}

impl DivAssign<Point> for Point {
    /// 任一分量接近 0 时保持不变
    fn div_assign(&mut self, rhs: Point) {
        if !rhs.coords().iter().any(|c| c.abs() < PRECISION) {
            self.position.coords.component_div_assign(&rhs.coords());
        }
    }
}

macro_rules! forward_binary_op {
    ($trait:ident, $method:ident, $assign:ident, $rhs:ty) => {
        impl $trait<$rhs> for Point {
            type Output = Point;

            fn $method(mut self, rhs: $rhs) -> Point {
                self.$assign(rhs);
                self
            }
        }
    };
}

forward_binary_op!(Add, add, add_assign, Point);
forward_binary_op!(Sub, sub, sub_assign, Point);
forward_binary_op!(Mul, mul, mul_assign, f64);
forward_binary_op!(Mul, mul, mul_assign, Point);
forward_binary_op!(Div, div, div_assign, f64);
forward_binary_op!(Div, div, div_assign, Point);

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x(), self.y(), self.z())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(Point::zero().is_valid());
        assert!(Point::new(1.0, -2.0, 3.5).is_valid());
        assert!(!Point::nan().is_valid());
        assert!(!Point::default().is_valid());
        assert!(!Point::new(1.0, f64::INFINITY, 0.0).is_valid());
        assert!(!Point::new(1.0, 0.0, f64::NAN).is_valid());
    }

    #[test]
    fn test_arithmetic() {
        let p1 = Point::new(10.0, 100.0, 0.0);
        let p2 = Point::new(30.0, 20.0, 0.0);

        assert_eq!(p1 + p2, Point::new(40.0, 120.0, 0.0));
        assert_eq!(p1 - p2, Point::new(-20.0, 80.0, 0.0));
        assert_eq!((p1 + p2) * 10.0, Point::new(400.0, 1200.0, 0.0));
        assert_eq!((p1 - p2) / 10.0, Point::new(-2.0, 8.0, 0.0));
        assert_eq!(
            Point::new(1.0, 2.0, 3.0) * Point::new(2.0, 3.0, 4.0),
            Point::new(2.0, 6.0, 12.0)
        );
        assert_eq!(
            Point::new(2.0, 6.0, 12.0) / Point::new(2.0, 3.0, 4.0),
            Point::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn test_division_by_near_zero_is_noop() {
        let mut p = Point::new(3.0, 6.0, 9.0);
        p /= 0.000_000_000_001;
        assert_eq!(p, Point::new(3.0, 6.0, 9.0));

        p /= Point::new(1.0, 0.0, 1.0);
        assert_eq!(p, Point::new(3.0, 6.0, 9.0));

        p /= 3.0;
        assert_eq!(p, Point::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_length_and_distance() {
        let p = Point::new(3.0, 4.0, 12.0);
        assert!(approx_eq(p.length(), 13.0));
        assert!(approx_eq(p.length_2d(), 5.0));
        assert!(approx_eq(p.distance(&Point::zero()), 13.0));
        assert!(approx_eq(
            Point::new(1.0, 1.0, 5.0).distance_2d(&Point::new(4.0, 5.0, -5.0)),
            5.0
        ));

        assert_eq!(Point::nan().length(), f64::INFINITY);
        assert_eq!(Point::nan().distance_2d(&Point::zero()), f64::INFINITY);
    }

    #[test]
    fn test_fuzzy_equality() {
        assert_eq!(Point::new(1.0, 1.0, 1.0), Point::new(1.00005, 0.99995, 1.0));
        assert_ne!(Point::new(1.0, 1.0, 1.0), Point::new(1.001, 1.0, 1.0));
        assert_ne!(Point::nan(), Point::nan());
        assert!(Point::new(0.00001, -0.00001, 0.0).is_zero());
        assert!(!Point::new(0.001, 0.0, 0.0).is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Point::new(1.0, 2.5, -3.0).to_string(), "(1,2.5,-3)");
    }
}

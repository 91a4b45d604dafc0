//! 轴对齐包围盒
//!
//! 通过 [`Boundary::refer_point`] / [`Boundary::refer_boundary`] 逐步累积，
//! 范围只会扩大不会缩小。新建的包围盒处于空状态（最小角为 +∞，最大角为 −∞）。

use crate::math::approx_eq;
use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// 3D包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    min: Point,
    max: Point,
}

impl Boundary {
    /// 创建空的包围盒（无效状态）
    pub fn new() -> Self {
        Self {
            min: Point::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// 以单个点初始化，无效点得到空包围盒
    pub fn from_point(initial: Point) -> Self {
        if initial.is_valid() {
            Self {
                min: initial,
                max: initial,
            }
        } else {
            Self::new()
        }
    }

    /// 从点集创建包围盒
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut boundary = Self::new();
        for point in points {
            boundary.refer_point(point);
        }
        boundary
    }

    pub fn min(&self) -> Point {
        self.min
    }

    pub fn max(&self) -> Point {
        self.max
    }

    pub fn set_min(&mut self, min: Point) {
        self.min = min;
    }

    pub fn set_max(&mut self, max: Point) {
        self.max = max;
    }

    /// 扩展包围盒以包含指定点
    pub fn refer_point(&mut self, point: &Point) {
        self.widen(point, point);
    }

    /// 扩展包围盒以包含另一个包围盒
    pub fn refer_boundary(&mut self, other: &Boundary) {
        self.widen(&other.min, &other.max);
    }

    // NaN 分量比较结果恒为 false，不会改变范围
    fn widen(&mut self, low: &Point, high: &Point) {
        if low.x() < self.min.x() {
            self.min.set_x(low.x());
        }
        if high.x() > self.max.x() {
            self.max.set_x(high.x());
        }
        if low.y() < self.min.y() {
            self.min.set_y(low.y());
        }
        if high.y() > self.max.y() {
            self.max.set_y(high.y());
        }
        if low.z() < self.min.z() {
            self.min.set_z(low.z());
        }
        if high.z() > self.max.z() {
            self.max.set_z(high.z());
        }
    }

    /// 获取中心点
    pub fn center(&self) -> Point {
        (self.min + self.max) / 2.0
    }

    /// 获取各轴尺寸
    pub fn dimension(&self) -> Point {
        Point::new(
            (self.max.x() - self.min.x()).abs(),
            (self.max.y() - self.min.y()).abs(),
            (self.max.z() - self.min.z()).abs(),
        )
    }

    /// 六个边界值是否都是有限值
    pub fn is_valid(&self) -> bool {
        self.min.is_valid() && self.max.is_valid()
    }

    /// 体积
    pub fn volumn(&self) -> f64 {
        let d = self.dimension();
        d.x() * d.y() * d.z()
    }

    /// XY 平面上的面积
    pub fn area(&self) -> f64 {
        let d = self.dimension();
        (d.x() * d.y()).abs()
    }

    /// 按面积排序，面积近似相等时比较 Y 方向跨度
    pub fn area_cmp(&self, other: &Self) -> Ordering {
        let (a1, a2) = (self.area(), other.area());
        if approx_eq(a1, a2) {
            let w1 = self.max.y() - self.min.y();
            let w2 = other.max.y() - other.min.y();
            w1.partial_cmp(&w2).unwrap_or(Ordering::Equal)
        } else {
            a1.partial_cmp(&a2).unwrap_or(Ordering::Equal)
        }
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.min, self.max)
    }
}

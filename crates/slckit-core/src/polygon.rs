//! 多边形（轮廓、填充、支撑路径）
//!
//! 多边形是带类型标签的有序顶点序列，既可以是闭合环也可以是开放折线。
//! 类型只是附加的元数据，参与排序与路径优化的分组，不影响几何计算。

use crate::boundary::Boundary;
use crate::math::approx_eq;
use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// 多边形类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[repr(i32)]
pub enum PolygonType {
    /// 轮廓
    #[default]
    Contour = 0,
    /// 填充
    Infill = 1,
    /// 支撑
    Support = 2,
    /// 附加路径
    Extra = 3,
}

impl PolygonType {
    /// 类型总数
    pub const COUNT: usize = 4;

    /// 全部类型，按序号排列
    pub const ALL: [PolygonType; Self::COUNT] = [
        PolygonType::Contour,
        PolygonType::Infill,
        PolygonType::Support,
        PolygonType::Extra,
    ];

    /// 序列化使用的序号
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    /// 从序号恢复类型
    pub fn from_ordinal(ordinal: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.ordinal() == ordinal)
    }

    /// 诊断输出中使用的类型字符，附加路径与轮廓一样显示为 `C`
    pub fn symbol(self) -> char {
        match self {
            PolygonType::Infill => 'I',
            PolygonType::Support => 'S',
            PolygonType::Contour | PolygonType::Extra => 'C',
        }
    }
}

/// 多边形
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point>,
    polygon_type: PolygonType,
}

impl Polygon {
    /// 创建空的轮廓多边形
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            polygon_type: PolygonType::Contour,
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point>, polygon_type: PolygonType) -> Self {
        Self {
            points: points.into_iter().collect(),
            polygon_type,
        }
    }

    /// 设置类型
    pub fn with_type(mut self, polygon_type: PolygonType) -> Self {
        self.polygon_type = polygon_type;
        self
    }

    pub fn polygon_type(&self) -> PolygonType {
        self.polygon_type
    }

    pub fn set_polygon_type(&mut self, polygon_type: PolygonType) {
        self.polygon_type = polygon_type;
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut Vec<Point> {
        &mut self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// 删除共线与重复的中间顶点
    ///
    /// 从倒数第二个顶点向前扫描到第二个顶点，首尾顶点不会被删除。
    /// 若出边长度为 0，或入边与出边的单位方向在精度内相同，则删除该顶点。
    /// 反复扫描，直到没有可删除的顶点。
    pub fn simplify(&mut self) {
        while self.simplify_pass() {}
    }

    /// 单轮扫描，返回是否删除了顶点
    fn simplify_pass(&mut self) -> bool {
        if self.points.len() < 3 {
            return false;
        }

        let before = self.points.len();
        let mut i = self.points.len() - 2;
        while i > 0 {
            if self.points.len() < 3 {
                break;
            }

            let prev_delta = self.points[i] - self.points[i - 1];
            let next_delta = self.points[i + 1] - self.points[i];

            if next_delta.is_zero() || same_direction(&prev_delta, &next_delta) {
                self.points.remove(i);
            }
            i -= 1;
        }
        self.points.len() != before
    }

    pub fn simplified(&self) -> Self {
        let mut other = self.clone();
        other.simplify();
        other
    }

    /// 反转顶点顺序
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    pub fn reversed(&self) -> Self {
        let mut other = self.clone();
        other.reverse();
        other
    }

    /// 未闭合时追加首顶点
    ///
    /// 首顶点无效时无法判断是否闭合，保持不变。
    pub fn close(&mut self) {
        let Some(first) = self.points.first().copied() else {
            return;
        };
        if first.is_valid() && !self.is_closed() {
            self.points.push(first);
        }
    }

    pub fn closed(&self) -> Self {
        let mut other = self.clone();
        other.close();
        other
    }

    /// 首尾顶点是否重合，空多边形视为闭合
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => first == last,
            _ => true,
        }
    }

    /// 平移；偏移量无效时不做任何修改
    pub fn translate(&mut self, offset: &Point) {
        if !offset.is_valid() {
            return;
        }
        for point in &mut self.points {
            *point += *offset;
        }
    }

    pub fn translated(&self, offset: &Point) -> Self {
        let mut other = self.clone();
        other.translate(offset);
        other
    }

    pub fn boundary(&self) -> Boundary {
        Boundary::from_points(&self.points)
    }

    pub fn center(&self) -> Point {
        self.boundary().center()
    }

    pub fn dimension(&self) -> Point {
        self.boundary().dimension()
    }

    /// 有符号面积（鞋带公式），逆时针为正
    ///
    /// 只累加 `0..N-1` 条边，不显式补上尾到首的边：开放折线按其顶点序列
    /// 直接求和，显式闭合（首尾重合）的多边形得到完整面积。少于 3 个顶点时为 0。
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }

        let sum: f64 = (0..n - 1)
            .map(|i| {
                let p0 = &self.points[i];
                let p1 = &self.points[(i + 1) % n];
                cross(p0, p1)
            })
            .sum();

        sum / 2.0
    }

    /// 形心，z 取首顶点的 z；少于 3 个顶点时返回无效点
    pub fn centroid(&self) -> Point {
        let n = self.points.len();
        if n < 3 {
            return Point::nan();
        }

        let mut area = 0.0;
        let mut x = 0.0;
        let mut y = 0.0;
        for i in 0..n - 1 {
            let p0 = &self.points[i];
            let p1 = &self.points[(i + 1) % n];
            let a = cross(p0, p1);
            area += a;
            x += (p0.x() + p1.x()) * a;
            y += (p0.y() + p1.y()) * a;
        }

        area /= 2.0;
        Point::new(x / (6.0 * area), y / (6.0 * area), self.points[0].z())
    }

    /// 仅按类型排序
    pub fn type_cmp(&self, other: &Self) -> Ordering {
        self.polygon_type.cmp(&other.polygon_type)
    }
}

fn cross(p0: &Point, p1: &Point) -> f64 {
    p0.x() * p1.y() - p1.x() * p0.y()
}

fn same_direction(a: &Point, b: &Point) -> bool {
    let (la, lb) = (a.length(), b.length());
    approx_eq(a.x() / la, b.x() / lb)
        && approx_eq(a.y() / la, b.y() / lb)
        && approx_eq(a.z() / la, b.z() / lb)
}

impl Deref for Polygon {
    type Target = [Point];

    fn deref(&self) -> &[Point] {
        &self.points
    }
}

impl DerefMut for Polygon {
    fn deref_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }
}

impl FromIterator<Point> for Polygon {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::from_points(iter, PolygonType::Contour)
    }
}

impl Extend<Point> for Polygon {
    fn extend<I: IntoIterator<Item = Point>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Polygon {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl IntoIterator for Polygon {
    type Item = Point;
    type IntoIter = std::vec::IntoIter<Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.polygon_type.symbol())?;
        for point in &self.points {
            write!(f, "{point}")?;
        }
        write!(f, "]")
    }
}

//! 切片层
//!
//! 同一高度上的全部多边形。除基本的几何运算外，提供按类型优先级的稳定排序，
//! 以及按最近端点贪心选择的空行程优化。

use crate::boundary::Boundary;
use crate::point::Point;
use crate::polygon::{Polygon, PolygonType};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// 多边形排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortPattern {
    /// 支撑 → 填充 → 附加 → 轮廓
    #[default]
    SupportInfillContour,
    /// 支撑 → 附加 → 轮廓 → 填充
    SupportContourInfill,
}

impl SortPattern {
    /// 类型在该排序方式下的优先级，取值 `0..PolygonType::COUNT`，越小越先
    pub fn priority(self, polygon_type: PolygonType) -> usize {
        match self {
            SortPattern::SupportInfillContour => match polygon_type {
                PolygonType::Support => 0,
                PolygonType::Infill => 1,
                PolygonType::Extra => 2,
                PolygonType::Contour => 3,
            },
            SortPattern::SupportContourInfill => match polygon_type {
                PolygonType::Support => 0,
                PolygonType::Extra => 1,
                PolygonType::Contour => 2,
                PolygonType::Infill => 3,
            },
        }
    }
}

/// 切片层
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    polygons: Vec<Polygon>,
    thickness: f64,
    height: f64,
}

impl Layer {
    /// 创建空层
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_polygons(polygons: impl IntoIterator<Item = Polygon>) -> Self {
        Self {
            polygons: polygons.into_iter().collect(),
            ..Self::default()
        }
    }

    /// 设置层高
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// 设置层厚
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn set_thickness(&mut self, thickness: f64) {
        self.thickness = thickness;
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_height(&mut self, height: f64) {
        self.height = height;
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn polygons_mut(&mut self) -> &mut Vec<Polygon> {
        &mut self.polygons
    }

    pub fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    pub fn push(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    /// 追加另一层的全部多边形，层高与层厚保持不变
    pub fn append_polygons(&mut self, other: &Layer) {
        self.polygons.extend_from_slice(&other.polygons);
    }

    pub fn translate(&mut self, offset: &Point) {
        for polygon in &mut self.polygons {
            polygon.translate(offset);
        }
    }

    pub fn translated(&self, offset: &Point) -> Self {
        let mut other = self.clone();
        other.translate(offset);
        other
    }

    pub fn boundary(&self) -> Boundary {
        let mut boundary = Boundary::new();
        for polygon in &self.polygons {
            boundary.refer_boundary(&polygon.boundary());
        }
        boundary
    }

    pub fn center(&self) -> Point {
        self.boundary().center()
    }

    pub fn dimension(&self) -> Point {
        self.boundary().dimension()
    }

    /// 按层高排序
    pub fn height_cmp(&self, other: &Self) -> Ordering {
        self.height.total_cmp(&other.height)
    }

    /// 按类型优先级稳定排序，同类型多边形保持原有相对顺序
    pub fn sort(&mut self, pattern: SortPattern) {
        self.polygons
            .sort_by_key(|polygon| pattern.priority(polygon.polygon_type()));
    }

    pub fn sorted(&self, pattern: SortPattern) -> Self {
        let mut other = self.clone();
        other.sort(pattern);
        other
    }

    /// 空行程优化（最近端点贪心）
    ///
    /// 从第一个非空多边形开始，使其起点靠近 `reference`；之后每一步在尚未放置的
    /// 多边形中寻找起点或终点离当前位置最近的一个，必要时反转，放到下一个位置。
    /// 距离相同时取最靠前的候选，且只有终点严格更近时才反转。
    ///
    /// 返回最后一个多边形的终点，供下一组或下一层继续衔接；
    /// 没有非空多边形时原样返回 `reference`。
    pub fn optimize(&mut self, reference: &Point) -> Point {
        let n = self.polygons.len();
        let mut last = *reference;

        let Some(seed) = self.polygons.iter().position(|p| !p.is_empty()) else {
            return last;
        };

        let polygon = &mut self.polygons[seed];
        let starts_far = endpoints(polygon)
            .is_some_and(|(head, tail)| head.distance_2d(&last) > tail.distance_2d(&last));
        if starts_far {
            polygon.reverse();
        }
        if let Some(end) = polygon.last() {
            last = *end;
        }

        for i in seed..n - 1 {
            let next = i + 1;

            // 起点与终点两组距离各自取最靠前的最小值
            let mut best_head = (f64::INFINITY, next);
            let mut best_tail = (f64::INFINITY, next);
            for (j, candidate) in self.polygons.iter().enumerate().skip(next) {
                let (d_head, d_tail) = match endpoints(candidate) {
                    Some((head, tail)) => (head.distance_2d(&last), tail.distance_2d(&last)),
                    None => (f64::INFINITY, f64::INFINITY),
                };
                if d_head < best_head.0 {
                    best_head = (d_head, j);
                }
                if d_tail < best_tail.0 {
                    best_tail = (d_tail, j);
                }
            }

            let flip = best_tail.0 < best_head.0;
            let index = if flip { best_tail.1 } else { best_head.1 };

            let target = &mut self.polygons[index];
            if target.is_empty() {
                // 剩余的都是空多边形
                break;
            }
            if flip {
                target.reverse();
            }
            if let Some(end) = target.last() {
                last = *end;
            }

            self.polygons.swap(next, index);
        }

        last
    }

    pub fn optimized(&self, reference: &Point) -> Self {
        let mut other = self.clone();
        other.optimize(reference);
        other
    }

    /// 分组空行程优化
    ///
    /// 先按 `pattern` 排序并按优先级分组，再依优先级顺序逐组调用 [`Layer::optimize`]，
    /// 上一组返回的终点作为下一组的参考点，最后按组顺序拼接回本层。
    pub fn optimize_by(&mut self, pattern: SortPattern, reference: &Point) -> Point {
        self.sort(pattern);

        let mut groups: [Vec<Polygon>; PolygonType::COUNT] = Default::default();
        for polygon in self.polygons.drain(..) {
            groups[pattern.priority(polygon.polygon_type())].push(polygon);
        }

        let mut last = *reference;
        for group in groups {
            let mut bucket = Layer::from_polygons(group);
            last = bucket.optimize(&last);
            self.polygons.append(&mut bucket.polygons);
        }
        last
    }

    pub fn optimized_by(&self, pattern: SortPattern, reference: &Point) -> Self {
        let mut other = self.clone();
        other.optimize_by(pattern, reference);
        other
    }

    /// 只保留指定类型的多边形
    pub fn filter(&mut self, polygon_type: PolygonType) {
        self.polygons
            .retain(|polygon| polygon.polygon_type() == polygon_type);
    }

    pub fn filtered(&self, polygon_type: PolygonType) -> Self {
        let mut other = self.clone();
        other.filter(polygon_type);
        other
    }

    /// 各多边形有符号面积之和
    pub fn area(&self) -> f64 {
        self.polygons.iter().map(Polygon::area).sum()
    }
}

fn endpoints(polygon: &Polygon) -> Option<(&Point, &Point)> {
    Some((polygon.first()?, polygon.last()?))
}

impl Deref for Layer {
    type Target = [Polygon];

    fn deref(&self) -> &[Polygon] {
        &self.polygons
    }
}

impl DerefMut for Layer {
    fn deref_mut(&mut self) -> &mut [Polygon] {
        &mut self.polygons
    }
}

impl FromIterator<Polygon> for Layer {
    fn from_iter<I: IntoIterator<Item = Polygon>>(iter: I) -> Self {
        Self::from_polygons(iter)
    }
}

impl Extend<Polygon> for Layer {
    fn extend<I: IntoIterator<Item = Polygon>>(&mut self, iter: I) {
        self.polygons.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Layer {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}

impl IntoIterator for Layer {
    type Item = Polygon;
    type IntoIter = std::vec::IntoIter<Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.into_iter()
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for polygon in &self.polygons {
            write!(f, "{polygon}")?;
        }
        write!(f, "}}")
    }
}

//! 切片模型
//!
//! 模型是按层组织的完整零件。模型维护一份与各层一一对应的高度表，
//! 该表只在 [`Model::sort`] 之后（包括文件加载完成时）保证与层序列一致。

use crate::boundary::Boundary;
use crate::layer::Layer;
use crate::point::Point;
use crate::polygon::PolygonType;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// 切片模型
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    layers: Vec<Layer>,
    heights: Vec<f64>,
    name: String,
}

impl Model {
    /// 创建空模型
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// 直接修改层序列后，高度表需要重新 [`Model::sort`]
    pub fn layers_mut(&mut self) -> &mut Vec<Layer> {
        &mut self.layers
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// 高度表
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// 获取指定索引的层
    pub fn layer_at(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// 获取指定高度（精确匹配高度表）的层
    pub fn layer_at_height(&self, height: f64) -> Option<&Layer> {
        let index = self.heights.iter().position(|h| *h == height)?;
        self.layer_at(index)
    }

    /// 第一个含有非支撑多边形的层的索引
    pub fn contour_start_index(&self) -> Option<usize> {
        self.layers.iter().position(|layer| {
            layer
                .iter()
                .any(|polygon| polygon.polygon_type() != PolygonType::Support)
        })
    }

    /// 第一个含有非支撑多边形的层的高度
    pub fn contour_start_height(&self) -> Option<f64> {
        let index = self.contour_start_index()?;
        self.heights.get(index).copied()
    }

    pub fn boundary(&self) -> Boundary {
        let mut boundary = Boundary::new();
        for layer in &self.layers {
            boundary.refer_boundary(&layer.boundary());
        }
        boundary
    }

    pub fn center(&self) -> Point {
        self.boundary().center()
    }

    pub fn dimension(&self) -> Point {
        self.boundary().dimension()
    }

    /// 按层高升序稳定排序，并重建高度表
    pub fn sort(&mut self) {
        self.layers.sort_by(Layer::height_cmp);
        self.heights = self.layers.iter().map(Layer::height).collect();
    }

    /// 合并另一个模型
    ///
    /// 高度完全相同的层合并多边形，新的高度追加为新层，最后按高度重新排序。
    pub fn merge(&mut self, other: &Model) {
        self.sort();

        for layer in &other.layers {
            match self.heights.iter().position(|h| *h == layer.height()) {
                Some(index) => self.layers[index].append_polygons(layer),
                None => self.layers.push(layer.clone()),
            }
        }

        self.sort();
    }

    pub fn translate(&mut self, offset: &Point) {
        for layer in &mut self.layers {
            layer.translate(offset);
        }
    }

    pub fn translated(&self, offset: &Point) -> Self {
        let mut other = self.clone();
        other.translate(offset);
        other
    }
}

// 高度表由层序列派生，不参与比较
impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.layers == other.layers
    }
}

impl Deref for Model {
    type Target = [Layer];

    fn deref(&self) -> &[Layer] {
        &self.layers
    }
}

impl DerefMut for Model {
    fn deref_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }
}

impl FromIterator<Layer> for Model {
    fn from_iter<I: IntoIterator<Item = Layer>>(iter: I) -> Self {
        Self {
            layers: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Extend<Layer> for Model {
    fn extend<I: IntoIterator<Item = Layer>>(&mut self, iter: I) {
        self.layers.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Model {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

//! SLCKit 核心数据模型
//!
//! 描述切片后的打印路径数据，并提供其上的几何运算。
//!
//! # 架构设计
//!
//! 采用严格的树形所有权：
//! - `Model`: 按高度排列的切片层集合
//! - `Layer`: 同一高度上的多边形集合，提供排序与空行程优化
//! - `Polygon`: 带类型标签的顶点序列，提供面积、形心与化简
//! - `Point` / `Boundary`: 坐标与包围盒
//!
//! 每个变换都成对提供：原地修改的版本（如 `translate`）与返回副本的版本（如 `translated`）。
//!
//! # 示例
//!
//! ```rust
//! use slckit_core::prelude::*;
//!
//! let square: Polygon = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
//!     .into_iter()
//!     .map(|(x, y)| Point::new_2d(x, y))
//!     .collect();
//!
//! println!("Area: {}", square.area());
//! ```

pub mod boundary;
pub mod layer;
pub mod math;
pub mod model;
pub mod point;
pub mod polygon;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::boundary::Boundary;
    pub use crate::layer::{Layer, SortPattern};
    pub use crate::math::{approx_eq, Point3, PRECISION};
    pub use crate::model::Model;
    pub use crate::point::Point;
    pub use crate::polygon::{Polygon, PolygonType};
}

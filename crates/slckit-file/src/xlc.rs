//! XLC 模型文件读写
//!
//! 小端序二进制格式：
//! - 版本标记字符串 [`XLC_VERSION`]
//! - 模型名
//! - 层序列，每层 `{f64 层厚, f64 层高, 多边形序列}`
//! - 多边形 `{i32 类型序号, 点序列}`，点 `{f64 x, f64 y, f64 z}`
//!
//! 字符串与序列的编码见 [`crate::binary`]。底层文件通过 [`StreamDevice`] 打开，
//! 可以是普通文件或 gzip 压缩文件。

use crate::binary::{ReadLe, WriteLe};
use crate::device::StreamDevice;
use crate::error::FileError;
use slckit_core::layer::Layer;
use slckit_core::model::Model;
use slckit_core::point::Point;
use slckit_core::polygon::{Polygon, PolygonType};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// 当前格式版本标记
pub const XLC_VERSION: &str = "XLC v2.0";

fn write_polygon<W: Write>(writer: &mut W, polygon: &Polygon) -> Result<(), FileError> {
    writer.write_i32_le(polygon.polygon_type().ordinal())?;
    writer.write_len(polygon.len())?;
    for point in polygon {
        writer.write_f64_le(point.x())?;
        writer.write_f64_le(point.y())?;
        writer.write_f64_le(point.z())?;
    }
    Ok(())
}

fn write_layer<W: Write>(writer: &mut W, layer: &Layer) -> Result<(), FileError> {
    writer.write_f64_le(layer.thickness())?;
    writer.write_f64_le(layer.height())?;
    writer.write_len(layer.len())?;
    for polygon in layer {
        write_polygon(writer, polygon)?;
    }
    Ok(())
}

/// 将模型编码为 XLC 字节流
pub fn encode<W: Write>(model: &Model, mut writer: W) -> Result<(), FileError> {
    writer.write_string(XLC_VERSION)?;
    writer.write_string(model.name())?;
    writer.write_len(model.len())?;
    for layer in model {
        write_layer(&mut writer, layer)?;
    }
    writer.flush()?;
    Ok(())
}

fn read_version<R: Read>(reader: &mut R) -> Result<(), FileError> {
    let len = reader
        .read_u32_le()
        .map_err(|e| FileError::while_reading("version tag", e))?;
    if len as usize != XLC_VERSION.len() {
        return Err(FileError::FormatVersionMismatch(format!(
            "tag of {} bytes",
            len
        )));
    }

    let tag = reader
        .read_bytes(len as usize)
        .map_err(|e| FileError::while_reading("version tag", e))?;
    if tag != XLC_VERSION.as_bytes() {
        return Err(FileError::FormatVersionMismatch(
            String::from_utf8_lossy(&tag).into_owned(),
        ));
    }
    Ok(())
}

fn read_point<R: Read>(reader: &mut R) -> Result<Point, FileError> {
    let mut read = || {
        reader
            .read_f64_le()
            .map_err(|e| FileError::while_reading("point", e))
    };
    let x = read()?;
    let y = read()?;
    let z = read()?;
    Ok(Point::new(x, y, z))
}

fn read_polygon<R: Read>(reader: &mut R) -> Result<Polygon, FileError> {
    let ordinal = reader
        .read_i32_le()
        .map_err(|e| FileError::while_reading("polygon", e))?;
    let polygon_type = PolygonType::from_ordinal(ordinal)
        .ok_or_else(|| FileError::InvalidFormat(format!("unknown polygon type {}", ordinal)))?;
    let point_count = reader
        .read_u32_le()
        .map_err(|e| FileError::while_reading("polygon", e))?;

    let mut polygon = Polygon::new().with_type(polygon_type);
    for _ in 0..point_count {
        polygon.push(read_point(reader)?);
    }
    Ok(polygon)
}

fn read_layer<R: Read>(reader: &mut R) -> Result<Layer, FileError> {
    let mut read = || {
        reader
            .read_f64_le()
            .map_err(|e| FileError::while_reading("layer", e))
    };
    let thickness = read()?;
    let height = read()?;
    let polygon_count = reader
        .read_u32_le()
        .map_err(|e| FileError::while_reading("layer", e))?;

    let mut layer = Layer::new().with_thickness(thickness).with_height(height);
    for _ in 0..polygon_count {
        layer.push(read_polygon(reader)?);
    }
    Ok(layer)
}

/// 解码 XLC 字节流，结果按层高排序
pub fn decode<R: Read>(mut reader: R) -> Result<Model, FileError> {
    read_version(&mut reader)?;

    let name = reader
        .read_string()
        .map_err(|e| FileError::while_reading("model name", e))?;
    let layer_count = reader
        .read_u32_le()
        .map_err(|e| FileError::while_reading("layer count", e))?;
    debug!("XLC model {}: {} layers", name, layer_count);

    let mut model = Model::with_name(name);
    for _ in 0..layer_count {
        model.push(read_layer(&mut reader)?);
    }

    model.sort();
    Ok(model)
}

/// 保存模型到 XLC 文件
pub fn save(
    model: &Model,
    path: impl AsRef<Path>,
    device: &dyn StreamDevice,
) -> Result<(), FileError> {
    let path = path.as_ref();
    let mut stream = device.open_write(path)?;
    encode(model, &mut stream)?;
    stream.close()?;

    info!("Saved XLC file: {} ({} layers)", path.display(), model.len());
    Ok(())
}

/// 读取 XLC 文件，任何错误都返回空模型
pub fn read(path: impl AsRef<Path>, device: &dyn StreamDevice) -> Model {
    let path = path.as_ref();
    match device.open_read(path).and_then(decode) {
        Ok(model) => {
            info!("Read XLC file: {} ({} layers)", path.display(), model.len());
            model
        }
        Err(e) => {
            warn!("Failed to read XLC file {}: {}", path.display(), e);
            Model::new()
        }
    }
}

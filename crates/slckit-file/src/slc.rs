//! SLC 切片文件读取（只读）
//!
//! 文件结构：
//! 1. 文本头，以 `0D 0A 1A` 结尾，包含 `-SLCVER`、`-UNIT`、`-TYPE` 等键值
//! 2. 256 字节保留区
//! 3. 采样表：`u8` 条目数，每条四个 `f32`
//! 4. 轮廓数据：逐层 `{f32 最小 Z, u32 边界数}`，边界数为 `0xFFFFFFFF` 时结束
//!
//! 单位为英寸时坐标乘以 [`INCH_SCALE`]，内部统一使用毫米。

use crate::binary::ReadLe;
use crate::error::FileError;
use slckit_core::layer::Layer;
use slckit_core::model::Model;
use slckit_core::point::Point;
use slckit_core::polygon::{Polygon, PolygonType};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// 文件头结束标记
pub const HEADER_TERMINATOR: [u8; 3] = [0x0D, 0x0A, 0x1A];

/// 保留区大小
pub const RESERVED_SIZE: u64 = 256;

/// 轮廓数据结束标记
pub const END_OF_CONTOURS: u32 = 0xFFFF_FFFF;

/// 支持的最低版本
pub const MIN_VERSION: f64 = 2.0;

/// 非毫米单位的缩放系数
pub const INCH_SCALE: f64 = 2.54;

/// SLC 文件头
#[derive(Debug, Clone, PartialEq)]
pub struct SlcHeader {
    pub version: f64,
    pub unit: String,
    pub part_type: String,
}

impl SlcHeader {
    /// 解析文件头文本
    pub fn parse(text: &str) -> Result<Self, FileError> {
        let tokens: Vec<&str> = text.split_ascii_whitespace().collect();

        let version = header_value(&tokens, "-SLCVER")?;
        let unit = header_value(&tokens, "-UNIT")?;
        let part_type = header_value(&tokens, "-TYPE")?;

        // 无法解析的版本号按 0 处理
        let version = version.parse::<f64>().unwrap_or(0.0);
        if version.is_nan() || version < MIN_VERSION {
            return Err(FileError::HeaderVersionTooOld(version));
        }

        Ok(Self {
            version,
            unit: unit.to_string(),
            part_type: part_type.to_string(),
        })
    }

    /// 从流中读取并解析文件头
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, FileError> {
        let text = read_header_text(reader)?;
        Self::parse(&text)
    }

    /// 坐标缩放系数
    pub fn scale(&self) -> f64 {
        if self.unit == "MM" {
            1.0
        } else {
            INCH_SCALE
        }
    }

    /// 本文件中多边形的类型
    pub fn polygon_type(&self) -> PolygonType {
        if self.part_type == "PART" {
            PolygonType::Contour
        } else {
            PolygonType::Support
        }
    }
}

/// 采样表条目
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingEntry {
    pub min_z: f32,
    pub thickness: f32,
    pub line_width_compensation: f32,
    pub reserved: f32,
}

impl SamplingEntry {
    fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            min_z: reader.read_f32_le()?,
            thickness: reader.read_f32_le()?,
            line_width_compensation: reader.read_f32_le()?,
            reserved: reader.read_f32_le()?,
        })
    }
}

fn header_value<'a>(tokens: &[&'a str], key: &str) -> Result<&'a str, FileError> {
    tokens
        .iter()
        .position(|token| *token == key)
        .and_then(|index| tokens.get(index + 1))
        .copied()
        .ok_or_else(|| FileError::HeaderMissingKey(key.to_string()))
}

fn read_header_text<R: Read>(reader: &mut R) -> Result<String, FileError> {
    let mut bytes = Vec::new();
    while !bytes.ends_with(&HEADER_TERMINATOR) {
        let byte = reader
            .read_u8_le()
            .map_err(|e| FileError::while_reading("header", e))?;
        bytes.push(byte);
    }
    bytes.truncate(bytes.len() - HEADER_TERMINATOR.len());
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_sampling_table<R: Read>(reader: &mut R) -> Result<Vec<SamplingEntry>, FileError> {
    let count = reader
        .read_u8_le()
        .map_err(|e| FileError::while_reading("sampling table", e))?;
    (0..count)
        .map(|_| {
            SamplingEntry::read(reader).map_err(|e| FileError::while_reading("sampling table", e))
        })
        .collect()
}

fn read_polygon<R: Read>(
    reader: &mut R,
    min_z: f64,
    header: &SlcHeader,
) -> Result<Polygon, FileError> {
    let vertex_count = reader
        .read_u32_le()
        .map_err(|e| FileError::while_reading("boundary", e))?;
    // 间隙数不参与建模
    let _gap_count = reader
        .read_u32_le()
        .map_err(|e| FileError::while_reading("boundary", e))?;

    let scale = header.scale();
    let mut polygon = Polygon::new().with_type(header.polygon_type());
    for _ in 0..vertex_count {
        let x = reader
            .read_f32_le()
            .map_err(|e| FileError::while_reading("vertex", e))?;
        let y = reader
            .read_f32_le()
            .map_err(|e| FileError::while_reading("vertex", e))?;
        polygon.push(Point::new(
            f64::from(x) * scale,
            f64::from(y) * scale,
            min_z * scale,
        ));
    }
    Ok(polygon)
}

/// 解码 SLC 字节流，将各层追加到 `model`
///
/// 文件头阶段出错时 `model` 保持不变；轮廓阶段出错时 `model` 保留已完整解码的层。
/// 只要文件头有效，无论成功与否 `model` 都按层高排序。
pub fn decode<R: Read>(mut reader: R, model: &mut Model) -> Result<(), FileError> {
    let header = SlcHeader::read(&mut reader)?;
    decode_body(reader, &header, model)
}

/// 解码文件头之后的部分
///
/// 出错时保留已完整解码的层，返回前总是按层高排序。
pub fn decode_body<R: Read>(
    mut reader: R,
    header: &SlcHeader,
    model: &mut Model,
) -> Result<(), FileError> {
    debug!(
        "SLC header: version {}, unit {}, type {}",
        header.version, header.unit, header.part_type
    );

    let result = read_contours(&mut reader, header, model);
    model.sort();
    result
}

fn read_contours<R: Read>(
    reader: &mut R,
    header: &SlcHeader,
    model: &mut Model,
) -> Result<(), FileError> {
    reader
        .skip_bytes(RESERVED_SIZE)
        .map_err(|e| FileError::while_reading("reserved section", e))?;

    for entry in read_sampling_table(reader)? {
        debug!(
            "SLC sampling: min z {}, thickness {}, line width compensation {}",
            entry.min_z, entry.thickness, entry.line_width_compensation
        );
    }

    loop {
        let min_z = reader
            .read_f32_le()
            .map_err(|e| FileError::while_reading("contour layer", e))?;
        let boundary_count = reader
            .read_u32_le()
            .map_err(|e| FileError::while_reading("contour layer", e))?;
        if boundary_count == END_OF_CONTOURS {
            return Ok(());
        }

        let min_z = f64::from(min_z);
        let mut layer = Layer::new().with_height(min_z * header.scale());
        for _ in 0..boundary_count {
            layer.push(read_polygon(reader, min_z, header)?);
        }
        model.push(layer);
    }
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 读取 SLC 文件
///
/// 模型名取文件名（不含扩展名）。文件头无效时返回空模型，
/// 轮廓数据不完整时返回已读取的部分。
pub fn read(path: impl AsRef<Path>) -> Model {
    let path = path.as_ref();
    let mut model = Model::with_name(file_stem(path));

    let result = File::open(path)
        .map_err(FileError::from)
        .and_then(|file| decode(BufReader::new(file), &mut model));

    match result {
        Ok(()) => info!("Read SLC file: {} ({} layers)", path.display(), model.len()),
        Err(e) if e.is_header_error() => {
            warn!("Rejected SLC file {}: {}", path.display(), e);
        }
        Err(e) => {
            warn!(
                "SLC file {} stopped after {} layers: {}",
                path.display(),
                model.len(),
                e
            );
        }
    }

    model
}

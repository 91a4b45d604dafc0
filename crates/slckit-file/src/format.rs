//! 按扩展名选择文件格式
//!
//! - `.slc`：SLC 切片文件，只读
//! - `.xlc`：XLC 模型文件
//! - `.xlc.gz`：gzip 压缩的 XLC 模型文件

use crate::device::{GzipDevice, PlainDevice, StreamDevice};
use crate::error::FileError;
use crate::{slc, xlc};
use slckit_core::model::Model;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::warn;

/// 模型文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Slc,
    Xlc,
}

impl ModelFormat {
    /// 根据扩展名判断格式，不区分大小写
    pub fn from_path(path: &Path) -> Option<Self> {
        let path = if is_gzip(path) {
            Path::new(path.file_stem()?)
        } else {
            path
        };

        match extension(path)?.as_str() {
            "slc" => Some(ModelFormat::Slc),
            "xlc" => Some(ModelFormat::Xlc),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ModelFormat::Slc => "slc",
            ModelFormat::Xlc => "xlc",
        }
    }

    /// 是否支持写入
    pub fn is_writable(self) -> bool {
        matches!(self, ModelFormat::Xlc)
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

fn is_gzip(path: &Path) -> bool {
    extension(path).as_deref() == Some("gz")
}

fn device_for(path: &Path) -> Box<dyn StreamDevice> {
    if is_gzip(path) {
        Box::new(GzipDevice::new())
    } else {
        Box::new(PlainDevice)
    }
}

fn unknown_format(path: &Path) -> FileError {
    FileError::UnsupportedFormat(format!("unknown file extension: {}", path.display()))
}

/// 打开模型文件
pub fn open(path: impl AsRef<Path>) -> Result<Model, FileError> {
    let path = path.as_ref();

    match ModelFormat::from_path(path) {
        Some(ModelFormat::Slc) => {
            let mut reader = BufReader::new(File::open(path)?);
            let header = slc::SlcHeader::read(&mut reader)?;

            // 文件头有效后，轮廓数据不完整时返回已解码的部分
            let mut model = Model::with_name(slc::file_stem(path));
            if let Err(e) = slc::decode_body(reader, &header, &mut model) {
                warn!(
                    "SLC file {} stopped after {} layers: {}",
                    path.display(),
                    model.len(),
                    e
                );
            }
            Ok(model)
        }
        Some(ModelFormat::Xlc) => {
            let reader = device_for(path).open_read(path)?;
            xlc::decode(reader)
        }
        None => Err(unknown_format(path)),
    }
}

/// 保存模型文件
pub fn save(model: &Model, path: impl AsRef<Path>) -> Result<(), FileError> {
    let path = path.as_ref();

    match ModelFormat::from_path(path) {
        Some(format) if !format.is_writable() => Err(FileError::UnsupportedFormat(format!(
            ".{} files are read-only",
            format.extension()
        ))),
        Some(_) => xlc::save(model, path, device_for(path).as_ref()),
        None => Err(unknown_format(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::WriteLe;
    use slckit_core::layer::Layer;
    use slckit_core::point::Point;
    use slckit_core::polygon::{Polygon, PolygonType};

    fn sample_model() -> Model {
        let polygon = Polygon::from_points(
            [Point::new(0.0, 0.0, 0.3), Point::new(4.0, 0.0, 0.3)],
            PolygonType::Infill,
        );
        let mut model = Model::with_name("gear");
        model.push(
            Layer::from_polygons([polygon])
                .with_thickness(0.3)
                .with_height(0.3),
        );
        model.sort();
        model
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ModelFormat::from_path(Path::new("part.slc")),
            Some(ModelFormat::Slc)
        );
        assert_eq!(
            ModelFormat::from_path(Path::new("dir/PART.XLC")),
            Some(ModelFormat::Xlc)
        );
        assert_eq!(
            ModelFormat::from_path(Path::new("part.xlc.gz")),
            Some(ModelFormat::Xlc)
        );
        assert_eq!(ModelFormat::from_path(Path::new("part.gz")), None);
        assert_eq!(ModelFormat::from_path(Path::new("part.stl")), None);
        assert_eq!(ModelFormat::from_path(Path::new("part")), None);

        assert!(ModelFormat::Xlc.is_writable());
        assert!(!ModelFormat::Slc.is_writable());
        assert_eq!(ModelFormat::Slc.extension(), "slc");
    }

    #[test]
    fn test_save_and_open() {
        let model = sample_model();
        for file_name in ["slckit_format.xlc", "slckit_format.xlc.gz"] {
            let path = std::env::temp_dir().join(file_name);
            save(&model, &path).unwrap();
            let loaded = open(&path);
            std::fs::remove_file(&path).ok();
            assert_eq!(loaded.unwrap(), model);
        }
    }

    #[test]
    fn test_compressed_file_is_gzip() {
        let path = std::env::temp_dir().join("slckit_format_magic.xlc.gz");
        save(&sample_model(), &path).unwrap();
        let raw = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn test_unsupported() {
        let model = sample_model();
        let slc_path = std::env::temp_dir().join("slckit_format.slc");
        assert!(matches!(
            save(&model, &slc_path),
            Err(FileError::UnsupportedFormat(ref message)) if message.contains(".slc")
        ));
        assert!(!slc_path.exists());
        assert!(matches!(
            save(&model, "model.stl"),
            Err(FileError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            open("model.stl"),
            Err(FileError::UnsupportedFormat(_))
        ));
    }

    fn slc_file(layers: &[f32], truncate: usize) -> Vec<u8> {
        let mut bytes = b"-SLCVER 2.0 -UNIT MM -TYPE PART".to_vec();
        bytes.extend_from_slice(&slc::HEADER_TERMINATOR);
        bytes.extend(std::iter::repeat(0u8).take(slc::RESERVED_SIZE as usize));
        bytes.push(0);
        for min_z in layers {
            bytes.write_f32_le(*min_z).unwrap();
            bytes.write_u32_le(1).unwrap();
            bytes.write_u32_le(2).unwrap();
            bytes.write_u32_le(0).unwrap();
            for value in [0.0f32, 0.0, 1.0, 1.0] {
                bytes.write_f32_le(value).unwrap();
            }
        }
        bytes.truncate(bytes.len() - truncate);
        bytes
    }

    #[test]
    fn test_open_truncated_slc_keeps_layers() {
        let path = std::env::temp_dir().join("slckit_format_truncated.slc");
        std::fs::write(&path, slc_file(&[2.0, 1.0, 3.0], 5)).unwrap();
        let model = open(&path);
        std::fs::remove_file(&path).ok();

        let model = model.unwrap();
        assert_eq!(model.name(), "slckit_format_truncated");
        assert_eq!(model.heights(), &[1.0, 2.0]);
        assert_eq!(model[0][0].len(), 2);
    }

    #[test]
    fn test_open_slc_with_bad_header() {
        let mut bytes = b"-SLCVER 1.0 -UNIT MM -TYPE PART".to_vec();
        bytes.extend_from_slice(&slc::HEADER_TERMINATOR);
        let path = std::env::temp_dir().join("slckit_format_old.slc");
        std::fs::write(&path, &bytes).unwrap();
        let result = open(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(FileError::HeaderVersionTooOld(_))));
    }

    #[test]
    fn test_open_missing_slc() {
        let path = std::env::temp_dir().join("slckit_format_missing.slc");
        assert!(matches!(open(&path), Err(FileError::Io(_))));
    }
}

//! 字节流设备
//!
//! XLC 读写不关心底层文件是否压缩，只通过 [`StreamDevice`] 打开读写流。
//! 提供两种实现：
//! - [`PlainDevice`]：普通文件
//! - [`GzipDevice`]：gzip 压缩文件（flate2）

use crate::error::FileError;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// 可关闭的写入流
///
/// 关闭时写出缓冲内容以及压缩格式的尾部数据。直接丢弃而不关闭的流
/// 可能丢失尾部，且无法得到错误信息。
pub trait WriteStream: Write {
    fn close(self: Box<Self>) -> io::Result<()>;
}

impl WriteStream for BufWriter<File> {
    fn close(mut self: Box<Self>) -> io::Result<()> {
        self.flush()?;
        self.get_ref().sync_all()
    }
}

impl WriteStream for GzEncoder<BufWriter<File>> {
    fn close(self: Box<Self>) -> io::Result<()> {
        let mut inner = (*self).finish()?;
        inner.flush()?;
        inner.get_ref().sync_all()
    }
}

/// 字节流设备
pub trait StreamDevice {
    /// 打开读取流
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read>, FileError>;

    /// 打开写入流，文件不存在时创建，存在时截断
    fn open_write(&self, path: &Path) -> Result<Box<dyn WriteStream>, FileError>;
}

/// 普通文件
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainDevice;

impl StreamDevice for PlainDevice {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read>, FileError> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn open_write(&self, path: &Path) -> Result<Box<dyn WriteStream>, FileError> {
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// gzip 压缩文件
#[derive(Debug, Clone, Copy)]
pub struct GzipDevice {
    level: Compression,
}

impl GzipDevice {
    pub fn new() -> Self {
        Self {
            level: Compression::default(),
        }
    }

    /// 指定压缩级别（0-9）
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }

    pub fn level(&self) -> u32 {
        self.level.level()
    }
}

impl Default for GzipDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamDevice for GzipDevice {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read>, FileError> {
        let file = File::open(path)?;
        Ok(Box::new(GzDecoder::new(BufReader::new(file))))
    }

    fn open_write(&self, path: &Path) -> Result<Box<dyn WriteStream>, FileError> {
        let file = File::create(path)?;
        Ok(Box::new(GzEncoder::new(BufWriter::new(file), self.level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_and_read(device: &dyn StreamDevice, file_name: &str) -> (Vec<u8>, Vec<u8>) {
        let path = std::env::temp_dir().join(file_name);
        let payload: Vec<u8> = (0..4096u32).map(|i| (i % 7) as u8).collect();

        let mut stream = device.open_write(&path).expect("Failed to open for write");
        stream.write_all(&payload).expect("Failed to write");
        stream.close().expect("Failed to close");

        let mut read_back = Vec::new();
        device
            .open_read(&path)
            .expect("Failed to open for read")
            .read_to_end(&mut read_back)
            .expect("Failed to read");
        let raw = std::fs::read(&path).expect("Failed to read raw file");

        std::fs::remove_file(&path).ok();
        assert_eq!(read_back, payload);
        (payload, raw)
    }

    #[test]
    fn test_plain_device_roundtrip() {
        let (payload, raw) = write_and_read(&PlainDevice, "slckit_device_plain.bin");
        assert_eq!(raw, payload);
    }

    #[test]
    fn test_gzip_device_roundtrip() {
        let (payload, raw) = write_and_read(&GzipDevice::new(), "slckit_device_gzip.bin.gz");
        // gzip 魔数
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);
        assert!(raw.len() < payload.len());
    }

    #[test]
    fn test_gzip_level() {
        assert_eq!(GzipDevice::new().level(), 6);
        assert_eq!(GzipDevice::with_level(1).level(), 1);
        assert_eq!(GzipDevice::with_level(42).level(), 9);
    }

    #[test]
    fn test_open_missing_file() {
        let path = std::env::temp_dir().join("slckit_device_missing.bin");
        std::fs::remove_file(&path).ok();
        assert!(matches!(PlainDevice.open_read(&path), Err(FileError::Io(_))));
    }
}

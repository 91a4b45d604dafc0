//! 小端序二进制读写
//!
//! SLC 与 XLC 共用的基本类型编解码。所有多字节数值均为小端序；
//! 字符串为 `u32` 字节长度加 UTF-8 内容，序列为 `u32` 元素个数加元素。

use std::io::{self, Read, Write};

/// 小端序读取
pub trait ReadLe: Read + Sized {
    fn read_u8_le(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u32_le(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_i32_le(&mut self) -> io::Result<i32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    fn read_f32_le(&mut self) -> io::Result<f32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(f32::from_le_bytes(buf))
    }

    fn read_f64_le(&mut self) -> io::Result<f64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(f64::from_le_bytes(buf))
    }

    /// 读取恰好 `len` 个字节
    fn read_bytes(&mut self, len: usize) -> io::Result<Vec<u8>> {
        // 不按声明长度预分配，损坏的长度字段不会导致超大内存申请
        let mut buf = Vec::new();
        self.by_ref().take(len as u64).read_to_end(&mut buf)?;
        if buf.len() < len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected {} bytes, got {}", len, buf.len()),
            ));
        }
        Ok(buf)
    }

    /// 跳过 `len` 个字节
    fn skip_bytes(&mut self, len: u64) -> io::Result<()> {
        let skipped = io::copy(&mut self.by_ref().take(len), &mut io::sink())?;
        if skipped < len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected to skip {} bytes, got {}", len, skipped),
            ));
        }
        Ok(())
    }

    /// 读取带长度前缀的 UTF-8 字符串
    fn read_string(&mut self) -> io::Result<String> {
        let len = self.read_u32_le()? as usize;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl<R: Read> ReadLe for R {}

/// 小端序写入
pub trait WriteLe: Write {
    fn write_u32_le(&mut self, value: u32) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_i32_le(&mut self, value: i32) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_f32_le(&mut self, value: f32) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_f64_le(&mut self, value: f64) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    /// 写入序列长度前缀
    fn write_len(&mut self, len: usize) -> io::Result<()> {
        let len = u32::try_from(len).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("sequence of {} items exceeds u32 length prefix", len),
            )
        })?;
        self.write_u32_le(len)
    }

    fn write_string(&mut self, value: &str) -> io::Result<()> {
        self.write_len(value.len())?;
        self.write_all(value.as_bytes())
    }
}

impl<W: Write> WriteLe for W {}

//! 文件操作错误定义

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing header key: {0}")]
    HeaderMissingKey(String),

    #[error("SLC version {0} is older than 2.0")]
    HeaderVersionTooOld(f64),

    #[error("Stream truncated: {0}")]
    StreamTruncated(String),

    #[error("Format version mismatch: {0}")]
    FormatVersionMismatch(String),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl FileError {
    /// 读取 `what` 时遇到的 IO 错误；提前结束的流归为截断
    pub fn while_reading(what: &str, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::UnexpectedEof {
            FileError::StreamTruncated(what.to_string())
        } else {
            FileError::Io(error)
        }
    }

    /// 是否属于 SLC 文件头阶段的错误
    pub fn is_header_error(&self) -> bool {
        matches!(
            self,
            FileError::HeaderMissingKey(_) | FileError::HeaderVersionTooOld(_)
        )
    }
}

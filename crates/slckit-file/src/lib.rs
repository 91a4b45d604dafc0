//! SLCKit 文件格式处理
//!
//! 支持：
//! - `.slc` 切片文件导入
//! - `.xlc` 原生格式读写（可选 gzip 压缩）

pub mod binary;
pub mod device;
pub mod error;
pub mod format;
pub mod slc;
pub mod xlc;

pub use device::{GzipDevice, PlainDevice, StreamDevice, WriteStream};
pub use error::FileError;
pub use format::ModelFormat;

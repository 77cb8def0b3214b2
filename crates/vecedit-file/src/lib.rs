//! VecEdit 文件格式处理
//!
//! 支持：
//! - AI / EPS / PDF 的启发式矢量提取（CDR 只产生占位文档）
//! - 提取失败时的占位文档
//! - 分层 SVG 的写出与读回
//! - 远程转换 → 本地提取 → 占位文档的导入流水线

pub mod error;
pub mod extract;
pub mod fallback;
pub mod format;
pub mod pipeline;
pub mod svg;

pub use error::FileError;
pub use extract::extract;
pub use fallback::placeholder_document;
pub use format::DeclaredFormat;
pub use pipeline::{
    convert, convert_file, convert_local, CommandConverter, Conversion, ConversionSource, ConvertOptions, NoRemote,
    RemoteConverter,
};
pub use svg::{deserialize, serialize};

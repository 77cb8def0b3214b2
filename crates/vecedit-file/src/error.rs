//! 文件操作错误定义

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SVG parse error: {0}")]
    Svg(#[from] roxmltree::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Remote conversion failed: {0}")]
    Remote(String),

    #[error("Document error: {0}")]
    Document(#[from] vecedit_core::error::DocumentError),
}

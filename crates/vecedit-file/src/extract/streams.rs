//! PDF 内容流
//!
//! 定位所有 `stream … endstream` 区域，逐个交给操作符解析器。
//! 压缩过的流（FlateDecode 等）解析不出操作符，自然贡献零个图元。

use super::operators::parse_operators;
use super::{pattern, Extraction};
use crate::error::FileError;
use regex::Regex;
use std::sync::LazyLock;

static STREAM: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?s)\bstream\b(.*?)\bendstream\b"));

/// 文本里是否还嵌着页面描述数据
pub fn has_page_description(text: &str) -> bool {
    text.contains("%PDF") || (text.contains("stream") && text.contains("endstream"))
}

pub fn extract_streams(text: &str) -> Result<Extraction, FileError> {
    let stream = pattern(&STREAM)?;
    let mut extraction = Extraction::default();

    for (index, caps) in stream.captures_iter(text).enumerate() {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        extraction.spans.push(whole.range());

        let drawables = parse_operators(body.as_str());
        tracing::debug!("PDF stream #{}: {} primitives", index, drawables.len());
        extraction.drawables.extend(drawables);
    }

    Ok(extraction)
}

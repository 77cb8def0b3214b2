//! 旧矢量格式的启发式提取
//!
//! 入口 [`extract`] 永不失败：每个启发式都是独立的纯函数，
//! 返回 `Result`，出错时记录警告并贡献零个图元。
//!
//! AI/EPS 的处理顺序（结果按此顺序合并）：
//! 1. 内嵌 SVG 标签
//! 2. `BeginPath`/`BeginCurve` 路径块
//! 3. 通用 moveto/lineto/re 操作符
//! 4. 嵌套的 PDF 内容流
//! 5. 以上全部为空时，二进制浮点扫描
//!
//! 第 3 步在屏蔽了 1、2、4 已消耗区域的文本上运行，避免同一段数据被输出两次。

mod binary;
mod markers;
mod operators;
mod streams;
mod svg_tags;
mod tokens;

pub use binary::scan_float_pairs;
pub use markers::extract_marker_blocks;
pub use operators::parse_operators;
pub use streams::{extract_streams, has_page_description};
pub use svg_tags::extract_svg_tags;
pub use tokens::{Token, Tokenizer};

pub(crate) use svg_tags::parse_length;

use crate::error::FileError;
use crate::format::DeclaredFormat;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use vecedit_core::primitive::Drawable;
use vecedit_core::properties::{Color, Style};

/// 单个启发式的结果
#[derive(Debug, Default)]
pub struct Extraction {
    pub drawables: Vec<Drawable>,
    /// 已消耗的文本区域（字节范围）
    pub spans: Vec<Range<usize>>,
}

/// 提取出的图元的默认样式
pub(crate) fn default_style() -> Style {
    Style::new(Color::BLACK, 1.0)
}

/// 取出预编译的正则；编译失败作为普通错误返回
pub(crate) fn pattern(cell: &'static LazyLock<Result<Regex, regex::Error>>) -> Result<&'static Regex, FileError> {
    match LazyLock::force(cell) {
        Ok(regex) => Ok(regex),
        Err(e) => Err(FileError::Pattern(e.clone())),
    }
}

/// 运行一个启发式，失败时记录并视为空
fn run<F>(name: &str, text: &str, heuristic: F) -> Extraction
where
    F: FnOnce(&str) -> Result<Extraction, FileError>,
{
    match heuristic(text) {
        Ok(extraction) => {
            tracing::debug!("Heuristic {}: {} primitives", name, extraction.drawables.len());
            extraction
        }
        Err(e) => {
            tracing::warn!("Heuristic {} failed, skipping: {}", name, e);
            Extraction::default()
        }
    }
}

/// 把已消耗的区域替换为空格（保留换行，注释不会因此吞掉后面的行）
fn mask(text: &str, spans: &[Range<usize>]) -> String {
    if spans.is_empty() {
        return text.to_string();
    }
    let mut bytes = text.as_bytes().to_vec();
    for span in spans {
        let end = span.end.min(bytes.len());
        let start = span.start.min(end);
        for b in &mut bytes[start..end] {
            if *b != b'\n' && *b != b'\r' {
                *b = b' ';
            }
        }
    }
    match String::from_utf8(bytes) {
        Ok(masked) => masked,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// 从原始字节中提取矢量图元
///
/// 对任何输入都会返回（可能为空的）列表。
pub fn extract(bytes: &[u8], format: DeclaredFormat) -> Vec<Drawable> {
    let drawables = match format {
        DeclaredFormat::Ai | DeclaredFormat::Eps => extract_postscript(bytes),
        DeclaredFormat::Pdf => {
            let text = String::from_utf8_lossy(bytes);
            run("pdf-streams", &text, extract_streams).drawables
        }
        // 没有可靠的文本/字节特征，交给占位文档
        DeclaredFormat::Cdr => Vec::new(),
    };

    tracing::info!("Extracted {} primitives from {} ({} bytes)", drawables.len(), format, bytes.len());
    drawables
}

fn extract_postscript(bytes: &[u8]) -> Vec<Drawable> {
    let text = String::from_utf8_lossy(bytes);

    let tags = run("svg-tags", &text, extract_svg_tags);
    let markers = run("path-markers", &text, extract_marker_blocks);
    let streams = if has_page_description(&text) {
        run("nested-pdf", &text, extract_streams)
    } else {
        Extraction::default()
    };

    let consumed: Vec<Range<usize>> = tags
        .spans
        .iter()
        .chain(&markers.spans)
        .chain(&streams.spans)
        .cloned()
        .collect();
    let masked = mask(&text, &consumed);
    let operators = run("operators", &masked, |t| Ok(Extraction {
        drawables: parse_operators(t),
        spans: Vec::new(),
    }));

    let mut drawables = Vec::new();
    drawables.extend(tags.drawables);
    drawables.extend(markers.drawables);
    drawables.extend(operators.drawables);
    drawables.extend(streams.drawables);

    if drawables.is_empty() {
        drawables = scan_float_pairs(bytes);
        tracing::debug!("Binary float scan: {} primitives", drawables.len());
    }

    drawables
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecedit_core::primitive::{Path, Shape};

    /// 简单的线性同余伪随机字节
    fn pseudo_random(len: usize, seed: u64) -> Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (state >> 33) as u8
            })
            .collect()
    }

    #[test]
    fn test_ai_with_embedded_path() {
        let mut bytes = b"%!PS-Adobe-3.0\n%%Creator: Adobe Illustrator\n".to_vec();
        bytes.extend_from_slice(b"<path d=\"M0,0 L100,100\"/>");
        bytes.extend_from_slice(&[0xff, 0xfe, 0x00, 0x80]);

        let drawables = extract(&bytes, DeclaredFormat::Ai);
        assert_eq!(drawables.len(), 1);
        assert_eq!(drawables[0].shape, Shape::Path(Path::new("M0,0 L100,100")));
    }

    #[test]
    fn test_cdr_always_empty() {
        for seed in 0..8 {
            assert!(extract(&pseudo_random(500, seed), DeclaredFormat::Cdr).is_empty());
        }
    }

    #[test]
    fn test_never_panics_on_arbitrary_input() {
        for seed in 0..32 {
            let bytes = pseudo_random(64 + seed as usize * 37, seed);
            for format in DeclaredFormat::ALL {
                let drawables = extract(&bytes, format);
                assert!(drawables.len() <= bytes.len());
            }
        }
        for format in DeclaredFormat::ALL {
            assert!(extract(&[], format).is_empty());
        }
    }

    #[test]
    fn test_heuristics_union_in_order() {
        let text = "<circle cx=\"5\" cy=\"5\" r=\"2\"/>\n\
                    %%BeginPath\n0 0 m 10 0 l\n%%EndPath\n\
                    100 100 moveto 200 200 lineto\n\
                    stream\n1 1 2 2 re\nendstream\n";
        let kinds: Vec<_> = extract(text.as_bytes(), DeclaredFormat::Eps)
            .iter()
            .map(|d| d.shape.type_name())
            .collect();
        assert_eq!(kinds, vec!["circle", "path", "line", "rect"]);
    }

    #[test]
    fn test_binary_scan_only_when_text_heuristics_empty() {
        let mut bytes = b"<rect x=\"0\" y=\"0\" width=\"5\" height=\"5\"/>".to_vec();
        bytes.extend(100.0f32.to_be_bytes());
        bytes.extend(200.0f32.to_be_bytes());
        assert_eq!(extract(&bytes, DeclaredFormat::Ai).len(), 1);

        let floats: Vec<u8> = [100.0f32, 200.0].iter().flat_map(|v| v.to_be_bytes()).collect();
        let drawables = extract(&floats, DeclaredFormat::Eps);
        assert_eq!(drawables.len(), 1);
        assert_eq!(drawables[0].shape.type_name(), "line");
    }

    #[test]
    fn test_pdf_streams() {
        let pdf = b"%PDF-1.3\nstream\n10 10 m 20 20 l 30 30 l S\nendstream\n";
        assert_eq!(extract(pdf, DeclaredFormat::Pdf).len(), 2);
    }

    #[test]
    fn test_mask_preserves_length() {
        let masked = mask("abc漢def", &[0..3, 6..9]);
        assert_eq!(masked, "   漢   ");
        assert_eq!(mask("a\nb", &[0..3]), " \n ");
    }
}

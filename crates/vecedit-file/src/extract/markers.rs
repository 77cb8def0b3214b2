//! 旧版创作工具的路径块标记
//!
//! 早期 Illustrator 导出的 EPS/AI 中，路径数据被包在
//! `%%BeginPath … %%EndPath` / `%%BeginCurve … %%EndCurve` 块内，
//! 块中是简写操作符：
//!
//! | 操作符 | 含义 | 输出 |
//! |---|---|---|
//! | `x y m` | moveto | `M` |
//! | `x y l` / `L` | lineto | `L` |
//! | `x1 y1 x2 y2 x3 y3 c` / `C` | 三次贝塞尔 | `C` |
//! | `x2 y2 x3 y3 v` / `V` | 首控制点 = 当前点 | `C` |
//! | `x1 y1 x3 y3 y` / `Y` | 末控制点 = 终点 | `C` |
//! | `h` `s` `b` `f` `closepath` | 闭合 | `Z` |
//!
//! 每个块生成一个路径图元。

use super::tokens::{Token, Tokenizer};
use super::{default_style, pattern, Extraction};
use crate::error::FileError;
use regex::Regex;
use std::sync::LazyLock;
use vecedit_core::math::Point2;
use vecedit_core::path_data::PathBuilder;
use vecedit_core::primitive::{Drawable, Path, Shape};

static BLOCK: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?s)Begin(?:Path|Curve)\b(.*?)End(?:Path|Curve)\b"));

/// 提取所有路径块
pub fn extract_marker_blocks(text: &str) -> Result<Extraction, FileError> {
    let block = pattern(&BLOCK)?;
    let mut extraction = Extraction::default();

    for caps in block.captures_iter(text) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        extraction.spans.push(whole.range());

        if let Some(data) = block_to_path_data(body.as_str()) {
            extraction
                .drawables
                .push(Drawable::new(Shape::Path(Path::new(data)), default_style()));
        }
    }

    Ok(extraction)
}

/// 把一个块的操作符翻译成路径数据，没有可见线段时返回 `None`
fn block_to_path_data(body: &str) -> Option<String> {
    let mut builder = PathBuilder::new();
    let mut operands: Vec<f64> = Vec::new();
    let mut current: Option<Point2> = None;

    for token in Tokenizer::new(body) {
        let op = match token {
            Token::Number(v) => {
                operands.push(v);
                continue;
            }
            Token::Malformed(_) => continue,
            Token::Other => {
                operands.clear();
                continue;
            }
            Token::Operator(op) => op,
        };

        let n = operands.len();
        let pt = |i: usize| Point2::new(operands[n - i], operands[n - i + 1]);

        match op {
            "m" if n >= 2 => {
                let p = pt(2);
                builder.move_to(p);
                current = Some(p);
            }
            "l" | "L" if n >= 2 => {
                let p = pt(2);
                if current.is_none() {
                    builder.move_to(p);
                } else {
                    builder.line_to(p);
                }
                current = Some(p);
            }
            "c" | "C" if n >= 6 => {
                if current.is_some() {
                    builder.cubic_to(pt(6), pt(4), pt(2));
                    current = Some(pt(2));
                }
            }
            "v" | "V" if n >= 4 => {
                if let Some(c) = current {
                    builder.cubic_to(c, pt(4), pt(2));
                    current = Some(pt(2));
                }
            }
            "y" | "Y" if n >= 4 => {
                if current.is_some() {
                    builder.cubic_to(pt(4), pt(2), pt(2));
                    current = Some(pt(2));
                }
            }
            "h" | "s" | "b" | "f" | "closepath" => {
                if current.is_some() {
                    builder.close();
                }
            }
            _ => {}
        }
        operands.clear();
    }

    if builder.is_degenerate() {
        None
    } else {
        Some(builder.build())
    }
}

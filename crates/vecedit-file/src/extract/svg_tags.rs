//! 内嵌的 SVG 风格标签
//!
//! 新版 AI 文件会在私有数据前后夹带 SVG/XML 片段，
//! 这里不做完整 XML 解析（周围全是二进制噪声），只用正则匹配
//! `path` / `rect` / `circle` / `text` 标签并解析属性。

use super::{pattern, Extraction};
use crate::error::FileError;
use crate::svg::{strip_non_xml, DEFAULT_FONT_SIZE};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;
use vecedit_core::math::Point2;
use vecedit_core::primitive::{Circle, Drawable, Path, Rect, Shape, Text, TextAnchor};
use vecedit_core::properties::{Color, Style};

static SHAPE_TAG: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?is)<(path|rect|circle)\b([^>]*)>"));

static TEXT_TAG: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?is)<text\b([^>]*)>(.*?)</text\s*>"));

static ATTRIBUTE: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-\w:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
});

static INNER_TAG: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(r"<[^>]*>"));

/// 提取所有可识别的标签，按出现顺序输出
pub fn extract_svg_tags(text: &str) -> Result<Extraction, FileError> {
    let shape_tag = pattern(&SHAPE_TAG)?;
    let text_tag = pattern(&TEXT_TAG)?;
    let attribute = pattern(&ATTRIBUTE)?;
    let inner_tag = pattern(&INNER_TAG)?;

    let mut found: Vec<(usize, Drawable)> = Vec::new();
    let mut extraction = Extraction::default();

    for caps in shape_tag.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        extraction.spans.push(whole.range());

        let name = caps.get(1).map(|m| m.as_str().to_ascii_lowercase()).unwrap_or_default();
        let attrs = parse_attributes(attribute, caps.get(2).map_or("", |m| m.as_str()));
        let shape = match name.as_str() {
            "path" => path_from(&attrs),
            "rect" => rect_from(&attrs),
            "circle" => circle_from(&attrs),
            _ => None,
        };
        if let Some(shape) = shape {
            found.push((whole.start(), Drawable::new(shape, stroke_style(&attrs))));
        }
    }

    for caps in text_tag.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        extraction.spans.push(whole.range());

        let attrs = parse_attributes(attribute, caps.get(1).map_or("", |m| m.as_str()));
        let raw = caps.get(2).map_or("", |m| m.as_str());
        if let Some(drawable) = text_from(&attrs, raw, inner_tag) {
            found.push((whole.start(), drawable));
        }
    }

    found.sort_by_key(|(start, _)| *start);
    extraction.drawables = found.into_iter().map(|(_, d)| d).collect();
    Ok(extraction)
}

fn parse_attributes(attribute: &Regex, source: &str) -> HashMap<String, String> {
    attribute
        .captures_iter(source)
        .filter_map(|caps: Captures<'_>| {
            let key = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
            Some((key, strip_non_xml(&unescape(value))))
        })
        .collect()
}

/// 解析长度值（允许 px/pt 后缀），无法解析或非有限值返回 `None`
pub(crate) fn parse_length(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed
        .strip_suffix("px")
        .or_else(|| trimmed.strip_suffix("pt"))
        .unwrap_or(trimmed)
        .trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn number(attrs: &HashMap<String, String>, key: &str) -> Option<f64> {
    attrs.get(key).and_then(|v| parse_length(v))
}

fn path_from(attrs: &HashMap<String, String>) -> Option<Shape> {
    let d = attrs.get("d")?.trim();
    if d.is_empty() {
        return None;
    }
    Some(Shape::Path(Path::new(d)))
}

fn rect_from(attrs: &HashMap<String, String>) -> Option<Shape> {
    let width = number(attrs, "width")?;
    let height = number(attrs, "height")?;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let origin = Point2::new(number(attrs, "x").unwrap_or(0.0), number(attrs, "y").unwrap_or(0.0));
    Some(Shape::Rect(Rect::new(origin, width, height)))
}

fn circle_from(attrs: &HashMap<String, String>) -> Option<Shape> {
    let radius = number(attrs, "r")?;
    if radius <= 0.0 {
        return None;
    }
    let center = Point2::new(number(attrs, "cx").unwrap_or(0.0), number(attrs, "cy").unwrap_or(0.0));
    Some(Shape::Circle(Circle::new(center, radius)))
}

fn text_from(attrs: &HashMap<String, String>, raw: &str, inner_tag: &Regex) -> Option<Drawable> {
    // 标签周围是二进制数据，控制字符不能带进文档
    let content = strip_non_xml(&unescape(inner_tag.replace_all(raw, "").trim()));
    if content.is_empty() {
        return None;
    }

    let position = Point2::new(number(attrs, "x").unwrap_or(0.0), number(attrs, "y").unwrap_or(0.0));
    let font_size = number(attrs, "font-size").filter(|s| *s > 0.0).unwrap_or(DEFAULT_FONT_SIZE);
    let anchor = attrs.get("text-anchor").map(|a| TextAnchor::parse(a)).unwrap_or_default();
    let color = attrs.get("fill").and_then(|c| Color::parse(c)).unwrap_or_default();

    let text = Text::new(position, content, font_size).with_anchor(anchor);
    Some(Drawable::new(Shape::Text(text), Style::new(color, 1.0)))
}

fn stroke_style(attrs: &HashMap<String, String>) -> Style {
    let color = attrs.get("stroke").and_then(|c| Color::parse(c)).unwrap_or_default();
    let width = number(attrs, "stroke-width").filter(|w| *w >= 0.0).unwrap_or(1.0);
    let mut style = Style::new(color, width);
    style.fill = attrs.get("fill").and_then(|c| Color::parse(c));
    style
}

/// 只处理预定义实体，未知实体原样保留
fn unescape(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_path_tag() {
        let extraction = extract_svg_tags("junk\x01<path d=\"M0,0 L100,100\"/>junk").unwrap();
        assert_eq!(extraction.drawables.len(), 1);
        assert_eq!(extraction.drawables[0].shape, Shape::Path(Path::new("M0,0 L100,100")));
    }

    #[test]
    fn test_mixed_tags_keep_document_order() {
        let text = r##"<text x="5" y="6" font-size="12px">Hi &amp; bye</text>
            <rect x="1" y="2" width="30" height="40" stroke="#ff0000" stroke-width="3"/>
            <circle cx='10' cy='10' r='4' fill="#00ff00"/>"##;
        let extraction = extract_svg_tags(text).unwrap();
        let kinds: Vec<_> = extraction.drawables.iter().map(|d| d.shape.type_name()).collect();
        assert_eq!(kinds, vec!["text", "rect", "circle"]);

        match &extraction.drawables[0].shape {
            Shape::Text(t) => {
                assert_eq!(t.content, "Hi & bye");
                assert_eq!(t.font_size, 12.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(extraction.drawables[1].style.color, Color::RED);
        assert_eq!(extraction.drawables[1].style.stroke_width, 3.0);
        assert_eq!(extraction.drawables[2].style.fill, Some(Color::rgb(0, 255, 0)));
    }

    #[test]
    fn test_bad_numbers_skip_element() {
        let extraction = extract_svg_tags(r#"<rect width="abc" height="5"/><circle r="2"/>"#).unwrap();
        assert_eq!(extraction.drawables.len(), 1);
        assert_eq!(extraction.spans.len(), 2);
    }

    #[test]
    fn test_control_bytes_stripped() {
        let extraction = extract_svg_tags("<text x=\"1\" y=\"2\">A\x01B</text><path d=\"M0 0\x02 L1 1\"/>").unwrap();
        let shapes: Vec<_> = extraction.drawables.iter().map(|d| d.shape.clone()).collect();
        assert_eq!(shapes[0], Shape::Text(Text::new(Point2::new(1.0, 2.0), "AB", DEFAULT_FONT_SIZE)));
        assert_eq!(shapes[1], Shape::Path(Path::new("M0 0 L1 1")));
    }

    #[test]
    fn test_tspan_content_flattened() {
        let extraction = extract_svg_tags("<text><tspan>Logo</tspan></text>").unwrap();
        match &extraction.drawables[0].shape {
            Shape::Text(t) => assert_eq!(t.content, "Logo"),
            other => panic!("unexpected {other:?}"),
        }
    }
}

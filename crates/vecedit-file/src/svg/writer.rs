//! SVG 写出

use super::{
    is_xml_char, ARROWHEAD_ID, ATTR_LAYER_ID, ATTR_LAYER_NAME, ATTR_LOCKED, CANVAS_HEIGHT, CANVAS_WIDTH,
    DEFAULT_FONT_SIZE, SVG_NAMESPACE,
};
use vecedit_core::layer::Layer;
use vecedit_core::primitive::{Primitive, Shape, TextAnchor};
use vecedit_core::properties::Style;

/// 逐行累积的 SVG 写出器
pub struct SvgWriter {
    output: Vec<String>,
}

impl SvgWriter {
    pub fn new() -> Self {
        Self { output: Vec::new() }
    }

    fn line(&mut self, depth: usize, content: String) {
        self.output.push(format!("{}{}", "  ".repeat(depth), content));
    }

    /// 写入根元素和箭头标记
    pub fn begin_document(&mut self) {
        self.line(
            0,
            format!(
                r#"<svg xmlns="{}" width="{}" height="{}" viewBox="0 0 {} {}">"#,
                SVG_NAMESPACE,
                number(CANVAS_WIDTH),
                number(CANVAS_HEIGHT),
                number(CANVAS_WIDTH),
                number(CANVAS_HEIGHT)
            ),
        );
        self.line(1, "<defs>".into());
        self.line(
            2,
            format!(
                r#"<marker id="{}" markerWidth="10" markerHeight="7" refX="10" refY="3.5" orient="auto">"#,
                ARROWHEAD_ID
            ),
        );
        self.line(3, r#"<polygon points="0 0, 10 3.5, 0 7" fill="context-stroke"/>"#.into());
        self.line(2, "</marker>".into());
        self.line(1, "</defs>".into());
    }

    pub fn write_layer(&mut self, layer: &Layer) {
        let mut attrs = vec![
            (ATTR_LAYER_ID, layer.id.0.to_string()),
            (ATTR_LAYER_NAME, layer.name.clone()),
        ];
        if layer.locked {
            attrs.push((ATTR_LOCKED, "true".into()));
        }
        if !layer.visible {
            attrs.push(("display", "none".into()));
        }

        if layer.is_empty() {
            self.line(1, format!("<g{}/>", attributes(&attrs)));
            return;
        }

        self.line(1, format!("<g{}>", attributes(&attrs)));
        for primitive in &layer.primitives {
            self.write_primitive(primitive);
        }
        self.line(1, "</g>".into());
    }

    pub fn write_primitive(&mut self, primitive: &Primitive) {
        let mut attrs = vec![("id", primitive.id.to_string())];
        let style = &primitive.style;

        let element = match &primitive.shape {
            Shape::Path(path) => {
                attrs.push(("d", path.data.clone()));
                push_stroke(&mut attrs, style, true);
                "path"
            }
            Shape::Line(line) | Shape::Arrow(line) => {
                attrs.push(("x1", number(line.start.x)));
                attrs.push(("y1", number(line.start.y)));
                attrs.push(("x2", number(line.end.x)));
                attrs.push(("y2", number(line.end.y)));
                push_stroke(&mut attrs, style, false);
                if matches!(primitive.shape, Shape::Arrow(_)) {
                    attrs.push(("marker-end", format!("url(#{})", ARROWHEAD_ID)));
                }
                "line"
            }
            Shape::Rect(rect) => {
                let rect = rect.normalized();
                attrs.push(("x", number(rect.origin.x)));
                attrs.push(("y", number(rect.origin.y)));
                attrs.push(("width", number(rect.width)));
                attrs.push(("height", number(rect.height)));
                push_stroke(&mut attrs, style, true);
                "rect"
            }
            Shape::Circle(circle) => {
                attrs.push(("cx", number(circle.center.x)));
                attrs.push(("cy", number(circle.center.y)));
                attrs.push(("r", number(circle.radius.abs())));
                push_stroke(&mut attrs, style, true);
                "circle"
            }
            Shape::Text(text) => {
                attrs.push(("x", number(text.position.x)));
                attrs.push(("y", number(text.position.y)));
                let font_size = if text.font_size > 0.0 && text.font_size.is_finite() {
                    text.font_size
                } else {
                    DEFAULT_FONT_SIZE
                };
                attrs.push(("font-size", number(font_size)));
                attrs.push(("fill", style.color.to_hex()));
                if text.anchor != TextAnchor::Start {
                    attrs.push(("text-anchor", text.anchor.as_str().into()));
                }
                self.line(
                    2,
                    format!("<text{}>{}</text>", attributes(&attrs), escape_text(&text.content)),
                );
                return;
            }
            Shape::Image(image) => {
                attrs.push(("x", number(image.origin.x)));
                attrs.push(("y", number(image.origin.y)));
                attrs.push(("width", number(image.width)));
                attrs.push(("height", number(image.height)));
                attrs.push(("href", image.href.clone()));
                "image"
            }
        };

        self.line(2, format!("<{}{}/>", element, attributes(&attrs)));
    }

    pub fn end_document(&mut self) {
        self.line(0, "</svg>".into());
    }

    pub fn finish(self) -> String {
        let mut svg = self.output.join("\n");
        svg.push('\n');
        svg
    }
}

impl Default for SvgWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// 把图层序列化为 SVG 字符串
pub fn serialize(layers: &[Layer]) -> String {
    let mut writer = SvgWriter::new();
    writer.begin_document();
    for layer in layers {
        writer.write_layer(layer);
    }
    writer.end_document();

    let svg = writer.finish();
    tracing::debug!("Serialized {} layers to SVG ({} bytes)", layers.len(), svg.len());
    svg
}

fn push_stroke(attrs: &mut Vec<(&'static str, String)>, style: &Style, fillable: bool) {
    attrs.push(("stroke", style.color.to_hex()));
    attrs.push(("stroke-width", number(style.stroke_width.max(0.0))));
    if fillable {
        let fill = style.fill.map(|c| c.to_hex()).unwrap_or_else(|| "none".into());
        attrs.push(("fill", fill));
    }
    if let Some(dash) = style.dash.as_ref().filter(|d| !d.is_empty()) {
        let pattern: Vec<String> = dash.iter().map(|v| number(*v)).collect();
        attrs.push(("stroke-dasharray", pattern.join(" ")));
    }
}

/// 最短往返格式；负零和非有限值写成 0
pub(crate) fn number(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        "0".into()
    } else {
        format!("{}", value)
    }
}

fn attributes(attrs: &[(&str, String)]) -> String {
    attrs
        .iter()
        .map(|(key, value)| format!(r#" {}="{}""#, key, escape_attribute(value)))
        .collect()
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            // 属性值里的空白字符会被 XML 解析器规范化成空格
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            c if !is_xml_char(c) => {}
            c => escaped.push(c),
        }
    }
    escaped
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\r' => escaped.push_str("&#13;"),
            c if !is_xml_char(c) => {}
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecedit_core::document::Document;
    use vecedit_core::layer::LayerId;
    use vecedit_core::math::Point2;
    use vecedit_core::primitive::{Drawable, Line, PrimitiveId, Rect, Text};
    use vecedit_core::properties::Color;

    #[test]
    fn test_root_and_defs() {
        let svg = serialize(Document::new().layers());
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="800" height="600" viewBox="0 0 800 600">"#));
        assert!(svg.contains(r#"<marker id="arrowhead""#));
        assert!(svg.contains(r#"data-layer-name="Layer 1""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_arrow_marker_and_id() {
        let primitive = Primitive::from_drawable(
            PrimitiveId(7),
            LayerId(1),
            Drawable::new(
                Shape::Arrow(Line::new(Point2::new(0.0, 0.0), Point2::new(10.5, 20.0))),
                Style::new(Color::RED, 2.0),
            ),
        );
        let mut writer = SvgWriter::new();
        writer.write_primitive(&primitive);
        assert_eq!(
            writer.finish().trim(),
            r##"<line id="p7" x1="0" y1="0" x2="10.5" y2="20" stroke="#ff0000" stroke-width="2" marker-end="url(#arrowhead)"/>"##
        );
    }

    #[test]
    fn test_rect_normalized_on_write() {
        let primitive = Primitive::from_drawable(
            PrimitiveId(2),
            LayerId(1),
            Drawable::new(Shape::Rect(Rect::new(Point2::new(50.0, 50.0), -20.0, -10.0)), Style::default()),
        );
        let mut writer = SvgWriter::new();
        writer.write_primitive(&primitive);
        let svg = writer.finish();
        assert!(svg.contains(r#"x="30" y="40" width="20" height="10""#));
        assert!(svg.contains(r#"fill="none""#));
    }

    #[test]
    fn test_text_escaped() {
        let primitive = Primitive::from_drawable(
            PrimitiveId(3),
            LayerId(1),
            Drawable::new(Shape::Text(Text::new(Point2::new(1.0, 2.0), "<b> & co", 16.0)), Style::default()),
        );
        let mut writer = SvgWriter::new();
        writer.write_primitive(&primitive);
        assert!(writer.finish().contains(">&lt;b&gt; &amp; co</text>"));
    }

    #[test]
    fn test_non_xml_chars_dropped() {
        let primitive = Primitive::from_drawable(
            PrimitiveId(4),
            LayerId(1),
            Drawable::new(
                Shape::Text(Text::new(Point2::new(0.0, 0.0), "A\u{1}B\u{0}\u{ffff}\tC", 16.0)),
                Style::default(),
            ),
        );
        let mut writer = SvgWriter::new();
        writer.write_primitive(&primitive);
        assert!(writer.finish().contains(">AB\tC</text>"));
        assert_eq!(escape_attribute("x\u{8}y\u{b}z"), "xyz");
    }

    #[test]
    fn test_number_format() {
        assert_eq!(number(100.0), "100");
        assert_eq!(number(-0.0), "0");
        assert_eq!(number(f64::NAN), "0");
        assert_eq!(number(f64::NEG_INFINITY), "0");
        assert_eq!(number(0.1), "0.1");
        assert_eq!(number(-2.5), "-2.5");
    }
}

//! SVG 读写
//!
//! 写出的 SVG 每个图层一个 `<g>`，图层元数据放在 `data-*` 属性里，
//! 读回时据此重建图层。对本系统写出的 SVG，`serialize(deserialize(s)) == s`。

mod reader;
mod writer;

pub use reader::{deserialize, IMPORTED_LAYER_NAME};
pub use writer::{serialize, SvgWriter};

/// 画布尺寸
pub const CANVAS_WIDTH: f64 = 800.0;
pub const CANVAS_HEIGHT: f64 = 600.0;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// 箭头标记的 id
pub const ARROWHEAD_ID: &str = "arrowhead";

pub(crate) const ATTR_LAYER_ID: &str = "data-layer-id";
pub(crate) const ATTR_LAYER_NAME: &str = "data-layer-name";
pub(crate) const ATTR_LOCKED: &str = "data-locked";

/// 文本缺少或给出非正字号时使用的字号
pub(crate) const DEFAULT_FONT_SIZE: f64 = 16.0;

/// XML 1.0 允许出现的字符
///
/// 除制表、换行、回车外的 C0 控制字符以及 U+FFFE/U+FFFF 不能出现在文档里，
/// 写成字符引用也不行。
pub fn is_xml_char(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => true,
        '\u{0}'..='\u{1f}' => false,
        '\u{fffe}' | '\u{ffff}' => false,
        _ => true,
    }
}

/// 去掉 XML 不允许的字符
pub fn strip_non_xml(value: &str) -> String {
    value.chars().filter(|c| is_xml_char(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::placeholder_document;
    use crate::format::DeclaredFormat;
    use vecedit_core::document::Document;
    use vecedit_core::math::Point2;
    use vecedit_core::primitive::{Circle, Drawable, Image, Line, Path, Rect, Shape, Text};
    use vecedit_core::properties::{Color, Style};

    fn assert_round_trip(document: &Document) {
        let svg = serialize(document.layers());
        let restored = deserialize(&svg).unwrap();
        assert_eq!(serialize(restored.layers()), svg);
    }

    #[test]
    fn test_round_trip_placeholder() {
        for format in DeclaredFormat::ALL {
            assert_round_trip(&placeholder_document(format));
        }
    }

    #[test]
    fn test_round_trip_all_shapes() {
        let mut document = Document::new();
        let base = document.active_layer_id();
        let red = Style::new(Color::RED, 3.5);
        let items = [
            Shape::Path(Path::new("M0 0 L10.25 3 C1 2 3 4 5 6 Z")),
            Shape::Line(Line::new(Point2::new(-1.5, 2.0), Point2::new(3.0, 1e-3))),
            Shape::Arrow(Line::new(Point2::new(0.0, 0.0), Point2::new(100.0, 50.0))),
            Shape::Rect(Rect::new(Point2::new(10.0, 10.0), 20.0, 0.1)),
            Shape::Text(Text::new(Point2::new(5.0, 5.0), "a < b & \"c\"\r\n\tdone", 12.0)),
            Shape::Image(Image {
                origin: Point2::new(0.0, 0.0),
                width: 64.0,
                height: 32.0,
                href: "https://example.com/a.png?x=1&y=2".into(),
            }),
        ];
        for shape in items {
            document.add_primitive(base, Drawable::new(shape, red.clone())).unwrap();
        }

        let hidden = document.add_layer("Hidden \"quoted\" <layer>");
        document
            .add_primitive(
                hidden,
                Drawable::new(
                    Shape::Path(Path::new("M1 1 L2 2")),
                    Style::new(Color::BLUE, 1.0).with_fill(Color::GREEN).with_dash([4.0, 2.0]),
                ),
            )
            .unwrap();
        document.toggle_visibility(hidden).unwrap();
        let locked = document.add_layer("Locked");
        document.toggle_lock(locked).unwrap();

        assert_round_trip(&document);
    }

    #[test]
    fn test_round_trip_edge_values() {
        let mut document = Document::new();
        let base = document.active_layer_id();
        let items = [
            Shape::Path(Path::new(" M0 0 L5 5 ")),
            Shape::Path(Path::new("")),
            Shape::Circle(Circle::new(Point2::new(10.0, 10.0), -4.0)),
            Shape::Line(Line::new(Point2::new(f64::NAN, 1.0), Point2::new(f64::INFINITY, 2.0))),
            Shape::Text(Text::new(Point2::new(0.0, 0.0), "zero size\u{1}", 0.0)),
        ];
        for shape in items {
            document.add_primitive(base, Drawable::new(shape, Style::new(Color::BLACK, -1.0))).unwrap();
        }
        document.add_layer("tab\there\u{7}");

        assert_round_trip(&document);
        let restored = deserialize(&serialize(document.layers())).unwrap();
        assert_eq!(restored.primitive_count(), 5);
        assert!(restored.layer_by_name("tab\there").is_some());
    }

    #[test]
    fn test_round_trip_preserves_layer_flags_and_ids() {
        let mut document = Document::new();
        let layer = document.add_layer("Top");
        let id = document
            .add_primitive(
                layer,
                Drawable::new(Shape::Line(Line::new(Point2::new(1.0, 2.0), Point2::new(3.0, 4.0))), Style::default()),
            )
            .unwrap();
        document.toggle_visibility(layer).unwrap();
        document.toggle_lock(layer).unwrap();

        let restored = deserialize(&serialize(document.layers())).unwrap();
        let top = restored.layer(layer).unwrap();
        assert_eq!(top.name, "Top");
        assert!(!top.visible);
        assert!(top.locked);
        assert_eq!(restored.primitive(id).map(|p| p.layer_id), Some(layer));
    }
}

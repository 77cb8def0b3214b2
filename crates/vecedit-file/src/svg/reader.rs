//! SVG 读取
//!
//! 带 `data-layer-id` / `data-layer-name` 的 `<g>` 各自成为一个图层。
//! 外部 SVG 没有这类分组时，所有可识别的形状放进一个导入图层。
//! 无法识别的元素和数值直接跳过。

use super::{ARROWHEAD_ID, ATTR_LAYER_ID, ATTR_LAYER_NAME, ATTR_LOCKED, DEFAULT_FONT_SIZE, XLINK_NAMESPACE};
use crate::error::FileError;
use crate::extract::parse_length;
use roxmltree::Node;
use std::collections::HashSet;
use vecedit_core::document::Document;
use vecedit_core::layer::{Layer, LayerId};
use vecedit_core::math::Point2;
use vecedit_core::primitive::{Circle, Drawable, Image, Line, Path, Primitive, PrimitiveId, Rect, Shape, Text, TextAnchor};
use vecedit_core::properties::{Color, Style};

/// 外部 SVG 的图层名
pub const IMPORTED_LAYER_NAME: &str = "Imported SVG";

/// 解析阶段的图层，ID 可能缺失或重复，最后统一分配
struct ParsedLayer {
    id: Option<u64>,
    name: String,
    visible: bool,
    locked: bool,
    primitives: Vec<(Option<u64>, Drawable)>,
}

/// 解析 SVG 字符串为文档
pub fn deserialize(markup: &str) -> Result<Document, FileError> {
    let xml = roxmltree::Document::parse(markup)?;

    let groups: Vec<Node> = xml
        .descendants()
        .filter(|n| n.has_tag_name("g") && (n.has_attribute(ATTR_LAYER_ID) || n.has_attribute(ATTR_LAYER_NAME)))
        .collect();

    let parsed = if groups.is_empty() {
        tracing::debug!("No tagged layer groups, importing all shapes into one layer");
        vec![ParsedLayer {
            id: None,
            name: IMPORTED_LAYER_NAME.to_string(),
            visible: true,
            locked: false,
            primitives: shapes_in(xml.root_element()),
        }]
    } else {
        groups.iter().map(|g| parse_group(*g)).collect()
    };

    let layers = assign_ids(parsed);
    tracing::debug!(
        "Deserialized SVG: {} layers, {} primitives",
        layers.len(),
        layers.iter().map(Layer::len).sum::<usize>()
    );
    Ok(Document::from_layers(layers))
}

fn parse_group(group: Node) -> ParsedLayer {
    let id = group.attribute(ATTR_LAYER_ID).and_then(parse_layer_id);
    let name = group
        .attribute(ATTR_LAYER_NAME)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Layer {}", id.unwrap_or(0)));
    let hidden = group.attribute("display").is_some_and(|d| d.trim() == "none")
        || group.attribute("visibility").is_some_and(|v| v.trim() == "hidden");
    let locked = group.attribute(ATTR_LOCKED).is_some_and(|l| l.trim() == "true");

    ParsedLayer {
        id,
        name,
        visible: !hidden,
        locked,
        primitives: shapes_in(group),
    }
}

/// 收集节点下的形状元素，跳过 `<defs>` 和嵌套的图层分组
fn shapes_in(scope: Node) -> Vec<(Option<u64>, Drawable)> {
    let mut found = Vec::new();
    collect(scope, &mut found);
    found
}

fn collect(node: Node, found: &mut Vec<(Option<u64>, Drawable)>) {
    for child in node.children().filter(Node::is_element) {
        let tag = child.tag_name().name();
        if tag == "defs" || tag == "marker" {
            continue;
        }
        if tag == "g" && (child.has_attribute(ATTR_LAYER_ID) || child.has_attribute(ATTR_LAYER_NAME)) {
            continue;
        }
        match parse_shape(child) {
            Some(drawable) => {
                let id = child.attribute("id").and_then(parse_primitive_id);
                found.push((id, drawable));
            }
            None => collect(child, found),
        }
    }
}

fn parse_layer_id(value: &str) -> Option<u64> {
    let value = value.trim();
    value.strip_prefix("layer-").unwrap_or(value).parse().ok()
}

fn parse_primitive_id(value: &str) -> Option<u64> {
    value.trim().strip_prefix('p')?.parse().ok()
}

/// 缺失或重复的 ID 从现有最大值之后分配
fn assign_ids(parsed: Vec<ParsedLayer>) -> Vec<Layer> {
    let max = parsed
        .iter()
        .flat_map(|l| l.id.into_iter().chain(l.primitives.iter().filter_map(|(id, _)| *id)))
        .max()
        .unwrap_or(0);
    let mut next = max + 1;
    let mut seen = HashSet::new();
    let mut resolve = |candidate: Option<u64>| match candidate {
        Some(id) if seen.insert(id) => id,
        _ => {
            let id = next;
            next += 1;
            seen.insert(id);
            id
        }
    };

    parsed
        .into_iter()
        .map(|p| {
            let layer_id = LayerId(resolve(p.id));
            let mut layer = Layer::new(layer_id, p.name);
            layer.visible = p.visible;
            layer.locked = p.locked;
            layer.primitives = p
                .primitives
                .into_iter()
                .map(|(id, drawable)| Primitive::from_drawable(PrimitiveId(resolve(id)), layer_id, drawable))
                .collect();
            layer
        })
        .collect()
}

fn number(node: Node, name: &str) -> Option<f64> {
    node.attribute(name).and_then(parse_length)
}

fn point(node: Node, x: &str, y: &str) -> Point2 {
    Point2::new(number(node, x).unwrap_or(0.0), number(node, y).unwrap_or(0.0))
}

fn parse_shape(node: Node) -> Option<Drawable> {
    let shape = match node.tag_name().name() {
        // 路径数据原样保留，写出时也不做改写
        "path" => Shape::Path(Path::new(node.attribute("d")?)),
        "line" => {
            let line = Line::new(point(node, "x1", "y1"), point(node, "x2", "y2"));
            let arrow = node
                .attribute("marker-end")
                .is_some_and(|m| m.contains(ARROWHEAD_ID));
            if arrow {
                Shape::Arrow(line)
            } else {
                Shape::Line(line)
            }
        }
        "rect" => {
            let width = number(node, "width").filter(|w| *w >= 0.0)?;
            let height = number(node, "height").filter(|h| *h >= 0.0)?;
            Shape::Rect(Rect::new(point(node, "x", "y"), width, height))
        }
        "circle" => {
            let radius = number(node, "r").filter(|r| *r >= 0.0)?;
            Shape::Circle(Circle::new(point(node, "cx", "cy"), radius))
        }
        "text" => {
            let content: String = node
                .descendants()
                .filter(Node::is_text)
                .filter_map(|n| n.text())
                .collect();
            let font_size = number(node, "font-size").filter(|s| *s > 0.0).unwrap_or(DEFAULT_FONT_SIZE);
            let anchor = node.attribute("text-anchor").map(TextAnchor::parse).unwrap_or_default();
            let text = Text::new(point(node, "x", "y"), content, font_size).with_anchor(anchor);
            let color = node.attribute("fill").and_then(Color::parse).unwrap_or_default();
            return Some(Drawable::new(Shape::Text(text), Style::new(color, 1.0)));
        }
        "image" => {
            let href = node
                .attribute("href")
                .or_else(|| node.attribute((XLINK_NAMESPACE, "href")))?;
            Shape::Image(Image {
                origin: point(node, "x", "y"),
                width: number(node, "width").unwrap_or(0.0),
                height: number(node, "height").unwrap_or(0.0),
                href: href.to_string(),
            })
        }
        _ => return None,
    };

    Some(Drawable::new(shape, stroke_style(node)))
}

fn stroke_style(node: Node) -> Style {
    let color = node.attribute("stroke").and_then(Color::parse).unwrap_or_default();
    let width = number(node, "stroke-width").filter(|w| *w >= 0.0).unwrap_or(1.0);
    let mut style = Style::new(color, width);
    style.fill = node.attribute("fill").and_then(Color::parse);
    style.dash = node.attribute("stroke-dasharray").and_then(parse_dash);
    style
}

fn parse_dash(value: &str) -> Option<Vec<f64>> {
    let dash: Vec<f64> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .filter_map(parse_length)
        .collect();
    (!dash.is_empty()).then_some(dash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_markup_is_error() {
        assert!(matches!(deserialize("<svg><g></svg>"), Err(FileError::Svg(_))));
    }

    #[test]
    fn test_external_svg_single_layer() {
        let markup = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
            <defs><marker id="m"><path d="M0 0 L1 1"/></marker></defs>
            <g transform="translate(1 1)">
                <rect x="1" y="2" width="3" height="4" stroke="red"/>
                <circle cx="5" cy="5" r="2" fill="#00ff00"/>
            </g>
            <image x="0" y="0" width="10" height="10" xlink:href="logo.png"/>
            <ellipse cx="1" cy="1" rx="2" ry="3"/>
        </svg>"##;
        let document = deserialize(markup).unwrap();
        assert_eq!(document.layer_count(), 1);

        let layer = &document.layers()[0];
        assert_eq!(layer.name, IMPORTED_LAYER_NAME);
        let kinds: Vec<_> = layer.primitives.iter().map(|p| p.shape.type_name()).collect();
        assert_eq!(kinds, vec!["rect", "circle", "image"]);
        assert_eq!(layer.primitives[0].style.color, Color::RED);
    }

    #[test]
    fn test_duplicate_ids_reassigned() {
        let markup = r#"<svg xmlns="http://www.w3.org/2000/svg">
            <g data-layer-id="1" data-layer-name="A"><line id="p2" x1="0" y1="0" x2="1" y2="1"/></g>
            <g data-layer-id="1" data-layer-name="B"><line id="p2" x1="0" y1="0" x2="2" y2="2"/></g>
        </svg>"#;
        let document = deserialize(markup).unwrap();
        let layer_ids: HashSet<_> = document.layers().iter().map(|l| l.id).collect();
        let primitive_ids: HashSet<_> = document.primitives().map(|p| p.id).collect();
        assert_eq!(layer_ids.len(), 2);
        assert_eq!(primitive_ids.len(), 2);
        assert!(!layer_ids.iter().any(|l| primitive_ids.contains(&PrimitiveId(l.0))));
    }

    #[test]
    fn test_hidden_by_visibility_attribute() {
        let markup = r#"<svg><g data-layer-name="Ghost" visibility="hidden"/></svg>"#;
        let document = deserialize(markup).unwrap();
        assert!(!document.layers()[0].visible);
        assert_eq!(document.layers()[0].name, "Ghost");
    }

    #[test]
    fn test_dash_parse() {
        assert_eq!(parse_dash("10, 5"), Some(vec![10.0, 5.0]));
        assert_eq!(parse_dash("none"), None);
    }
}

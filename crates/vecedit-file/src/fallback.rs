//! 占位文档
//!
//! 提取不到任何矢量数据（或远程转换失败）时使用的固定三图层文档：
//! - `converted`: 虚线边框 + 两行居中说明文字
//! - `outline`: 一个闭合矩形路径
//! - `details`: 一个圆和一个小矩形

use crate::format::DeclaredFormat;
use crate::svg::{CANVAS_HEIGHT, CANVAS_WIDTH};
use vecedit_core::document::Document;
use vecedit_core::error::DocumentError;
use vecedit_core::math::Point2;
use vecedit_core::primitive::{Circle, Drawable, Path, Rect, Shape, Text, TextAnchor};
use vecedit_core::properties::{Color, Style};

pub const CONVERTED_LAYER: &str = "converted";
pub const OUTLINE_LAYER: &str = "outline";
pub const DETAILS_LAYER: &str = "details";

/// 生成占位文档
pub fn placeholder_document(format: DeclaredFormat) -> Document {
    match build(format) {
        Ok(document) => document,
        Err(e) => {
            // 新建文档上的图层都未锁定，这里理论上不会失败
            tracing::error!("Failed to build placeholder document: {}", e);
            Document::new()
        }
    }
}

fn build(format: DeclaredFormat) -> Result<Document, DocumentError> {
    let mut document = Document::new();
    let center_x = CANVAS_WIDTH / 2.0;
    let center_y = CANVAS_HEIGHT / 2.0;

    let converted = document.active_layer_id();
    document.rename_layer(converted, CONVERTED_LAYER)?;
    document.add_primitive(
        converted,
        Drawable::new(
            Shape::Rect(Rect::new(Point2::new(50.0, 50.0), 700.0, 500.0)),
            Style::new(Color::GRAY, 2.0).with_dash([10.0, 5.0]),
        ),
    )?;
    document.add_primitive(
        converted,
        Drawable::new(
            Shape::Text(
                Text::new(Point2::new(center_x, center_y - 20.0), format!("{} file converted", format), 24.0)
                    .with_anchor(TextAnchor::Middle),
            ),
            Style::new(Color::DARK_GRAY, 1.0),
        ),
    )?;
    document.add_primitive(
        converted,
        Drawable::new(
            Shape::Text(
                Text::new(
                    Point2::new(center_x, center_y + 20.0),
                    format!("No vector data could be extracted from this {} file", format),
                    14.0,
                )
                .with_anchor(TextAnchor::Middle),
            ),
            Style::new(Color::GRAY, 1.0),
        ),
    )?;

    let outline = document.add_layer(OUTLINE_LAYER);
    document.add_primitive(
        outline,
        Drawable::new(
            Shape::Path(Path::new("M100 100 L700 100 L700 500 L100 500 Z")),
            Style::new(Color::BLACK, 2.0),
        ),
    )?;

    let details = document.add_layer(DETAILS_LAYER);
    document.add_primitive(
        details,
        Drawable::new(
            Shape::Circle(Circle::new(Point2::new(200.0, 200.0), 40.0)),
            Style::new(Color::BLUE, 2.0),
        ),
    )?;
    document.add_primitive(
        details,
        Drawable::new(
            Shape::Rect(Rect::new(Point2::new(550.0, 400.0), 100.0, 60.0)),
            Style::new(Color::RED, 2.0),
        ),
    )?;

    document.set_active_layer(converted)?;
    Ok(document)
}

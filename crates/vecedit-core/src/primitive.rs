//! 图元定义
//!
//! 支持的图元：
//! - 路径 (Path)
//! - 线段 (Line)
//! - 箭头 (Arrow，几何上与线段相同)
//! - 矩形 (Rect)
//! - 圆 (Circle)
//! - 文本 (Text)
//! - 图片 (Image)

use crate::layer::LayerId;
use crate::math::{distance_to_segment, BoundingBox2, Point2};
use crate::path_data;
use crate::properties::Style;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 图元ID，在文档内唯一
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrimitiveId(pub u64);

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// 形状（按类型区分的几何数据）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Path(Path),
    Line(Line),
    Arrow(Line),
    Rect(Rect),
    Circle(Circle),
    Text(Text),
    Image(Image),
}

impl Shape {
    /// 获取形状的包围盒
    pub fn bounding_box(&self) -> BoundingBox2 {
        match self {
            Shape::Path(p) => p.bounding_box(),
            Shape::Line(l) | Shape::Arrow(l) => l.bounding_box(),
            Shape::Rect(r) => r.bounding_box(),
            Shape::Circle(c) => c.bounding_box(),
            Shape::Text(t) => t.bounding_box(),
            Shape::Image(i) => BoundingBox2::from_origin_size(i.origin, i.width, i.height),
        }
    }

    /// 获取类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Path(_) => "path",
            Shape::Line(_) => "line",
            Shape::Arrow(_) => "arrow",
            Shape::Rect(_) => "rect",
            Shape::Circle(_) => "circle",
            Shape::Text(_) => "text",
            Shape::Image(_) => "image",
        }
    }

    /// 命中测试
    ///
    /// 线段/箭头按点到线段距离判断，其余按包围盒判断。
    pub fn hit_test(&self, point: &Point2, tolerance: f64) -> bool {
        match self {
            Shape::Line(l) | Shape::Arrow(l) => l.distance_to_point(point) <= tolerance,
            other => other.bounding_box().contains(point, 0.0),
        }
    }

    /// 整体平移
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Shape::Path(p) => p.data = path_data::translate(&p.data, dx, dy),
            Shape::Line(l) | Shape::Arrow(l) => {
                l.start.x += dx;
                l.start.y += dy;
                l.end.x += dx;
                l.end.y += dy;
            }
            Shape::Rect(r) => {
                r.origin.x += dx;
                r.origin.y += dy;
            }
            Shape::Circle(c) => {
                c.center.x += dx;
                c.center.y += dy;
            }
            Shape::Text(t) => {
                t.position.x += dx;
                t.position.y += dy;
            }
            Shape::Image(i) => {
                i.origin.x += dx;
                i.origin.y += dy;
            }
        }
    }
}

/// 路径
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// SVG 路径数据
    pub data: String,
}

impl Path {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points(path_data::points(&self.data))
    }
}

/// 线段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

impl Line {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// 计算线段长度
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// 计算点到线段的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        distance_to_segment(point, &self.start, &self.end)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points([self.start, self.end])
    }
}

/// 矩形
///
/// 绘制过程中宽高可以为负（从锚点向左上拖动），提交时再规范化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point2,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(origin: Point2, width: f64, height: f64) -> Self {
        Self { origin, width, height }
    }

    /// 规范化为非负宽高
    pub fn normalized(&self) -> Self {
        let bb = self.bounding_box();
        Self::new(bb.min, bb.width(), bb.height())
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_origin_size(self.origin, self.width, self.height)
    }
}

/// 圆
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(
            Point2::new(self.center.x - self.radius, self.center.y - self.radius),
            Point2::new(self.center.x + self.radius, self.center.y + self.radius),
        )
    }
}

/// 文本对齐（对应 text-anchor）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "middle" => TextAnchor::Middle,
            "end" => TextAnchor::End,
            _ => TextAnchor::Start,
        }
    }
}

/// 文本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// 基线位置
    pub position: Point2,
    pub content: String,
    pub font_size: f64,
    pub anchor: TextAnchor,
}

impl Text {
    pub fn new(position: Point2, content: impl Into<String>, font_size: f64) -> Self {
        Self {
            position,
            content: content.into(),
            font_size,
            anchor: TextAnchor::Start,
        }
    }

    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// 估算包围盒（平均字宽按 0.6 倍字号计）
    pub fn bounding_box(&self) -> BoundingBox2 {
        let width = self.content.chars().count().max(1) as f64 * self.font_size * 0.6;
        let left = match self.anchor {
            TextAnchor::Start => self.position.x,
            TextAnchor::Middle => self.position.x - width / 2.0,
            TextAnchor::End => self.position.x - width,
        };
        BoundingBox2::new(
            Point2::new(left, self.position.y - self.font_size),
            Point2::new(left + width, self.position.y),
        )
    }
}

/// 图片引用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub origin: Point2,
    pub width: f64,
    pub height: f64,
    /// 图片 URL
    pub href: String,
}

/// 尚未放入图层的图元（提取器、占位文档的输出）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub shape: Shape,
    pub style: Style,
}

impl Drawable {
    pub fn new(shape: Shape, style: Style) -> Self {
        Self { shape, style }
    }
}

/// 文档中的图元
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub id: PrimitiveId,
    /// 所属图层
    pub layer_id: LayerId,
    pub shape: Shape,
    pub style: Style,
}

impl Primitive {
    pub fn from_drawable(id: PrimitiveId, layer_id: LayerId, drawable: Drawable) -> Self {
        Self {
            id,
            layer_id,
            shape: drawable.shape,
            style: drawable.style,
        }
    }

    pub fn to_drawable(&self) -> Drawable {
        Drawable::new(self.shape.clone(), self.style.clone())
    }
}

//! VecEdit 核心
//!
//! 提供图元、图层、分层文档以及基于快照的撤销/重做。
//!
//! # 架构设计
//!
//! - `Primitive`: 文档中的一个可绘制单元（形状 + 样式 + 所属图层）
//! - `Layer`: 有序的图元集合，带可见/锁定标记
//! - `Document`: 图层栈与活动图层，负责不变量
//! - `DocumentModel`: 文档 + 历史，每次成功修改记录一个快照
//!
//! # 示例
//!
//! ```rust
//! use vecedit_core::prelude::*;
//!
//! let mut model = DocumentModel::new(Document::new());
//! let layer = model.document().active_layer_id();
//! let line = Line::new(Point2::new(10.0, 10.0), Point2::new(50.0, 50.0));
//! model.add_primitive(layer, Drawable::new(Shape::Line(line), Style::default())).unwrap();
//!
//! assert!(model.undo());
//! assert_eq!(model.document().primitive_count(), 0);
//! ```

pub mod document;
pub mod error;
pub mod history;
pub mod layer;
pub mod math;
pub mod model;
pub mod path_data;
pub mod primitive;
pub mod properties;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::document::Document;
    pub use crate::error::DocumentError;
    pub use crate::history::{History, Snapshot};
    pub use crate::layer::{Layer, LayerId};
    pub use crate::math::{BoundingBox2, Point2, Vector2};
    pub use crate::model::DocumentModel;
    pub use crate::primitive::{
        Circle, Drawable, Image, Line, Path, Primitive, PrimitiveId, Rect, Shape, Text, TextAnchor,
    };
    pub use crate::properties::{Color, Style};
}

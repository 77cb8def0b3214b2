//! 图层

use crate::primitive::{Primitive, PrimitiveId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 图层ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// 图层：按绘制顺序排列的图元集合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    /// 绘制顺序，后面的在上
    pub primitives: Vec<Primitive>,
}

impl Layer {
    pub fn new(id: LayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            locked: false,
            primitives: Vec::new(),
        }
    }

    pub fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.iter().find(|p| p.id == id)
    }

    pub fn primitive_mut(&mut self, id: PrimitiveId) -> Option<&mut Primitive> {
        self.primitives.iter_mut().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PrimitiveId) -> bool {
        self.primitives.iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// 可以被编辑器选中/修改（可见且未锁定）
    pub fn is_editable(&self) -> bool {
        self.visible && !self.locked
    }
}

//! 分层文档
//!
//! `Document` 只负责结构和不变量：
//! - 至少有一个图层
//! - 图元的 `layer_id` 始终指向它所在的图层
//! - 锁定图层中的图元不能被修改
//!
//! 这里的操作不记录历史，带撤销的入口见 [`crate::model::DocumentModel`]。

use crate::error::{DocumentError, Result};
use crate::layer::{Layer, LayerId};
use crate::math::Point2;
use crate::primitive::{Drawable, Primitive, PrimitiveId};
use serde::{Deserialize, Serialize};

/// 新建文档时默认图层的名称
pub const DEFAULT_LAYER_NAME: &str = "Layer 1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    layers: Vec<Layer>,
    active_layer: LayerId,
    /// 下一个可用ID（图层与图元共用）
    next_id: u64,
}

impl Document {
    /// 创建只含一个空图层的文档
    pub fn new() -> Self {
        Self::from_layers(Vec::new())
    }

    /// 由已有图层构造
    ///
    /// 图层为空时补一个默认图层；图元的 `layer_id` 会被校正为所在图层；
    /// 最上面的图层成为活动图层。
    pub fn from_layers(layers: Vec<Layer>) -> Self {
        let mut document = Self {
            layers: Vec::new(),
            active_layer: LayerId(0),
            next_id: 1,
        };
        document.replace_layers(layers);
        document
    }

    /// 用一组图层整体替换当前内容（撤销/重做时使用）
    ///
    /// 活动图层仍存在时保持不变，否则切到最上层。ID 分配器只增不减。
    pub fn replace_layers(&mut self, mut layers: Vec<Layer>) {
        let mut max_id = 0;
        for layer in &mut layers {
            max_id = max_id.max(layer.id.0);
            for primitive in &mut layer.primitives {
                primitive.layer_id = layer.id;
                max_id = max_id.max(primitive.id.0);
            }
        }
        self.next_id = self.next_id.max(max_id + 1);
        self.layers = layers;

        if self.layers.is_empty() {
            let id = self.allocate_id();
            self.layers.push(Layer::new(LayerId(id), DEFAULT_LAYER_NAME));
        }

        if !self.layers.iter().any(|l| l.id == self.active_layer) {
            if let Some(top) = self.layers.last() {
                self.active_layer = top.id;
            }
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ========== 查询 ==========

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(DocumentError::LayerNotFound(id))
    }

    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn active_layer_id(&self) -> LayerId {
        self.active_layer
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.layer(self.active_layer)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// 所有图元，按绘制顺序
    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.layers.iter().flat_map(|l| l.primitives.iter())
    }

    pub fn primitive_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    pub fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.layers.iter().find_map(|l| l.primitive(id))
    }

    /// 图元所在图层的位置
    fn locate(&self, id: PrimitiveId) -> Result<usize> {
        self.layers
            .iter()
            .position(|l| l.contains(id))
            .ok_or(DocumentError::PrimitiveNotFound(id))
    }

    /// 命中测试：从最上层的最后一个图元开始，跳过隐藏和锁定图层
    pub fn hit_test(&self, point: &Point2, tolerance: f64) -> Option<PrimitiveId> {
        self.layers
            .iter()
            .rev()
            .filter(|l| l.is_editable())
            .flat_map(|l| l.primitives.iter().rev())
            .find(|p| p.shape.hit_test(point, tolerance))
            .map(|p| p.id)
    }

    // ========== 图层操作 ==========

    /// 在最上层追加新图层并设为活动图层
    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        let id = LayerId(self.allocate_id());
        self.layers.push(Layer::new(id, name));
        self.active_layer = id;
        id
    }

    /// 删除图层；最后一个图层不能删除
    pub fn remove_layer(&mut self, id: LayerId) -> Result<Layer> {
        let index = self
            .layers
            .iter()
            .position(|l| l.id == id)
            .ok_or(DocumentError::LayerNotFound(id))?;
        if self.layers.len() == 1 {
            return Err(DocumentError::LastLayer);
        }

        let removed = self.layers.remove(index);
        if self.active_layer == id {
            let next = index.min(self.layers.len() - 1);
            self.active_layer = self.layers[next].id;
        }
        Ok(removed)
    }

    /// 切换可见性，返回新值
    pub fn toggle_visibility(&mut self, id: LayerId) -> Result<bool> {
        let layer = self.layer_mut(id)?;
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }

    /// 切换锁定，返回新值
    pub fn toggle_lock(&mut self, id: LayerId) -> Result<bool> {
        let layer = self.layer_mut(id)?;
        layer.locked = !layer.locked;
        Ok(layer.locked)
    }

    pub fn rename_layer(&mut self, id: LayerId, name: impl Into<String>) -> Result<()> {
        self.layer_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn set_active_layer(&mut self, id: LayerId) -> Result<()> {
        if self.layer(id).is_none() {
            return Err(DocumentError::LayerNotFound(id));
        }
        self.active_layer = id;
        Ok(())
    }

    // ========== 图元操作 ==========

    /// 向图层追加图元
    pub fn add_primitive(&mut self, layer_id: LayerId, drawable: Drawable) -> Result<PrimitiveId> {
        let layer = self.layer(layer_id).ok_or(DocumentError::LayerNotFound(layer_id))?;
        if layer.locked {
            return Err(DocumentError::LayerLocked(layer_id));
        }

        let id = PrimitiveId(self.allocate_id());
        let layer = self.layer_mut(layer_id)?;
        layer.primitives.push(Primitive::from_drawable(id, layer_id, drawable));
        Ok(id)
    }

    /// 原地修改图元（所在图层锁定时拒绝）
    pub fn update_primitive<F>(&mut self, id: PrimitiveId, f: F) -> Result<()>
    where
        F: FnOnce(&mut Primitive),
    {
        let index = self.locate(id)?;
        let layer = &mut self.layers[index];
        if layer.locked {
            return Err(DocumentError::LayerLocked(layer.id));
        }
        let layer_id = layer.id;
        if let Some(primitive) = layer.primitive_mut(id) {
            f(primitive);
            // 修改闭包不能改变归属
            primitive.id = id;
            primitive.layer_id = layer_id;
        }
        Ok(())
    }

    /// 平移图元；偏移必须是有限值
    pub fn move_primitive(&mut self, id: PrimitiveId, dx: f64, dy: f64) -> Result<()> {
        if !(dx.is_finite() && dy.is_finite()) {
            return Err(DocumentError::InvalidOffset { dx, dy });
        }
        self.update_primitive(id, |p| p.shape.translate(dx, dy))
    }

    pub fn remove_primitive(&mut self, id: PrimitiveId) -> Result<Primitive> {
        let index = self.locate(id)?;
        let layer = &mut self.layers[index];
        if layer.locked {
            return Err(DocumentError::LayerLocked(layer.id));
        }
        let position = layer
            .primitives
            .iter()
            .position(|p| p.id == id)
            .ok_or(DocumentError::PrimitiveNotFound(id))?;
        Ok(layer.primitives.remove(position))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

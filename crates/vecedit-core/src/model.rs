//! 带历史记录的文档模型
//!
//! 所有结构性修改都经过这里：成功后压入一个快照，失败时文档保持不变。
//! 编辑器的实时拖动/缩放走 `*_transient` 方法，结束时调用一次 [`DocumentModel::commit`]。

use crate::document::Document;
use crate::error::Result;
use crate::history::{History, Snapshot};
use crate::layer::{Layer, LayerId};
use crate::primitive::{Drawable, Primitive, PrimitiveId, Shape};

#[derive(Debug, Clone)]
pub struct DocumentModel {
    document: Document,
    history: History,
}

impl DocumentModel {
    /// 接管文档，并把初始状态作为第一个快照
    pub fn new(document: Document) -> Self {
        Self::with_history_depth(document, 0)
    }

    pub fn with_history_depth(document: Document, max_depth: usize) -> Self {
        let mut model = Self {
            document,
            history: History::with_max_depth(max_depth),
        };
        model.commit();
        model
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// 记录当前图层状态
    pub fn commit(&mut self) {
        self.history.push(Snapshot::capture(self.document.layers()));
        tracing::debug!(
            "History snapshot #{} ({} primitives)",
            self.history.position(),
            self.document.primitive_count()
        );
    }

    fn committed<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_ok() {
            self.commit();
        }
        result
    }

    // ========== 图层操作 ==========

    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        let id = self.document.add_layer(name);
        self.commit();
        id
    }

    pub fn remove_layer(&mut self, id: LayerId) -> Result<Layer> {
        let result = self.document.remove_layer(id);
        self.committed(result)
    }

    pub fn toggle_visibility(&mut self, id: LayerId) -> Result<bool> {
        let result = self.document.toggle_visibility(id);
        self.committed(result)
    }

    pub fn toggle_lock(&mut self, id: LayerId) -> Result<bool> {
        let result = self.document.toggle_lock(id);
        self.committed(result)
    }

    pub fn rename_layer(&mut self, id: LayerId, name: impl Into<String>) -> Result<()> {
        let result = self.document.rename_layer(id, name);
        self.committed(result)
    }

    /// 切换活动图层；不改变图层内容，因此不产生快照
    pub fn set_active_layer(&mut self, id: LayerId) -> Result<()> {
        self.document.set_active_layer(id)
    }

    // ========== 图元操作 ==========

    pub fn add_primitive(&mut self, layer_id: LayerId, drawable: Drawable) -> Result<PrimitiveId> {
        let result = self.document.add_primitive(layer_id, drawable);
        self.committed(result)
    }

    pub fn move_primitive(&mut self, id: PrimitiveId, dx: f64, dy: f64) -> Result<()> {
        let result = self.document.move_primitive(id, dx, dy);
        self.committed(result)
    }

    pub fn remove_primitive(&mut self, id: PrimitiveId) -> Result<Primitive> {
        let result = self.document.remove_primitive(id);
        self.committed(result)
    }

    /// 修改文本内容（非文本图元不受影响）
    pub fn set_text_content(&mut self, id: PrimitiveId, content: impl Into<String>) -> Result<()> {
        let content = content.into();
        let result = self.document.update_primitive(id, |p| {
            if let Shape::Text(text) = &mut p.shape {
                text.content = content;
            }
        });
        self.committed(result)
    }

    // ========== 不记录历史的实时修改 ==========

    /// 插入一个正在绘制的图元
    pub fn add_primitive_transient(&mut self, layer_id: LayerId, drawable: Drawable) -> Result<PrimitiveId> {
        self.document.add_primitive(layer_id, drawable)
    }

    pub fn update_transient<F>(&mut self, id: PrimitiveId, f: F) -> Result<()>
    where
        F: FnOnce(&mut Primitive),
    {
        self.document.update_primitive(id, f)
    }

    pub fn move_transient(&mut self, id: PrimitiveId, dx: f64, dy: f64) -> Result<()> {
        self.document.move_primitive(id, dx, dy)
    }

    /// 丢弃未提交的图元（例如零尺寸的绘制、取消的文本）
    pub fn discard_transient(&mut self, id: PrimitiveId) -> Result<Primitive> {
        self.document.remove_primitive(id)
    }

    // ========== 撤销/重做 ==========

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// 撤销；没有可撤销的内容时返回 false
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                let layers = snapshot.to_layers();
                self.document.replace_layers(layers);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                let layers = snapshot.to_layers();
                self.document.replace_layers(layers);
                true
            }
            None => false,
        }
    }
}

impl Default for DocumentModel {
    fn default() -> Self {
        Self::new(Document::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::primitive::{Circle, Text};
    use crate::properties::Style;

    fn circle() -> Drawable {
        Drawable::new(Shape::Circle(Circle::new(Point2::new(10.0, 10.0), 5.0)), Style::default())
    }

    #[test]
    fn test_undo_without_mutations_is_noop() {
        let mut model = DocumentModel::default();
        let before = model.document().clone();
        assert!(!model.undo());
        assert_eq!(model.document(), &before);
    }

    #[test]
    fn test_each_mutation_pushes_one_snapshot() {
        let mut model = DocumentModel::default();
        let layer = model.document().active_layer_id();
        let start = model.history().len();

        let id = model.add_primitive(layer, circle()).unwrap();
        model.move_primitive(id, 1.0, 1.0).unwrap();
        model.add_layer("Top");
        assert_eq!(model.history().len(), start + 3);
    }

    #[test]
    fn test_failed_mutation_pushes_nothing() {
        let mut model = DocumentModel::default();
        let layer = model.document().active_layer_id();
        let start = model.history().len();

        assert!(model.remove_layer(layer).is_err());
        model.toggle_lock(layer).unwrap();
        assert!(model.add_primitive(layer, circle()).unwrap_err().is_validation());
        assert_eq!(model.history().len(), start + 1);
        assert_eq!(model.document().primitive_count(), 0);
    }

    #[test]
    fn test_redo_restores_undone_state() {
        let mut model = DocumentModel::default();
        let layer = model.document().active_layer_id();
        model.add_primitive(layer, circle()).unwrap();
        let after = model.document().layers().to_vec();

        assert!(model.undo());
        assert_eq!(model.document().primitive_count(), 0);
        assert!(model.redo());
        assert_eq!(model.document().layers(), after.as_slice());
    }

    #[test]
    fn test_snapshots_do_not_alias() {
        let mut model = DocumentModel::default();
        let layer = model.document().active_layer_id();
        let id = model.add_primitive(layer, circle()).unwrap();
        let snapshot = model.history().current().cloned().unwrap();

        model.move_transient(id, 100.0, 0.0).unwrap();
        let stored = &snapshot.layers()[0].primitives[0].shape;
        assert_eq!(stored, &Shape::Circle(Circle::new(Point2::new(10.0, 10.0), 5.0)));
    }

    #[test]
    fn test_set_text_content() {
        let mut model = DocumentModel::default();
        let layer = model.document().active_layer_id();
        let text = Drawable::new(Shape::Text(Text::new(Point2::origin(), "Text", 16.0)), Style::default());
        let id = model.add_primitive(layer, text).unwrap();
        model.set_text_content(id, "Hello").unwrap();

        match &model.document().primitive(id).unwrap().shape {
            Shape::Text(t) => assert_eq!(t.content, "Hello"),
            other => panic!("unexpected shape {other:?}"),
        }
    }
}

//! 撤销/重做历史
//!
//! 线性快照栈 + 指针。指针从 -1 开始（尚无快照）；
//! 在中间位置 push 时丢弃指针之后的所有快照。

use crate::layer::Layer;
use std::sync::Arc;

/// 图层列表的不可变深拷贝
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    layers: Arc<[Layer]>,
}

impl Snapshot {
    pub fn capture(layers: &[Layer]) -> Self {
        Self {
            layers: layers.to_vec().into(),
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// 复制出一份可修改的图层列表
    pub fn to_layers(&self) -> Vec<Layer> {
        self.layers.to_vec()
    }
}

/// 快照历史
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    index: isize,
    /// 最大保留数量，0 表示不限
    max_depth: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_max_depth(0)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            index: -1,
            max_depth,
        }
    }

    /// 压入快照，截断 redo 分支
    pub fn push(&mut self, snapshot: Snapshot) {
        let new_len = (self.index + 1) as usize;
        self.snapshots.truncate(new_len);

        self.snapshots.push(snapshot);
        if self.max_depth > 0 && self.snapshots.len() > self.max_depth {
            let overflow = self.snapshots.len() - self.max_depth;
            self.snapshots.drain(..overflow);
        }
        self.index = self.snapshots.len() as isize - 1;
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        (self.index + 1) < self.snapshots.len() as isize
    }

    /// 指针后退一步（已在 0 或为空时不动）
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.can_undo() {
            self.index -= 1;
            self.current()
        } else {
            None
        }
    }

    /// 指针前进一步（已在末尾时不动）
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.can_redo() {
            self.index += 1;
            self.current()
        } else {
            None
        }
    }

    pub fn current(&self) -> Option<&Snapshot> {
        if self.index >= 0 {
            self.snapshots.get(self.index as usize)
        } else {
            None
        }
    }

    /// 当前指针位置，-1 表示空
    pub fn position(&self) -> isize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.index = -1;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerId;

    fn snap(name: &str) -> Snapshot {
        Snapshot::capture(&[Layer::new(LayerId(1), name)])
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::new();
        assert_eq!(history.position(), -1);
        assert!(history.current().is_none());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_undo_stops_at_zero() {
        let mut history = History::new();
        history.push(snap("a"));
        history.push(snap("b"));

        assert_eq!(history.undo().map(|s| s.layers()[0].name.clone()), Some("a".into()));
        assert!(history.undo().is_none());
        assert_eq!(history.position(), 0);
    }

    #[test]
    fn test_push_discards_redo_branch() {
        let mut history = History::new();
        history.push(snap("a"));
        history.push(snap("b"));
        history.undo();
        history.push(snap("c"));

        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.current().map(|s| s.layers()[0].name.as_str()), Some("c"));
    }

    #[test]
    fn test_redo_after_undo() {
        let mut history = History::new();
        history.push(snap("a"));
        history.push(snap("b"));
        let undone = history.current().cloned();
        history.undo();
        assert_eq!(history.redo().cloned(), undone);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_max_depth() {
        let mut history = History::with_max_depth(2);
        history.push(snap("a"));
        history.push(snap("b"));
        history.push(snap("c"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.position(), 1);
        assert_eq!(history.undo().map(|s| s.layers()[0].name.as_str()), Some("b"));
    }
}

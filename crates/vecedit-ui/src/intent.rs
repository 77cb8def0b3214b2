//! 编辑意图
//!
//! 指针/键盘事件先被翻译成意图，再由 [`crate::editor::Editor::dispatch`] 统一处理。
//! 坐标字段注明了坐标系：`at`/`to` 为文档坐标，`screen` 为屏幕坐标。

use crate::state::{PenMode, Tool};
use vecedit_core::layer::LayerId;
use vecedit_core::math::Point2;
use vecedit_core::primitive::PrimitiveId;
use vecedit_core::properties::Color;

/// 拖动绘制的图元种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    Line,
    Freehand,
    Rectangle,
    Circle,
    Arrow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    // 会话
    SetTool(Tool),
    SetPenMode(PenMode),
    SetColor(Color),
    SetStrokeWidth(f64),
    SetFontSize(f64),

    // 绘制
    BeginDraw { kind: DrawKind, at: Point2 },
    UpdateDraw { to: Point2 },
    CommitDraw,

    // 选择与拖动
    Select(PrimitiveId),
    ClearSelection,
    BeginDrag { id: PrimitiveId, screen: Point2 },
    Drag { screen: Point2 },
    EndDrag,
    DeleteSelection,

    // 文本
    BeginText { at: Point2 },
    BeginTextEdit(PrimitiveId),
    EditText(String),
    CommitText,
    CancelText,

    // 视图
    BeginPan { screen: Point2 },
    Pan { screen: Point2 },
    EndPan,
    Zoom { delta: f64 },
    ResetView,

    // 图层
    AddLayer(String),
    RemoveLayer(LayerId),
    ToggleVisibility(LayerId),
    ToggleLock(LayerId),
    RenameLayer { id: LayerId, name: String },
    SetActiveLayer(LayerId),

    // 历史
    Undo,
    Redo,

    /// 放弃当前交互
    Cancel,
}

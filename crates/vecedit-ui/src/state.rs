//! 编辑器会话状态
//!
//! 会话状态不进入历史记录：工具、样式、选择、视图和当前交互。

use crate::view::Viewport;
use serde::{Deserialize, Serialize};
use vecedit_core::math::{Point2, Vector2};
use vecedit_core::primitive::PrimitiveId;
use vecedit_core::properties::Color;

/// 当前工具
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    Pen,
    Text,
    Rectangle,
    Circle,
    Arrow,
}

impl Tool {
    pub const ALL: [Tool; 6] = [Tool::Select, Tool::Pen, Tool::Text, Tool::Rectangle, Tool::Circle, Tool::Arrow];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Pen => "Pen",
            Tool::Text => "Text",
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Arrow => "Arrow",
        }
    }

    pub fn shortcut(&self) -> char {
        match self {
            Tool::Select => 'v',
            Tool::Pen => 'p',
            Tool::Text => 't',
            Tool::Rectangle => 'r',
            Tool::Circle => 'c',
            Tool::Arrow => 'a',
        }
    }

    pub fn from_shortcut(c: char) -> Option<Self> {
        let c = c.to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| t.shortcut() == c)
    }
}

/// 画笔模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenMode {
    /// 拖动画直线
    #[default]
    Line,
    /// 拖动轨迹生成路径
    Freehand,
}

impl PenMode {
    pub fn toggled(&self) -> Self {
        match self {
            PenMode::Line => PenMode::Freehand,
            PenMode::Freehand => PenMode::Line,
        }
    }
}

/// 当前交互，同一时刻只有一个
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// 实时调整正在绘制的图元
    Drawing { id: PrimitiveId, anchor: Point2 },
    /// 拖动图元；`origin` 为上一次的屏幕位置，`moved` 为累计的文档位移
    Dragging {
        id: PrimitiveId,
        origin: Point2,
        moved: Vector2,
    },
    /// 平移视图；`origin` 为上一次的屏幕位置
    Panning { origin: Point2 },
    /// 行内文本编辑；`original` 为 `None` 表示新建的文本
    TextEditing {
        id: PrimitiveId,
        original: Option<String>,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Idle => "idle",
            Interaction::Drawing { .. } => "drawing",
            Interaction::Dragging { .. } => "dragging",
            Interaction::Panning { .. } => "panning",
            Interaction::TextEditing { .. } => "text-editing",
        }
    }
}

/// 编辑器默认设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub color: Color,
    pub stroke_width: f64,
    pub font_size: f64,
    /// 历史记录最大深度，0 表示不限
    pub history_depth: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            stroke_width: 2.0,
            font_size: 16.0,
            history_depth: 0,
        }
    }
}

/// 编辑器会话
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSession {
    pub tool: Tool,
    pub pen_mode: PenMode,
    pub color: Color,
    pub stroke_width: f64,
    pub font_size: f64,
    pub selection: Option<PrimitiveId>,
    pub view: Viewport,
    pub interaction: Interaction,
}

impl EditorSession {
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            tool: Tool::Select,
            pen_mode: PenMode::Line,
            color: settings.color,
            stroke_width: settings.stroke_width,
            font_size: settings.font_size,
            selection: None,
            view: Viewport::new(),
            interaction: Interaction::Idle,
        }
    }

    pub fn is_selected(&self, id: PrimitiveId) -> bool {
        self.selection == Some(id)
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(&EditorSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_shortcuts_unique() {
        for tool in Tool::ALL {
            assert_eq!(Tool::from_shortcut(tool.shortcut()), Some(tool));
            assert_eq!(Tool::from_shortcut(tool.shortcut().to_ascii_uppercase()), Some(tool));
        }
        assert_eq!(Tool::from_shortcut('x'), None);
    }

    #[test]
    fn test_session_defaults_from_settings() {
        let settings = EditorSettings {
            color: Color::RED,
            stroke_width: 4.0,
            font_size: 20.0,
            history_depth: 10,
        };
        let session = EditorSession::new(&settings);
        assert_eq!(session.color, Color::RED);
        assert_eq!(session.stroke_width, 4.0);
        assert_eq!(session.tool, Tool::Select);
        assert!(session.interaction.is_idle());
    }
}

//! 具体的 Action 实现
//!
//! 每个工具对应一个 Action 实现

mod draw_arrow;
mod draw_circle;
mod draw_rectangle;
mod pen;
mod select;
mod text;

pub use draw_arrow::DrawArrowAction;
pub use draw_circle::DrawCircleAction;
pub use draw_rectangle::DrawRectangleAction;
pub use pen::PenAction;
pub use select::{SelectAction, HIT_TOLERANCE};
pub use text::TextAction;

use crate::action::Action;
use crate::state::Tool;

/// 创建指定工具的 Action
pub fn create_action(tool: Tool) -> Box<dyn Action> {
    match tool {
        Tool::Select => Box::new(SelectAction::new()),
        Tool::Pen => Box::new(PenAction::new()),
        Tool::Text => Box::new(TextAction::new()),
        Tool::Rectangle => Box::new(DrawRectangleAction::new()),
        Tool::Circle => Box::new(DrawCircleAction::new()),
        Tool::Arrow => Box::new(DrawArrowAction::new()),
    }
}

//! 绘制矩形 Action
//!
//! 从按下点拖向对角点；宽高在绘制中可以为负，提交时规范化。

use crate::action::{draw_gesture_down, draw_gesture_move, draw_gesture_prompt, draw_gesture_up};
use crate::action::{Action, ActionContext, ActionResult};
use crate::input::MouseButton;
use crate::intent::DrawKind;
use crate::state::{EditorSession, Tool};

pub struct DrawRectangleAction;

impl DrawRectangleAction {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DrawRectangleAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawRectangleAction {
    fn tool(&self) -> Tool {
        Tool::Rectangle
    }

    fn on_pointer_down(&mut self, ctx: &ActionContext, button: MouseButton) -> ActionResult {
        draw_gesture_down(DrawKind::Rectangle, ctx, button)
    }

    fn on_pointer_move(&mut self, ctx: &ActionContext) -> ActionResult {
        draw_gesture_move(ctx)
    }

    fn on_pointer_up(&mut self, ctx: &ActionContext, button: MouseButton) -> ActionResult {
        draw_gesture_up(ctx, button)
    }

    fn get_prompt(&self, session: &EditorSession) -> &str {
        draw_gesture_prompt(session)
    }
}

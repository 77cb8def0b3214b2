//! 绘制箭头 Action

use crate::action::{draw_gesture_down, draw_gesture_move, draw_gesture_prompt, draw_gesture_up};
use crate::action::{Action, ActionContext, ActionResult};
use crate::input::MouseButton;
use crate::intent::DrawKind;
use crate::state::{EditorSession, Tool};

pub struct DrawArrowAction;

impl DrawArrowAction {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DrawArrowAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawArrowAction {
    fn tool(&self) -> Tool {
        Tool::Arrow
    }

    fn on_pointer_down(&mut self, ctx: &ActionContext, button: MouseButton) -> ActionResult {
        draw_gesture_down(DrawKind::Arrow, ctx, button)
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

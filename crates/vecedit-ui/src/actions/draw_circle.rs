//! 绘制圆 Action
//!
//! 按下点为圆心，拖动距离为半径。

use crate::action::{draw_gesture_down, draw_gesture_move, draw_gesture_prompt, draw_gesture_up};
use crate::action::{Action, ActionContext, ActionResult};
use crate::input::MouseButton;
use crate::intent::DrawKind;
use crate::state::{EditorSession, Tool};

pub struct DrawCircleAction;

impl DrawCircleAction {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DrawCircleAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawCircleAction {
    fn tool(&self) -> Tool {
        Tool::Circle
    }

    fn on_pointer_down(&mut self, ctx: &ActionContext, button: MouseButton) -> ActionResult {
        draw_gesture_down(DrawKind::Circle, ctx, button)
    }

    fn on_pointer_move(&mut self, ctx: &ActionContext) -> ActionResult {
        draw_gesture_move(ctx)
    }

    fn on_pointer_up(&mut self, ctx: &ActionContext, button: MouseButton) -> ActionResult {
        draw_gesture_up(ctx, button)
    }

    fn get_prompt(&self, session: &EditorSession) -> &str {
        match session.interaction {
            crate::state::Interaction::Drawing { .. } => "Drag to set the radius",
            _ => draw_gesture_prompt(session),
        }
    }
}

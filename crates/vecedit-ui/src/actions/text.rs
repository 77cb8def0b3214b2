//! 文本 Action
//!
//! 点击处创建占位文本并进入行内编辑；编辑内容、提交和取消由键盘意图驱动。

use crate::action::{Action, ActionContext, ActionResult};
use crate::input::MouseButton;
use crate::intent::Intent;
use crate::state::{EditorSession, Interaction, Tool};

pub struct TextAction;

impl TextAction {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for TextAction {
    fn tool(&self) -> Tool {
        Tool::Text
    }

    fn on_pointer_down(&mut self, ctx: &ActionContext, button: MouseButton) -> ActionResult {
        match button {
            MouseButton::Left => ActionResult::one(Intent::BeginText { at: ctx.point }),
            _ => ActionResult::Continue,
        }
    }

    fn on_pointer_move(&mut self, _ctx: &ActionContext) -> ActionResult {
        ActionResult::Continue
    }

    fn on_pointer_up(&mut self, _ctx: &ActionContext, _button: MouseButton) -> ActionResult {
        ActionResult::Continue
    }

    fn get_prompt(&self, session: &EditorSession) -> &str {
        match session.interaction {
            Interaction::TextEditing { .. } => "Type text, Enter to confirm, Esc to cancel",
            _ => "Click to place text",
        }
    }
}

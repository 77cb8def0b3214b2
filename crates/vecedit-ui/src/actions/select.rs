//! 选择 Action
//!
//! 按下时命中测试：命中则选中并开始拖动，否则清空选择。

use crate::action::{Action, ActionContext, ActionResult};
use crate::input::MouseButton;
use crate::intent::Intent;
use crate::state::{EditorSession, Interaction, Tool};

/// 命中容差（文档单位）
pub const HIT_TOLERANCE: f64 = 5.0;

pub struct SelectAction;

impl SelectAction {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SelectAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for SelectAction {
    fn tool(&self) -> Tool {
        Tool::Select
    }

    fn on_pointer_down(&mut self, ctx: &ActionContext, button: MouseButton) -> ActionResult {
        if button != MouseButton::Left {
            return ActionResult::Continue;
        }
        match ctx.document.hit_test(&ctx.point, HIT_TOLERANCE) {
            Some(id) => ActionResult::Dispatch(vec![
                Intent::Select(id),
                Intent::BeginDrag { id, screen: ctx.screen },
            ]),
            None => ActionResult::one(Intent::ClearSelection),
        }
    }

    fn on_pointer_move(&mut self, ctx: &ActionContext) -> ActionResult {
        match ctx.session.interaction {
            Interaction::Dragging { .. } => ActionResult::one(Intent::Drag { screen: ctx.screen }),
            _ => ActionResult::Continue,
        }
    }

    fn on_pointer_up(&mut self, ctx: &ActionContext, button: MouseButton) -> ActionResult {
        match (&ctx.session.interaction, button) {
            (Interaction::Dragging { .. }, MouseButton::Left) => {
                ActionResult::Dispatch(vec![Intent::Drag { screen: ctx.screen }, Intent::EndDrag])
            }
            _ => ActionResult::Continue,
        }
    }

    fn get_prompt(&self, session: &EditorSession) -> &str {
        match session.interaction {
            Interaction::Dragging { .. } => "Release to place",
            _ => "Select object:",
        }
    }
}

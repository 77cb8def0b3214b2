//! 画笔 Action
//!
//! 直线模式下拖动生成一条线段；自由模式下拖动轨迹生成路径。

use crate::action::{draw_gesture_down, draw_gesture_move, draw_gesture_up};
use crate::action::{Action, ActionContext, ActionResult};
use crate::input::MouseButton;
use crate::intent::DrawKind;
use crate::state::{EditorSession, Interaction, PenMode, Tool};

pub struct PenAction;

impl PenAction {
    pub fn new() -> Self {
        Self
    }

    fn kind(mode: PenMode) -> DrawKind {
        match mode {
            PenMode::Line => DrawKind::Line,
            PenMode::Freehand => DrawKind::Freehand,
        }
    }
}

impl Default for PenAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for PenAction {
    fn tool(&self) -> Tool {
        Tool::Pen
    }

    fn on_pointer_down(&mut self, ctx: &ActionContext, button: MouseButton) -> ActionResult {
        draw_gesture_down(Self::kind(ctx.session.pen_mode), ctx, button)
    }

    fn on_pointer_move(&mut self, ctx: &ActionContext) -> ActionResult {
        draw_gesture_move(ctx)
    }

    fn on_pointer_up(&mut self, ctx: &ActionContext, button: MouseButton) -> ActionResult {
        draw_gesture_up(ctx, button)
    }

    fn get_prompt(&self, session: &EditorSession) -> &str {
        match (&session.interaction, session.pen_mode) {
            (Interaction::Drawing { .. }, _) => "Release to finish the stroke",
            (_, PenMode::Line) => "Drag to draw a line",
            (_, PenMode::Freehand) => "Drag to draw freehand",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::intent::Intent;
    use vecedit_core::document::Document;
    use vecedit_core::math::Point2;
    use vecedit_core::primitive::PrimitiveId;

    fn ctx<'a>(document: &'a Document, session: &'a EditorSession, x: f64, y: f64) -> ActionContext<'a> {
        ActionContext {
            document,
            session,
            point: Point2::new(x, y),
            screen: Point2::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn test_pen_mode_selects_kind() {
        let document = Document::new();
        let mut session = EditorSession::default();
        let mut action = PenAction::new();

        let result = action.on_pointer_down(&ctx(&document, &session, 10.0, 10.0), MouseButton::Left);
        assert_eq!(
            result,
            ActionResult::one(Intent::BeginDraw {
                kind: DrawKind::Line,
                at: Point2::new(10.0, 10.0)
            })
        );

        session.pen_mode = PenMode::Freehand;
        let result = action.on_pointer_down(&ctx(&document, &session, 10.0, 10.0), MouseButton::Left);
        assert!(matches!(
            result.into_intents().as_slice(),
            [Intent::BeginDraw { kind: DrawKind::Freehand, .. }]
        ));
    }

    #[test]
    fn test_move_ignored_when_idle() {
        let document = Document::new();
        let mut session = EditorSession::default();
        let mut action = PenAction::new();
        assert_eq!(action.on_pointer_move(&ctx(&document, &session, 5.0, 5.0)), ActionResult::Continue);

        session.interaction = Interaction::Drawing {
            id: PrimitiveId(2),
            anchor: Point2::origin(),
        };
        assert_eq!(
            action.on_pointer_move(&ctx(&document, &session, 5.0, 5.0)),
            ActionResult::one(Intent::UpdateDraw { to: Point2::new(5.0, 5.0) })
        );
    }

    #[test]
    fn test_right_button_does_nothing() {
        let document = Document::new();
        let session = EditorSession::default();
        let mut action = PenAction::new();
        assert_eq!(
            action.on_pointer_down(&ctx(&document, &session, 0.0, 0.0), MouseButton::Right),
            ActionResult::Continue
        );
    }
}

//! Action 系统
//!
//! 每个工具是一个独立的 Action，把指针事件翻译成意图。
//! Action 本身不修改文档；交互状态保存在 [`EditorSession::interaction`] 中，
//! 由编辑器统一推进。

use crate::input::{Modifiers, MouseButton};
use crate::intent::{DrawKind, Intent};
use crate::state::{EditorSession, Interaction, Tool};
use vecedit_core::document::Document;
use vecedit_core::math::Point2;

/// Action 执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    /// 无需处理
    Continue,
    /// 按顺序分发这些意图
    Dispatch(Vec<Intent>),
}

impl ActionResult {
    pub fn one(intent: Intent) -> Self {
        ActionResult::Dispatch(vec![intent])
    }

    pub fn into_intents(self) -> Vec<Intent> {
        match self {
            ActionResult::Continue => Vec::new(),
            ActionResult::Dispatch(intents) => intents,
        }
    }
}

/// Action 上下文
pub struct ActionContext<'a> {
    pub document: &'a Document,
    pub session: &'a EditorSession,
    /// 指针的文档坐标
    pub point: Point2,
    /// 指针的屏幕坐标
    pub screen: Point2,
    pub modifiers: Modifiers,
}

/// 工具接口
pub trait Action: Send {
    fn tool(&self) -> Tool;

    fn name(&self) -> &str {
        self.tool().name()
    }

    fn on_pointer_down(&mut self, ctx: &ActionContext, button: MouseButton) -> ActionResult;

    /// 只有交互进行中才会被调用
    fn on_pointer_move(&mut self, ctx: &ActionContext) -> ActionResult;

    fn on_pointer_up(&mut self, ctx: &ActionContext, button: MouseButton) -> ActionResult;

    /// 当前状态的提示文本
    fn get_prompt(&self, session: &EditorSession) -> &str;
}

/// 拖动绘制类工具的公共流程：按下锚定，移动调整，松开提交
pub(crate) fn draw_gesture_down(kind: DrawKind, ctx: &ActionContext, button: MouseButton) -> ActionResult {
    match button {
        MouseButton::Left => ActionResult::one(Intent::BeginDraw { kind, at: ctx.point }),
        MouseButton::Right | MouseButton::Middle => ActionResult::Continue,
    }
}

pub(crate) fn draw_gesture_move(ctx: &ActionContext) -> ActionResult {
    match ctx.session.interaction {
        Interaction::Drawing { .. } => ActionResult::one(Intent::UpdateDraw { to: ctx.point }),
        _ => ActionResult::Continue,
    }
}

pub(crate) fn draw_gesture_up(ctx: &ActionContext, button: MouseButton) -> ActionResult {
    match (&ctx.session.interaction, button) {
        (Interaction::Drawing { .. }, MouseButton::Left) => ActionResult::Dispatch(vec![
            Intent::UpdateDraw { to: ctx.point },
            Intent::CommitDraw,
        ]),
        _ => ActionResult::Continue,
    }
}

pub(crate) fn draw_gesture_prompt(session: &EditorSession) -> &'static str {
    match session.interaction {
        Interaction::Drawing { .. } => "Drag to size, release to finish",
        _ => "Press and drag to draw",
    }
}

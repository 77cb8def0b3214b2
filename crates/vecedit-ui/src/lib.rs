//! VecEdit 编辑器控制器
//!
//! 与界面框架无关的编辑状态机：指针/键盘事件经当前工具翻译成意图，
//! 由 [`Editor`] 统一修改文档、会话和视图。

pub mod action;
pub mod actions;
pub mod command_registry;
pub mod editor;
pub mod input;
pub mod intent;
pub mod state;
pub mod view;

pub use action::{Action, ActionContext, ActionResult};
pub use actions::create_action;
pub use command_registry::{CommandKind, CommandRegistry, ScriptError, ScriptStep};
pub use editor::Editor;
pub use input::{Key, Modifiers, MouseButton, PointerEvent, PointerKind};
pub use intent::{DrawKind, Intent};
pub use state::{EditorSession, EditorSettings, Interaction, PenMode, Tool};
pub use view::Viewport;

//! 编辑器控制器
//!
//! `Editor` 独占文档模型和会话状态。输入事件经当前工具的 Action 翻译成意图，
//! 所有修改都经过 [`Editor::dispatch`]。
//!
//! 历史规则：
//! - 绘制/拖动/文本编辑过程中的修改不产生快照
//! - 交互结束时最多提交一个快照（零尺寸绘制、未移动的拖动不提交）
//! - 非法操作返回错误，文档和历史保持不变

use crate::action::{Action, ActionContext};
use crate::actions::create_action;
use crate::input::{Key, Modifiers, PointerEvent, PointerKind};
use crate::intent::{DrawKind, Intent};
use crate::state::{EditorSession, EditorSettings, Interaction, Tool};
use crate::view::WHEEL_ZOOM_STEP;
use vecedit_core::document::Document;
use vecedit_core::error::{DocumentError, Result};
use vecedit_core::layer::Layer;
use vecedit_core::math::{Point2, Vector2, EPSILON};
use vecedit_core::model::DocumentModel;
use vecedit_core::path_data::{self, PathBuilder};
use vecedit_core::primitive::{Circle, Drawable, Line, Path, PrimitiveId, Rect, Shape, Text};
use vecedit_core::properties::Style;
use vecedit_file::svg::serialize;

/// 新建文本的占位内容
pub const PLACEHOLDER_TEXT: &str = "Text";

pub struct Editor {
    model: Option<DocumentModel>,
    session: EditorSession,
    settings: EditorSettings,
    action: Box<dyn Action>,
}

impl Editor {
    pub fn new(settings: EditorSettings) -> Self {
        let session = EditorSession::new(&settings);
        let action = create_action(session.tool);
        Self {
            model: None,
            session,
            settings,
            action,
        }
    }

    // ========== 打开/保存/关闭 ==========

    /// 打开文档；`None` 时新建空白文档
    pub fn open(&mut self, document: Option<Document>) {
        let document = document.unwrap_or_default();
        tracing::info!(
            "Opening document: {} layers, {} primitives",
            document.layer_count(),
            document.primitive_count()
        );
        self.model = Some(DocumentModel::with_history_depth(document, self.settings.history_depth));
        self.reset_session();
    }

    /// 当前图层和对应的 SVG；未打开文档时返回 `None`
    pub fn save(&self) -> Option<(Vec<Layer>, String)> {
        let model = self.model.as_ref()?;
        let layers = model.document().layers().to_vec();
        let svg = serialize(&layers);
        tracing::info!("Saved document: {} layers, {} bytes of SVG", layers.len(), svg.len());
        Some((layers, svg))
    }

    /// 关闭文档，丢弃未保存的修改
    pub fn close(&mut self) {
        if self.model.take().is_some() {
            tracing::info!("Document closed");
        }
        self.reset_session();
    }

    fn reset_session(&mut self) {
        self.session = EditorSession::new(&self.settings);
        self.action = create_action(self.session.tool);
    }

    // ========== 查询 ==========

    pub fn is_open(&self) -> bool {
        self.model.is_some()
    }

    pub fn document(&self) -> Option<&Document> {
        self.model.as_ref().map(DocumentModel::document)
    }

    pub fn model(&self) -> Option<&DocumentModel> {
        self.model.as_ref()
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// 当前工具的提示
    pub fn prompt(&self) -> &str {
        self.action.get_prompt(&self.session)
    }

    // ========== 输入事件 ==========

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<()> {
        let Some(model) = self.model.as_ref() else {
            return Ok(());
        };
        let point = self.session.view.screen_to_document(event.position);
        let ctx = ActionContext {
            document: model.document(),
            session: &self.session,
            point,
            screen: event.position,
            modifiers: event.modifiers,
        };

        let intents = match (event.kind, &self.session.interaction) {
            (PointerKind::Down, Interaction::Idle) if event.is_pan_gesture() => {
                vec![Intent::BeginPan { screen: event.position }]
            }
            (PointerKind::Down, Interaction::Idle) => self.action.on_pointer_down(&ctx, event.button).into_intents(),
            // 在文本框外按下视为失焦：先提交文本，再按正常流程处理
            (PointerKind::Down, Interaction::TextEditing { .. }) => {
                let mut intents = vec![Intent::CommitText];
                if event.is_pan_gesture() {
                    intents.push(Intent::BeginPan { screen: event.position });
                } else {
                    intents.extend(self.action.on_pointer_down(&ctx, event.button).into_intents());
                }
                intents
            }
            (PointerKind::Move, Interaction::Panning { .. }) => vec![Intent::Pan { screen: event.position }],
            (PointerKind::Up, Interaction::Panning { .. }) => vec![Intent::EndPan],
            (PointerKind::Move, Interaction::Drawing { .. } | Interaction::Dragging { .. }) => {
                self.action.on_pointer_move(&ctx).into_intents()
            }
            (PointerKind::Up, Interaction::Drawing { .. } | Interaction::Dragging { .. }) => {
                self.action.on_pointer_up(&ctx, event.button).into_intents()
            }
            // 没有进行中的交互时忽略移动和松开；交互中的第二次按下也忽略
            _ => Vec::new(),
        };

        self.dispatch_all(intents)
    }

    /// 滚轮缩放，`units` 为正时放大
    pub fn handle_wheel(&mut self, units: f64) -> Result<()> {
        self.dispatch(Intent::Zoom {
            delta: units * WHEEL_ZOOM_STEP,
        })
    }

    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> Result<()> {
        match self.key_intent(key, modifiers) {
            Some(intent) => self.dispatch(intent),
            None => Ok(()),
        }
    }

    /// 行内编辑器的内容变化
    pub fn edit_text(&mut self, content: impl Into<String>) -> Result<()> {
        self.dispatch(Intent::EditText(content.into()))
    }

    fn key_intent(&self, key: Key, modifiers: Modifiers) -> Option<Intent> {
        if let Interaction::TextEditing { .. } = self.session.interaction {
            return match key {
                Key::Enter => Some(Intent::CommitText),
                Key::Escape => Some(Intent::CancelText),
                _ => None,
            };
        }

        if modifiers.ctrl {
            return match key {
                Key::Char('z') if modifiers.shift => Some(Intent::Redo),
                Key::Char('z') => Some(Intent::Undo),
                Key::Char('y') => Some(Intent::Redo),
                Key::Char('0') => Some(Intent::ResetView),
                _ => None,
            };
        }

        match key {
            Key::Delete | Key::Backspace => Some(Intent::DeleteSelection),
            Key::Escape => Some(Intent::Cancel),
            Key::Enter => {
                let id = self.session.selection?;
                let is_text = self
                    .document()
                    .and_then(|d| d.primitive(id))
                    .is_some_and(|p| matches!(p.shape, Shape::Text(_)));
                is_text.then_some(Intent::BeginTextEdit(id))
            }
            Key::Char('f') => Some(Intent::SetPenMode(self.session.pen_mode.toggled())),
            Key::Char(c) => Tool::from_shortcut(c).map(Intent::SetTool),
        }
    }

    // ========== 意图处理 ==========

    pub fn dispatch_all(&mut self, intents: impl IntoIterator<Item = Intent>) -> Result<()> {
        for intent in intents {
            self.dispatch(intent)?;
        }
        Ok(())
    }

    pub fn dispatch(&mut self, intent: Intent) -> Result<()> {
        tracing::trace!("Dispatch {:?} ({})", intent, self.session.interaction.name());

        // 只涉及会话的意图
        match intent {
            Intent::SetTool(tool) => {
                self.finish_interaction()?;
                if self.session.tool != tool {
                    self.session.tool = tool;
                    self.action = create_action(tool);
                    tracing::debug!("Tool: {}", tool.name());
                }
                return Ok(());
            }
            Intent::SetPenMode(mode) => {
                self.session.pen_mode = mode;
                return Ok(());
            }
            Intent::SetColor(color) => {
                self.session.color = color;
                return Ok(());
            }
            Intent::SetStrokeWidth(width) => {
                if width.is_finite() && width > 0.0 {
                    self.session.stroke_width = width;
                }
                return Ok(());
            }
            Intent::SetFontSize(size) => {
                if size.is_finite() && size > 0.0 {
                    self.session.font_size = size;
                }
                return Ok(());
            }
            Intent::Zoom { delta } => {
                let zoom = self.session.view.zoom_by(delta);
                tracing::trace!("Zoom: {}", zoom);
                return Ok(());
            }
            Intent::ResetView => {
                self.session.view.reset();
                return Ok(());
            }
            Intent::BeginPan { screen } => {
                if self.session.interaction.is_idle() {
                    self.session.interaction = Interaction::Panning { origin: screen };
                }
                return Ok(());
            }
            Intent::Pan { screen } => {
                if let Interaction::Panning { origin } = &mut self.session.interaction {
                    let delta = screen - *origin;
                    *origin = screen;
                    self.session.view.pan_by(delta);
                }
                return Ok(());
            }
            Intent::EndPan => {
                if let Interaction::Panning { .. } = self.session.interaction {
                    self.session.interaction = Interaction::Idle;
                }
                return Ok(());
            }
            _ => {}
        }

        let Some(model) = self.model.as_mut() else {
            tracing::debug!("No document open, ignoring {:?}", intent);
            return Ok(());
        };
        reduce(model, &mut self.session, intent)
    }

    /// 结束当前交互（切换工具时），按正常路径提交
    fn finish_interaction(&mut self) -> Result<()> {
        let intent = match self.session.interaction {
            Interaction::Idle => return Ok(()),
            Interaction::Drawing { .. } => Intent::CommitDraw,
            Interaction::Dragging { .. } => Intent::EndDrag,
            Interaction::Panning { .. } => Intent::EndPan,
            Interaction::TextEditing { .. } => Intent::CommitText,
        };
        self.dispatch(intent)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

/// 处理需要文档的意图
fn reduce(model: &mut DocumentModel, session: &mut EditorSession, intent: Intent) -> Result<()> {
    // 图层修改会立即提交快照，不能夹在一次手势中间
    let layer_edit = matches!(
        intent,
        Intent::AddLayer(_)
            | Intent::RemoveLayer(_)
            | Intent::ToggleVisibility(_)
            | Intent::ToggleLock(_)
            | Intent::RenameLayer { .. }
            | Intent::SetActiveLayer(_)
    );
    if layer_edit && !session.interaction.is_idle() {
        tracing::debug!("Ignoring {:?} during {}", intent, session.interaction.name());
        return Ok(());
    }

    match intent {
        // ---------- 绘制 ----------
        Intent::BeginDraw { kind, at } => {
            if !session.interaction.is_idle() {
                return Ok(());
            }
            let layer = model.document().active_layer_id();
            let drawable = Drawable::new(initial_shape(kind, at), Style::new(session.color, session.stroke_width));
            let id = model.add_primitive_transient(layer, drawable)?;
            session.interaction = Interaction::Drawing { id, anchor: at };
        }
        Intent::UpdateDraw { to } => {
            if let Interaction::Drawing { id, anchor } = session.interaction {
                model.update_transient(id, |p| resize(&mut p.shape, anchor, to))?;
            }
        }
        Intent::CommitDraw => {
            if let Interaction::Drawing { id, .. } = session.interaction {
                session.interaction = Interaction::Idle;
                let degenerate = model.document().primitive(id).is_none_or(|p| is_degenerate(&p.shape));
                if degenerate {
                    model.discard_transient(id)?;
                    tracing::debug!("Discarded zero-size primitive {}", id);
                } else {
                    model.update_transient(id, |p| {
                        if let Shape::Rect(rect) = &mut p.shape {
                            *rect = rect.normalized();
                        }
                    })?;
                    model.commit();
                }
            }
        }

        // ---------- 选择与拖动 ----------
        Intent::Select(id) => {
            if model.document().primitive(id).is_some() {
                session.selection = Some(id);
            }
        }
        Intent::ClearSelection => session.clear_selection(),
        Intent::BeginDrag { id, screen } => {
            if session.interaction.is_idle() && model.document().primitive(id).is_some() {
                session.interaction = Interaction::Dragging {
                    id,
                    origin: screen,
                    moved: Vector2::zeros(),
                };
            }
        }
        Intent::Drag { screen } => {
            if let Interaction::Dragging { id, origin, moved } = &mut session.interaction {
                let delta = session.view.screen_delta_to_document(screen - *origin);
                if delta.norm() > EPSILON {
                    model.move_transient(*id, delta.x, delta.y)?;
                    *origin = screen;
                    *moved += delta;
                }
            }
        }
        Intent::EndDrag => {
            if let Interaction::Dragging { moved, .. } = session.interaction {
                session.interaction = Interaction::Idle;
                if moved.norm() > EPSILON {
                    model.commit();
                }
            }
        }
        Intent::DeleteSelection => {
            if !session.interaction.is_idle() {
                return Ok(());
            }
            if let Some(id) = session.selection {
                model.remove_primitive(id)?;
                session.selection = None;
            }
        }

        // ---------- 文本 ----------
        Intent::BeginText { at } => {
            if !session.interaction.is_idle() {
                return Ok(());
            }
            let layer = model.document().active_layer_id();
            let text = Text::new(at, PLACEHOLDER_TEXT, session.font_size);
            let id = model.add_primitive_transient(layer, Drawable::new(Shape::Text(text), Style::new(session.color, 1.0)))?;
            session.interaction = Interaction::TextEditing { id, original: None };
            session.selection = Some(id);
        }
        Intent::BeginTextEdit(id) => {
            if !session.interaction.is_idle() {
                return Ok(());
            }
            let document = model.document();
            let primitive = document.primitive(id).ok_or(DocumentError::PrimitiveNotFound(id))?;
            if let Some(layer) = document.layer(primitive.layer_id).filter(|l| l.locked) {
                return Err(DocumentError::LayerLocked(layer.id));
            }
            if let Shape::Text(text) = &primitive.shape {
                session.interaction = Interaction::TextEditing {
                    id,
                    original: Some(text.content.clone()),
                };
            }
        }
        Intent::EditText(content) => {
            if let Interaction::TextEditing { id, .. } = session.interaction {
                model.update_transient(id, |p| set_content(&mut p.shape, content))?;
            }
        }
        Intent::CommitText => {
            if let Some((id, original)) = take_text_editing(session) {
                let content = text_content(model.document(), id);
                match original {
                    None if content.as_deref().is_none_or(|c| c.trim().is_empty()) => {
                        model.discard_transient(id)?;
                        session.selection = None;
                    }
                    None => model.commit(),
                    Some(original) if content.as_deref() != Some(original.as_str()) => model.commit(),
                    Some(_) => {}
                }
            }
        }
        Intent::CancelText => {
            if let Some((id, original)) = take_text_editing(session) {
                match original {
                    None => {
                        model.discard_transient(id)?;
                        session.selection = None;
                    }
                    Some(original) => model.update_transient(id, |p| set_content(&mut p.shape, original))?,
                }
            }
        }

        // ---------- 图层 ----------
        Intent::AddLayer(name) => {
            model.add_layer(name);
        }
        Intent::RemoveLayer(id) => {
            model.remove_layer(id)?;
            prune_selection(model, session);
        }
        Intent::ToggleVisibility(id) => {
            model.toggle_visibility(id)?;
        }
        Intent::ToggleLock(id) => {
            model.toggle_lock(id)?;
        }
        Intent::RenameLayer { id, name } => model.rename_layer(id, name)?,
        Intent::SetActiveLayer(id) => model.set_active_layer(id)?,

        // ---------- 历史 ----------
        Intent::Undo => step_history(model, session, DocumentModel::undo),
        Intent::Redo => step_history(model, session, DocumentModel::redo),

        Intent::Cancel => match std::mem::take(&mut session.interaction) {
            Interaction::Idle => session.clear_selection(),
            Interaction::Drawing { id, .. } => {
                model.discard_transient(id)?;
            }
            Interaction::Dragging { id, moved, .. } => {
                model.move_transient(id, -moved.x, -moved.y)?;
            }
            Interaction::Panning { .. } => {}
            Interaction::TextEditing { id, original } => {
                session.interaction = Interaction::TextEditing { id, original };
                return reduce(model, session, Intent::CancelText);
            }
        },

        // 会话意图已在 Editor::dispatch 中处理
        Intent::SetTool(_)
        | Intent::SetPenMode(_)
        | Intent::SetColor(_)
        | Intent::SetStrokeWidth(_)
        | Intent::SetFontSize(_)
        | Intent::Zoom { .. }
        | Intent::ResetView
        | Intent::BeginPan { .. }
        | Intent::Pan { .. }
        | Intent::EndPan => {}
    }
    Ok(())
}

fn initial_shape(kind: DrawKind, at: Point2) -> Shape {
    match kind {
        DrawKind::Line => Shape::Line(Line::new(at, at)),
        DrawKind::Arrow => Shape::Arrow(Line::new(at, at)),
        DrawKind::Rectangle => Shape::Rect(Rect::new(at, 0.0, 0.0)),
        DrawKind::Circle => Shape::Circle(Circle::new(at, 0.0)),
        DrawKind::Freehand => Shape::Path(Path::new(PathBuilder::new().move_to(at).build())),
    }
}

/// 按新的指针位置调整正在绘制的形状
fn resize(shape: &mut Shape, anchor: Point2, to: Point2) {
    match shape {
        Shape::Line(line) | Shape::Arrow(line) => line.end = to,
        Shape::Rect(rect) => {
            rect.origin = anchor;
            rect.width = to.x - anchor.x;
            rect.height = to.y - anchor.y;
        }
        Shape::Circle(circle) => circle.radius = (to - anchor).norm(),
        Shape::Path(path) => {
            let last = path_data::points(&path.data).last().copied();
            if last != Some(to) {
                let mut builder = PathBuilder::new();
                builder.line_to(to);
                path.data.push(' ');
                path.data.push_str(&builder.build());
            }
        }
        Shape::Text(_) | Shape::Image(_) => {}
    }
}

/// 零尺寸的绘制结果不提交
fn is_degenerate(shape: &Shape) -> bool {
    match shape {
        Shape::Line(line) | Shape::Arrow(line) => line.length() < EPSILON,
        Shape::Rect(rect) => rect.width.abs() < EPSILON || rect.height.abs() < EPSILON,
        Shape::Circle(circle) => circle.radius < EPSILON,
        Shape::Path(path) => {
            let bb = path.bounding_box();
            bb.width() < EPSILON && bb.height() < EPSILON
        }
        Shape::Text(_) | Shape::Image(_) => false,
    }
}

/// 结束文本编辑；当前不是文本编辑时保持原状
fn take_text_editing(session: &mut EditorSession) -> Option<(PrimitiveId, Option<String>)> {
    match std::mem::take(&mut session.interaction) {
        Interaction::TextEditing { id, original } => Some((id, original)),
        other => {
            session.interaction = other;
            None
        }
    }
}

fn set_content(shape: &mut Shape, content: String) {
    if let Shape::Text(text) = shape {
        text.content = content;
    }
}

fn text_content(document: &Document, id: PrimitiveId) -> Option<String> {
    match &document.primitive(id)?.shape {
        Shape::Text(text) => Some(text.content.clone()),
        _ => None,
    }
}

/// 交互进行中忽略撤销/重做
fn step_history(model: &mut DocumentModel, session: &mut EditorSession, step: fn(&mut DocumentModel) -> bool) {
    if !session.interaction.is_idle() {
        tracing::debug!("Ignoring history step during {}", session.interaction.name());
        return;
    }
    if step(model) {
        prune_selection(model, session);
    }
}

/// 选中的图元被删除（撤销、删除图层）后清空选择
fn prune_selection(model: &DocumentModel, session: &mut EditorSession) {
    if let Some(id) = session.selection {
        if model.document().primitive(id).is_none() {
            session.selection = None;
        }
    }
}

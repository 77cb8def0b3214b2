//! 脚本命令注册表
//!
//! 把文本命令（`tool pen`、`drag 10 10 50 50`、`key ctrl+z` 等）解析成编辑器输入，
//! 供命令行演示和批量编辑使用。命令支持完整名、短命令和用户别名，大小写不敏感。
//!
//! 脚本格式：每行一条命令，`#` 开头的行是注释。

use crate::editor::Editor;
use crate::input::{Key, Modifiers, MouseButton, PointerEvent, PointerKind};
use crate::intent::Intent;
use crate::state::{PenMode, Tool};
use std::collections::HashMap;
use thiserror::Error;
use vecedit_core::error::DocumentError;
use vecedit_core::layer::LayerId;
use vecedit_core::properties::Color;

/// 命令种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Tool,
    PenMode,
    Down,
    Move,
    Up,
    Drag,
    Wheel,
    Key,
    Type,
    Color,
    Width,
    FontSize,
    Layer,
    Undo,
    Redo,
    ResetView,
}

/// 解析后的一步输入
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Pointer(PointerEvent),
    /// 按下、经过中点移动、松开
    Drag { from: (f64, f64), to: (f64, f64) },
    Wheel(f64),
    Key(Key, Modifiers),
    Type(String),
    Intent(Intent),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'{}", hint(.suggestions))]
    UnknownCommand {
        line: usize,
        command: String,
        /// 以该输入为前缀的完整命令
        suggestions: Vec<String>,
    },

    #[error("line {line}: {message}")]
    InvalidArgument { line: usize, message: String },

    #[error("line {line}: {source}")]
    Document {
        line: usize,
        #[source]
        source: DocumentError,
    },
}

#[derive(Debug, Clone)]
pub struct CommandRegistry {
    /// 完整命令 -> 种类
    main_commands: HashMap<String, CommandKind>,
    /// 短命令 -> 种类
    short_commands: HashMap<String, CommandKind>,
    /// 用户别名 -> 完整命令
    aliases: HashMap<String, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            main_commands: HashMap::new(),
            short_commands: HashMap::new(),
            aliases: HashMap::new(),
        };
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        self.register(CommandKind::Tool, "TOOL", &["T"]);
        self.register(CommandKind::PenMode, "PENMODE", &["PM"]);
        self.register(CommandKind::Down, "DOWN", &["D", "PRESS"]);
        self.register(CommandKind::Move, "MOVE", &["M"]);
        self.register(CommandKind::Up, "UP", &["U", "RELEASE"]);
        self.register(CommandKind::Drag, "DRAG", &["DR"]);
        self.register(CommandKind::Wheel, "WHEEL", &["W", "ZOOM"]);
        self.register(CommandKind::Key, "KEY", &["K"]);
        self.register(CommandKind::Type, "TYPE", &["TX"]);
        self.register(CommandKind::Color, "COLOR", &["COL"]);
        self.register(CommandKind::Width, "WIDTH", &["SW"]);
        self.register(CommandKind::FontSize, "FONTSIZE", &["FS"]);
        self.register(CommandKind::Layer, "LAYER", &["LA"]);
        self.register(CommandKind::Undo, "UNDO", &["Z"]);
        self.register(CommandKind::Redo, "REDO", &["Y"]);
        self.register(CommandKind::ResetView, "RESETVIEW", &["RV"]);
    }

    pub fn register(&mut self, kind: CommandKind, full_cmd: &str, shortcuts: &[&str]) {
        self.main_commands.insert(full_cmd.to_uppercase(), kind);
        for shortcut in shortcuts {
            self.short_commands.insert(shortcut.to_uppercase(), kind);
        }
    }

    pub fn lookup(&self, input: &str) -> Option<CommandKind> {
        let input_upper = input.to_uppercase();

        if let Some(&kind) = self.main_commands.get(&input_upper) {
            return Some(kind);
        }
        if let Some(&kind) = self.short_commands.get(&input_upper) {
            return Some(kind);
        }
        self.aliases
            .get(&input_upper)
            .and_then(|cmd| self.main_commands.get(cmd).copied())
    }

    /// 以 prefix 开头的完整命令，按字母排序
    pub fn complete(&self, prefix: &str) -> Vec<String> {
        let prefix_upper = prefix.to_uppercase();
        let mut results: Vec<String> = self
            .main_commands
            .keys()
            .filter(|cmd| cmd.starts_with(&prefix_upper))
            .cloned()
            .collect();
        results.sort();
        results
    }

    /// 添加别名；不能覆盖已有命令，目标必须存在
    pub fn add_alias(&mut self, alias: &str, command: &str) -> bool {
        let alias_upper = alias.to_uppercase();
        let command_upper = command.to_uppercase();

        if self.main_commands.contains_key(&alias_upper) || !self.main_commands.contains_key(&command_upper) {
            return false;
        }
        self.aliases.insert(alias_upper, command_upper);
        true
    }

    /// 解析一行；空行和注释返回 `None`
    pub fn parse_line(&self, line_no: usize, line: &str) -> Result<Option<ScriptStep>, ScriptError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        let kind = self.lookup(command).ok_or_else(|| ScriptError::UnknownCommand {
            line: line_no,
            command: command.to_string(),
            suggestions: self.complete(command),
        })?;
        let args: Vec<&str> = rest.split_whitespace().collect();
        let invalid = |message: String| ScriptError::InvalidArgument { line: line_no, message };

        let step = match kind {
            CommandKind::Tool => {
                let name = single(&args).ok_or_else(|| invalid("expected a tool name".into()))?;
                let tool = parse_tool(name).ok_or_else(|| invalid(format!("unknown tool '{name}'")))?;
                ScriptStep::Intent(Intent::SetTool(tool))
            }
            CommandKind::PenMode => {
                let mode = match single(&args).map(str::to_ascii_lowercase).as_deref() {
                    Some("line") => PenMode::Line,
                    Some("freehand") => PenMode::Freehand,
                    _ => return Err(invalid("expected 'line' or 'freehand'".into())),
                };
                ScriptStep::Intent(Intent::SetPenMode(mode))
            }
            CommandKind::Down | CommandKind::Move | CommandKind::Up => {
                let pointer_kind = match kind {
                    CommandKind::Down => PointerKind::Down,
                    CommandKind::Move => PointerKind::Move,
                    _ => PointerKind::Up,
                };
                ScriptStep::Pointer(parse_pointer(pointer_kind, &args).map_err(invalid)?)
            }
            CommandKind::Drag => {
                let values = numbers(&args).map_err(invalid)?;
                match values.as_slice() {
                    [x1, y1, x2, y2] => ScriptStep::Drag {
                        from: (*x1, *y1),
                        to: (*x2, *y2),
                    },
                    _ => return Err(invalid("expected x1 y1 x2 y2".into())),
                }
            }
            CommandKind::Wheel => ScriptStep::Wheel(single_number(&args).map_err(invalid)?),
            CommandKind::Key => {
                let chord = single(&args).ok_or_else(|| invalid("expected a key".into()))?;
                let (key, modifiers) = parse_chord(chord).ok_or_else(|| invalid(format!("unknown key '{chord}'")))?;
                ScriptStep::Key(key, modifiers)
            }
            CommandKind::Type => ScriptStep::Type(rest.to_string()),
            CommandKind::Color => {
                let value = single(&args).ok_or_else(|| invalid("expected a color".into()))?;
                let color = Color::parse(value).ok_or_else(|| invalid(format!("invalid color '{value}'")))?;
                ScriptStep::Intent(Intent::SetColor(color))
            }
            CommandKind::Width => ScriptStep::Intent(Intent::SetStrokeWidth(single_number(&args).map_err(invalid)?)),
            CommandKind::FontSize => ScriptStep::Intent(Intent::SetFontSize(single_number(&args).map_err(invalid)?)),
            CommandKind::Layer => ScriptStep::Intent(parse_layer(&args, rest).map_err(invalid)?),
            CommandKind::Undo => ScriptStep::Intent(Intent::Undo),
            CommandKind::Redo => ScriptStep::Intent(Intent::Redo),
            CommandKind::ResetView => ScriptStep::Intent(Intent::ResetView),
        };
        Ok(Some(step))
    }

    /// 解析整个脚本
    pub fn parse_script(&self, script: &str) -> Result<Vec<(usize, ScriptStep)>, ScriptError> {
        let mut steps = Vec::new();
        for (index, line) in script.lines().enumerate() {
            if let Some(step) = self.parse_line(index + 1, line)? {
                steps.push((index + 1, step));
            }
        }
        Ok(steps)
    }

    /// 在编辑器上执行脚本，返回执行的步数
    ///
    /// 先解析全部行，语法错误时不执行任何一步。
    pub fn run_script(&self, editor: &mut Editor, script: &str) -> Result<usize, ScriptError> {
        let steps = self.parse_script(script)?;
        for (line, step) in &steps {
            tracing::debug!("Script line {}: {:?}", line, step);
            apply(editor, step.clone()).map_err(|source| ScriptError::Document { line: *line, source })?;
        }
        tracing::info!("Executed {} script steps", steps.len());
        Ok(steps.len())
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// 把一步输入交给编辑器
pub fn apply(editor: &mut Editor, step: ScriptStep) -> Result<(), DocumentError> {
    match step {
        ScriptStep::Pointer(event) => editor.handle_pointer(event),
        ScriptStep::Drag { from, to } => {
            let mid = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
            editor.handle_pointer(PointerEvent::down(from.0, from.1))?;
            editor.handle_pointer(PointerEvent::moved(mid.0, mid.1))?;
            editor.handle_pointer(PointerEvent::moved(to.0, to.1))?;
            editor.handle_pointer(PointerEvent::up(to.0, to.1))
        }
        ScriptStep::Wheel(units) => editor.handle_wheel(units),
        ScriptStep::Key(key, modifiers) => editor.handle_key(key, modifiers),
        ScriptStep::Type(content) => editor.edit_text(content),
        ScriptStep::Intent(intent) => editor.dispatch(intent),
    }
}

fn hint(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean {}?)", suggestions.join(", "))
    }
}

fn single<'a>(args: &[&'a str]) -> Option<&'a str> {
    match args {
        [value] => Some(*value),
        _ => None,
    }
}

fn numbers(args: &[&str]) -> Result<Vec<f64>, String> {
    args.iter()
        .map(|a| a.parse::<f64>().map_err(|_| format!("invalid number '{a}'")))
        .collect()
}

fn single_number(args: &[&str]) -> Result<f64, String> {
    match numbers(args)?.as_slice() {
        [value] => Ok(*value),
        _ => Err("expected one number".into()),
    }
}

fn parse_tool(name: &str) -> Option<Tool> {
    let lower = name.to_ascii_lowercase();
    Tool::ALL
        .into_iter()
        .find(|t| t.name().eq_ignore_ascii_case(&lower) || (lower.len() == 1 && lower.starts_with(t.shortcut())))
}

/// `x y [left|right|middle] [ctrl|shift|alt ...]`
fn parse_pointer(kind: PointerKind, args: &[&str]) -> Result<PointerEvent, String> {
    let [x, y, flags @ ..] = args else {
        return Err("expected x y".into());
    };
    let coords = numbers(&[*x, *y])?;
    let mut event = PointerEvent::new(kind, coords[0], coords[1]);
    for flag in flags {
        match flag.to_ascii_lowercase().as_str() {
            "left" => event.button = MouseButton::Left,
            "right" => event.button = MouseButton::Right,
            "middle" => event.button = MouseButton::Middle,
            "ctrl" => event.modifiers.ctrl = true,
            "shift" => event.modifiers.shift = true,
            "alt" => event.modifiers.alt = true,
            other => return Err(format!("unknown pointer flag '{other}'")),
        }
    }
    Ok(event)
}

/// `ctrl+shift+z`、`esc`、`delete`
fn parse_chord(chord: &str) -> Option<(Key, Modifiers)> {
    let mut modifiers = Modifiers::NONE;
    let mut parts: Vec<&str> = chord.split('+').collect();
    let key = Key::parse(parts.pop()?)?;
    for part in parts {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "cmd" => modifiers.ctrl = true,
            "shift" => modifiers.shift = true,
            "alt" => modifiers.alt = true,
            _ => return None,
        }
    }
    Some((key, modifiers))
}

/// `layer add|remove|hide|lock|rename|active ...`
fn parse_layer(args: &[&str], rest: &str) -> Result<Intent, String> {
    let Some((sub, tail)) = args.split_first() else {
        return Err("expected a layer subcommand".into());
    };
    let id = || -> Result<LayerId, String> {
        let raw: &str = tail.first().copied().ok_or("expected a layer id")?;
        let raw = raw.strip_prefix("layer-").unwrap_or(raw);
        raw.parse::<u64>()
            .map(LayerId)
            .map_err(|_| format!("invalid layer id '{raw}'"))
    };
    // 名称取子命令（和图层 id）之后的整段原文，保留空格
    let name_after = |skip: usize| -> Result<String, String> {
        let mut name = rest;
        for _ in 0..skip {
            name = name.split_once(char::is_whitespace).map_or("", |(_, tail)| tail.trim_start());
        }
        let name = name.trim();
        if name.is_empty() {
            Err("expected a layer name".into())
        } else {
            Ok(name.to_string())
        }
    };

    match sub.to_ascii_lowercase().as_str() {
        "add" => Ok(Intent::AddLayer(name_after(1)?)),
        "remove" | "rm" => Ok(Intent::RemoveLayer(id()?)),
        "hide" | "show" | "visibility" => Ok(Intent::ToggleVisibility(id()?)),
        "lock" | "unlock" => Ok(Intent::ToggleLock(id()?)),
        "rename" => Ok(Intent::RenameLayer {
            id: id()?,
            name: name_after(2)?,
        }),
        "active" | "use" => Ok(Intent::SetActiveLayer(id()?)),
        other => Err(format!("unknown layer subcommand '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecedit_core::primitive::Shape;

    #[test]
    fn test_lookup() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.lookup("TOOL"), Some(CommandKind::Tool));
        assert_eq!(registry.lookup("drag"), Some(CommandKind::Drag));
        assert_eq!(registry.lookup("dr"), Some(CommandKind::Drag));
        assert_eq!(registry.lookup("NOTEXIST"), None);
    }

    #[test]
    fn test_complete_and_alias() {
        let mut registry = CommandRegistry::new();
        assert_eq!(registry.complete("RE"), vec!["REDO".to_string(), "RESETVIEW".to_string()]);

        assert!(registry.add_alias("press2", "DOWN"));
        assert_eq!(registry.lookup("PRESS2"), Some(CommandKind::Down));
        assert!(!registry.add_alias("undo", "REDO"));
        assert!(!registry.add_alias("foo", "NOPE"));
        assert_eq!(registry.lookup("foo"), None);
    }

    #[test]
    fn test_parse_lines() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.parse_line(1, "  # comment").unwrap(), None);
        assert_eq!(
            registry.parse_line(1, "tool circle").unwrap(),
            Some(ScriptStep::Intent(Intent::SetTool(Tool::Circle)))
        );
        assert_eq!(
            registry.parse_line(1, "key ctrl+shift+z").unwrap(),
            Some(ScriptStep::Key(Key::Char('z'), Modifiers::CTRL_SHIFT))
        );
        assert_eq!(
            registry.parse_line(1, "down 5 6 middle").unwrap(),
            Some(ScriptStep::Pointer(PointerEvent::down(5.0, 6.0).with_button(MouseButton::Middle)))
        );
        assert_eq!(
            registry.parse_line(1, "layer rename layer-3 Sketch   notes ").unwrap(),
            Some(ScriptStep::Intent(Intent::RenameLayer {
                id: LayerId(3),
                name: "Sketch   notes".into()
            }))
        );
        assert_eq!(
            registry.parse_line(1, "layer add  Two  spaces").unwrap(),
            Some(ScriptStep::Intent(Intent::AddLayer("Two  spaces".into())))
        );
        assert_eq!(
            registry.parse_line(1, "type Hello  world").unwrap(),
            Some(ScriptStep::Type("Hello  world".into()))
        );
    }

    #[test]
    fn test_parse_errors_carry_line() {
        let registry = CommandRegistry::new();
        assert!(matches!(
            registry.parse_line(4, "jump 1 2"),
            Err(ScriptError::UnknownCommand { line: 4, .. })
        ));
        let err = registry.parse_line(5, "re").unwrap_err();
        assert_eq!(err.to_string(), "line 5: unknown command 're' (did you mean REDO, RESETVIEW?)");
        assert!(matches!(
            registry.parse_line(7, "drag 1 2 3"),
            Err(ScriptError::InvalidArgument { line: 7, .. })
        ));
        assert!(matches!(
            registry.parse_line(2, "color notacolor"),
            Err(ScriptError::InvalidArgument { line: 2, .. })
        ));
    }

    #[test]
    fn test_run_script_draws() {
        let registry = CommandRegistry::new();
        let mut editor = Editor::default();
        editor.open(None);

        let script = "\
tool rectangle
drag 10 10 60 40
tool text
down 100 100
type Label
key enter
";
        assert_eq!(registry.run_script(&mut editor, script).unwrap(), 6);

        let document = editor.document().unwrap();
        assert_eq!(document.primitive_count(), 2);
        assert!(document.primitives().any(|p| matches!(&p.shape, Shape::Text(t) if t.content == "Label")));
    }

    #[test]
    fn test_run_script_syntax_error_runs_nothing() {
        let registry = CommandRegistry::new();
        let mut editor = Editor::default();
        editor.open(None);

        let result = registry.run_script(&mut editor, "tool pen\ndrag 0 0 10 10\nbogus\n");
        assert!(matches!(result, Err(ScriptError::UnknownCommand { line: 3, .. })));
        assert_eq!(editor.document().unwrap().primitive_count(), 0);
    }

    #[test]
    fn test_run_script_document_error() {
        let registry = CommandRegistry::new();
        let mut editor = Editor::default();
        editor.open(None);
        let layer = editor.document().unwrap().active_layer_id();

        let script = format!("layer lock {}\ntool pen\ndrag 0 0 10 10\n", layer.0);
        let result = registry.run_script(&mut editor, &script);
        assert!(matches!(
            result,
            Err(ScriptError::Document {
                line: 3,
                source: DocumentError::LayerLocked(_)
            })
        ));
    }
}

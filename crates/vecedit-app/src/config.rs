//! 程序配置
//!
//! JSON 文件，所有字段都有默认值：
//!
//! ```json
//! {
//!   "log_level": "info",
//!   "remote_timeout_ms": 10000,
//!   "remote_command": ["inkscape", "--pipe", "--export-type=svg"],
//!   "editor": { "color": "#000000", "stroke_width": 2, "font_size": 16, "history_depth": 0 },
//!   "script_aliases": { "rect": "DRAG" }
//! }
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use vecedit_core::properties::Color;
use vecedit_file::{CommandConverter, ConvertOptions};
use vecedit_ui::{CommandRegistry, EditorSettings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 默认日志级别（`RUST_LOG` 优先）
    pub log_level: String,
    pub remote_timeout_ms: u64,
    /// 远程转换命令，`{format}` 会被替换为 ai/eps/cdr/pdf；未配置时只做本地提取
    pub remote_command: Option<Vec<String>>,
    pub editor: EditorConfig,
    /// 脚本命令别名 -> 完整命令名
    pub script_aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub color: String,
    pub stroke_width: f64,
    pub font_size: f64,
    pub history_depth: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            remote_timeout_ms: u64::try_from(vecedit_file::pipeline::DEFAULT_REMOTE_TIMEOUT.as_millis())
                .unwrap_or(u64::MAX),
            remote_command: None,
            editor: EditorConfig::default(),
            script_aliases: BTreeMap::new(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        let settings = EditorSettings::default();
        Self {
            color: settings.color.to_hex(),
            stroke_width: settings.stroke_width,
            font_size: settings.font_size,
            history_depth: settings.history_depth,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: AppConfig =
            serde_json::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// 未指定路径时使用默认配置
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        self.editor_settings()?;
        self.registry()?;
        if let Some(command) = &self.remote_command {
            if command.is_empty() {
                bail!("remote_command must name a program");
            }
        }
        Ok(())
    }

    pub fn editor_settings(&self) -> Result<EditorSettings> {
        let editor = &self.editor;
        let color = Color::parse(&editor.color).with_context(|| format!("Invalid editor color '{}'", editor.color))?;
        if !(editor.stroke_width.is_finite() && editor.stroke_width > 0.0) {
            bail!("editor.stroke_width must be positive");
        }
        if !(editor.font_size.is_finite() && editor.font_size > 0.0) {
            bail!("editor.font_size must be positive");
        }
        Ok(EditorSettings {
            color,
            stroke_width: editor.stroke_width,
            font_size: editor.font_size,
            history_depth: editor.history_depth,
        })
    }

    /// 带上配置别名的脚本命令表
    pub fn registry(&self) -> Result<CommandRegistry> {
        let mut registry = CommandRegistry::new();
        for (alias, command) in &self.script_aliases {
            if !registry.add_alias(alias, command) {
                bail!("Invalid script alias '{}' -> '{}'", alias, command);
            }
        }
        Ok(registry)
    }

    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            remote_timeout: Duration::from_millis(self.remote_timeout_ms),
        }
    }

    pub fn remote(&self) -> Option<CommandConverter> {
        self.remote_command.as_deref().and_then(CommandConverter::from_argv)
    }
}

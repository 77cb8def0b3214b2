//! 视觉属性：颜色、线宽、填充、虚线

use serde::{Deserialize, Serialize};
use std::fmt;

/// RGB 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const DARK_GRAY: Color = Color::rgb(51, 51, 51);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` 形式
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// 解析 CSS 颜色：`#rgb`、`#rrggbb` 以及少量常用颜色名
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return match hex.len() {
                3 => {
                    let mut channels = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                    Some(Self::rgb(channels.next()??, channels.next()??, channels.next()??))
                }
                6 => Some(Self::rgb(
                    u8::from_str_radix(hex.get(0..2)?, 16).ok()?,
                    u8::from_str_radix(hex.get(2..4)?, 16).ok()?,
                    u8::from_str_radix(hex.get(4..6)?, 16).ok()?,
                )),
                _ => None,
            };
        }

        match value.to_ascii_lowercase().as_str() {
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "red" => Some(Self::RED),
            "green" => Some(Self::GREEN),
            "blue" => Some(Self::BLUE),
            "gray" | "grey" => Some(Self::GRAY),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// 图元样式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// 描边颜色（文本为填充颜色）
    pub color: Color,
    pub stroke_width: f64,
    /// 填充颜色，`None` 表示不填充
    pub fill: Option<Color>,
    /// 虚线模式（stroke-dasharray）
    pub dash: Option<Vec<f64>>,
}

impl Style {
    pub fn new(color: Color, stroke_width: f64) -> Self {
        Self {
            color,
            stroke_width,
            fill: None,
            dash: None,
        }
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_dash(mut self, dash: impl Into<Vec<f64>>) -> Self {
        self.dash = Some(dash.into());
        self
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(Color::BLACK, 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse() {
        assert_eq!(Color::parse("#ff0000"), Some(Color::RED));
        assert_eq!(Color::parse("#f00"), Some(Color::RED));
        assert_eq!(Color::parse("Black"), Some(Color::BLACK));
        assert_eq!(Color::parse("none"), None);
        assert_eq!(Color::parse("#zzzzzz"), None);
    }

    #[test]
    fn test_color_hex_roundtrip() {
        let c = Color::rgb(18, 52, 86);
        assert_eq!(c.to_hex(), "#123456");
        assert_eq!(Color::parse(&c.to_hex()), Some(c));
    }
}

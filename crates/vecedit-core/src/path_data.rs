//! SVG 路径数据（`d` 属性）的宽松解析与构建
//!
//! 只覆盖编辑器需要的能力：求控制点（用于包围盒）、整体平移、
//! 以及提取器用来拼装 `M/L/C/Z` 序列的构建器。
//! 解析失败的数字直接跳过，不会报错。

use crate::math::Point2;

/// 一条路径命令：命令字母 + 参数
#[derive(Debug, Clone, PartialEq)]
pub struct PathCommand {
    pub command: char,
    pub params: Vec<f64>,
}

impl PathCommand {
    fn is_relative(&self) -> bool {
        self.command.is_ascii_lowercase()
    }
}

/// 每种命令一次消耗的参数个数
fn arity(command: char) -> usize {
    match command.to_ascii_uppercase() {
        'M' | 'L' | 'T' => 2,
        'H' | 'V' => 1,
        'C' => 6,
        'S' | 'Q' => 4,
        'A' => 7,
        _ => 0,
    }
}

/// 解析路径数据
///
/// 连续参数按 SVG 规则拆成多条同类命令（`M` 之后的隐式坐标视为 `L`）。
/// 参数不完整的尾部命令被丢弃。
pub fn parse(data: &str) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    let mut current: Option<char> = None;
    let mut pending: Vec<f64> = Vec::new();

    let flush = |commands: &mut Vec<PathCommand>, command: char, pending: &mut Vec<f64>| {
        let n = arity(command);
        if n == 0 {
            commands.push(PathCommand { command, params: Vec::new() });
            pending.clear();
            return;
        }
        let mut cmd = command;
        for chunk in pending.chunks(n) {
            if chunk.len() == n {
                commands.push(PathCommand { command: cmd, params: chunk.to_vec() });
            }
            cmd = match cmd {
                'M' => 'L',
                'm' => 'l',
                other => other,
            };
        }
        pending.clear();
    };

    let bytes = data.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if "MmLlHhVvCcSsQqTtAaZz".contains(c) {
            match current.take() {
                Some(cmd) => flush(&mut commands, cmd, &mut pending),
                None => pending.clear(),
            }
            current = Some(c);
            i += 1;
        } else if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() {
            let start = i;
            i += 1;
            let mut seen_dot = c == '.';
            while i < bytes.len() {
                let d = bytes[i] as char;
                if d.is_ascii_digit() {
                    i += 1;
                } else if d == '.' && !seen_dot {
                    seen_dot = true;
                    i += 1;
                } else if (d == 'e' || d == 'E') && i + 1 < bytes.len() {
                    i += 1;
                    if bytes[i] == b'-' || bytes[i] == b'+' {
                        i += 1;
                    }
                } else {
                    break;
                }
            }
            if let Ok(value) = data[start..i].parse::<f64>() {
                pending.push(value);
            }
        } else {
            i += 1;
        }
    }
    if let Some(cmd) = current {
        flush(&mut commands, cmd, &mut pending);
    }

    commands
}

/// 把命令序列格式化为 `d` 字符串
pub fn format(commands: &[PathCommand]) -> String {
    commands
        .iter()
        .map(|cmd| {
            if cmd.params.is_empty() {
                cmd.command.to_string()
            } else {
                let params: Vec<String> = cmd.params.iter().map(|v| v.to_string()).collect();
                format!("{}{}", cmd.command, params.join(" "))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 路径经过的所有点（含控制点），绝对坐标
pub fn points(data: &str) -> Vec<Point2> {
    let mut result = Vec::new();
    let mut cursor = Point2::origin();
    let mut subpath_start = Point2::origin();

    for cmd in parse(data) {
        let base = if cmd.is_relative() { cursor } else { Point2::origin() };
        let p = &cmd.params;
        match cmd.command.to_ascii_uppercase() {
            'H' => {
                let x = if cmd.is_relative() { cursor.x + p[0] } else { p[0] };
                cursor = Point2::new(x, cursor.y);
                result.push(cursor);
            }
            'V' => {
                let y = if cmd.is_relative() { cursor.y + p[0] } else { p[0] };
                cursor = Point2::new(cursor.x, y);
                result.push(cursor);
            }
            'A' => {
                cursor = Point2::new(base.x + p[5], base.y + p[6]);
                result.push(cursor);
            }
            'Z' => {
                cursor = subpath_start;
            }
            upper => {
                for pair in p.chunks(2) {
                    result.push(Point2::new(base.x + pair[0], base.y + pair[1]));
                }
                if let Some(last) = result.last() {
                    cursor = *last;
                }
                if upper == 'M' {
                    subpath_start = cursor;
                }
            }
        }
    }

    result
}

/// 平移路径：绝对坐标加偏移，相对命令保持不变（开头的 `m` 除外）
pub fn translate(data: &str, dx: f64, dy: f64) -> String {
    let mut commands = parse(data);
    for (index, cmd) in commands.iter_mut().enumerate() {
        let leading_move = index == 0 && cmd.command == 'm';
        if cmd.is_relative() && !leading_move {
            continue;
        }
        match cmd.command.to_ascii_uppercase() {
            'H' => cmd.params[0] += dx,
            'V' => cmd.params[0] += dy,
            'A' => {
                cmd.params[5] += dx;
                cmd.params[6] += dy;
            }
            'Z' => {}
            _ => {
                for pair in cmd.params.chunks_mut(2) {
                    pair[0] += dx;
                    pair[1] += dy;
                }
            }
        }
    }
    format(&commands)
}

/// 路径数据构建器
#[derive(Debug, Default, Clone)]
pub struct PathBuilder {
    commands: Vec<PathCommand>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Point2) -> &mut Self {
        self.commands.push(PathCommand { command: 'M', params: vec![p.x, p.y] });
        self
    }

    pub fn line_to(&mut self, p: Point2) -> &mut Self {
        self.commands.push(PathCommand { command: 'L', params: vec![p.x, p.y] });
        self
    }

    pub fn cubic_to(&mut self, c1: Point2, c2: Point2, p: Point2) -> &mut Self {
        self.commands.push(PathCommand {
            command: 'C',
            params: vec![c1.x, c1.y, c2.x, c2.y, p.x, p.y],
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        if !matches!(self.commands.last(), Some(c) if c.command == 'Z') {
            self.commands.push(PathCommand { command: 'Z', params: Vec::new() });
        }
        self
    }

    /// 是否只有 moveto（或为空），这种路径不可见
    pub fn is_degenerate(&self) -> bool {
        self.commands.iter().all(|c| matches!(c.command, 'M' | 'Z'))
    }

    pub fn build(&self) -> String {
        format(&self.commands)
    }
}

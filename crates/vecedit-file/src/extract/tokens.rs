//! PostScript / PDF 内容流的宽松分词器
//!
//! 只区分三类记号：
//! - 数字（操作数）
//! - 操作符（字母开头的单词，如 `m`、`lineto`、`re`）
//! - 其他（名字、字符串、数组/字典括号等），遇到时清空操作数栈
//!
//! 看起来像数字但解析失败的记号被单独标出，调用方直接跳过。
//! `%` 到行尾为注释。

/// 记号
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Number(f64),
    Operator(&'a str),
    /// 形似数字但无法解析，例如 `1.2.3`
    Malformed(&'a str),
    Other,
}

/// 分词器
pub struct Tokenizer<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, position: 0 }
    }

    fn bytes(&self) -> &'a [u8] {
        self.source.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.position).copied()
    }

    fn is_delimiter(b: u8) -> bool {
        b.is_ascii_whitespace() || matches!(b, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
    }

    /// 跳过空白和注释
    fn skip_trivia(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b == 0 {
                self.position += 1;
            } else if b == b'%' {
                while let Some(b) = self.peek() {
                    if b == b'\n' || b == b'\r' {
                        break;
                    }
                    self.position += 1;
                }
            } else {
                break;
            }
        }
    }

    /// 读到下一个分隔符为止
    fn read_word(&mut self) -> &'a str {
        let start = self.position;
        while let Some(b) = self.peek() {
            if Self::is_delimiter(b) {
                break;
            }
            self.position += 1;
        }
        // 分隔符都是 ASCII，因此切片边界一定落在字符边界上
        self.source.get(start..self.position).unwrap_or("")
    }

    /// 跳过 `( ... )` 字符串，处理嵌套括号与反斜杠转义
    fn skip_string(&mut self) {
        let mut depth = 0usize;
        while let Some(b) = self.peek() {
            self.position += 1;
            match b {
                b'\\' => self.position += 1,
                b'(' => depth += 1,
                b')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_trivia();
        let b = self.peek()?;

        let token = match b {
            b'(' => {
                self.skip_string();
                Token::Other
            }
            b'<' => {
                // `<<` 字典开始，或 `<...>` 十六进制字符串
                self.position += 1;
                if self.peek() == Some(b'<') {
                    self.position += 1;
                } else {
                    while let Some(b) = self.peek() {
                        self.position += 1;
                        if b == b'>' {
                            break;
                        }
                    }
                }
                Token::Other
            }
            b'/' => {
                self.position += 1;
                self.read_word();
                Token::Other
            }
            b')' | b'>' | b'[' | b']' | b'{' | b'}' => {
                self.position += 1;
                Token::Other
            }
            b'+' | b'-' | b'.' | b'0'..=b'9' => {
                let word = self.read_word();
                match word.parse::<f64>() {
                    Ok(v) if v.is_finite() => Token::Number(v),
                    _ => Token::Malformed(word),
                }
            }
            _ => {
                let word = self.read_word();
                if word.is_empty() {
                    // 非 ASCII 或控制字符，单独消耗一个字节
                    self.position += 1;
                    while !self.source.is_char_boundary(self.position) {
                        self.position += 1;
                    }
                    Token::Other
                } else if word.starts_with(|c: char| c.is_ascii_alphabetic() || c == '\'' || c == '"' || c == '*') {
                    Token::Operator(word)
                } else {
                    Token::Other
                }
            }
        };

        Some(token)
    }
}

//! 页面描述操作符解析（moveto / lineto / re）
//!
//! PostScript 与 PDF 内容流共用：
//! - `x y m` / `x y moveto` 设置当前点
//! - `x y l` / `x y lineto` 从当前点画线段
//! - `x y w h re` 矩形
//!
//! 其他操作符只清空操作数栈。坐标按原样保留，不做 y 轴翻转。

use super::tokens::{Token, Tokenizer};
use super::default_style;
use vecedit_core::math::Point2;
use vecedit_core::primitive::{Drawable, Line, Rect, Shape};

/// 扫描文本中的路径操作符，生成线段与矩形
pub fn parse_operators(text: &str) -> Vec<Drawable> {
    let mut drawables = Vec::new();
    let mut operands: Vec<f64> = Vec::new();
    let mut current: Option<Point2> = None;

    for token in Tokenizer::new(text) {
        match token {
            Token::Number(v) => operands.push(v),
            Token::Malformed(_) => {}
            Token::Other => operands.clear(),
            Token::Operator(op) => {
                match op {
                    "m" | "moveto" => {
                        if let Some(p) = last_point(&operands) {
                            current = Some(p);
                        }
                    }
                    "l" | "lineto" => {
                        if let Some(p) = last_point(&operands) {
                            if let Some(start) = current {
                                if (p - start).norm() > 0.0 {
                                    drawables.push(Drawable::new(
                                        Shape::Line(Line::new(start, p)),
                                        default_style(),
                                    ));
                                }
                            }
                            current = Some(p);
                        }
                    }
                    "re" => {
                        if operands.len() >= 4 {
                            let n = operands.len();
                            let (x, y, w, h) = (operands[n - 4], operands[n - 3], operands[n - 2], operands[n - 1]);
                            if w != 0.0 && h != 0.0 {
                                let rect = Rect::new(Point2::new(x, y), w, h).normalized();
                                drawables.push(Drawable::new(Shape::Rect(rect), default_style()));
                            }
                            current = Some(Point2::new(x, y));
                        }
                    }
                    _ => {}
                }
                operands.clear();
            }
        }
    }

    drawables
}

/// 操作数栈顶的坐标对
fn last_point(operands: &[f64]) -> Option<Point2> {
    match operands {
        [.., x, y] => Some(Point2::new(*x, *y)),
        _ => None,
    }
}

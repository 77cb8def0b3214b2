//! 二进制浮点扫描（最后手段）
//!
//! 把原始字节按 4 字节对齐读作大端 f32，相邻两个值都落在画布范围内时，
//! 视为一个坐标并生成一条短对角线段。信号很弱，只在其他启发式全部失败时使用。

use super::default_style;
use vecedit_core::math::Point2;
use vecedit_core::primitive::{Drawable, Line, Shape};

/// 坐标的合理范围
const MAX_COORDINATE: f32 = 10_000.0;

/// 生成线段的长度（x、y 方向各偏移）
const SEGMENT_LENGTH: f64 = 10.0;

/// 最多生成的线段数
pub const MAX_SEGMENTS: usize = 256;

fn plausible(v: f32) -> bool {
    (v == 0.0 || v.is_normal()) && (0.0..=MAX_COORDINATE).contains(&v)
}

pub fn scan_float_pairs(bytes: &[u8]) -> Vec<Drawable> {
    let mut drawables = Vec::new();
    let mut i = 0;

    while i + 8 <= bytes.len() && drawables.len() < MAX_SEGMENTS {
        let x = f32::from_be_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        let y = f32::from_be_bytes([bytes[i + 4], bytes[i + 5], bytes[i + 6], bytes[i + 7]]);

        if plausible(x) && plausible(y) && !(x == 0.0 && y == 0.0) {
            let start = Point2::new(x as f64, y as f64);
            let end = Point2::new(start.x + SEGMENT_LENGTH, start.y + SEGMENT_LENGTH);
            drawables.push(Drawable::new(Shape::Line(Line::new(start, end)), default_style()));
            i += 8;
        } else {
            i += 4;
        }
    }

    drawables
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn test_pairs_in_range() {
        let bytes = encode(&[100.0, 200.0, -5.0, 300.0, 400.0]);
        let drawables = scan_float_pairs(&bytes);
        // (100,200) 命中；(-5,300) 失败后从 300 开始，(300,400) 命中
        assert_eq!(drawables.len(), 2);
        assert_eq!(
            drawables[1].shape,
            Shape::Line(Line::new(Point2::new(300.0, 400.0), Point2::new(310.0, 410.0)))
        );
    }

    #[test]
    fn test_zero_pairs_and_nan_rejected() {
        let bytes = encode(&[0.0, 0.0, f32::NAN, 1.0, 20_000.0, 1.0]);
        assert!(scan_float_pairs(&bytes).is_empty());
    }

    #[test]
    fn test_cap() {
        let values: Vec<f32> = (0..2000).map(|i| (i % 500) as f32 + 1.0).collect();
        assert_eq!(scan_float_pairs(&encode(&values)).len(), MAX_SEGMENTS);
    }

    #[test]
    fn test_short_buffer() {
        assert!(scan_float_pairs(&[0x42, 0xc8, 0x00]).is_empty());
    }
}

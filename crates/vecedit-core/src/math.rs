//! 数学基础类型
//!
//! 基于 nalgebra，文档坐标统一使用 f64。

use serde::{Deserialize, Serialize};

pub type Point2 = nalgebra::Point2<f64>;
pub type Vector2 = nalgebra::Vector2<f64>;

/// 浮点比较容差
pub const EPSILON: f64 = 1e-9;

/// 轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// 由任意点集构造（点集为空时返回原点处的退化盒）
    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Self::new(Point2::origin(), Point2::origin());
        };

        let mut min = first;
        let mut max = first;
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Self { min, max }
    }

    /// 由左上角和（可能为负的）宽高构造
    pub fn from_origin_size(origin: Point2, width: f64, height: f64) -> Self {
        Self::from_points([origin, Point2::new(origin.x + width, origin.y + height)])
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// 点是否在盒内（含边界，可附加容差）
    pub fn contains(&self, point: &Point2, tolerance: f64) -> bool {
        point.x >= self.min.x - tolerance
            && point.x <= self.max.x + tolerance
            && point.y >= self.min.y - tolerance
            && point.y <= self.max.y + tolerance
    }
}

/// 点到线段的距离
pub fn distance_to_segment(point: &Point2, start: &Point2, end: &Point2) -> f64 {
    let v = end - start;
    let w = point - start;

    let c1 = w.dot(&v);
    if c1 <= 0.0 {
        return (point - start).norm();
    }

    let c2 = v.dot(&v);
    if c2 <= c1 {
        return (point - end).norm();
    }

    let b = c1 / c2;
    let pb = start + v * b;
    (point - pb).norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_from_negative_size() {
        let bb = BoundingBox2::from_origin_size(Point2::new(10.0, 10.0), -5.0, -5.0);
        assert_eq!(bb.min, Point2::new(5.0, 5.0));
        assert_eq!(bb.max, Point2::new(10.0, 10.0));
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert!((distance_to_segment(&Point2::new(5.0, 3.0), &a, &b) - 3.0).abs() < EPSILON);
        assert!((distance_to_segment(&Point2::new(-4.0, 3.0), &a, &b) - 5.0).abs() < EPSILON);
    }
}

//! 视图变换：缩放与平移

use serde::{Deserialize, Serialize};
use vecedit_core::math::{Point2, Vector2};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

/// 滚轮每个单位对应的缩放增量
pub const WHEEL_ZOOM_STEP: f64 = 0.01;

/// 屏幕坐标 = 文档坐标 × zoom + pan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Vector2,
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan: Vector2::zeros(),
        }
    }

    /// 调整缩放并钳制到 [MIN_ZOOM, MAX_ZOOM]，返回新值
    pub fn zoom_by(&mut self, delta: f64) -> f64 {
        if delta.is_finite() {
            self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        }
        self.zoom
    }

    /// 滚轮缩放
    pub fn wheel(&mut self, units: f64) -> f64 {
        self.zoom_by(units * WHEEL_ZOOM_STEP)
    }

    pub fn pan_by(&mut self, delta: Vector2) {
        self.pan += delta;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn screen_to_document(&self, screen: Point2) -> Point2 {
        Point2::from((screen.coords - self.pan) / self.zoom)
    }

    pub fn document_to_screen(&self, point: Point2) -> Point2 {
        Point2::from(point.coords * self.zoom + self.pan)
    }

    /// 屏幕上的位移换算为文档位移
    pub fn screen_delta_to_document(&self, delta: Vector2) -> Vector2 {
        delta / self.zoom
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_accumulates() {
        let mut view = Viewport::new();
        for _ in 0..3 {
            view.wheel(5.0);
        }
        assert!((view.zoom - 1.15).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut view = Viewport::new();
        for _ in 0..1000 {
            view.wheel(5.0);
        }
        assert_eq!(view.zoom, MAX_ZOOM);
        view.zoom_by(-100.0);
        assert_eq!(view.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_transform_round_trip() {
        let mut view = Viewport::new();
        view.zoom_by(1.0);
        view.pan_by(Vector2::new(40.0, -20.0));

        let screen = Point2::new(240.0, 180.0);
        let doc = view.screen_to_document(screen);
        assert_eq!(doc, Point2::new(100.0, 100.0));
        assert_eq!(view.document_to_screen(doc), screen);
    }

    #[test]
    fn test_reset() {
        let mut view = Viewport::new();
        view.wheel(30.0);
        view.pan_by(Vector2::new(5.0, 5.0));
        view.reset();
        assert_eq!(view, Viewport::new());
    }
}

//! Canvas-to-screen mapping for a zoomed, offset page.

use crate::background::CanvasSize;
use kurbo::{Affine, Point, Rect, Vec2};

/// Explicit transform context threaded through input handling and rendering.
///
/// `origin` is where the page's top-left corner sits on screen, `scale` is the
/// zoom factor (1.0 = 100%), and `size` is the page size in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub origin: Point,
    pub scale: f64,
    pub size: CanvasSize,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self::new(Point::ZERO, 1.0, CanvasSize::default())
    }
}

impl CanvasTransform {
    pub fn new(origin: Point, scale: f64, size: CanvasSize) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Self { origin, scale, size }
    }

    /// Context for a given zoom percentage.
    pub fn from_zoom(origin: Point, zoom_percent: u32, size: CanvasSize) -> Self {
        Self::new(origin, zoom_percent as f64 / 100.0, size)
    }

    /// Canvas coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.origin.to_vec2()) * Affine::scale(self.scale)
    }

    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.origin.to_vec2())
    }

    pub fn to_canvas(&self, screen: Point) -> Point {
        self.inverse_transform() * screen
    }

    pub fn to_screen(&self, canvas: Point) -> Point {
        self.transform() * canvas
    }

    /// Convert a screen-space distance to canvas units.
    pub fn delta_to_canvas(&self, delta: Vec2) -> Vec2 {
        delta / self.scale
    }

    /// Page rectangle in screen coordinates.
    pub fn page_rect(&self) -> Rect {
        self.transform().transform_rect_bbox(self.size.to_rect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let ctx = CanvasTransform::default();
        let p = Point::new(12.0, 34.0);
        assert_eq!(ctx.to_canvas(p), p);
    }

    #[test]
    fn test_zoom_is_divided_out() {
        let ctx = CanvasTransform::from_zoom(Point::new(50.0, 20.0), 200, CanvasSize::default());
        let canvas = ctx.to_canvas(Point::new(250.0, 220.0));
        assert!((canvas.x - 100.0).abs() < 1e-10);
        assert!((canvas.y - 100.0).abs() < 1e-10);
        let back = ctx.to_screen(canvas);
        assert!((back.x - 250.0).abs() < 1e-10);
        assert!((back.y - 220.0).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_scale_falls_back() {
        let ctx = CanvasTransform::new(Point::ZERO, 0.0, CanvasSize::default());
        assert_eq!(ctx.scale, 1.0);
    }

    #[test]
    fn test_page_rect() {
        let ctx = CanvasTransform::new(Point::new(10.0, 10.0), 0.5, CanvasSize::new(800, 600));
        assert_eq!(ctx.page_rect(), Rect::new(10.0, 10.0, 410.0, 310.0));
    }
}

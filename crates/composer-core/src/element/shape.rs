//! Fill and stroke styling for geometric elements.

use super::Rgba;
use serde::{Deserialize, Serialize};

fn default_opacity() -> f64 {
    1.0
}

fn default_stroke_width() -> f64 {
    2.0
}

/// Style shared by rectangles, circles, lines and triangles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    #[serde(default = "ShapeStyle::default_fill")]
    pub fill_color: Rgba,
    #[serde(default)]
    pub stroke_color: Rgba,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Opacity (0.0 - 1.0).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill_color: Self::default_fill(),
            stroke_color: Rgba::BLACK,
            stroke_width: default_stroke_width(),
            opacity: default_opacity(),
        }
    }
}

impl ShapeStyle {
    fn default_fill() -> Rgba {
        Rgba::TRANSPARENT
    }

    pub fn new(fill_color: Rgba, stroke_color: Rgba, stroke_width: f64) -> Self {
        Self {
            fill_color,
            stroke_color,
            stroke_width,
            opacity: 1.0,
        }
    }

    pub fn rectangle() -> Self {
        Self::new(Rgba::rgb(0x34, 0x98, 0xdb), Rgba::rgb(0x29, 0x80, 0xb9), 2.0)
    }

    pub fn circle() -> Self {
        Self::new(Rgba::rgb(0xe7, 0x4c, 0x3c), Rgba::rgb(0xc0, 0x39, 0x2b), 2.0)
    }

    pub fn line() -> Self {
        Self::new(Rgba::TRANSPARENT, Rgba::rgb(0x2c, 0x3e, 0x50), 3.0)
    }

    pub fn triangle() -> Self {
        Self::new(Rgba::rgb(0xf3, 0x9c, 0x12), Rgba::rgb(0xe6, 0x7e, 0x22), 2.0)
    }

    /// Whether a stroke would produce visible output.
    pub fn has_stroke(&self) -> bool {
        self.stroke_width > 0.0 && !self.stroke_color.is_transparent()
    }

    pub fn has_fill(&self) -> bool {
        !self.fill_color.is_transparent()
    }

    pub(crate) fn normalize(&mut self) {
        self.opacity = if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            self.stroke_width = 0.0;
        }
    }
}

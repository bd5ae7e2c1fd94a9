//! Canvas metadata: page size, presets and background fill.

use crate::element::Rgba;
use kurbo::{Rect, Size};
use serde::{Deserialize, Deserializer, Serialize};

/// Fixed page size of the composition, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    pub fn to_rect(self) -> Rect {
        self.to_size().to_rect()
    }
}

/// Named page sizes offered when creating a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasPreset {
    A4,
    A3,
    PosterSmall,
    PosterMedium,
    PosterLarge,
    SquareSmall,
    SquareMedium,
    Banner,
    Social,
    PhoneWallpaper,
}

impl CanvasPreset {
    pub fn all() -> &'static [CanvasPreset] {
        &[
            CanvasPreset::A4,
            CanvasPreset::A3,
            CanvasPreset::PosterSmall,
            CanvasPreset::PosterMedium,
            CanvasPreset::PosterLarge,
            CanvasPreset::SquareSmall,
            CanvasPreset::SquareMedium,
            CanvasPreset::Banner,
            CanvasPreset::Social,
            CanvasPreset::PhoneWallpaper,
        ]
    }

    pub fn size(self) -> CanvasSize {
        match self {
            CanvasPreset::A4 => CanvasSize::new(794, 1123),
            CanvasPreset::A3 => CanvasSize::new(1123, 1587),
            CanvasPreset::PosterSmall => CanvasSize::new(600, 800),
            CanvasPreset::PosterMedium => CanvasSize::new(800, 1200),
            CanvasPreset::PosterLarge => CanvasSize::new(1200, 1800),
            CanvasPreset::SquareSmall => CanvasSize::new(600, 600),
            CanvasPreset::SquareMedium => CanvasSize::new(800, 800),
            CanvasPreset::Banner => CanvasSize::new(1200, 400),
            CanvasPreset::Social => CanvasSize::new(1080, 1080),
            CanvasPreset::PhoneWallpaper => CanvasSize::new(750, 1334),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CanvasPreset::A4 => "A4",
            CanvasPreset::A3 => "A3",
            CanvasPreset::PosterSmall => "Poster (small)",
            CanvasPreset::PosterMedium => "Poster (medium)",
            CanvasPreset::PosterLarge => "Poster (large)",
            CanvasPreset::SquareSmall => "Square (small)",
            CanvasPreset::SquareMedium => "Square (medium)",
            CanvasPreset::Banner => "Banner",
            CanvasPreset::Social => "Social post",
            CanvasPreset::PhoneWallpaper => "Phone wallpaper",
        }
    }
}

/// Direction of a two-stop linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GradientDirection {
    #[default]
    #[serde(rename = "to bottom")]
    ToBottom,
    #[serde(rename = "to top")]
    ToTop,
    #[serde(rename = "to right")]
    ToRight,
    #[serde(rename = "to left")]
    ToLeft,
}

impl GradientDirection {
    /// Start and end points of the gradient axis inside `rect`.
    pub fn endpoints(self, rect: Rect) -> (kurbo::Point, kurbo::Point) {
        use kurbo::Point;
        match self {
            GradientDirection::ToBottom => (Point::new(rect.x0, rect.y0), Point::new(rect.x0, rect.y1)),
            GradientDirection::ToTop => (Point::new(rect.x0, rect.y1), Point::new(rect.x0, rect.y0)),
            GradientDirection::ToRight => (Point::new(rect.x0, rect.y0), Point::new(rect.x1, rect.y0)),
            GradientDirection::ToLeft => (Point::new(rect.x1, rect.y0), Point::new(rect.x0, rect.y0)),
        }
    }
}

/// How a background image covers the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    #[default]
    Cover,
    Contain,
    Repeat,
}

fn default_gradient() -> [Rgba; 2] {
    [Rgba::WHITE, Rgba::rgb(0xf0, 0xf0, 0xf0)]
}

fn default_solid() -> Rgba {
    Rgba::WHITE
}

/// Page background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Background {
    Solid {
        #[serde(default = "default_solid")]
        color: Rgba,
    },
    Gradient {
        #[serde(rename = "gradientColors", default = "default_gradient")]
        colors: [Rgba; 2],
        #[serde(rename = "gradientDirection", default)]
        direction: GradientDirection,
    },
    Image {
        #[serde(rename = "imageUrl", default)]
        url: Option<String>,
        #[serde(rename = "imageMode", default)]
        mode: ImageMode,
    },
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid { color: Rgba::WHITE }
    }
}

impl Background {
    pub fn solid(color: Rgba) -> Self {
        Background::Solid { color }
    }

    /// Accepts both the tagged form and the legacy bare color string.
    pub fn deserialize_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Legacy(String),
            Tagged(Background),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Tagged(bg) => Ok(bg),
            Wire::Legacy(s) => match Rgba::parse(&s) {
                Some(color) => Ok(Background::Solid { color }),
                None => {
                    log::warn!("Unrecognized legacy background `{}`, using white", s);
                    Ok(Background::default())
                }
            },
        }
    }
}

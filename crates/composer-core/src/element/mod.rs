//! Element definitions for the composition canvas.

mod color;
mod image;
mod patch;
mod shape;
mod text;

pub use color::Rgba;
pub use image::{ImageFormat, ImageProps, decode_data_url, encode_data_url, fit_within};
pub use patch::ElementPatch;
pub use shape::ShapeStyle;
pub use text::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_TEXT_CONTENT, FONT_FAMILIES, FontStyle,
    FontWeight, TextAlign, TextDecoration, TextProps,
};

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Smallest width or height any element may have.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;

/// Default top-left position for newly added elements.
pub const DEFAULT_POSITION: Point = Point::new(100.0, 100.0);

/// Stable element identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The six element kinds, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Text,
    Image,
    Rectangle,
    Circle,
    Line,
    Triangle,
}

impl ElementType {
    pub fn name(self) -> &'static str {
        match self {
            ElementType::Text => "text",
            ElementType::Image => "image",
            ElementType::Rectangle => "rectangle",
            ElementType::Circle => "circle",
            ElementType::Line => "line",
            ElementType::Triangle => "triangle",
        }
    }

    pub fn all() -> &'static [ElementType] {
        &[
            ElementType::Text,
            ElementType::Image,
            ElementType::Rectangle,
            ElementType::Circle,
            ElementType::Line,
            ElementType::Triangle,
        ]
    }

    /// Whether this kind carries a [`ShapeStyle`].
    pub fn is_shape(self) -> bool {
        matches!(
            self,
            ElementType::Rectangle | ElementType::Circle | ElementType::Line | ElementType::Triangle
        )
    }
}

/// Kind-specific payload of an element, tagged by `"type"` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextProps),
    Image(ImageProps),
    Rectangle(ShapeStyle),
    Circle(ShapeStyle),
    Line(ShapeStyle),
    Triangle(ShapeStyle),
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Text(_) => ElementType::Text,
            ElementKind::Image(_) => ElementType::Image,
            ElementKind::Rectangle(_) => ElementType::Rectangle,
            ElementKind::Circle(_) => ElementType::Circle,
            ElementKind::Line(_) => ElementType::Line,
            ElementKind::Triangle(_) => ElementType::Triangle,
        }
    }

    pub fn shape_style(&self) -> Option<&ShapeStyle> {
        match self {
            ElementKind::Rectangle(s)
            | ElementKind::Circle(s)
            | ElementKind::Line(s)
            | ElementKind::Triangle(s) => Some(s),
            ElementKind::Text(_) | ElementKind::Image(_) => None,
        }
    }

    pub fn shape_style_mut(&mut self) -> Option<&mut ShapeStyle> {
        match self {
            ElementKind::Rectangle(s)
            | ElementKind::Circle(s)
            | ElementKind::Line(s)
            | ElementKind::Triangle(s) => Some(s),
            ElementKind::Text(_) | ElementKind::Image(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextProps> {
        match self {
            ElementKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextProps> {
        match self {
            ElementKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageProps> {
        match self {
            ElementKind::Image(i) => Some(i),
            _ => None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A placed element: common geometry plus a kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Top-left corner in canvas units.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees about the element center, in `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub kind: ElementKind,
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 { 0.0 } else { r }
}

impl Element {
    /// Create an element at the default position with the given size.
    pub fn new(kind: ElementKind, width: f64, height: f64) -> Self {
        let mut element = Self {
            id: ElementId::new(),
            x: DEFAULT_POSITION.x,
            y: DEFAULT_POSITION.y,
            width,
            height,
            rotation: 0.0,
            visible: true,
            locked: false,
            kind,
        };
        element.normalize();
        element
    }

    pub fn text(props: TextProps) -> Self {
        Self::new(ElementKind::Text(props), 200.0, 50.0)
    }

    pub fn rectangle() -> Self {
        Self::new(ElementKind::Rectangle(ShapeStyle::rectangle()), 200.0, 150.0)
    }

    pub fn circle() -> Self {
        Self::new(ElementKind::Circle(ShapeStyle::circle()), 150.0, 150.0)
    }

    /// A horizontal line. The requested 2-unit height is raised to the size floor.
    pub fn line() -> Self {
        Self::new(ElementKind::Line(ShapeStyle::line()), 200.0, 2.0)
    }

    pub fn triangle() -> Self {
        Self::new(ElementKind::Triangle(ShapeStyle::triangle()), 150.0, 130.0)
    }

    pub fn image(props: ImageProps, width: f64, height: f64) -> Self {
        Self::new(ElementKind::Image(props), width, height)
    }

    /// Default element for any kind that needs no external payload.
    pub fn with_defaults(ty: ElementType) -> Option<Self> {
        match ty {
            ElementType::Text => Some(Self::text(TextProps::default())),
            ElementType::Rectangle => Some(Self::rectangle()),
            ElementType::Circle => Some(Self::circle()),
            ElementType::Line => Some(Self::line()),
            ElementType::Triangle => Some(Self::triangle()),
            ElementType::Image => None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self.normalize();
        self
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Opacity applied when painting. Only shapes carry their own opacity.
    pub fn opacity(&self) -> f64 {
        self.kind.shape_style().map_or(1.0, |s| s.opacity)
    }

    /// Whether pointer gestures may start on this element.
    pub fn is_interactive(&self) -> bool {
        self.visible && !self.locked
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Unrotated bounding box.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Map element-local coordinates (origin at top-left, unrotated) to canvas
    /// coordinates, rotating about the element center.
    pub fn local_transform(&self) -> Affine {
        let half = Vec2::new(self.width / 2.0, self.height / 2.0);
        Affine::translate(self.center().to_vec2())
            * Affine::rotate(self.rotation.to_radians())
            * Affine::translate(-half)
    }

    /// Axis-aligned bounds of the rotated box.
    pub fn rotated_bounds(&self) -> Rect {
        if self.rotation == 0.0 {
            return self.bounds();
        }
        self.local_transform()
            .transform_rect_bbox(Rect::new(0.0, 0.0, self.width, self.height))
    }

    /// Hit test in canvas coordinates, honoring rotation.
    pub fn contains(&self, point: Point) -> bool {
        let local = self.local_transform().inverse() * point;
        local.x >= 0.0 && local.y >= 0.0 && local.x <= self.width && local.y <= self.height
    }

    /// Copy with a fresh id, shifted by `offset`.
    pub fn duplicate(&self, offset: Vec2) -> Self {
        Self {
            id: ElementId::new(),
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..self.clone()
        }
    }

    /// Enforce geometric and style invariants, clamping out-of-range values.
    pub fn normalize(&mut self) {
        self.normalize_with(MIN_ELEMENT_SIZE);
    }

    pub(crate) fn normalize_with(&mut self, min_size: f64) {
        if !self.x.is_finite() {
            self.x = 0.0;
        }
        if !self.y.is_finite() {
            self.y = 0.0;
        }
        self.width = clamp_size(self.width, min_size);
        self.height = clamp_size(self.height, min_size);
        self.rotation = normalize_rotation(self.rotation);
        match &mut self.kind {
            ElementKind::Text(t) => t.normalize(),
            ElementKind::Image(_) => {}
            ElementKind::Rectangle(s)
            | ElementKind::Circle(s)
            | ElementKind::Line(s)
            | ElementKind::Triangle(s) => s.normalize(),
        }
    }
}

fn clamp_size(value: f64, min_size: f64) -> f64 {
    if value.is_finite() { value.max(min_size) } else { min_size }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_kind() {
        let rect = Element::rectangle();
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (100.0, 100.0, 200.0, 150.0));
        assert_eq!(rect.kind.shape_style().unwrap().fill_color, Rgba::rgb(0x34, 0x98, 0xdb));
        assert!(rect.visible);
        assert!(!rect.locked);

        let line = Element::line();
        assert_eq!(line.height, MIN_ELEMENT_SIZE);
        assert_eq!(line.kind.shape_style().unwrap().stroke_width, 3.0);

        let text = Element::with_defaults(ElementType::Text).unwrap();
        assert_eq!(text.kind.as_text().unwrap().content, DEFAULT_TEXT_CONTENT);
        assert!(Element::with_defaults(ElementType::Image).is_none());
    }

    #[test]
    fn test_normalize_clamps_geometry() {
        let mut el = Element::rectangle();
        el.width = 3.0;
        el.height = f64::NAN;
        el.rotation = -90.0;
        el.normalize();
        assert_eq!(el.width, 10.0);
        assert_eq!(el.height, 10.0);
        assert_eq!(el.rotation, 270.0);
    }

    #[test]
    fn test_normalize_rotation_range() {
        assert_eq!(normalize_rotation(360.0), 0.0);
        assert_eq!(normalize_rotation(725.0), 5.0);
        assert_eq!(normalize_rotation(-1e-20), 0.0);
        for deg in [-720.5, -1.0, 0.0, 359.999, 1e9] {
            let r = normalize_rotation(deg);
            assert!((0.0..360.0).contains(&r), "{deg} -> {r}");
        }
    }

    #[test]
    fn test_contains_honors_rotation() {
        let el = Element::rectangle().at(0.0, 0.0).sized(100.0, 20.0);
        assert!(el.contains(Point::new(90.0, 10.0)));
        assert!(!el.contains(Point::new(50.0, 50.0)));

        let mut rotated = el.clone();
        rotated.rotation = 90.0;
        // Now spans x 40..60, y -40..60 around center (50, 10)
        assert!(!rotated.contains(Point::new(90.0, 10.0)));
        assert!(rotated.contains(Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_serde_shape_is_flat_and_tagged() {
        let el = Element::circle();
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["type"], "circle");
        assert_eq!(json["fillColor"], "#e74c3c");
        assert_eq!(json["width"], 150.0);
        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn test_deserialize_applies_optional_defaults() {
        let json = r#"{"id":"a","type":"rectangle","x":1,"y":2,"width":30,"height":40}"#;
        let el: Element = serde_json::from_str(json).unwrap();
        assert!(el.visible);
        assert!(!el.locked);
        assert_eq!(el.rotation, 0.0);
        assert_eq!(el.opacity(), 1.0);
    }

    #[test]
    fn test_duplicate_gets_new_id() {
        let el = Element::triangle();
        let copy = el.duplicate(Vec2::new(20.0, 20.0));
        assert_ne!(copy.id, el.id);
        assert_eq!(copy.x, el.x + 20.0);
        assert_eq!(copy.kind, el.kind);
    }
}

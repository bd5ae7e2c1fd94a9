//! Element geometry shared by both backends.
//!
//! Paths are built in element-local coordinates: the origin is the element's
//! top-left corner and the box spans `(0, 0)..(width, height)`.

use composer_core::element::{Element, ElementKind, Rgba};
use kurbo::{Affine, BezPath, Ellipse, Point, Rect, Shape};

/// Tolerance for flattening curves into path segments.
const PATH_TOLERANCE: f64 = 0.1;

/// Point an element rotates about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationPivot {
    /// Element center, as in the editor.
    #[default]
    Center,
    /// Element top-left corner.
    Origin,
}

/// Element-local to canvas transform with rotation about `pivot`.
pub fn element_transform(element: &Element, pivot: RotationPivot) -> Affine {
    match pivot {
        RotationPivot::Center => element.local_transform(),
        RotationPivot::Origin => {
            Affine::translate(element.position().to_vec2()) * Affine::rotate(element.rotation.to_radians())
        }
    }
}

/// Fill and stroke of a shape element.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePaint {
    pub path: BezPath,
    pub fill: Option<Rgba>,
    /// Color and width.
    pub stroke: Option<(Rgba, f64)>,
}

/// Outline of a shape element in local coordinates. Text and images have none.
pub fn shape_path(element: &Element) -> Option<BezPath> {
    let (w, h) = (element.width, element.height);
    let path = match &element.kind {
        ElementKind::Rectangle(_) => Rect::new(0.0, 0.0, w, h).to_path(PATH_TOLERANCE),
        ElementKind::Circle(_) => {
            Ellipse::new(Point::new(w / 2.0, h / 2.0), (w / 2.0, h / 2.0), 0.0).to_path(PATH_TOLERANCE)
        }
        ElementKind::Line(_) => {
            let mut path = BezPath::new();
            path.move_to((0.0, 0.0));
            path.line_to((w, 0.0));
            path
        }
        ElementKind::Triangle(_) => {
            let mut path = BezPath::new();
            path.move_to((w / 2.0, 0.0));
            path.line_to((0.0, h));
            path.line_to((w, h));
            path.close_path();
            path
        }
        ElementKind::Text(_) | ElementKind::Image(_) => return None,
    };
    Some(path)
}

/// Path plus resolved paint for a shape element. Lines are stroke-only.
pub fn shape_paint(element: &Element) -> Option<ShapePaint> {
    let style = element.kind.shape_style()?;
    let path = shape_path(element)?;
    let is_line = matches!(element.kind, ElementKind::Line(_));
    let fill = (!is_line && style.has_fill()).then_some(style.fill_color);
    let stroke = style.has_stroke().then_some((style.stroke_color, style.stroke_width));
    Some(ShapePaint { path, fill, stroke })
}

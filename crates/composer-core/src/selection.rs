//! Selection handles and their hit testing.

use crate::element::Element;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Handle size in canvas units.
pub const HANDLE_SIZE: f64 = 8.0;
/// Handle hit tolerance in canvas units.
pub const HANDLE_HIT_TOLERANCE: f64 = 6.0;
/// Distance from the top edge to the rotation handle (in canvas units).
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// One of the eight resize handles, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
}

impl ResizeHandle {
    pub fn all() -> &'static [ResizeHandle] {
        &[
            ResizeHandle::Nw,
            ResizeHandle::N,
            ResizeHandle::Ne,
            ResizeHandle::E,
            ResizeHandle::Se,
            ResizeHandle::S,
            ResizeHandle::Sw,
            ResizeHandle::W,
        ]
    }

    pub fn is_corner(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Ne | ResizeHandle::Se | ResizeHandle::Sw)
    }

    pub fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::W | ResizeHandle::Sw)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, ResizeHandle::Ne | ResizeHandle::E | ResizeHandle::Se)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::N | ResizeHandle::Ne)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, ResizeHandle::Sw | ResizeHandle::S | ResizeHandle::Se)
    }

    /// Position within the unit square, (0,0) = top-left.
    fn anchor(self) -> (f64, f64) {
        match self {
            ResizeHandle::Nw => (0.0, 0.0),
            ResizeHandle::N => (0.5, 0.0),
            ResizeHandle::Ne => (1.0, 0.0),
            ResizeHandle::E => (1.0, 0.5),
            ResizeHandle::Se => (1.0, 1.0),
            ResizeHandle::S => (0.5, 1.0),
            ResizeHandle::Sw => (0.0, 1.0),
            ResizeHandle::W => (0.0, 0.5),
        }
    }
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Resize(ResizeHandle),
    /// Rotation handle (positioned above the top edge).
    Rotate,
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in canvas coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }

    /// Square drawn for this handle.
    pub fn rect(&self, size: f64) -> Rect {
        Rect::from_center_size(self.position, (size, size))
    }
}

/// Whether `element` shows manipulation handles in its current state.
pub fn shows_handles(element: &Element, selected: bool) -> bool {
    selected && element.visible && !element.locked
}

/// Handles of an element in canvas coordinates, rotated with the element.
/// The rotate handle comes first so it wins hit tests over overlapping handles.
pub fn handles(element: &Element) -> Vec<Handle> {
    let to_canvas = element.local_transform();
    let (w, h) = (element.width, element.height);

    let mut out = Vec::with_capacity(9);
    out.push(Handle::new(
        to_canvas * Point::new(w / 2.0, -ROTATE_HANDLE_OFFSET),
        HandleKind::Rotate,
    ));
    for &handle in ResizeHandle::all() {
        let (fx, fy) = handle.anchor();
        out.push(Handle::new(
            to_canvas * Point::new(fx * w, fy * h),
            HandleKind::Resize(handle),
        ));
    }
    out
}

/// Find the handle of `element` under `point`.
pub fn hit_handle(element: &Element, point: Point, tolerance: f64) -> Option<HandleKind> {
    handles(element)
        .into_iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// New box for a resize gesture.
///
/// `delta` is the pointer travel since the gesture began, in canvas units.
/// Width and height are floored at `min_size`; when the floor engages on a
/// handle that moves the left or top edge, the opposite edge stays put.
pub fn resize_rect(initial: Rect, handle: ResizeHandle, delta: Vec2, min_size: f64) -> Rect {
    let mut x0 = initial.x0;
    let mut y0 = initial.y0;
    let mut width = initial.width();
    let mut height = initial.height();

    if handle.moves_right() {
        width = (width + delta.x).max(min_size);
    }
    if handle.moves_left() {
        let w = (width - delta.x).max(min_size);
        x0 = initial.x1 - w;
        width = w;
    }
    if handle.moves_bottom() {
        height = (height + delta.y).max(min_size);
    }
    if handle.moves_top() {
        let h = (height - delta.y).max(min_size);
        y0 = initial.y1 - h;
        height = h;
    }

    Rect::new(x0, y0, x0 + width, y0 + height)
}

/// Rotation in degrees for a pointer at `pointer` around `pivot`, with 0°
/// pointing straight up, normalized into `[0, 360)`.
pub fn rotation_from_pointer(pivot: Point, pointer: Point) -> f64 {
    let d = pointer - pivot;
    crate::element::normalize_rotation(d.y.atan2(d.x).to_degrees() + 90.0)
}

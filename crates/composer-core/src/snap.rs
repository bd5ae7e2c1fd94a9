//! Alignment guides shown while an element is being moved.
//!
//! Guides are advisory: computing them never changes the moving element's
//! position.

use crate::background::CanvasSize;
use crate::element::{Element, ElementId};
use kurbo::Rect;

/// Distance (canvas units, exclusive) within which two edges count as aligned.
pub const SNAP_THRESHOLD: f64 = 5.0;

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideAxis {
    /// A line of constant x.
    Vertical,
    /// A line of constant y.
    Horizontal,
}

/// A transient alignment line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapGuide {
    pub axis: GuideAxis,
    /// x for vertical guides, y for horizontal ones.
    pub position: f64,
    /// Span along the perpendicular axis as `(start, end)`.
    pub extent: (f64, f64),
}

impl SnapGuide {
    pub fn vertical(x: f64, y0: f64, y1: f64) -> Self {
        Self {
            axis: GuideAxis::Vertical,
            position: x,
            extent: (y0.min(y1), y0.max(y1)),
        }
    }

    pub fn horizontal(y: f64, x0: f64, x1: f64) -> Self {
        Self {
            axis: GuideAxis::Horizontal,
            position: y,
            extent: (x0.min(x1), x0.max(x1)),
        }
    }

    /// Endpoints in canvas coordinates.
    pub fn endpoints(&self) -> (kurbo::Point, kurbo::Point) {
        use kurbo::Point;
        match self.axis {
            GuideAxis::Vertical => (
                Point::new(self.position, self.extent.0),
                Point::new(self.position, self.extent.1),
            ),
            GuideAxis::Horizontal => (
                Point::new(self.extent.0, self.position),
                Point::new(self.extent.1, self.position),
            ),
        }
    }
}

/// Left, right and center along one axis.
fn stops(lo: f64, hi: f64) -> [f64; 3] {
    [lo, hi, (lo + hi) / 2.0]
}

/// Guide accumulator that merges guides landing on the same coordinate.
#[derive(Default)]
struct GuideSet {
    guides: Vec<SnapGuide>,
}

impl GuideSet {
    fn push(&mut self, guide: SnapGuide) {
        // First match keeps its slot; later matches only widen its extent
        if let Some(existing) = self
            .guides
            .iter_mut()
            .find(|g| g.axis == guide.axis && g.position == guide.position)
        {
            existing.extent.0 = existing.extent.0.min(guide.extent.0);
            existing.extent.1 = existing.extent.1.max(guide.extent.1);
        } else {
            self.guides.push(guide);
        }
    }
}

/// Compute alignment guides for `moving` (its proposed bounds) against every
/// other element, hidden ones included, and the page edges and centerlines.
///
/// Vertical guides come before horizontal ones. Within an axis, guides are in
/// discovery order: siblings in z-order, then the page.
pub fn compute_guides(
    moving_id: &ElementId,
    moving: Rect,
    siblings: &[Element],
    canvas: CanvasSize,
    threshold: f64,
) -> Vec<SnapGuide> {
    let near = |a: f64, b: f64| (a - b).abs() < threshold;
    let mut vertical = GuideSet::default();
    let mut horizontal = GuideSet::default();

    let moving_x = stops(moving.x0, moving.x1);
    let moving_y = stops(moving.y0, moving.y1);

    for sibling in siblings.iter().filter(|e| &e.id != moving_id) {
        let b = sibling.bounds();
        let (span_y0, span_y1) = (moving.y0.min(b.y0), moving.y1.max(b.y1));
        let (span_x0, span_x1) = (moving.x0.min(b.x0), moving.x1.max(b.x1));

        for mx in moving_x {
            for sx in stops(b.x0, b.x1) {
                if near(mx, sx) {
                    vertical.push(SnapGuide::vertical(sx, span_y0, span_y1));
                }
            }
        }
        for my in moving_y {
            for sy in stops(b.y0, b.y1) {
                if near(my, sy) {
                    horizontal.push(SnapGuide::horizontal(sy, span_x0, span_x1));
                }
            }
        }
    }

    // Page edges pair with the matching edge of the moving box
    let page = stops(0.0, canvas.width as f64);
    for (mx, px) in moving_x.into_iter().zip(page) {
        if near(mx, px) {
            vertical.push(SnapGuide::vertical(px, moving.y0, moving.y1));
        }
    }
    let page = stops(0.0, canvas.height as f64);
    for (my, py) in moving_y.into_iter().zip(page) {
        if near(my, py) {
            horizontal.push(SnapGuide::horizontal(py, moving.x0, moving.x1));
        }
    }

    let mut guides = vertical.guides;
    guides.extend(horizontal.guides);
    guides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::rectangle().at(x, y).sized(w, h)
    }

    fn verticals(guides: &[SnapGuide]) -> Vec<f64> {
        guides
            .iter()
            .filter(|g| g.axis == GuideAxis::Vertical)
            .map(|g| g.position)
            .collect()
    }

    const PAGE: CanvasSize = CanvasSize::new(2000, 2000);

    #[test]
    fn test_left_edges_within_threshold() {
        let a = boxed(100.0, 300.0, 50.0, 50.0);
        let b = boxed(103.0, 500.0, 60.0, 50.0);
        let moving = ElementId::new();
        for left in [98.0, 100.0, 101.5, 104.0, 107.9] {
            let rect = Rect::new(left, 600.0, left + 40.0, 640.0);
            let guides = compute_guides(&moving, rect, &[a.clone(), b.clone()], PAGE, SNAP_THRESHOLD);
            let xs = verticals(&guides);
            assert!(xs.contains(&100.0) || xs.contains(&103.0), "left {left}: {xs:?}");
        }
    }

    #[test]
    fn test_ten_units_apart_yields_nothing() {
        let sibling = boxed(110.0, 300.0, 200.0, 50.0);
        let rect = Rect::new(100.0, 600.0, 140.0, 640.0);
        let guides = compute_guides(&ElementId::new(), rect, &[sibling], PAGE, SNAP_THRESHOLD);
        assert!(guides.is_empty(), "{guides:?}");
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let sibling = boxed(100.0, 300.0, 200.0, 50.0);
        let rect = Rect::new(105.0, 600.0, 125.0, 640.0);
        let guides = compute_guides(&ElementId::new(), rect, &[sibling], PAGE, SNAP_THRESHOLD);
        assert!(verticals(&guides).is_empty());
    }

    #[test]
    fn test_guide_spans_union_of_both_boxes() {
        let sibling = boxed(100.0, 50.0, 40.0, 40.0);
        let rect = Rect::new(102.0, 400.0, 122.0, 450.0);
        let guides = compute_guides(&ElementId::new(), rect, &[sibling], PAGE, SNAP_THRESHOLD);
        let g = guides.iter().find(|g| g.position == 100.0).unwrap();
        assert_eq!(g.extent, (50.0, 450.0));
    }

    #[test]
    fn test_self_is_ignored() {
        let me = boxed(100.0, 100.0, 50.0, 50.0);
        let guides = compute_guides(&me.id, me.bounds(), &[me.clone()], PAGE, SNAP_THRESHOLD);
        assert!(guides.is_empty());
    }

    #[test]
    fn test_hidden_sibling_still_guides() {
        let me = boxed(100.0, 100.0, 50.0, 50.0);
        let mut hidden = boxed(100.0, 300.0, 50.0, 50.0);
        hidden.visible = false;
        let guides = compute_guides(&me.id, me.bounds(), &[me.clone(), hidden], PAGE, SNAP_THRESHOLD);
        assert_eq!(verticals(&guides), vec![100.0, 150.0, 125.0]);
        let g = guides.iter().find(|g| g.position == 100.0).unwrap();
        assert_eq!(g.extent, (100.0, 350.0));
    }

    #[test]
    fn test_page_edges_and_center() {
        let page = CanvasSize::new(800, 600);
        let rect = Rect::new(2.0, 280.0, 52.0, 320.0);
        let guides = compute_guides(&ElementId::new(), rect, &[], page, SNAP_THRESHOLD);
        assert_eq!(guides.len(), 2);
        assert_eq!(guides[0], SnapGuide::vertical(0.0, 280.0, 320.0));
        assert_eq!(guides[1], SnapGuide::horizontal(300.0, 2.0, 52.0));
    }

    #[test]
    fn test_duplicate_positions_are_merged() {
        // Both siblings share x=100, the moving box sits between them vertically
        let a = boxed(100.0, 0.0, 30.0, 30.0);
        let b = boxed(100.0, 500.0, 30.0, 30.0);
        let rect = Rect::new(101.0, 200.0, 201.0, 250.0);
        let guides = compute_guides(&ElementId::new(), rect, &[a, b], PAGE, SNAP_THRESHOLD);
        let at_100: Vec<_> = guides.iter().filter(|g| g.position == 100.0).collect();
        assert_eq!(at_100.len(), 1);
        assert_eq!(at_100[0].extent, (0.0, 530.0));
    }
}

//! Live backend: a retained display list for the editing view.
//!
//! Each element becomes a [`LiveNode`] positioned in screen space. Nodes are
//! cached per element and rebuilt only when the element, the canvas transform
//! or the render mode changes; the text element under edit is rebuilt every
//! frame since its buffer lives outside the scene.

use crate::decode::{DecodedImage, cover_crop, decode_image};
use crate::geometry::{ShapePaint, shape_paint};
use crate::renderer::{RenderContext, RenderMode, Renderer};
use composer_core::background::Background;
use composer_core::camera::CanvasTransform;
use composer_core::element::{Element, ElementId, ElementKind, ImageProps, TextProps};
use composer_core::selection::{self, HANDLE_SIZE, HandleKind};
use kurbo::{Affine, Point, Rect, Size};
use peniko::Color;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Opacity multiplier for hidden elements in edit mode.
pub const HIDDEN_OPACITY: f64 = 0.5;
/// Opacity multiplier for locked elements.
pub const LOCKED_OPACITY: f64 = 0.7;

/// Type-specific content of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeVisual {
    Shape(ShapePaint),
    Text {
        props: TextProps,
        /// Caret byte offset while the element is being edited.
        caret: Option<usize>,
    },
    Image {
        /// `None` when the source could not be decoded; draw a placeholder.
        image: Option<Arc<DecodedImage>>,
        /// Source rectangle (in image pixels) cropped to cover the box.
        crop: Rect,
    },
}

/// One element ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveNode {
    pub id: ElementId,
    /// Element-local to screen transform, rotation about the element center included.
    pub transform: Affine,
    /// Unrotated box size in canvas units.
    pub size: Size,
    pub opacity: f64,
    pub visual: NodeVisual,
}

/// Editing affordances drawn above the nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayItem {
    /// Dashed box around a selected element.
    SelectionOutline { transform: Affine, size: Size },
    /// Handle square (resize) or circle (rotate), centered in screen space.
    Handle { center: Point, kind: HandleKind, size: f64 },
    Guide { from: Point, to: Point },
    Marquee(Rect),
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone)]
pub struct DisplayList {
    pub backdrop: Color,
    /// Page rectangle in screen coordinates.
    pub page: Rect,
    pub background: Background,
    /// Nodes in paint order (bottom first).
    pub nodes: Vec<LiveNode>,
    pub overlays: Vec<OverlayItem>,
    pub selection_color: Color,
    pub guide_color: Color,
}

impl Default for DisplayList {
    fn default() -> Self {
        Self {
            backdrop: Color::WHITE,
            page: Rect::ZERO,
            background: Background::default(),
            nodes: Vec::new(),
            overlays: Vec::new(),
            selection_color: Color::BLACK,
            guide_color: Color::BLACK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FrameKey {
    transform: CanvasTransform,
    mode: RenderMode,
}

#[derive(Debug)]
struct CachedNode {
    element: Element,
    key: FrameKey,
    node: Option<LiveNode>,
}

#[derive(Debug)]
struct CachedImage {
    src_hash: u64,
    image: Option<Arc<DecodedImage>>,
}

/// Live renderer producing a [`DisplayList`].
#[derive(Debug, Default)]
pub struct LiveRenderer {
    nodes: HashMap<ElementId, CachedNode>,
    image_cache: HashMap<ElementId, CachedImage>,
    display: DisplayList,
    rebuilds: usize,
}

impl LiveRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display list from the last [`Renderer::build_scene`] call.
    pub fn display_list(&self) -> &DisplayList {
        &self.display
    }

    /// Total node rebuilds since creation.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    fn build_node(&mut self, element: &Element, key: FrameKey, text_override: Option<(&str, usize)>) -> Option<LiveNode> {
        if !element.visible && key.mode == RenderMode::Preview {
            return None;
        }
        let mut opacity = element.opacity();
        if !element.visible {
            opacity *= HIDDEN_OPACITY;
        }
        if element.locked {
            opacity *= LOCKED_OPACITY;
        }

        let visual = match &element.kind {
            ElementKind::Text(props) => match text_override {
                Some((text, caret)) => NodeVisual::Text {
                    props: TextProps {
                        content: text.to_string(),
                        ..props.clone()
                    },
                    caret: Some(caret),
                },
                None => NodeVisual::Text {
                    props: props.clone(),
                    caret: None,
                },
            },
            ElementKind::Image(props) => {
                let image = self.load_image(&element.id, props);
                let crop = match &image {
                    Some(img) => cover_crop(img.width as f64, img.height as f64, element.width, element.height),
                    None => Rect::ZERO,
                };
                NodeVisual::Image { image, crop }
            }
            ElementKind::Rectangle(_) | ElementKind::Circle(_) | ElementKind::Line(_) | ElementKind::Triangle(_) => {
                NodeVisual::Shape(shape_paint(element)?)
            }
        };

        Some(LiveNode {
            id: element.id.clone(),
            transform: key.transform.transform() * element.local_transform(),
            size: element.size(),
            opacity,
            visual,
        })
    }

    /// Decoded pixels for an image element, cached until its source changes.
    fn load_image(&mut self, id: &ElementId, props: &ImageProps) -> Option<Arc<DecodedImage>> {
        let mut hasher = DefaultHasher::new();
        props.src.hash(&mut hasher);
        let src_hash = hasher.finish();

        if let Some(cached) = self.image_cache.get(id) {
            if cached.src_hash == src_hash {
                return cached.image.clone();
            }
        }
        let image = match decode_image(props) {
            Ok(decoded) => Some(Arc::new(decoded)),
            Err(err) => {
                log::warn!("Image {} not drawable: {}", id, err);
                None
            }
        };
        self.image_cache.insert(
            id.clone(),
            CachedImage {
                src_hash,
                image: image.clone(),
            },
        );
        image
    }

    fn build_overlays(ctx: &RenderContext) -> Vec<OverlayItem> {
        let mut overlays = Vec::new();
        if !ctx.shows_overlays() {
            return overlays;
        }
        let view = ctx.transform.transform();

        for element in ctx.scene.selected_elements() {
            if !selection::shows_handles(element, true) {
                continue;
            }
            overlays.push(OverlayItem::SelectionOutline {
                transform: view * element.local_transform(),
                size: element.size(),
            });
            for handle in selection::handles(element) {
                overlays.push(OverlayItem::Handle {
                    center: ctx.transform.to_screen(handle.position),
                    kind: handle.kind,
                    size: HANDLE_SIZE,
                });
            }
        }

        for guide in ctx.guides {
            let (from, to) = guide.endpoints();
            overlays.push(OverlayItem::Guide {
                from: ctx.transform.to_screen(from),
                to: ctx.transform.to_screen(to),
            });
        }

        if let Some(rect) = ctx.marquee {
            overlays.push(OverlayItem::Marquee(view.transform_rect_bbox(rect)));
        }
        overlays
    }
}

impl Renderer for LiveRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        let key = FrameKey {
            transform: ctx.transform,
            mode: ctx.mode,
        };
        let editing = ctx.text_edit.map(|state| (state.id(), state.text(), state.caret()));

        let mut nodes = Vec::with_capacity(ctx.scene.len());
        let mut live_ids = HashSet::with_capacity(ctx.scene.len());

        for element in ctx.scene.elements() {
            live_ids.insert(element.id.clone());

            if let Some((id, text, caret)) = editing {
                if id == &element.id {
                    self.rebuilds += 1;
                    nodes.extend(self.build_node(element, key, Some((text, caret))));
                    // The cached node no longer reflects what is on screen
                    self.nodes.remove(&element.id);
                    continue;
                }
            }

            let fresh = self
                .nodes
                .get(&element.id)
                .is_some_and(|cached| cached.key == key && cached.element == *element);
            if !fresh {
                self.rebuilds += 1;
                let node = self.build_node(element, key, None);
                self.nodes.insert(
                    element.id.clone(),
                    CachedNode {
                        element: element.clone(),
                        key,
                        node,
                    },
                );
            }
            if let Some(node) = self.nodes.get(&element.id).and_then(|c| c.node.clone()) {
                nodes.push(node);
            }
        }

        self.nodes.retain(|id, _| live_ids.contains(id));
        self.image_cache.retain(|id, _| live_ids.contains(id));

        self.display = DisplayList {
            backdrop: self.background_color(ctx),
            page: ctx.transform.page_rect(),
            background: ctx.scene.background().clone(),
            nodes,
            overlays: Self::build_overlays(ctx),
            selection_color: ctx.selection_color,
            guide_color: ctx.guide_color,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::tests::png_props;
    use composer_core::element::ElementPatch;
    use composer_core::scene::Scene;
    use composer_core::snap::SnapGuide;
    use composer_core::text_edit::TextEditState;

    fn scene_with_rect() -> (Scene, ElementId) {
        let mut scene = Scene::default();
        let el = Element::rectangle().at(100.0, 100.0).sized(200.0, 100.0);
        let id = el.id.clone();
        scene.add_element(el);
        (scene, id)
    }

    fn render(renderer: &mut LiveRenderer, ctx: &RenderContext) -> DisplayList {
        renderer.build_scene(ctx);
        renderer.display_list().clone()
    }

    #[test]
    fn test_nodes_follow_zoom_and_origin() {
        let (scene, _) = scene_with_rect();
        let mut renderer = LiveRenderer::new();
        let ctx = RenderContext::new(&scene, CanvasTransform::from_zoom(Point::new(10.0, 20.0), 200, scene.canvas_size()));
        let list = render(&mut renderer, &ctx);
        assert_eq!(list.nodes.len(), 1);
        let top_left = list.nodes[0].transform * Point::ZERO;
        assert!((top_left - Point::new(210.0, 220.0)).hypot() < 1e-9);
        assert_eq!(list.page, Rect::new(10.0, 20.0, 1610.0, 1220.0));
    }

    #[test]
    fn test_rotation_about_center() {
        let (mut scene, id) = scene_with_rect();
        scene.update_element(&id, &ElementPatch::rotation(180.0));
        let mut renderer = LiveRenderer::new();
        let list = render(&mut renderer, &RenderContext::new(&scene, CanvasTransform::default()));
        // Rotating 180° about the center maps the top-left corner onto the bottom-right
        let p = list.nodes[0].transform * Point::ZERO;
        assert!((p - Point::new(300.0, 200.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_hidden_and_locked_opacity() {
        let (mut scene, id) = scene_with_rect();
        let locked = Element::circle();
        let locked_id = locked.id.clone();
        scene.add_element(locked);
        scene.update_element(&id, &ElementPatch { visible: Some(false), opacity: Some(0.8), ..Default::default() });
        scene.update_element(&locked_id, &ElementPatch { locked: Some(true), ..Default::default() });

        let mut renderer = LiveRenderer::new();
        let list = render(&mut renderer, &RenderContext::new(&scene, CanvasTransform::default()));
        assert!((list.nodes[0].opacity - 0.4).abs() < 1e-9);
        assert!((list.nodes[1].opacity - 0.7).abs() < 1e-9);

        let preview = RenderContext::new(&scene, CanvasTransform::default()).with_mode(RenderMode::Preview);
        let list = render(&mut renderer, &preview);
        assert_eq!(list.nodes.len(), 1);
        assert_eq!(list.nodes[0].id, locked_id);
    }

    #[test]
    fn test_incremental_rebuilds() {
        let (mut scene, id) = scene_with_rect();
        scene.add_element(Element::circle());
        let mut renderer = LiveRenderer::new();
        let ctx_transform = CanvasTransform::default();

        renderer.build_scene(&RenderContext::new(&scene, ctx_transform));
        assert_eq!(renderer.rebuild_count(), 2);

        renderer.build_scene(&RenderContext::new(&scene, ctx_transform));
        assert_eq!(renderer.rebuild_count(), 2);

        scene.update_element(&id, &ElementPatch::position(0.0, 0.0));
        renderer.build_scene(&RenderContext::new(&scene, ctx_transform));
        assert_eq!(renderer.rebuild_count(), 3);

        let zoomed = CanvasTransform::from_zoom(Point::ZERO, 150, scene.canvas_size());
        renderer.build_scene(&RenderContext::new(&scene, zoomed));
        assert_eq!(renderer.rebuild_count(), 5);
    }

    #[test]
    fn test_selection_overlays() {
        let (mut scene, id) = scene_with_rect();
        scene.set_selection([id]);
        let guides = [SnapGuide::vertical(100.0, 0.0, 300.0)];
        let ctx = RenderContext::new(&scene, CanvasTransform::default())
            .with_guides(&guides)
            .with_marquee(Some(Rect::new(0.0, 0.0, 50.0, 50.0)));
        let mut renderer = LiveRenderer::new();
        let list = render(&mut renderer, &ctx);

        let handles = list.overlays.iter().filter(|o| matches!(o, OverlayItem::Handle { .. })).count();
        assert_eq!(handles, 9);
        assert!(list.overlays.iter().any(|o| matches!(o, OverlayItem::SelectionOutline { .. })));
        assert!(list.overlays.contains(&OverlayItem::Guide {
            from: Point::new(100.0, 0.0),
            to: Point::new(100.0, 300.0),
        }));
        assert!(list.overlays.contains(&OverlayItem::Marquee(Rect::new(0.0, 0.0, 50.0, 50.0))));

        let preview = render(&mut renderer, &ctx.with_mode(RenderMode::Preview));
        assert!(preview.overlays.is_empty());
    }

    #[test]
    fn test_locked_selection_has_no_handles() {
        let (mut scene, id) = scene_with_rect();
        scene.update_element(&id, &ElementPatch { locked: Some(true), ..Default::default() });
        scene.set_selection([id]);
        let mut renderer = LiveRenderer::new();
        let list = render(&mut renderer, &RenderContext::new(&scene, CanvasTransform::default()));
        assert!(list.overlays.is_empty());
    }

    #[test]
    fn test_text_under_edit_shows_buffer() {
        let mut scene = Scene::default();
        let el = Element::text(TextProps::with_content("Hello"));
        let id = el.id.clone();
        scene.add_element(el);
        let mut state = TextEditState::new(id.clone(), "Hello");
        state.insert("Bye");

        let mut renderer = LiveRenderer::new();
        let ctx = RenderContext::new(&scene, CanvasTransform::default()).with_text_edit(Some(&state));
        let list = render(&mut renderer, &ctx);
        match &list.nodes[0].visual {
            NodeVisual::Text { props, caret } => {
                assert_eq!(props.content, "Bye");
                assert_eq!(*caret, Some(3));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_image_nodes_and_placeholder() {
        let mut scene = Scene::default();
        let good = Element::image(png_props(40, 20), 100.0, 100.0);
        let bad = Element::image(
            ImageProps {
                src: "missing.png".into(),
                original_file_name: None,
                file_size: None,
            },
            100.0,
            100.0,
        );
        scene.add_element(good);
        scene.add_element(bad);

        let mut renderer = LiveRenderer::new();
        let list = render(&mut renderer, &RenderContext::new(&scene, CanvasTransform::default()));
        match &list.nodes[0].visual {
            NodeVisual::Image { image: Some(img), crop } => {
                assert_eq!((img.width, img.height), (40, 20));
                assert_eq!(*crop, Rect::new(10.0, 0.0, 30.0, 20.0));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(list.nodes[1].visual, NodeVisual::Image { image: None, .. }));
    }

    #[test]
    fn test_removed_elements_leave_cache() {
        let (mut scene, id) = scene_with_rect();
        let mut renderer = LiveRenderer::new();
        renderer.build_scene(&RenderContext::new(&scene, CanvasTransform::default()));
        scene.remove_elements(&[id]);
        let list = render(&mut renderer, &RenderContext::new(&scene, CanvasTransform::default()));
        assert!(list.nodes.is_empty());
        assert!(renderer.nodes.is_empty());
    }
}

//! Renderer trait abstraction.

use composer_core::camera::CanvasTransform;
use composer_core::editor::Editor;
use composer_core::scene::Scene;
use composer_core::snap::SnapGuide;
use composer_core::text_edit::TextEditState;
use kurbo::{Point, Rect};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Image decode failed: {0}")]
    ImageDecode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Which editor view is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Editing view: hidden elements are ghosted, overlays are shown.
    #[default]
    Edit,
    /// Clean preview: hidden elements and overlays are left out.
    Preview,
}

impl RenderMode {
    pub fn name(self) -> &'static str {
        match self {
            RenderMode::Edit => "Edit",
            RenderMode::Preview => "Preview",
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The scene to render.
    pub scene: &'a Scene,
    /// Page placement and zoom.
    pub transform: CanvasTransform,
    pub mode: RenderMode,
    /// Workspace color around the page.
    pub backdrop_color: Color,
    /// Selection highlight color.
    pub selection_color: Color,
    /// Snap guide color.
    pub guide_color: Color,
    /// Marquee rectangle in canvas coordinates.
    pub marquee: Option<Rect>,
    /// Alignment guides for the drag in progress.
    pub guides: &'a [SnapGuide],
    /// Text element being edited, with its live buffer.
    pub text_edit: Option<&'a TextEditState>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(scene: &'a Scene, transform: CanvasTransform) -> Self {
        Self {
            scene,
            transform,
            mode: RenderMode::Edit,
            backdrop_color: Color::from_rgba8(240, 240, 240, 255),
            selection_color: Color::from_rgba8(0, 0, 255, 255),
            guide_color: Color::from_rgba8(236, 72, 153, 255),
            marquee: None,
            guides: &[],
            text_edit: None,
        }
    }

    /// Context for an editor session, picking up its gesture overlays.
    pub fn for_editor(editor: &'a Editor, origin: Point) -> Self {
        let controller = editor.controller();
        Self::new(editor.scene(), editor.canvas_transform(origin))
            .with_marquee(controller.marquee())
            .with_guides(controller.guides())
            .with_text_edit(controller.text_edit())
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_backdrop(mut self, color: Color) -> Self {
        self.backdrop_color = color;
        self
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    pub fn with_marquee(mut self, rect: Option<Rect>) -> Self {
        self.marquee = rect;
        self
    }

    pub fn with_guides(mut self, guides: &'a [SnapGuide]) -> Self {
        self.guides = guides;
        self
    }

    pub fn with_text_edit(mut self, state: Option<&'a TextEditState>) -> Self {
        self.text_edit = state;
        self
    }

    /// Whether overlays (handles, guides, marquee) are drawn.
    pub fn shows_overlays(&self) -> bool {
        self.mode == RenderMode::Edit
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the draw list for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the backdrop color (for clearing around the page).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.backdrop_color
    }
}

//! Composer Render Library
//!
//! Two backends over a `composer_core::Scene`: a retained display list for
//! the live editing view, and a tiny-skia rasterizer for PNG, JPEG and PDF
//! export.

pub mod decode;
pub mod error;
pub mod export;
pub mod geometry;
pub mod live;
pub mod renderer;

pub use decode::{DecodedImage, cover_crop, decode_image};
pub use error::{ExportError, ExportResult};
pub use export::{ExportConfig, ExportFormat, ExportScale, SceneExporter, encode_jpeg, encode_png};
pub use geometry::{RotationPivot, ShapePaint, element_transform, shape_path};
pub use live::{DisplayList, LiveNode, LiveRenderer, NodeVisual, OverlayItem};
pub use renderer::{RenderContext, RenderMode, RenderResult, Renderer, RendererError};

//! Composer Core Library
//!
//! Platform-agnostic document model and editing logic for the Composer
//! layout editor: elements, the scene store, undo history, pointer gestures,
//! snapping and the project file format.

pub mod background;
pub mod camera;
pub mod capture;
pub mod config;
pub mod editor;
pub mod element;
pub mod history;
pub mod import;
pub mod input;
pub mod project;
pub mod scene;
pub mod selection;
pub mod shortcuts;
pub mod snap;
pub mod text_edit;
pub mod transform;

pub use background::{Background, CanvasPreset, CanvasSize, GradientDirection, ImageMode};
pub use camera::CanvasTransform;
pub use capture::{CaptureHost, CaptureSlot, PointerCapture};
pub use config::{ConfigError, EditorConfig};
pub use editor::{Editor, KeyOutcome};
pub use element::{Element, ElementId, ElementKind, ElementPatch, ElementType, Rgba};
pub use history::{History, HistoryMode};
pub use import::{ImportError, ImportFile, ImportReport};
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use project::{ProjectError, ProjectFile, ProjectResult, ProjectSettings};
pub use scene::{ReorderAction, Scene, Snapshot};
pub use shortcuts::{Command, Shortcut, ShortcutRegistry};
pub use snap::{GuideAxis, SNAP_THRESHOLD, SnapGuide};
pub use transform::{GestureState, TransformController, TransformEvent};

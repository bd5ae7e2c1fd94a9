//! Project file format: the persisted form of a scene.
//!
//! ```json
//! { "elements": [...],
//!   "canvas": { "width": 800, "height": 600, "background": {...} },
//!   "settings": { "name": "...", "description": "...", "author": "..." } }
//! ```

use crate::background::{Background, CanvasSize};
use crate::element::{Element, ElementId};
use crate::scene::Scene;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default project name.
pub const UNTITLED_PROJECT: &str = "Untitled project";

/// Project load/save errors.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not a JSON project file: {}", .0.display())]
    NotJson(PathBuf),
    #[error("Malformed project file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for project operations.
pub type ProjectResult<T> = Result<T, ProjectError>;

/// Descriptive metadata stored alongside the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    pub name: String,
    pub description: String,
    pub author: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            name: UNTITLED_PROJECT.to_string(),
            description: String::new(),
            author: String::new(),
        }
    }
}

/// Page size and background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
    #[serde(default, deserialize_with = "Background::deserialize_lenient")]
    pub background: Background,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        let size = CanvasSize::default();
        Self {
            width: size.width,
            height: size.height,
            background: Background::default(),
        }
    }
}

impl CanvasSettings {
    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }
}

/// A complete project document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub canvas: CanvasSettings,
    #[serde(default)]
    pub settings: ProjectSettings,
}

impl ProjectFile {
    /// Capture the persisted parts of `scene`.
    pub fn from_scene(scene: &Scene, settings: &ProjectSettings) -> Self {
        let size = scene.canvas_size();
        Self {
            elements: scene.elements().to_vec(),
            canvas: CanvasSettings {
                width: size.width,
                height: size.height,
                background: scene.background().clone(),
            },
            settings: settings.clone(),
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> ProjectResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a project, upgrading legacy fields and repairing element invariants.
    pub fn from_json(json: &str) -> ProjectResult<Self> {
        let mut project: Self = serde_json::from_str(json)?;
        project.repair();
        Ok(project)
    }

    /// Normalize geometry and make element ids unique.
    fn repair(&mut self) {
        let mut seen: HashSet<ElementId> = HashSet::with_capacity(self.elements.len());
        for element in &mut self.elements {
            element.normalize();
            if !seen.insert(element.id.clone()) {
                let fresh = ElementId::new();
                log::warn!("Duplicate element id {} in project, reassigned to {}", element.id, fresh);
                element.id = fresh.clone();
                seen.insert(fresh);
            }
        }
    }

    /// Read a `.json` project file. Other extensions are rejected without being read.
    pub fn load_file(path: impl AsRef<Path>) -> ProjectResult<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if !is_json {
            return Err(ProjectError::NotJson(path.to_path_buf()));
        }
        let json = fs::read_to_string(path)?;
        let project = Self::from_json(&json)?;
        log::info!("Loaded project {} ({} elements)", path.display(), project.elements.len());
        Ok(project)
    }

    pub fn save_file(&self, path: impl AsRef<Path>) -> ProjectResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Saved project to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Rgba, TextProps};

    fn sample_scene() -> Scene {
        let mut scene = Scene::new(CanvasSize::new(1080, 1080));
        scene.add_element(Element::rectangle());
        scene.add_element(Element::text(TextProps::with_content("Title")).at(40.0, 60.0));
        let mut line = Element::line();
        line.rotation = 45.0;
        scene.add_element(line);
        scene.set_background(Background::solid(Rgba::rgb(0x11, 0x22, 0x33)));
        scene
    }

    #[test]
    fn test_round_trip_preserves_order_and_content() {
        let scene = sample_scene();
        let settings = ProjectSettings {
            name: "Poster".into(),
            ..ProjectSettings::default()
        };
        let json = ProjectFile::from_scene(&scene, &settings).to_json().unwrap();
        let loaded = ProjectFile::from_json(&json).unwrap();
        assert_eq!(loaded.elements, scene.elements());
        assert_eq!(loaded.canvas.size(), CanvasSize::new(1080, 1080));
        assert_eq!(loaded.settings.name, "Poster");
        assert_eq!(loaded.canvas.background, *scene.background());
    }

    #[test]
    fn test_legacy_background_string() {
        let json = r##"{"elements":[],"canvas":{"width":800,"height":600,"background":"#112233"}}"##;
        let project = ProjectFile::from_json(json).unwrap();
        assert_eq!(project.canvas.background, Background::solid(Rgba::rgb(0x11, 0x22, 0x33)));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let project = ProjectFile::from_json("{}").unwrap();
        assert!(project.elements.is_empty());
        assert_eq!(project.canvas.size(), CanvasSize::new(800, 600));
        assert_eq!(project.canvas.background, Background::default());
        assert_eq!(project.settings.name, UNTITLED_PROJECT);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(ProjectFile::from_json("{ not json"), Err(ProjectError::Parse(_))));
        let bad_type = r#"{"elements":[{"id":"a","type":"hexagon","x":0,"y":0,"width":10,"height":10}]}"#;
        assert!(ProjectFile::from_json(bad_type).is_err());
    }

    #[test]
    fn test_repairs_duplicates_and_geometry() {
        let json = r#"{"elements":[
            {"id":"a","type":"rectangle","x":0,"y":0,"width":2,"height":30,"rotation":-30},
            {"id":"a","type":"circle","x":5,"y":5,"width":40,"height":40}
        ]}"#;
        let project = ProjectFile::from_json(json).unwrap();
        assert_eq!(project.elements[0].width, 10.0);
        assert_eq!(project.elements[0].rotation, 330.0);
        assert_eq!(project.elements[0].id.as_str(), "a");
        assert_ne!(project.elements[1].id, project.elements[0].id);
    }

    #[test]
    fn test_file_io_and_extension_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.json");
        let project = ProjectFile::from_scene(&sample_scene(), &ProjectSettings::default());
        project.save_file(&path).unwrap();
        assert_eq!(ProjectFile::load_file(&path).unwrap(), project);

        let txt = dir.path().join("poster.txt");
        std::fs::write(&txt, "{}").unwrap();
        assert!(matches!(ProjectFile::load_file(&txt), Err(ProjectError::NotJson(_))));
    }
}

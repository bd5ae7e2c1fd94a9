//! Editor session: scene, history, gestures and the keyboard surface wired together.

use crate::background::{Background, CanvasPreset, CanvasSize};
use crate::camera::CanvasTransform;
use crate::capture::CaptureSlot;
use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementPatch};
use crate::history::{History, HistoryMode};
use crate::import::{ImportFile, ImportReport, image_element};
use crate::input::{Key, KeyEvent, PointerEvent};
use crate::project::{ProjectFile, ProjectResult, ProjectSettings};
use crate::scene::{ReorderAction, Scene, Snapshot};
use crate::shortcuts::{Command, ShortcutRegistry};
use crate::transform::{TransformController, TransformEvent};
use kurbo::{Point, Vec2};
use std::path::Path;

/// Result of routing a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    /// Ctrl+S: the host should persist the project.
    SaveRequested,
    NotHandled,
}

/// One editing session over a single page.
#[derive(Debug)]
pub struct Editor {
    scene: Scene,
    history: History,
    controller: TransformController,
    clipboard: Vec<Element>,
    zoom: u32,
    settings: ProjectSettings,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(CanvasSize::default())
    }
}

impl Editor {
    pub fn new(canvas_size: CanvasSize) -> Self {
        Self::with_config(canvas_size, EditorConfig::default(), CaptureSlot::default())
    }

    pub fn with_config(canvas_size: CanvasSize, config: EditorConfig, capture: CaptureSlot) -> Self {
        let config = config.validated();
        let mut editor = Self {
            scene: Scene::new(canvas_size).with_min_element_size(config.min_element_size),
            history: History::with_limit(config.history_limit),
            controller: TransformController::new(capture).with_snap_threshold(config.snap_threshold),
            clipboard: Vec::new(),
            zoom: 100,
            settings: ProjectSettings::default(),
            config,
        };
        editor.reset_history();
        editor
    }

    // --- Accessors ---

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn controller(&self) -> &TransformController {
        &self.controller
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn can_paste(&self) -> bool {
        !self.clipboard.is_empty()
    }

    /// Transform context for the current zoom with the page drawn at `origin`.
    pub fn canvas_transform(&self, origin: Point) -> CanvasTransform {
        CanvasTransform::from_zoom(origin, self.zoom, self.scene.canvas_size())
    }

    // --- History ---

    /// Forget all history and make the current sequence the only entry.
    fn reset_history(&mut self) {
        self.history.reset();
        self.history.commit(self.scene.snapshot());
    }

    /// Commit `snapshot` unless it matches the entry the cursor is on.
    fn record(&mut self, snapshot: Snapshot) {
        if self.history.current().as_ref() == Some(&snapshot) {
            return;
        }
        self.history.commit(snapshot);
    }

    pub fn undo(&mut self) -> bool {
        if !self.controller.is_idle() {
            return false;
        }
        match self.history.undo() {
            Some(snapshot) => {
                self.scene.restore(&snapshot);
                log::debug!("Undo to entry {}", self.history.cursor());
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if !self.controller.is_idle() {
            return false;
        }
        match self.history.redo() {
            Some(snapshot) => {
                self.scene.restore(&snapshot);
                log::debug!("Redo to entry {}", self.history.cursor());
                true
            }
            None => false,
        }
    }

    // --- Element operations ---

    /// Add an element on top of the z-order.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let snapshot = self.scene.add_element(element);
        let id = snapshot
            .last()
            .map(|e| e.id.clone())
            .unwrap_or_default();
        self.record(snapshot);
        id
    }

    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) {
        if !self.scene.contains(id) || patch.is_empty() {
            return;
        }
        let snapshot = self.scene.update_element(id, patch);
        self.record(snapshot);
    }

    pub fn reorder(&mut self, id: &ElementId, action: ReorderAction) {
        if !self.scene.contains(id) {
            return;
        }
        let snapshot = self.scene.reorder(id, action);
        self.record(snapshot);
    }

    pub fn select<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ElementId>,
    {
        self.scene.set_selection(ids);
    }

    /// Remove every selected element. Returns how many were removed.
    pub fn remove_selected(&mut self) -> usize {
        let ids = self.scene.selection().to_vec();
        if ids.is_empty() {
            return 0;
        }
        let before = self.scene.len();
        let snapshot = self.scene.remove_elements(&ids);
        self.scene.clear_selection();
        self.record(snapshot);
        before - self.scene.len()
    }

    pub fn copy(&mut self) -> usize {
        let copied: Vec<Element> = self.scene.selected_elements().into_iter().cloned().collect();
        if copied.is_empty() {
            return 0;
        }
        self.clipboard = copied;
        self.clipboard.len()
    }

    /// Paste the clipboard with fresh ids, offset by `paste_offset` from the
    /// copied elements, and select the pasted elements.
    pub fn paste(&mut self) -> Vec<ElementId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let step = self.config.paste_offset;
        let pasted: Vec<Element> = self
            .clipboard
            .iter()
            .map(|e| e.duplicate(Vec2::new(step, step)))
            .collect();
        let ids: Vec<ElementId> = pasted.iter().map(|e| e.id.clone()).collect();
        let snapshot = self.scene.add_elements(pasted);
        self.scene.set_selection(ids.clone());
        self.record(snapshot);
        ids
    }

    /// Move the selection by `(dx, dy)` nudge steps as a single commit.
    pub fn nudge(&mut self, dx: i8, dy: i8) -> bool {
        let step = self.config.nudge_step;
        let patches: Vec<(ElementId, ElementPatch)> = self
            .scene
            .selected_elements()
            .into_iter()
            .filter(|e| !e.locked)
            .map(|e| {
                let patch = ElementPatch::position(e.x + dx as f64 * step, e.y + dy as f64 * step);
                (e.id.clone(), patch)
            })
            .collect();
        if patches.is_empty() {
            return false;
        }
        let snapshot = self.scene.update_elements(&patches);
        self.record(snapshot);
        true
    }

    // --- Input ---

    /// Feed a pointer event through the gesture controller and apply the
    /// history policy to whatever it reports.
    pub fn handle_pointer(&mut self, event: PointerEvent, ctx: &CanvasTransform) -> TransformEvent {
        let result = self.controller.handle_pointer(&mut self.scene, event, ctx);
        self.apply_event(&result);
        result
    }

    fn apply_event(&mut self, event: &TransformEvent) {
        match event {
            TransformEvent::Updated(snapshot) if self.config.history_mode == HistoryMode::Granular => {
                self.record(snapshot.clone());
            }
            TransformEvent::Ended {
                result: Some(snapshot), ..
            }
            | TransformEvent::Cancelled(snapshot)
            | TransformEvent::EditCommitted(snapshot) => self.record(snapshot.clone()),
            _ => {}
        }
    }

    /// Enter text editing on `id` (for hosts with an explicit edit action).
    pub fn begin_text_edit(&mut self, id: &ElementId) -> TransformEvent {
        self.controller.begin_text_edit(&mut self.scene, id)
    }

    /// Leave text editing keeping the typed content, as on blur.
    pub fn commit_text(&mut self) -> TransformEvent {
        let result = self.controller.commit_text(&mut self.scene);
        self.apply_event(&result);
        result
    }

    pub fn insert_text(&mut self, text: &str) -> bool {
        // Text insertion from IME/paste goes straight to the edit buffer
        for c in text.chars() {
            let result = self.controller.edit_key(&mut self.scene, KeyEvent::plain(Key::Character(c)));
            if result == TransformEvent::Ignored {
                return false;
            }
        }
        true
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> KeyOutcome {
        if self.controller.text_edit().is_some() {
            let result = self.controller.edit_key(&mut self.scene, event);
            self.apply_event(&result);
            return match result {
                TransformEvent::Ignored => KeyOutcome::NotHandled,
                _ => KeyOutcome::Handled,
            };
        }

        let Some(command) = ShortcutRegistry::resolve(&event) else {
            return KeyOutcome::NotHandled;
        };
        log::debug!("Shortcut {:?}", command);
        let handled = match command {
            Command::DeleteSelection => self.remove_selected() > 0,
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Copy => self.copy() > 0,
            Command::Paste => !self.paste().is_empty(),
            Command::Save => return KeyOutcome::SaveRequested,
            Command::Nudge(dx, dy) => self.nudge(dx, dy),
            Command::Cancel => {
                let result = self.controller.cancel(&mut self.scene);
                self.apply_event(&result);
                result != TransformEvent::Ignored
            }
        };
        if handled { KeyOutcome::Handled } else { KeyOutcome::NotHandled }
    }

    // --- Zoom ---

    /// Set the zoom percentage, clamped to the configured range.
    pub fn set_zoom(&mut self, percent: u32) -> u32 {
        self.zoom = percent.clamp(self.config.zoom_min, self.config.zoom_max);
        self.zoom
    }

    pub fn zoom_in(&mut self) -> u32 {
        self.set_zoom(self.zoom.saturating_add(self.config.zoom_step))
    }

    pub fn zoom_out(&mut self) -> u32 {
        self.set_zoom(self.zoom.saturating_sub(self.config.zoom_step))
    }

    pub fn reset_zoom(&mut self) -> u32 {
        self.set_zoom(100)
    }

    // --- Document ---

    /// Resize the page. This discards every element along with the selection
    /// and history; the number of discarded elements is returned.
    pub fn reset_canvas_size(&mut self, size: CanvasSize) -> usize {
        self.controller.cancel(&mut self.scene);
        let discarded = self.scene.clear();
        self.scene.set_canvas_size(size);
        self.clipboard.clear();
        self.reset_history();
        log::info!(
            "Canvas reset to {}x{}, {} elements discarded",
            size.width,
            size.height,
            discarded
        );
        discarded
    }

    pub fn apply_preset(&mut self, preset: CanvasPreset) -> usize {
        self.reset_canvas_size(preset.size())
    }

    pub fn set_background(&mut self, background: Background) {
        self.scene.set_background(background);
    }

    pub fn update_settings(&mut self, settings: ProjectSettings) {
        self.settings = settings;
    }

    // --- Persistence ---

    pub fn to_project(&self) -> ProjectFile {
        ProjectFile::from_scene(&self.scene, &self.settings)
    }

    pub fn save_project(&self, path: impl AsRef<Path>) -> ProjectResult<()> {
        self.to_project().save_file(path)
    }

    /// Replace the whole document. History collapses to a single entry.
    pub fn apply_project(&mut self, project: ProjectFile) {
        self.controller.cancel(&mut self.scene);
        let size = project.canvas.size();
        self.scene
            .replace_document(project.elements, size, project.canvas.background);
        self.settings = project.settings;
        self.reset_history();
    }

    /// Load a project file. On error nothing in the session changes.
    pub fn load_project(&mut self, path: impl AsRef<Path>) -> ProjectResult<()> {
        let project = ProjectFile::load_file(path)?;
        self.apply_project(project);
        Ok(())
    }

    // --- Import ---

    /// Add each image in `files` as its own undo step. Rejected files are
    /// reported and do not stop the batch.
    pub fn import_images(&mut self, files: &[ImportFile]) -> ImportReport {
        let mut report = ImportReport::default();
        let max = (self.config.image_max_width, self.config.image_max_height);
        for (index, file) in files.iter().enumerate() {
            match image_element(file, index, max) {
                Ok(element) => {
                    let id = self.add_element(element);
                    report.imported.push(id);
                }
                Err(err) => {
                    log::warn!("Skipping {}: {}", file.name, err);
                    report.rejected.push((file.name.clone(), err));
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;
    use crate::input::Modifiers;
    use crate::transform::GestureState;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn drag(editor: &mut Editor, from: Point, to: &[Point]) {
        let ctx = editor.canvas_transform(Point::ZERO);
        editor.handle_pointer(PointerEvent::down(from), &ctx);
        for &p in to {
            editor.handle_pointer(PointerEvent::moved(p), &ctx);
        }
        editor.handle_pointer(PointerEvent::up(*to.last().unwrap_or(&from)), &ctx);
    }

    #[test]
    fn test_drag_then_undo_redo() {
        let mut editor = Editor::default();
        let id = editor.add_element(Element::rectangle().at(100.0, 100.0).sized(200.0, 150.0));

        drag(&mut editor, pt(110.0, 110.0), &[pt(160.0, 150.0)]);
        let el = editor.scene().element(&id).unwrap();
        assert_eq!((el.x, el.y), (150.0, 140.0));

        assert!(editor.undo());
        let el = editor.scene().element(&id).unwrap();
        assert_eq!((el.x, el.y), (100.0, 100.0));

        assert!(editor.redo());
        let el = editor.scene().element(&id).unwrap();
        assert_eq!((el.x, el.y), (150.0, 140.0));
    }

    #[test]
    fn test_add_and_delete_circle() {
        let mut editor = Editor::default();
        editor.reset_canvas_size(CanvasSize::new(800, 600));
        let id = editor.add_element(Element::circle());
        editor.select([id]);
        assert_eq!(editor.handle_key(KeyEvent::plain(Key::Delete)), KeyOutcome::Handled);
        assert_eq!(editor.scene().len(), 0);
        assert!(editor.scene().selection().is_empty());
    }

    #[test]
    fn test_granular_history_commits_each_move() {
        let mut editor = Editor::default();
        editor.add_element(Element::rectangle());
        drag(&mut editor, pt(110.0, 110.0), &[pt(120.0, 110.0), pt(130.0, 110.0), pt(140.0, 110.0)]);
        // baseline + add + three moves
        assert_eq!(editor.history().len(), 5);
    }

    #[test]
    fn test_coalesced_history_commits_once_per_gesture() {
        let config = EditorConfig {
            history_mode: HistoryMode::Coalesced,
            ..EditorConfig::default()
        };
        let mut editor = Editor::with_config(CanvasSize::default(), config, CaptureSlot::default());
        let id = editor.add_element(Element::rectangle());
        drag(&mut editor, pt(110.0, 110.0), &[pt(120.0, 110.0), pt(130.0, 110.0), pt(140.0, 110.0)]);
        assert_eq!(editor.history().len(), 3);

        editor.undo();
        assert_eq!(editor.scene().element(&id).unwrap().x, 100.0);
    }

    #[test]
    fn test_click_without_move_adds_no_history() {
        let mut editor = Editor::default();
        editor.add_element(Element::rectangle());
        let len = editor.history().len();
        drag(&mut editor, pt(110.0, 110.0), &[]);
        assert_eq!(editor.history().len(), len);
    }

    #[test]
    fn test_undo_at_baseline_is_noop() {
        let mut editor = Editor::default();
        assert!(!editor.undo());
        assert!(!editor.redo());
        editor.add_element(Element::triangle());
        assert!(editor.undo());
        assert!(editor.scene().is_empty());
        assert!(!editor.undo());
    }

    #[test]
    fn test_commit_after_undo_drops_redo() {
        let mut editor = Editor::default();
        editor.add_element(Element::rectangle());
        editor.add_element(Element::circle());
        editor.undo();
        assert!(editor.history().can_redo());
        editor.add_element(Element::line());
        assert!(!editor.history().can_redo());
        assert_eq!(editor.scene().len(), 2);
        assert_eq!(editor.scene().elements()[1].element_type(), ElementType::Line);
    }

    #[test]
    fn test_undo_drops_vanished_selection() {
        let mut editor = Editor::default();
        let id = editor.add_element(Element::rectangle());
        editor.select([id]);
        editor.undo();
        assert!(editor.scene().selection().is_empty());
    }

    #[test]
    fn test_copy_paste_offsets_and_selects() {
        let mut editor = Editor::default();
        let a = editor.add_element(Element::rectangle().at(10.0, 10.0));
        let b = editor.add_element(Element::circle().at(300.0, 50.0));
        editor.select([a.clone(), b.clone()]);
        assert_eq!(editor.handle_key(KeyEvent::ctrl('c')), KeyOutcome::Handled);
        assert_eq!(editor.handle_key(KeyEvent::ctrl('v')), KeyOutcome::Handled);

        let scene = editor.scene();
        assert_eq!(scene.len(), 4);
        let pasted = &scene.elements()[2..];
        assert_eq!(scene.selection(), &[pasted[0].id.clone(), pasted[1].id.clone()]);
        assert_eq!((pasted[0].x, pasted[0].y), (30.0, 30.0));
        assert_eq!((pasted[1].x, pasted[1].y), (320.0, 70.0));
        assert!(pasted.iter().all(|e| e.id != a && e.id != b));
        assert_ne!(pasted[0].id, pasted[1].id);

        let again = editor.paste();
        assert_eq!(editor.scene().element(&again[0]).unwrap().x, 30.0);
    }

    #[test]
    fn test_repeated_paste_keeps_fixed_offset() {
        let mut editor = Editor::default();
        let a = editor.add_element(Element::rectangle().at(10.0, 10.0));
        editor.select([a]);
        editor.copy();
        let first = editor.paste();
        let second = editor.paste();
        let third = editor.paste();

        for ids in [&first, &second, &third] {
            let pasted = editor.scene().element(&ids[0]).unwrap();
            assert_eq!((pasted.x, pasted.y), (30.0, 30.0));
        }
        assert_ne!(first[0], second[0]);
        assert_ne!(second[0], third[0]);
        assert_eq!(editor.scene().selection(), third.as_slice());
        assert_eq!(editor.scene().len(), 4);
    }

    #[test]
    fn test_arrow_nudge_skips_locked() {
        let mut editor = Editor::default();
        let a = editor.add_element(Element::rectangle().at(10.0, 10.0));
        let b = editor.add_element(Element::circle().at(300.0, 50.0));
        editor.update_element(&b, &ElementPatch { locked: Some(true), ..Default::default() });
        editor.select([a.clone(), b.clone()]);
        let len = editor.history().len();

        assert_eq!(editor.handle_key(KeyEvent::plain(Key::ArrowLeft)), KeyOutcome::Handled);
        assert_eq!(editor.handle_key(KeyEvent::plain(Key::ArrowDown)), KeyOutcome::Handled);
        assert_eq!(editor.scene().element(&a).unwrap().position(), pt(9.0, 11.0));
        assert_eq!(editor.scene().element(&b).unwrap().position(), pt(300.0, 50.0));
        assert_eq!(editor.history().len(), len + 2);
    }

    #[test]
    fn test_save_shortcut_is_reported() {
        let mut editor = Editor::default();
        assert_eq!(editor.handle_key(KeyEvent::ctrl('s')), KeyOutcome::SaveRequested);
        assert_eq!(editor.handle_key(KeyEvent::plain(Key::Character('q'))), KeyOutcome::NotHandled);
    }

    #[test]
    fn test_keys_route_to_text_editor_while_editing() {
        let mut editor = Editor::default();
        let id = editor.add_element(Element::with_defaults(ElementType::Text).unwrap());
        assert_eq!(editor.begin_text_edit(&id), TransformEvent::EditStarted(id.clone()));
        // Delete inside the editor removes the selected text, not the element
        editor.handle_key(KeyEvent::plain(Key::Delete));
        assert!(editor.insert_text("Hi"));
        assert_eq!(editor.scene().len(), 1);
        editor.handle_key(KeyEvent::plain(Key::Enter));
        assert_eq!(editor.controller().state(), GestureState::Idle);
        assert_eq!(editor.scene().element(&id).unwrap().kind.as_text().unwrap().content, "Hi");

        editor.undo();
        assert_ne!(editor.scene().element(&id).unwrap().kind.as_text().unwrap().content, "Hi");
    }

    #[test]
    fn test_zoom_clamped_and_stepped() {
        let mut editor = Editor::default();
        assert_eq!(editor.zoom_in(), 110);
        assert_eq!(editor.set_zoom(500), 200);
        assert_eq!(editor.zoom_in(), 200);
        assert_eq!(editor.set_zoom(10), 50);
        assert_eq!(editor.zoom_out(), 50);
        assert_eq!(editor.reset_zoom(), 100);
    }

    #[test]
    fn test_zoomed_drag_divides_out_scale() {
        let mut editor = Editor::default();
        let id = editor.add_element(Element::rectangle().at(100.0, 100.0));
        editor.set_zoom(200);
        drag(&mut editor, pt(220.0, 220.0), &[pt(260.0, 240.0)]);
        assert_eq!(editor.scene().element(&id).unwrap().position(), pt(120.0, 110.0));
    }

    #[test]
    fn test_preset_reset_is_destructive() {
        let mut editor = Editor::default();
        let id = editor.add_element(Element::rectangle());
        editor.add_element(Element::circle());
        editor.select([id]);
        assert_eq!(editor.apply_preset(CanvasPreset::all()[0]), 2);
        assert!(editor.scene().is_empty());
        assert!(editor.scene().selection().is_empty());
        assert!(!editor.history().can_undo());
        assert_eq!(editor.scene().canvas_size(), CanvasPreset::all()[0].size());
    }

    #[test]
    fn test_project_load_replaces_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.json");

        let mut source = Editor::new(CanvasSize::new(600, 600));
        source.add_element(Element::rectangle());
        source.update_settings(ProjectSettings {
            name: "Card".into(),
            ..ProjectSettings::default()
        });
        source.save_project(&path).unwrap();

        let mut editor = Editor::default();
        let id = editor.add_element(Element::circle());
        editor.select([id]);
        editor.load_project(&path).unwrap();
        assert_eq!(editor.scene().elements(), source.scene().elements());
        assert_eq!(editor.scene().canvas_size(), CanvasSize::new(600, 600));
        assert_eq!(editor.settings().name, "Card");
        assert!(editor.scene().selection().is_empty());
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"elements\": [").unwrap();

        let mut editor = Editor::default();
        editor.add_element(Element::rectangle());
        let before = editor.scene().snapshot();
        assert!(editor.load_project(&path).is_err());
        assert_eq!(editor.scene().snapshot(), before);
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn test_import_batch_reports_rejections() {
        let mut editor = Editor::default();
        let files = vec![
            ImportFile::new("a.png", "image/png", crate::import::tests::png_bytes(20, 10)),
            ImportFile::new("b.txt", "text/plain", b"nope".to_vec()),
            ImportFile::new("c.png", "image/png", b"not really a png".to_vec()),
            ImportFile::new("d.png", "image/png", crate::import::tests::png_bytes(1000, 1000)),
        ];
        let report = editor.import_images(&files);
        assert_eq!(report.imported.len(), 2);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(editor.history().len(), 3);

        let last = editor.scene().element(&report.imported[1]).unwrap();
        assert_eq!((last.width, last.height), (300.0, 300.0));
        assert_eq!(last.position(), pt(160.0, 160.0));
    }

    #[test]
    fn test_escape_cancels_drag() {
        let mut editor = Editor::default();
        let id = editor.add_element(Element::rectangle());
        let ctx = editor.canvas_transform(Point::ZERO);
        editor.handle_pointer(PointerEvent::down(pt(110.0, 110.0)), &ctx);
        editor.handle_pointer(PointerEvent::moved(pt(300.0, 300.0)), &ctx);
        assert_eq!(editor.handle_key(KeyEvent::plain(Key::Escape)), KeyOutcome::Handled);
        assert_eq!(editor.scene().element(&id).unwrap().position(), pt(100.0, 100.0));
        assert!(editor.controller().is_idle());
    }

    #[test]
    fn test_locked_elements_cannot_be_dragged() {
        let mut editor = Editor::default();
        let id = editor.add_element(Element::rectangle());
        editor.update_element(&id, &ElementPatch { locked: Some(true), ..Default::default() });
        let ctx = editor.canvas_transform(Point::ZERO);
        let ev = editor.handle_pointer(
            PointerEvent::Down {
                position: pt(110.0, 110.0),
                button: crate::input::MouseButton::Left,
                modifiers: Modifiers::NONE,
                click_count: 1,
            },
            &ctx,
        );
        assert_eq!(ev, TransformEvent::Ignored);
    }
}

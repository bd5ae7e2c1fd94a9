//! Pointer-driven gesture state machine: move, resize, rotate, marquee and
//! inline text editing.
//!
//! The controller only holds state for the gesture in progress. Every change
//! to the element sequence goes through [`Scene`] and is reported back as a
//! [`TransformEvent`] carrying the resulting snapshot, so the caller decides
//! what reaches history.

use crate::camera::CanvasTransform;
use crate::capture::{CaptureSlot, PointerCapture};
use crate::element::{Element, ElementId, ElementKind, ElementPatch};
use crate::input::{KeyEvent, Modifiers, PointerEvent};
use crate::scene::{Scene, Snapshot};
use crate::selection::{self, HANDLE_HIT_TOLERANCE, HandleKind, ResizeHandle};
use crate::snap::{self, SNAP_THRESHOLD, SnapGuide};
use crate::text_edit::{TextEditResult, TextEditState};
use kurbo::{Point, Rect, Vec2};

/// Coarse gesture state, without per-gesture data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Dragging,
    Resizing,
    Rotating,
    Marquee,
    EditingText,
}

/// What a controller call did.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformEvent {
    /// Nothing happened (locked element, no gesture, ignored button).
    Ignored,
    /// Only the selection changed.
    SelectionChanged,
    /// A gesture started. The selection may also have changed.
    Began(GestureState),
    /// The element sequence changed mid-gesture.
    Updated(Snapshot),
    /// A gesture finished. `result` is the final sequence if it differs from
    /// the sequence at gesture start.
    Ended {
        gesture: GestureState,
        result: Option<Snapshot>,
    },
    /// A gesture was aborted and the touched element restored.
    Cancelled(Snapshot),
    EditStarted(ElementId),
    /// Key consumed by the text editor without leaving edit mode.
    EditChanged,
    /// New content written to the scene.
    EditCommitted(Snapshot),
    /// Edit mode left without changes.
    EditCancelled,
}

#[derive(Debug)]
enum Gesture {
    Idle,
    Dragging {
        id: ElementId,
        /// Pointer position minus element origin, in canvas units.
        offset: Vec2,
        before: Element,
        _capture: PointerCapture,
    },
    Resizing {
        id: ElementId,
        handle: ResizeHandle,
        start_pointer: Point,
        initial: Rect,
        before: Element,
        _capture: PointerCapture,
    },
    Rotating {
        id: ElementId,
        /// Element center in screen coordinates.
        pivot: Point,
        before: Element,
        _capture: PointerCapture,
    },
    Marquee {
        start: Point,
        current: Point,
        additive: bool,
        base_selection: Vec<ElementId>,
        _capture: PointerCapture,
    },
    EditingText(TextEditState),
}

impl Gesture {
    fn state(&self) -> GestureState {
        match self {
            Gesture::Idle => GestureState::Idle,
            Gesture::Dragging { .. } => GestureState::Dragging,
            Gesture::Resizing { .. } => GestureState::Resizing,
            Gesture::Rotating { .. } => GestureState::Rotating,
            Gesture::Marquee { .. } => GestureState::Marquee,
            Gesture::EditingText(_) => GestureState::EditingText,
        }
    }
}

/// Drives element transforms from pointer input.
#[derive(Debug)]
pub struct TransformController {
    gesture: Gesture,
    guides: Vec<SnapGuide>,
    capture: CaptureSlot,
    snap_threshold: f64,
}

impl Default for TransformController {
    fn default() -> Self {
        Self::new(CaptureSlot::default())
    }
}

impl TransformController {
    pub fn new(capture: CaptureSlot) -> Self {
        Self {
            gesture: Gesture::Idle,
            guides: Vec::new(),
            capture,
            snap_threshold: SNAP_THRESHOLD,
        }
    }

    pub fn with_snap_threshold(mut self, threshold: f64) -> Self {
        self.snap_threshold = threshold;
        self
    }

    pub fn state(&self) -> GestureState {
        self.gesture.state()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    /// Guides for the drag in progress. Empty outside a drag.
    pub fn guides(&self) -> &[SnapGuide] {
        &self.guides
    }

    /// Marquee rectangle in canvas coordinates, while one is being dragged.
    pub fn marquee(&self) -> Option<Rect> {
        match &self.gesture {
            Gesture::Marquee { start, current, .. } => Some(Rect::from_points(*start, *current)),
            _ => None,
        }
    }

    /// Active text editing state.
    pub fn text_edit(&self) -> Option<&TextEditState> {
        match &self.gesture {
            Gesture::EditingText(state) => Some(state),
            _ => None,
        }
    }

    /// Id of the element whose gesture is in progress.
    pub fn active_element(&self) -> Option<&ElementId> {
        match &self.gesture {
            Gesture::Dragging { id, .. } | Gesture::Resizing { id, .. } | Gesture::Rotating { id, .. } => Some(id),
            Gesture::EditingText(state) => Some(state.id()),
            Gesture::Idle | Gesture::Marquee { .. } => None,
        }
    }

    pub fn handle_pointer(&mut self, scene: &mut Scene, event: PointerEvent, ctx: &CanvasTransform) -> TransformEvent {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
                click_count,
            } => {
                if button != crate::input::MouseButton::Left {
                    return TransformEvent::Ignored;
                }
                self.pointer_down(scene, position, modifiers, click_count, ctx)
            }
            PointerEvent::Move { position } => self.pointer_move(scene, position, ctx),
            PointerEvent::Up { .. } => self.pointer_up(scene),
        }
    }

    /// Start a gesture at `screen`.
    pub fn pointer_down(
        &mut self,
        scene: &mut Scene,
        screen: Point,
        modifiers: Modifiers,
        click_count: u8,
        ctx: &CanvasTransform,
    ) -> TransformEvent {
        if !self.is_idle() {
            // Presses inside the element being edited belong to the text field
            return TransformEvent::Ignored;
        }
        let point = ctx.to_canvas(screen);

        // Handles of selected elements sit partly outside their bodies, so test them first
        let tolerance = HANDLE_HIT_TOLERANCE / ctx.scale;
        let handle_hit = scene
            .elements()
            .iter()
            .rev()
            .filter(|e| selection::shows_handles(e, scene.is_selected(&e.id)))
            .find_map(|e| selection::hit_handle(e, point, tolerance).map(|kind| (e.clone(), kind)));

        if let Some((element, kind)) = handle_hit {
            if !modifiers.toggles_selection() {
                scene.set_selection([element.id.clone()]);
            }
            return self.begin_handle_gesture(element, kind, point, ctx);
        }

        let Some(element) = scene.element_at(point).cloned() else {
            return self.begin_marquee(scene, point, modifiers);
        };

        if element.locked {
            log::debug!("Ignoring press on locked element {}", element.id);
            return TransformEvent::Ignored;
        }

        if modifiers.toggles_selection() {
            scene.toggle_selection(&element.id);
            if !scene.is_selected(&element.id) {
                return TransformEvent::SelectionChanged;
            }
        } else {
            scene.set_selection([element.id.clone()]);
        }

        if click_count >= 2 {
            if let ElementKind::Text(text) = &element.kind {
                log::debug!("Editing text element {}", element.id);
                self.gesture = Gesture::EditingText(TextEditState::new(element.id.clone(), &text.content));
                return TransformEvent::EditStarted(element.id);
            }
        }

        let Some(capture) = self.capture.acquire() else {
            return TransformEvent::SelectionChanged;
        };
        log::debug!("Drag start on {}", element.id);
        self.gesture = Gesture::Dragging {
            id: element.id.clone(),
            offset: point - element.position(),
            before: element,
            _capture: capture,
        };
        TransformEvent::Began(GestureState::Dragging)
    }

    fn begin_handle_gesture(
        &mut self,
        element: Element,
        kind: HandleKind,
        point: Point,
        ctx: &CanvasTransform,
    ) -> TransformEvent {
        let Some(capture) = self.capture.acquire() else {
            return TransformEvent::SelectionChanged;
        };
        match kind {
            HandleKind::Rotate => {
                log::debug!("Rotate start on {} at {:.1}°", element.id, element.rotation);
                self.gesture = Gesture::Rotating {
                    id: element.id.clone(),
                    pivot: ctx.to_screen(element.center()),
                    before: element,
                    _capture: capture,
                };
                TransformEvent::Began(GestureState::Rotating)
            }
            HandleKind::Resize(handle) => {
                log::debug!("Resize start on {} via {:?}", element.id, handle);
                self.gesture = Gesture::Resizing {
                    id: element.id.clone(),
                    handle,
                    start_pointer: point,
                    initial: element.bounds(),
                    before: element,
                    _capture: capture,
                };
                TransformEvent::Began(GestureState::Resizing)
            }
        }
    }

    fn begin_marquee(&mut self, scene: &mut Scene, point: Point, modifiers: Modifiers) -> TransformEvent {
        let additive = modifiers.toggles_selection();
        if !additive {
            scene.clear_selection();
        }
        let Some(capture) = self.capture.acquire() else {
            return TransformEvent::SelectionChanged;
        };
        self.gesture = Gesture::Marquee {
            start: point,
            current: point,
            additive,
            base_selection: scene.selection().to_vec(),
            _capture: capture,
        };
        TransformEvent::Began(GestureState::Marquee)
    }

    /// Continue the active gesture with the pointer at `screen`.
    pub fn pointer_move(&mut self, scene: &mut Scene, screen: Point, ctx: &CanvasTransform) -> TransformEvent {
        let point = ctx.to_canvas(screen);
        match &mut self.gesture {
            Gesture::Idle | Gesture::EditingText(_) => TransformEvent::Ignored,
            Gesture::Dragging { id, offset, .. } => {
                let origin = point - *offset;
                let snapshot = scene.update_element(id, &ElementPatch::position(origin.x, origin.y));
                if let Some(moved) = scene.element(id) {
                    self.guides = snap::compute_guides(
                        id,
                        moved.bounds(),
                        scene.elements(),
                        scene.canvas_size(),
                        self.snap_threshold,
                    );
                }
                TransformEvent::Updated(snapshot)
            }
            Gesture::Resizing {
                id,
                handle,
                start_pointer,
                initial,
                ..
            } => {
                let rect = selection::resize_rect(*initial, *handle, point - *start_pointer, scene.min_element_size());
                let patch = ElementPatch::geometry(rect.x0, rect.y0, rect.width(), rect.height());
                TransformEvent::Updated(scene.update_element(id, &patch))
            }
            Gesture::Rotating { id, pivot, .. } => {
                let degrees = selection::rotation_from_pointer(*pivot, screen);
                TransformEvent::Updated(scene.update_element(id, &ElementPatch::rotation(degrees)))
            }
            Gesture::Marquee {
                start,
                current,
                additive,
                base_selection,
                ..
            } => {
                *current = point;
                let hits = scene.elements_in_rect(Rect::from_points(*start, *current));
                if *additive {
                    let mut ids = base_selection.clone();
                    ids.extend(hits);
                    scene.set_selection(ids);
                } else {
                    scene.set_selection(hits);
                }
                TransformEvent::SelectionChanged
            }
        }
    }

    /// Finish the active gesture. Dropping it releases the pointer capture.
    pub fn pointer_up(&mut self, scene: &mut Scene) -> TransformEvent {
        if matches!(self.gesture, Gesture::EditingText(_) | Gesture::Idle) {
            return TransformEvent::Ignored;
        }
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        self.guides.clear();
        let state = gesture.state();

        let result = match &gesture {
            Gesture::Dragging { id, before, .. }
            | Gesture::Resizing { id, before, .. }
            | Gesture::Rotating { id, before, .. } => {
                let changed = scene.element(id).is_some_and(|now| now != before);
                changed.then(|| scene.snapshot())
            }
            _ => None,
        };
        log::debug!("{:?} ended, changed: {}", state, result.is_some());
        TransformEvent::Ended { gesture: state, result }
    }

    /// Abort the active pointer gesture, putting the element back where it was.
    pub fn cancel(&mut self, scene: &mut Scene) -> TransformEvent {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        self.guides.clear();
        match gesture {
            Gesture::Dragging { id, before, .. }
            | Gesture::Resizing { id, before, .. }
            | Gesture::Rotating { id, before, .. } => {
                let patch = ElementPatch {
                    rotation: Some(before.rotation),
                    ..ElementPatch::geometry(before.x, before.y, before.width, before.height)
                };
                TransformEvent::Cancelled(scene.update_element(&id, &patch))
            }
            Gesture::Marquee { base_selection, .. } => {
                scene.set_selection(base_selection);
                TransformEvent::SelectionChanged
            }
            Gesture::EditingText(_) => TransformEvent::EditCancelled,
            Gesture::Idle => TransformEvent::Ignored,
        }
    }

    /// Enter edit mode on a text element without a double click.
    pub fn begin_text_edit(&mut self, scene: &mut Scene, id: &ElementId) -> TransformEvent {
        if !self.is_idle() {
            return TransformEvent::Ignored;
        }
        match scene.element(id) {
            Some(Element {
                kind: ElementKind::Text(text),
                locked: false,
                ..
            }) => {
                self.gesture = Gesture::EditingText(TextEditState::new(id.clone(), &text.content));
                scene.set_selection([id.clone()]);
                TransformEvent::EditStarted(id.clone())
            }
            _ => TransformEvent::Ignored,
        }
    }

    /// Route a key press to the text editor.
    pub fn edit_key(&mut self, scene: &mut Scene, event: KeyEvent) -> TransformEvent {
        let Gesture::EditingText(state) = &mut self.gesture else {
            return TransformEvent::Ignored;
        };
        match state.handle_key(event) {
            TextEditResult::Handled => TransformEvent::EditChanged,
            TextEditResult::NotHandled => TransformEvent::Ignored,
            TextEditResult::Commit => self.commit_text(scene),
            TextEditResult::Cancel => {
                self.gesture = Gesture::Idle;
                TransformEvent::EditCancelled
            }
        }
    }

    /// Leave edit mode keeping the edited content (Enter or blur).
    pub fn commit_text(&mut self, scene: &mut Scene) -> TransformEvent {
        let Gesture::EditingText(state) = std::mem::replace(&mut self.gesture, Gesture::Idle) else {
            return TransformEvent::Ignored;
        };
        if !state.is_modified() {
            return TransformEvent::EditCancelled;
        }
        log::debug!("Committing text for {}", state.id());
        TransformEvent::EditCommitted(scene.update_element(state.id(), &ElementPatch::content(state.text())))
    }
}

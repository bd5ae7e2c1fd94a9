//! Pointer and keyboard events delivered by the host shell.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Whether a click should toggle membership instead of replacing the selection.
    pub fn toggles_selection(&self) -> bool {
        self.command() || self.shift
    }
}

/// Pointer events in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
        /// 1 for a single click, 2 for a double click.
        click_count: u8,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
}

impl PointerEvent {
    /// Left-button single press without modifiers.
    pub fn down(position: Point) -> Self {
        PointerEvent::Down {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
            click_count: 1,
        }
    }

    pub fn moved(position: Point) -> Self {
        PointerEvent::Move { position }
    }

    pub fn up(position: Point) -> Self {
        PointerEvent::Up {
            position,
            button: MouseButton::Left,
        }
    }

    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position, .. } => position,
        }
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Character(char),
    Backspace,
    Delete,
    Enter,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(Key::Character(c), Modifiers::CTRL)
    }
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(500);
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Derives click counts for shells that only report raw presses.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last_click: Option<(Instant, Point)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a press at `position` and return its click count (1 or 2).
    pub fn press(&mut self, position: Point) -> u8 {
        self.press_at(Instant::now(), position)
    }

    pub fn press_at(&mut self, now: Instant, position: Point) -> u8 {
        let is_double = self.last_click.is_some_and(|(time, pos)| {
            now.saturating_duration_since(time) <= DOUBLE_CLICK_TIME
                && (position - pos).hypot() <= DOUBLE_CLICK_DISTANCE
        });
        if is_double {
            // A third press starts a new sequence
            self.last_click = None;
            2
        } else {
            self.last_click = Some((now, position));
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_toggles() {
        assert!(!Modifiers::NONE.toggles_selection());
        assert!(Modifiers::CTRL.toggles_selection());
        assert!(Modifiers::SHIFT.toggles_selection());
        let meta = Modifiers { meta: true, ..Modifiers::NONE };
        assert!(meta.command());
    }

    #[test]
    fn test_double_click_detection() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        let p = Point::new(10.0, 10.0);
        assert_eq!(tracker.press_at(t0, p), 1);
        assert_eq!(tracker.press_at(t0 + Duration::from_millis(200), Point::new(12.0, 11.0)), 2);
        assert_eq!(tracker.press_at(t0 + Duration::from_millis(300), p), 1);
    }

    #[test]
    fn test_slow_or_far_clicks_are_single() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        tracker.press_at(t0, Point::ZERO);
        assert_eq!(tracker.press_at(t0 + Duration::from_millis(900), Point::ZERO), 1);
        assert_eq!(tracker.press_at(t0 + Duration::from_millis(1000), Point::new(50.0, 0.0)), 1);
    }

    #[test]
    fn test_event_position() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(PointerEvent::down(p).position(), p);
        assert_eq!(PointerEvent::up(p).position(), p);
    }
}

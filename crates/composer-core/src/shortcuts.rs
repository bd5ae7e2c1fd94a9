//! Keyboard shortcut registry and documentation.

use crate::input::{Key, KeyEvent};

/// Editor action bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    DeleteSelection,
    Undo,
    Redo,
    Copy,
    Paste,
    Save,
    /// Move the selection by this many steps on each axis.
    Nudge(i8, i8),
    /// Abort the gesture in progress.
    Cancel,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone, Copy)]
pub struct Shortcut {
    pub key: Key,
    pub ctrl: bool,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: Key, ctrl: bool, command: Command, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            command,
            description,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        let key_matches = match (self.key, event.key) {
            (Key::Character(a), Key::Character(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        };
        key_matches && self.ctrl == event.modifiers.command()
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let key = match self.key {
            Key::Character(c) => c.to_ascii_uppercase().to_string(),
            other => format!("{other:?}"),
        };
        if self.ctrl { format!("Ctrl+{key}") } else { key }
    }
}

const SHORTCUTS: &[Shortcut] = &[
    Shortcut::new(Key::Delete, false, Command::DeleteSelection, "Delete selected elements"),
    Shortcut::new(Key::Character('z'), true, Command::Undo, "Undo"),
    Shortcut::new(Key::Character('y'), true, Command::Redo, "Redo"),
    Shortcut::new(Key::Character('c'), true, Command::Copy, "Copy selected elements"),
    Shortcut::new(Key::Character('v'), true, Command::Paste, "Paste copied elements"),
    Shortcut::new(Key::Character('s'), true, Command::Save, "Save project"),
    Shortcut::new(Key::ArrowLeft, false, Command::Nudge(-1, 0), "Nudge selection left"),
    Shortcut::new(Key::ArrowRight, false, Command::Nudge(1, 0), "Nudge selection right"),
    Shortcut::new(Key::ArrowUp, false, Command::Nudge(0, -1), "Nudge selection up"),
    Shortcut::new(Key::ArrowDown, false, Command::Nudge(0, 1), "Nudge selection down"),
    Shortcut::new(Key::Escape, false, Command::Cancel, "Cancel current action"),
];

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> &'static [Shortcut] {
        SHORTCUTS
    }

    /// Command bound to `event`, if any.
    pub fn resolve(event: &KeyEvent) -> Option<Command> {
        SHORTCUTS.iter().find(|s| s.matches(event)).map(|s| s.command)
    }
}

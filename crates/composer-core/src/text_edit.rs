//! Inline editing buffer for text elements.

use crate::element::ElementId;
use crate::input::{Key, KeyEvent};

/// Result of handling a text editing event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEditResult {
    /// Event was handled, text or caret may have changed.
    Handled,
    /// Enter without Shift: keep the edited content.
    Commit,
    /// Escape: throw the edits away.
    Cancel,
    /// Event was not handled (pass to other handlers).
    NotHandled,
}

/// Editing state for one text element.
///
/// Positions are byte offsets into `text` and always sit on char boundaries.
#[derive(Debug, Clone)]
pub struct TextEditState {
    id: ElementId,
    original: String,
    text: String,
    caret: usize,
    /// Other end of the selection, if any.
    anchor: Option<usize>,
}

impl TextEditState {
    /// Start editing `content`, with the whole text selected.
    pub fn new(id: ElementId, content: &str) -> Self {
        Self {
            id,
            original: content.to_string(),
            text: content.to_string(),
            caret: content.len(),
            anchor: Some(0),
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Content as it was when editing began.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_modified(&self) -> bool {
        self.text != self.original
    }

    /// Selected byte range, if non-empty.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        (anchor != self.caret).then(|| (anchor.min(self.caret), anchor.max(self.caret)))
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> TextEditResult {
        let shift = event.modifiers.shift;
        let command = event.modifiers.command();

        match event.key {
            Key::Escape => return TextEditResult::Cancel,
            Key::Enter if shift => self.insert("\n"),
            Key::Enter => return TextEditResult::Commit,
            Key::Backspace => {
                if !self.delete_selection() {
                    if let Some(prev) = self.prev_boundary(self.caret) {
                        self.text.replace_range(prev..self.caret, "");
                        self.caret = prev;
                    }
                }
            }
            Key::Delete => {
                if !self.delete_selection() {
                    if let Some(next) = self.next_boundary(self.caret) {
                        self.text.replace_range(self.caret..next, "");
                    }
                }
            }
            Key::ArrowLeft => {
                let target = match (self.selection(), shift) {
                    (Some((start, _)), false) => start,
                    _ => self.prev_boundary(self.caret).unwrap_or(0),
                };
                self.move_caret(target, shift);
            }
            Key::ArrowRight => {
                let target = match (self.selection(), shift) {
                    (Some((_, end)), false) => end,
                    _ => self.next_boundary(self.caret).unwrap_or(self.text.len()),
                };
                self.move_caret(target, shift);
            }
            Key::ArrowUp => self.move_caret(self.vertical_target(-1), shift),
            Key::ArrowDown => self.move_caret(self.vertical_target(1), shift),
            Key::Home => {
                let target = if command { 0 } else { self.line_start(self.caret) };
                self.move_caret(target, shift);
            }
            Key::End => {
                let target = if command {
                    self.text.len()
                } else {
                    self.line_end(self.caret)
                };
                self.move_caret(target, shift);
            }
            Key::Character(c) if command => {
                if c.eq_ignore_ascii_case(&'a') {
                    self.anchor = Some(0);
                    self.caret = self.text.len();
                } else {
                    return TextEditResult::NotHandled;
                }
            }
            Key::Character(c) => {
                let mut buf = [0u8; 4];
                self.insert(c.encode_utf8(&mut buf));
            }
        }
        TextEditResult::Handled
    }

    /// Insert `s` at the caret, replacing any selection.
    pub fn insert(&mut self, s: &str) {
        self.delete_selection();
        self.text.insert_str(self.caret, s);
        self.caret += s.len();
        self.anchor = None;
    }

    fn delete_selection(&mut self) -> bool {
        match self.selection() {
            Some((start, end)) => {
                self.text.replace_range(start..end, "");
                self.caret = start;
                self.anchor = None;
                true
            }
            None => {
                self.anchor = None;
                false
            }
        }
    }

    fn move_caret(&mut self, target: usize, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.caret);
        } else {
            self.anchor = None;
        }
        self.caret = target;
    }

    fn prev_boundary(&self, pos: usize) -> Option<usize> {
        self.text[..pos].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self, pos: usize) -> Option<usize> {
        self.text[pos..].chars().next().map(|c| pos + c.len_utf8())
    }

    fn line_start(&self, pos: usize) -> usize {
        self.text[..pos].rfind('\n').map_or(0, |i| i + 1)
    }

    fn line_end(&self, pos: usize) -> usize {
        self.text[pos..].find('\n').map_or(self.text.len(), |i| pos + i)
    }

    /// Caret position one line up (`-1`) or down (`1`), keeping the column in chars.
    fn vertical_target(&self, direction: i32) -> usize {
        let start = self.line_start(self.caret);
        let column = self.text[start..self.caret].chars().count();
        let target_start = if direction < 0 {
            if start == 0 {
                return 0;
            }
            self.line_start(start - 1)
        } else {
            let end = self.line_end(self.caret);
            if end == self.text.len() {
                return self.text.len();
            }
            end + 1
        };
        let target_end = self.line_end(target_start);
        self.text[target_start..target_end]
            .char_indices()
            .nth(column)
            .map_or(target_end, |(i, _)| target_start + i)
    }
}

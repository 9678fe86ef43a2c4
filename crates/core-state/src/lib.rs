//! Editor state: the buffer, cursor, mode, selection and user-facing notices.
//!
//! This is the host side of textobject requests. Actions read the cursor and
//! the active selection to build a reference region, then write back either a
//! new selection (and cursor) or an informational notice when nothing was
//! found.
//!
//! Selections store a normalized half-open range `[start, end)` in host
//! coordinates (0-indexed line and byte). A selection whose `end` lies past a
//! line's content includes that line's terminator, which is how a textobject
//! ending "just past end of line" is represented.

use core_config::TextobjectLayer;
use core_text::{Buffer, Position};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSpan {
    pub start: Position,
    pub end: Position,
}

impl SelectionSpan {
    /// Construct a new span normalizing ordering so that start <= end (line, then byte).
    pub fn new(mut a: Position, mut b: Position) -> Self {
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        Self { start: a, end: b }
    }

    /// Zero-width selection at `pos`.
    pub fn empty_at(pos: Position) -> Self {
        Self::new(pos, pos)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Last selected position, or `None` for an empty span.
    pub fn last(&self) -> Option<Position> {
        if self.is_empty() {
            return None;
        }
        if self.end.byte > 0 {
            Some(Position::new(self.end.line, self.end.byte - 1))
        } else {
            // Half-open end at a line start: the last byte is the previous
            // line's terminator.
            Some(Position::new(self.end.line.saturating_sub(1), usize::MAX))
        }
    }

    /// Absolute `(start, end_exclusive)` byte range within `buffer`.
    pub fn byte_range(&self, buffer: &Buffer) -> (usize, usize) {
        (buffer.byte_offset(self.start), buffer.byte_offset(self.end))
    }

    /// Selected text.
    pub fn text(&self, buffer: &Buffer) -> String {
        let (a, b) = self.byte_range(buffer);
        buffer.slice_bytes(a, b)
    }
}

/// Persistent (yet optionally empty) selection model.
///
/// Invariants:
/// - If `active` is `Some(span)` then `span.start <= span.end` (enforced by
///   `SelectionSpan::new`).
/// - An empty active span is a real selection (for example the inside of
///   `()`); it differs from no selection at all.
#[derive(Debug, Default, Clone)]
pub struct SelectionModel {
    /// The currently active selection; None when no user selection exists.
    pub active: Option<SelectionSpan>,
}

impl SelectionModel {
    pub fn set(&mut self, span: SelectionSpan) {
        self.active = Some(span);
    }
}

/// Current editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Normal command/navigation mode.
    #[default]
    Normal,
    /// Visual character-wise selection mode.
    VisualChar,
}

/// Informational message surfaced to the user after an action (e.g. "no
/// textobject found").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
}

/// Top-level editor state container (single buffer).
pub struct EditorState {
    pub buffer: Buffer,
    pub file_name: Option<PathBuf>,
    pub cursor: Position,
    pub mode: Mode,
    pub selection: SelectionModel,
    /// Buffer-local textobject settings layered over the config file.
    pub textobject_local: TextobjectLayer,
    pub notice: Option<Notice>,
}

impl EditorState {
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            file_name: None,
            cursor: Position::origin(),
            mode: Mode::Normal,
            selection: SelectionModel::default(),
            textobject_local: TextobjectLayer::default(),
            notice: None,
        }
    }

    /// Place the cursor, clamped onto an existing character (or column 0 of
    /// an empty line).
    pub fn set_cursor(&mut self, pos: Position) {
        let mut pos = pos;
        self.buffer.clamp(&mut pos);
        let len = self.buffer.line_byte_len(pos.line);
        if len > 0 && pos.byte >= len {
            pos.byte = len - 1;
        }
        self.cursor = pos;
    }

    pub fn selection(&self) -> Option<SelectionSpan> {
        self.selection.active
    }

    /// Replace the selection and enter Visual mode.
    pub fn select(&mut self, span: SelectionSpan) {
        self.selection.set(span);
        self.mode = Mode::VisualChar;
    }

    pub fn set_notice<S: Into<String>>(&mut self, text: S) {
        self.notice = Some(Notice { text: text.into() });
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

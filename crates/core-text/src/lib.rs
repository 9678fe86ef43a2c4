//! Rope-based text buffer abstraction.
//!
//! This crate stands in for the host editor's buffer storage. The textobject
//! engine never touches the rope directly; it reads whole lines through the
//! [`LineSource`] trait so any host that can hand out line ranges can drive a
//! search.

use anyhow::Result;
use ropey::Rope;

/// A text buffer backed by a `ropey::Rope`.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
}

/// A host cursor position expressed as (line index, byte offset within that line).
///
/// Both fields are 0-indexed, which is the convention at the host boundary.
/// The textobject engine works with 1-indexed coordinates and converts at the
/// edge of its public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub byte: usize,
}

impl Position {
    pub fn new(line: usize, byte: usize) -> Self {
        Self { line, byte }
    }
    pub fn origin() -> Self {
        Self { line: 0, byte: 0 }
    }
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.line = 0;
            self.byte = 0;
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
        }
        let max_len = line_len_fn(self.line);
        if self.byte > max_len {
            self.byte = max_len;
        }
    }
}

/// Read-only line access consumed by the textobject engine.
///
/// Line numbers are 1-indexed and ranges inclusive, mirroring the editor API
/// the engine was designed against. Returned lines never carry their line
/// terminator.
pub trait LineSource {
    /// Total number of lines. An empty buffer still reports one (empty) line.
    fn line_count(&self) -> usize;

    /// Lines `start..=end`. Out-of-range requests are clamped; an inverted
    /// range yields an empty vector.
    fn lines(&self, start: usize, end: usize) -> Vec<String>;
}

impl<T: LineSource + ?Sized> LineSource for &T {
    fn line_count(&self) -> usize {
        (**self).line_count()
    }
    fn lines(&self, start: usize, end: usize) -> Vec<String> {
        (**self).lines(start, end)
    }
}

/// Plain in-memory lines. Handy for tests and for hosts that already keep a
/// `Vec<String>` snapshot.
impl LineSource for [String] {
    fn line_count(&self) -> usize {
        self.len().max(1)
    }
    fn lines(&self, start: usize, end: usize) -> Vec<String> {
        let start = start.max(1);
        let end = end.min(self.len());
        if start > end {
            return Vec::new();
        }
        self[start - 1..end].to_vec()
    }
}

impl LineSource for Vec<String> {
    fn line_count(&self) -> usize {
        self.as_slice().line_count()
    }
    fn lines(&self, start: usize, end: usize) -> Vec<String> {
        self.as_slice().lines(start, end)
    }
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_str(name: impl Into<String>, content: &str) -> Result<Self> {
        Ok(Self {
            rope: Rope::from_str(content),
            name: name.into(),
        })
    }

    /// Total number of rope lines (a trailing newline opens an extra empty line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Return the requested line as an owned `String` (including trailing newline if present).
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx < self.rope.len_lines() {
            Some(self.rope.line(idx).to_string())
        } else {
            None
        }
    }

    /// Byte length of a line (excluding any newline) for clamping purposes.
    pub fn line_byte_len(&self, idx: usize) -> usize {
        if idx >= self.rope.len_lines() {
            return 0;
        }
        self.line_content(idx).len()
    }

    /// Line text without its terminator (`\n` or `\r\n`).
    pub fn line_content(&self, idx: usize) -> String {
        let mut s = match self.line(idx) {
            Some(s) => s,
            None => return String::new(),
        };
        if s.ends_with('\n') {
            s.pop();
            if s.ends_with('\r') {
                s.pop();
            }
        }
        s
    }

    /// Number of lines as an editor displays them: a terminating newline does
    /// not open a phantom line at the end.
    pub fn editor_line_count(&self) -> usize {
        let n = self.rope.len_lines();
        if n > 1 && self.rope.line(n - 1).len_chars() == 0 {
            n - 1
        } else {
            n
        }
    }

    /// Clamp a host position into the buffer (line within range, byte within line).
    pub fn clamp(&self, pos: &mut Position) {
        let count = self.editor_line_count();
        pos.clamp_to(count, |l| self.line_byte_len(l));
    }

    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Absolute byte offset of `pos`. Bytes past the line's content run into
    /// its terminator and beyond; the result is clamped to the buffer length.
    pub fn byte_offset(&self, pos: Position) -> usize {
        let line = pos.line.min(self.rope.len_lines().saturating_sub(1));
        let start = self.rope.line_to_byte(line);
        (start + pos.byte).min(self.rope.len_bytes())
    }

    /// Text between two absolute byte offsets. Offsets inside a multi-byte
    /// character snap to that character's start.
    pub fn slice_bytes(&self, start: usize, end: usize) -> String {
        let len = self.rope.len_bytes();
        let (start, end) = (start.min(len), end.min(len));
        if start >= end {
            return String::new();
        }
        let a = self.rope.byte_to_char(start);
        let b = self.rope.byte_to_char(end);
        self.rope.slice(a..b).to_string()
    }
}

impl LineSource for Buffer {
    fn line_count(&self) -> usize {
        self.editor_line_count()
    }

    fn lines(&self, start: usize, end: usize) -> Vec<String> {
        let start = start.max(1);
        let end = end.min(self.editor_line_count());
        (start..=end).map(|l| self.line_content(l - 1)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_buffer_and_read_line() {
        let b = Buffer::from_str("test", "hello\nworld").unwrap();
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line(0).unwrap(), "hello\n");
        assert_eq!(b.line(1).unwrap(), "world");
    }

    #[test]
    fn trailing_newline_does_not_add_editor_line() {
        let b = Buffer::from_str("t", "a\nb\n").unwrap();
        assert_eq!(b.line_count(), 3); // rope view
        assert_eq!(LineSource::line_count(&b), 2);
        assert_eq!(b.lines(1, 5), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn lines_strip_crlf_terminators() {
        let b = Buffer::from_str("t", "ab\r\ncd").unwrap();
        assert_eq!(b.lines(1, 2), vec!["ab".to_string(), "cd".to_string()]);
        assert_eq!(b.line_byte_len(0), 2);
    }

    #[test]
    fn empty_buffer_reports_single_line() {
        let b = Buffer::from_str("t", "").unwrap();
        assert_eq!(LineSource::line_count(&b), 1);
        assert_eq!(b.lines(1, 1), vec![String::new()]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let lines = vec!["x".to_string(), "y".to_string()];
        assert!(lines.lines(2, 1).is_empty());
        assert_eq!(lines.lines(0, 1), vec!["x".to_string()]);
    }

    #[test]
    fn byte_offsets_cross_line_terminators() {
        let b = Buffer::from_str("t", "(\naa\n)\n").unwrap();
        assert_eq!(b.byte_offset(Position::new(1, 0)), 2);
        // One past "aa" is the terminator of line 1.
        let end = b.byte_offset(Position::new(1, 3));
        assert_eq!(b.slice_bytes(b.byte_offset(Position::new(0, 1)), end), "\naa\n");
        assert_eq!(b.byte_offset(Position::new(9, 9)), b.len_bytes());
    }

    #[test]
    fn slice_snaps_to_char_boundaries() {
        let b = Buffer::from_str("t", "é(x)").unwrap();
        assert_eq!(b.slice_bytes(1, 5), "é(x)");
        assert_eq!(b.slice_bytes(4, 2), "");
    }

    #[test]
    fn clamp_pulls_position_into_buffer() {
        let b = Buffer::from_str("t", "abc\nde\n").unwrap();
        let mut pos = Position::new(7, 9);
        b.clamp(&mut pos);
        assert_eq!(pos, Position::new(1, 2));
    }
}

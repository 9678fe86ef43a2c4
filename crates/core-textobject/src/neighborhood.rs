//! Text window around a reference region.
//!
//! A neighborhood is materialised once per search attempt: the reference
//! region's lines plus `n_neighbors` lines above and below, each suffixed with
//! `'\n'` and concatenated into one string. The terminator keeps "end of line
//! N" distinct from "start of line N+1" in 1D offsets, and lets columns one past
//! the last character round-trip.

use crate::region::{Position, Region, Span};
use core_text::LineSource;

#[derive(Debug, Clone)]
pub struct Neighborhood {
    n_neighbors: usize,
    line_start: usize,
    lines: Vec<String>,
    text: String,
}

impl Neighborhood {
    /// Read lines `max(1, ref.left.line - n) ..= min(total, ref.right.line + n)`.
    pub fn build<S: LineSource + ?Sized>(source: &S, reference: &Region, n_neighbors: usize) -> Self {
        let top = reference.left.line.min(reference.right.line);
        let bottom = reference.left.line.max(reference.right.line);
        let line_start = top.saturating_sub(n_neighbors).max(1);
        let line_end = source.line_count().min(bottom.saturating_add(n_neighbors));
        let mut lines: Vec<String> = source
            .lines(line_start, line_end)
            .into_iter()
            .map(|mut l| {
                l.push('\n');
                l
            })
            .collect();
        if lines.is_empty() {
            lines.push("\n".to_string());
        }
        let text = lines.concat();
        Self {
            n_neighbors,
            line_start,
            lines,
            text,
        }
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// Buffer line number of the first window line.
    pub fn line_start(&self) -> usize {
        self.line_start
    }

    /// Window lines, each with its terminator.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The concatenated window.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-indexed inclusive byte slice; empty for an empty span. Spans come
    /// from byte-oriented matching and may split a multi-byte character.
    pub fn slice(&self, span: Span) -> &[u8] {
        let bytes = self.text.as_bytes();
        if span.is_empty() {
            return &[];
        }
        let end = span.right.min(bytes.len());
        let start = span.left.saturating_sub(1).min(end);
        &bytes[start..end]
    }

    /// Lines above the window clamp to its first line. Lines below it are
    /// extrapolated with the last line's length so past-the-end positions
    /// still map monotonically.
    pub fn pos_to_offset(&self, pos: Position) -> usize {
        let rel = pos.line.saturating_sub(self.line_start);
        let inside = rel.min(self.lines.len());
        let mut offset: usize = self.lines[..inside].iter().map(String::len).sum();
        if rel > inside {
            let last = self.lines.last().map_or(1, String::len);
            offset += (rel - inside) * last;
        }
        offset + pos.col
    }

    /// The returned column may be one past the line's last character.
    pub fn offset_to_pos(&self, offset: usize) -> Position {
        let mut idx = 0;
        let mut line_offset = 0;
        while idx < self.lines.len() && line_offset + self.lines[idx].len() < offset {
            line_offset += self.lines[idx].len();
            idx += 1;
        }
        Position::new(self.line_start + idx, offset - line_offset)
    }

    pub fn region_to_span(&self, region: &Region) -> Span {
        Span::new(self.pos_to_offset(region.left), self.pos_to_offset(region.right))
    }

    pub fn span_to_region(&self, span: Span) -> Region {
        Region::new(self.offset_to_pos(span.left), self.offset_to_pos(span.right))
    }
}

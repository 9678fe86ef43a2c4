//! Coordinates used by the engine.
//!
//! * [`Position`] / [`Region`]: 2D, 1-indexed `(line, col)` in the buffer.
//! * [`Span`]: 1D, 1-indexed inclusive byte offsets into a neighborhood string.
//!
//! Empty values are legal. An empty span is `[l, l - 1]` (the point just before
//! offset `l`); an empty region keeps `right` one column before `left`, which
//! may be column 0 or the terminator column of the previous line.

use crate::error::{Result, TextobjectError};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Convert a host cursor (0-indexed line and byte column).
    pub fn from_host(pos: core_text::Position) -> Self {
        Self {
            line: pos.line + 1,
            col: pos.byte + 1,
        }
    }

    /// Convert back to host convention. Column 0 (right end of an empty
    /// region) saturates to the line start.
    pub fn to_host(self) -> core_text::Position {
        core_text::Position::new(self.line.saturating_sub(1), self.col.saturating_sub(1))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub left: Position,
    pub right: Position,
}

impl Region {
    pub const fn new(left: Position, right: Position) -> Self {
        Self { left, right }
    }

    /// Empty region anchored at `pos`.
    pub const fn empty_at(pos: Position) -> Self {
        Self {
            left: pos,
            right: Position::new(pos.line, pos.col.saturating_sub(1)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.right < self.left
    }

    pub fn edge(&self, side: Side) -> Position {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.left, self.right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub left: usize,
    pub right: usize,
}

impl Span {
    pub const fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    /// Empty span sitting just before offset `left`.
    pub const fn empty_at(left: usize) -> Self {
        Self {
            left,
            right: left.saturating_sub(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.right < self.left
    }

    /// Number of bytes covered.
    pub fn width(&self) -> usize {
        (self.right + 1).saturating_sub(self.left)
    }

    /// `self` covers `other` when `other` lies within `self`'s bounds. An empty
    /// `other` is a point; it is covered when `self` contains the byte at it.
    pub fn covers(&self, other: &Span) -> bool {
        if other.is_empty() {
            self.left <= other.left && other.left <= self.right
        } else {
            self.left <= other.left && other.right <= self.right
        }
    }

    pub fn offset(self, by: usize) -> Self {
        Self::new(self.left + by, self.right + by)
    }
}

/// Edge of a found region used when moving the cursor onto a textobject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl FromStr for Side {
    type Err = TextobjectError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(TextobjectError::InvalidSide(other.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

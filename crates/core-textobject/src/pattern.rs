//! Single-pass string patterns.
//!
//! Textobject grammars are written in a small pattern dialect modelled on Lua
//! patterns rather than regular expressions. Matching is byte oriented and
//! backtracks only inside one pattern; there is no alternation and no
//! grouping beyond captures.
//!
//! Supported items:
//! * literal bytes, `.` (any byte), `%x` escapes for non-alphanumeric bytes;
//! * classes `%a %c %d %g %l %p %s %u %w %x` and their upper-case complements;
//! * sets `[...]` / `[^...]` with ranges (`a-z`) and classes;
//! * quantifiers `*`, `+`, `-` (lazy) and `?`;
//! * `^` anchor at pattern start and `$` anchor at pattern end;
//! * captures `( )`, position captures `()`, back-references `%1`..`%9`;
//! * `%bxy` balanced runs and `%f[set]` frontiers.
//!
//! Positions handed back to callers are 0-based byte indices for match bounds
//! (`start..end`) and 1-based for position captures, which is the convention
//! extraction templates are written against.

use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

const MAX_CAPTURES: usize = 32;
const MAX_DEPTH: usize = 200;
const ESC: u8 = b'%';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("malformed pattern (ends with '%') in '{0}'")]
    TrailingEscape(String),
    #[error("malformed pattern (missing ']') in '{0}'")]
    UnclosedSet(String),
    #[error("missing arguments to '%b' in '{0}'")]
    MissingBalanceArgs(String),
    #[error("missing '[' after '%f' in '{0}'")]
    MissingFrontierSet(String),
    #[error("invalid pattern capture in '{0}'")]
    InvalidCapture(String),
    #[error("unfinished capture in '{0}'")]
    UnfinishedCapture(String),
    #[error("invalid capture index %{index} in '{pattern}'")]
    InvalidCaptureIndex { index: u8, pattern: String },
    #[error("too many captures in '{0}'")]
    TooManyCaptures(String),
}

/// One captured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// `()`: 1-based position of the byte following the capture point.
    Position(usize),
    /// `(...)`: 0-based half-open byte range of the captured text.
    Text { start: usize, end: usize },
}

/// A successful match: 0-based half-open bounds plus captures in pattern order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub captures: SmallVec<[Capture; 4]>,
}

/// A validated pattern.
#[derive(Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    capture_count: usize,
    lazy: Option<Box<(Pattern, Pattern)>>,
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.source)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Pattern {
    /// Validate `source` and prepare it for matching.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let mut pattern = Self::compile_plain(source)?;
        pattern.lazy = split_lazy(source).map(Box::new);
        Ok(pattern)
    }

    fn compile_plain(source: &str) -> Result<Self, PatternError> {
        let capture_count = validate(source.as_bytes(), source)?;
        Ok(Self {
            source: source.to_string(),
            capture_count,
            lazy: None,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of captures (both kinds) declared by the pattern.
    pub fn capture_count(&self) -> usize {
        self.capture_count
    }

    /// Whether the pattern starts with the `^` anchor.
    pub fn is_anchored(&self) -> bool {
        self.source.starts_with('^')
    }

    /// `%bxx`: balanced run whose opening and closing delimiter coincide
    /// (quotes). Such matches never nest, so scanning resumes after them.
    pub fn is_same_balanced(&self) -> bool {
        let b = self.source.as_bytes();
        b.len() == 4 && b[0] == ESC && b[1] == b'b' && b[2] == b[3]
    }

    /// Sub-patterns around the first unescaped top-level `.-` item, for
    /// patterns shaped like `A.-B` with a non-empty `A`.
    pub fn lazy_parts(&self) -> Option<(&Pattern, &Pattern)> {
        self.lazy.as_deref().map(|(a, b)| (a, b))
    }

    /// First match starting at or after the 1-based `init`.
    ///
    /// An anchored pattern is only tried at `init` itself.
    pub fn find(&self, text: impl AsRef<[u8]>, init: usize) -> Option<Match> {
        let src = text.as_ref();
        let init = init.max(1);
        if init > src.len() + 1 {
            return None;
        }
        let pat = self.source.as_bytes();
        let (anchored, p0) = if pat.first() == Some(&b'^') {
            (true, 1)
        } else {
            (false, 0)
        };
        let mut s = init - 1;
        loop {
            let mut ms = MatchState::new(src, pat);
            if let Some(end) = ms.do_match(s, p0) {
                return Some(Match {
                    start: s,
                    end,
                    captures: ms.collect(),
                });
            }
            s += 1;
            if anchored || s > src.len() {
                return None;
            }
        }
    }

    /// Captures of the first match in `text`; `None` when nothing matches.
    pub fn captures(&self, text: impl AsRef<[u8]>) -> Option<SmallVec<[Capture; 4]>> {
        self.find(text, 1).map(|m| m.captures)
    }
}

/// Escape every non-alphanumeric byte so `text` matches itself literally.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if c.is_ascii() && !c.is_ascii_alphanumeric() {
            out.push('%');
        }
        out.push(c);
    }
    out
}

// Index just past the single-item class starting at `p`. Caller guarantees a
// validated pattern.
fn class_end(pat: &[u8], mut p: usize) -> Option<usize> {
    let c = *pat.get(p)?;
    p += 1;
    match c {
        ESC => {
            if p >= pat.len() {
                None
            } else {
                Some(p + 1)
            }
        }
        b'[' => {
            if pat.get(p) == Some(&b'^') {
                p += 1;
            }
            loop {
                let c = *pat.get(p)?;
                p += 1;
                if c == ESC {
                    if p >= pat.len() {
                        return None;
                    }
                    p += 1;
                }
                if pat.get(p) == Some(&b']') {
                    return Some(p + 1);
                }
                if p >= pat.len() {
                    return None;
                }
            }
        }
        _ => Some(p),
    }
}

fn validate(pat: &[u8], source: &str) -> Result<usize, PatternError> {
    let mut p = usize::from(pat.first() == Some(&b'^'));
    let mut opened: Vec<usize> = Vec::new();
    let mut count = 0usize;
    while p < pat.len() {
        match pat[p] {
            b'(' => {
                count += 1;
                if count > MAX_CAPTURES {
                    return Err(PatternError::TooManyCaptures(source.to_string()));
                }
                if pat.get(p + 1) == Some(&b')') {
                    p += 2;
                } else {
                    opened.push(count);
                    p += 1;
                }
                continue;
            }
            b')' => {
                if opened.pop().is_none() {
                    return Err(PatternError::InvalidCapture(source.to_string()));
                }
                p += 1;
                continue;
            }
            ESC => match pat.get(p + 1) {
                None => return Err(PatternError::TrailingEscape(source.to_string())),
                Some(b'b') => {
                    if p + 3 >= pat.len() {
                        return Err(PatternError::MissingBalanceArgs(source.to_string()));
                    }
                    p += 4;
                    continue;
                }
                Some(b'f') => {
                    if pat.get(p + 2) != Some(&b'[') {
                        return Err(PatternError::MissingFrontierSet(source.to_string()));
                    }
                    p = class_end(pat, p + 2)
                        .ok_or_else(|| PatternError::UnclosedSet(source.to_string()))?;
                    continue;
                }
                Some(d) if d.is_ascii_digit() => {
                    let index = d - b'0';
                    let idx = usize::from(index);
                    if idx == 0 || idx > count || opened.contains(&idx) {
                        return Err(PatternError::InvalidCaptureIndex {
                            index,
                            pattern: source.to_string(),
                        });
                    }
                    p += 2;
                    continue;
                }
                _ => {}
            },
            _ => {}
        }
        let ep = class_end(pat, p).ok_or_else(|| match pat[p] {
            ESC => PatternError::TrailingEscape(source.to_string()),
            _ => PatternError::UnclosedSet(source.to_string()),
        })?;
        p = ep;
        if matches!(pat.get(p), Some(b'*' | b'+' | b'-' | b'?')) {
            p += 1;
        }
    }
    if !opened.is_empty() {
        return Err(PatternError::UnfinishedCapture(source.to_string()));
    }
    Ok(count)
}

// Locate the first top-level `.-` item that is not the very first item
// after an optional `^`.
fn split_lazy(source: &str) -> Option<(Pattern, Pattern)> {
    let pat = source.as_bytes();
    let start = usize::from(pat.first() == Some(&b'^'));
    let mut p = start;
    while p < pat.len() {
        match pat[p] {
            b'(' | b')' => {
                p += 1;
                continue;
            }
            ESC if pat.get(p + 1) == Some(&b'b') => {
                p += 4;
                continue;
            }
            ESC if pat.get(p + 1) == Some(&b'f') => {
                p = class_end(pat, p + 2)?;
                continue;
            }
            b'.' if p > start && pat.get(p + 1) == Some(&b'-') => {
                let left = Pattern::compile_plain(&source[..p]).ok()?;
                let right = Pattern::compile_plain(&source[p + 2..]).ok()?;
                return Some((left, right));
            }
            _ => {}
        }
        p = class_end(pat, p)?;
        if matches!(pat.get(p), Some(b'*' | b'+' | b'-' | b'?')) {
            p += 1;
        }
    }
    None
}

fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn match_class(c: u8, cl: u8) -> bool {
    let res = match cl.to_ascii_lowercase() {
        b'a' => c.is_ascii_alphabetic(),
        b'c' => c.is_ascii_control(),
        b'd' => c.is_ascii_digit(),
        b'g' => c.is_ascii_graphic(),
        b'l' => c.is_ascii_lowercase(),
        b'p' => c.is_ascii_punctuation(),
        b's' => is_space(c),
        b'u' => c.is_ascii_uppercase(),
        b'w' => c.is_ascii_alphanumeric(),
        b'x' => c.is_ascii_hexdigit(),
        _ => return cl == c,
    };
    if cl.is_ascii_uppercase() { !res } else { res }
}

// `p` at '[', `ec` at the closing ']'.
fn match_bracket_class(pat: &[u8], c: u8, mut p: usize, ec: usize) -> bool {
    let mut sig = true;
    if pat[p + 1] == b'^' {
        sig = false;
        p += 1;
    }
    p += 1;
    while p < ec {
        if pat[p] == ESC {
            p += 1;
            if match_class(c, pat[p]) {
                return sig;
            }
        } else if pat[p + 1] == b'-' && p + 2 < ec {
            if pat[p] <= c && c <= pat[p + 2] {
                return sig;
            }
            p += 2;
        } else if pat[p] == c {
            return sig;
        }
        p += 1;
    }
    !sig
}

fn single_match(pat: &[u8], c: u8, p: usize, ep: usize) -> bool {
    match pat[p] {
        b'.' => true,
        ESC => match_class(c, pat[p + 1]),
        b'[' => match_bracket_class(pat, c, p, ep - 1),
        lit => lit == c,
    }
}

#[derive(Clone, Copy)]
enum CapLen {
    Unclosed,
    Position,
    Len(usize),
}

struct MatchState<'a> {
    src: &'a [u8],
    pat: &'a [u8],
    depth: usize,
    captures: SmallVec<[(usize, CapLen); 4]>,
}

impl<'a> MatchState<'a> {
    fn new(src: &'a [u8], pat: &'a [u8]) -> Self {
        Self {
            src,
            pat,
            depth: 0,
            captures: SmallVec::new(),
        }
    }

    fn collect(&self) -> SmallVec<[Capture; 4]> {
        self.captures
            .iter()
            .map(|&(init, len)| match len {
                CapLen::Position => Capture::Position(init + 1),
                CapLen::Len(n) => Capture::Text {
                    start: init,
                    end: init + n,
                },
                CapLen::Unclosed => Capture::Text {
                    start: init,
                    end: init,
                },
            })
            .collect()
    }

    fn do_match(&mut self, s: usize, p: usize) -> Option<usize> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let res = self.match_items(s, p);
        self.depth -= 1;
        res
    }

    fn match_items(&mut self, mut s: usize, mut p: usize) -> Option<usize> {
        let pat = self.pat;
        loop {
            if p == pat.len() {
                return Some(s);
            }
            match pat[p] {
                b'(' => {
                    return if pat.get(p + 1) == Some(&b')') {
                        self.start_capture(s, p + 2, CapLen::Position)
                    } else {
                        self.start_capture(s, p + 1, CapLen::Unclosed)
                    };
                }
                b')' => return self.end_capture(s, p + 1),
                b'$' if p + 1 == pat.len() => {
                    return (s == self.src.len()).then_some(s);
                }
                ESC if pat.get(p + 1) == Some(&b'b') => {
                    s = self.match_balance(s, p + 2)?;
                    p += 4;
                    continue;
                }
                ESC if pat.get(p + 1) == Some(&b'f') => {
                    let set = p + 2;
                    let ep = class_end(pat, set)?;
                    let prev = if s == 0 { 0 } else { self.src[s - 1] };
                    let cur = self.src.get(s).copied().unwrap_or(0);
                    if !match_bracket_class(pat, prev, set, ep - 1)
                        && match_bracket_class(pat, cur, set, ep - 1)
                    {
                        p = ep;
                        continue;
                    }
                    return None;
                }
                ESC if pat.get(p + 1).is_some_and(u8::is_ascii_digit) => {
                    s = self.match_capture(s, pat[p + 1])?;
                    p += 2;
                    continue;
                }
                _ => {}
            }
            let ep = class_end(pat, p)?;
            let m = s < self.src.len() && single_match(pat, self.src[s], p, ep);
            match pat.get(ep) {
                Some(b'?') => {
                    if m && let Some(res) = self.do_match(s + 1, ep + 1) {
                        return Some(res);
                    }
                    p = ep + 1;
                }
                Some(b'+') => return if m { self.max_expand(s + 1, p, ep) } else { None },
                Some(b'*') => return self.max_expand(s, p, ep),
                Some(b'-') => return self.min_expand(s, p, ep),
                _ => {
                    if !m {
                        return None;
                    }
                    s += 1;
                    p = ep;
                }
            }
        }
    }

    fn max_expand(&mut self, s: usize, p: usize, ep: usize) -> Option<usize> {
        let mut i = 0usize;
        while s + i < self.src.len() && single_match(self.pat, self.src[s + i], p, ep) {
            i += 1;
        }
        loop {
            if let Some(res) = self.do_match(s + i, ep + 1) {
                return Some(res);
            }
            if i == 0 {
                return None;
            }
            i -= 1;
        }
    }

    fn min_expand(&mut self, mut s: usize, p: usize, ep: usize) -> Option<usize> {
        loop {
            if let Some(res) = self.do_match(s, ep + 1) {
                return Some(res);
            }
            if s < self.src.len() && single_match(self.pat, self.src[s], p, ep) {
                s += 1;
            } else {
                return None;
            }
        }
    }

    fn start_capture(&mut self, s: usize, p: usize, what: CapLen) -> Option<usize> {
        self.captures.push((s, what));
        let res = self.do_match(s, p);
        if res.is_none() {
            self.captures.pop();
        }
        res
    }

    fn end_capture(&mut self, s: usize, p: usize) -> Option<usize> {
        let l = self
            .captures
            .iter()
            .rposition(|(_, len)| matches!(len, CapLen::Unclosed))?;
        let init = self.captures[l].0;
        self.captures[l].1 = CapLen::Len(s - init);
        let res = self.do_match(s, p);
        if res.is_none() {
            self.captures[l].1 = CapLen::Unclosed;
        }
        res
    }

    fn match_balance(&self, s: usize, p: usize) -> Option<usize> {
        let (open, close) = (self.pat[p], self.pat[p + 1]);
        if self.src.get(s) != Some(&open) {
            return None;
        }
        let mut depth = 1usize;
        for (i, &c) in self.src.iter().enumerate().skip(s + 1) {
            if c == close {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            } else if c == open {
                depth += 1;
            }
        }
        None
    }

    fn match_capture(&self, s: usize, digit: u8) -> Option<usize> {
        let idx = usize::from(digit - b'0').checked_sub(1)?;
        let (init, len) = *self.captures.get(idx)?;
        let CapLen::Len(len) = len else {
            return None;
        };
        let captured = &self.src[init..init + len];
        self.src[s..].starts_with(captured).then_some(s + len)
    }
}

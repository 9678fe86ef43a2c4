//! Search policies and the candidate ordering they induce.

use crate::error::{Result, TextobjectError};
use crate::region::Span;
use std::fmt;
use std::str::FromStr;

/// How a candidate that does not cover the reference is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchMethod {
    /// Only covering candidates.
    Cover,
    /// Covering, else the closest candidate at or after the reference.
    #[default]
    CoverOrNext,
    /// Covering, else the closest candidate at or before the reference.
    CoverOrPrev,
    /// Covering, else the closest candidate in either direction.
    CoverOrNearest,
}

impl SearchMethod {
    pub const ALL: [SearchMethod; 4] = [
        Self::Cover,
        Self::CoverOrNext,
        Self::CoverOrPrev,
        Self::CoverOrNearest,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::CoverOrNext => "cover_or_next",
            Self::CoverOrPrev => "cover_or_prev",
            Self::CoverOrNearest => "cover_or_nearest",
        }
    }

    fn is_eligible(self, candidate: &Span, reference: &Span) -> bool {
        match self {
            Self::Cover => false,
            Self::CoverOrNext => is_on_left(reference, candidate),
            Self::CoverOrPrev => is_on_left(candidate, reference),
            Self::CoverOrNearest => true,
        }
    }

    fn distance(self, candidate: &Span, reference: &Span) -> usize {
        let left = candidate.left.abs_diff(reference.left);
        let right = candidate.right.abs_diff(reference.right);
        match self {
            Self::Cover | Self::CoverOrNext => left,
            Self::CoverOrPrev => right,
            Self::CoverOrNearest => left.min(right),
        }
    }
}

impl FromStr for SearchMethod {
    type Err = TextobjectError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| TextobjectError::InvalidSearchMethod(s.to_string()))
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// `a` lies to the left of `b`: both bounds at or before `b`'s.
fn is_on_left(a: &Span, b: &Span) -> bool {
    a.left <= b.left && a.right <= b.right
}

fn covers(outer: Option<&Span>, inner: &Span) -> bool {
    outer.is_some_and(|o| o.covers(inner))
}

/// Whether `candidate` should replace `current` as the best match for
/// `reference` under `method`.
///
/// A candidate equal to the reference is never better; covering candidates
/// beat non-covering ones and narrower covering beats wider. Non-covering
/// candidates are ranked by the method's directional distance and must not sit
/// inside the reference.
pub fn is_better_span(candidate: &Span, current: Option<&Span>, reference: &Span, method: SearchMethod) -> bool {
    if candidate == reference {
        return false;
    }
    let candidate_covers = candidate.covers(reference);
    let current_covers = covers(current, reference);
    match (candidate_covers, current_covers) {
        (true, false) => return true,
        (false, true) => return false,
        (true, true) => {
            return current.is_some_and(|c| candidate.width() < c.width());
        }
        (false, false) => {}
    }
    if method == SearchMethod::Cover || reference.covers(candidate) {
        return false;
    }
    if !method.is_eligible(candidate, reference) {
        return false;
    }
    match current {
        None => true,
        Some(current) => method.distance(candidate, reference) < method.distance(current, reference),
    }
}

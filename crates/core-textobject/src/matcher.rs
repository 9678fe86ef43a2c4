//! Enumerates spans matched by a nested pattern.
//!
//! Level 1 is searched over the whole neighborhood string, every following
//! level inside the previous level's match. Only final-level matches are
//! reported, each absolute span at most once per call.

use crate::composed::NestedPattern;
use crate::pattern::Pattern;
use crate::region::Span;
use std::collections::HashSet;
use tracing::trace;

/// One step of the single-pass search: first match at or after 1-based `init`,
/// as a 1-based inclusive span local to `text`.
///
/// * An anchored pattern only matches when `init == 1`.
/// * Patterns shaped `A.-B` pick their closing `B` relative to `reference`
///   (see [`find_lazy`]).
pub fn string_find(text: &[u8], pattern: &Pattern, init: usize, reference: Span) -> Option<Span> {
    if pattern.is_anchored() && init > 1 {
        return None;
    }
    if let Some((a, b)) = pattern.lazy_parts() {
        return find_lazy(text, a, b, init, reference);
    }
    pattern
        .find(text, init)
        .map(|m| Span::new(m.start + 1, m.end))
}

/// `A.-B` search. Take the first `A` at or after `init`, then walk `B`
/// candidates after it:
/// * `A` not covered by `reference`: accept the first `B` ending exactly at
///   `reference.right` or not covered by `reference`;
/// * `A` covered: accept the first `B` not covered.
///
/// This lets repeated searches on symmetric delimiters (quotes) grow past the
/// current selection instead of re-finding it.
pub fn find_lazy(text: &[u8], a: &Pattern, b: &Pattern, init: usize, reference: Span) -> Option<Span> {
    let am = a.find(text, init)?;
    let a_span = Span::new(am.start + 1, am.end);
    let a_covered = reference.covers(&a_span);
    let mut from = am.end + 1;
    loop {
        let bm = b.find(text, from)?;
        let b_span = Span::new(bm.start + 1, bm.end);
        let b_covered = reference.covers(&b_span);
        let accept = if a_covered {
            !b_covered
        } else {
            b_span.right == reference.right || !b_covered
        };
        if accept {
            return Some(Span::new(a_span.left, b_span.right));
        }
        from = bm.start + 2;
    }
}

/// Call `visit` with every distinct absolute span matched by `nested`.
pub fn for_each_matching_span<F>(text: &str, nested: &NestedPattern<'_>, reference: Span, mut visit: F)
where
    F: FnMut(Span),
{
    let mut walk = Walk {
        patterns: nested.patterns(),
        reference,
        visited: HashSet::new(),
    };
    walk.level(0, text.as_bytes(), 0, &mut visit);
}

struct Walk<'p, 'a> {
    patterns: &'p [&'a Pattern],
    reference: Span,
    visited: HashSet<(usize, usize)>,
}

impl Walk<'_, '_> {
    fn level<F: FnMut(Span)>(&mut self, level: usize, text: &[u8], offset: usize, visit: &mut F) {
        let pattern = self.patterns[level];
        let is_last = level + 1 == self.patterns.len();
        let same_balanced = pattern.is_same_balanced();
        // Reference expressed in this level's local coordinates.
        let local_ref = Span::new(
            self.reference.left.saturating_sub(offset),
            self.reference.right.saturating_sub(offset),
        );
        let mut init = 1;
        while init <= text.len() {
            let Some(found) = string_find(text, pattern, init, local_ref) else {
                break;
            };
            if is_last {
                let abs = found.offset(offset);
                if self.visited.insert((abs.left, abs.right)) {
                    trace!(target: "textobject.match", left = abs.left, right = abs.right, pattern = %pattern, "span_matched");
                    visit(abs);
                }
            } else if !found.is_empty() {
                let inner = &text[found.left - 1..found.right];
                self.level(level + 1, inner, offset + found.left - 1, visit);
            }
            init = if same_balanced { found.right } else { found.left } + 1;
        }
    }
}

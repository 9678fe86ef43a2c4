//! Textobject search orchestration.
//!
//! A call starts in a neighborhood holding only the reference lines. Each
//! success becomes the reference of the next iteration; a failure escalates the
//! neighborhood once to `n_lines` of context and retries the same iteration.
//! A second failure ends the call with "not found".

use crate::compare::{SearchMethod, is_better_span};
use crate::composed::ComposedPattern;
use crate::error::Result;
use crate::extract::{AiType, extract_subspan};
use crate::matcher::for_each_matching_span;
use crate::neighborhood::Neighborhood;
use crate::pattern::Pattern;
use crate::region::{Position, Region, Span};
use crate::spec::SpecProvider;
use core_text::LineSource;
use tracing::{debug, trace};

/// Built-in line radius used when neither configuration nor the call sets one.
pub const DEFAULT_N_LINES: usize = 50;

/// Values used for options a call leaves unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchDefaults {
    pub n_lines: usize,
    pub search_method: SearchMethod,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            n_lines: DEFAULT_N_LINES,
            search_method: SearchMethod::default(),
        }
    }
}

/// Per-call options; `None` falls back to [`SearchDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub n_lines: Option<usize>,
    pub n_times: Option<usize>,
    pub reference_region: Option<Region>,
    pub search_method: Option<SearchMethod>,
}

impl SearchOptions {
    /// Set the search method from its textual name.
    pub fn with_search_method_str(mut self, method: &str) -> Result<Self> {
        self.search_method = Some(method.parse()?);
        Ok(self)
    }

    /// Fill every unset option. The reference defaults to an empty region at
    /// `cursor`.
    pub fn resolve(&self, defaults: &SearchDefaults, cursor: Position) -> ResolvedSearch {
        ResolvedSearch {
            n_lines: self.n_lines.unwrap_or(defaults.n_lines),
            n_times: self.n_times.unwrap_or(1),
            reference_region: self.reference_region.unwrap_or(Region::empty_at(cursor)),
            search_method: self.search_method.unwrap_or(defaults.search_method),
        }
    }
}

/// Fully populated options of one search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSearch {
    pub n_lines: usize,
    pub n_times: usize,
    pub reference_region: Region,
    pub search_method: SearchMethod,
}

/// Best candidate of one iteration and the extraction template of the nested
/// pattern that produced it.
#[derive(Debug, Clone, Copy)]
pub struct BestMatch<'a> {
    pub span: Span,
    pub extraction: &'a Pattern,
}

/// Best span over every nested pattern of `composed` with respect to
/// `reference`. Ties keep the earliest candidate.
pub fn find_best_match<'a>(
    neighborhood: &Neighborhood,
    composed: &'a ComposedPattern,
    reference: Span,
    method: SearchMethod,
) -> Option<BestMatch<'a>> {
    let mut best: Option<BestMatch<'a>> = None;
    for nested in composed.expand() {
        let extraction = nested.extraction();
        for_each_matching_span(neighborhood.text(), &nested, reference, |span| {
            if is_better_span(&span, best.as_ref().map(|b| &b.span), &reference, method) {
                trace!(target: "textobject.search", left = span.left, right = span.right, "best_candidate");
                best = Some(BestMatch { span, extraction });
            }
        });
    }
    best
}

/// Find textobject `id` in `source`.
///
/// Returns `Ok(None)` when the id is unknown or no span qualifies within the
/// escalation budget; errors are reserved for invalid textobject definitions.
/// The provider is consulted exactly once.
pub fn find_textobject<S, P>(
    source: &S,
    id: char,
    ai_type: AiType,
    opts: &ResolvedSearch,
    provider: &P,
) -> Result<Option<Region>>
where
    S: LineSource + ?Sized,
    P: SpecProvider + ?Sized,
{
    debug!(
        target: "textobject.search",
        id = %id,
        ai_type = %ai_type,
        n_times = opts.n_times,
        n_lines = opts.n_lines,
        method = %opts.search_method,
        reference = %opts.reference_region,
        "search_start"
    );
    let Some(composed) = provider.resolve(id)? else {
        debug!(target: "textobject.search", id = %id, "unknown_textobject");
        return Ok(None);
    };
    if opts.n_times == 0 {
        debug!(target: "textobject.search", id = %id, reason = "zero_repeats", "search_not_found");
        return Ok(None);
    }

    let reference = opts.reference_region;
    let mut hood = Neighborhood::build(source, &reference, 0);
    let mut current = hood.region_to_span(&reference);
    let mut extraction: Option<&Pattern> = None;
    let mut successes = 0;

    while successes < opts.n_times {
        if let Some(best) = find_best_match(&hood, &composed, current, opts.search_method) {
            current = best.span;
            extraction = Some(best.extraction);
            successes += 1;
            continue;
        }
        if hood.n_neighbors() > 0 || opts.n_lines == 0 {
            debug!(target: "textobject.search", id = %id, successes, "search_not_found");
            return Ok(None);
        }
        let carried = hood.span_to_region(current);
        hood = Neighborhood::build(source, &reference, opts.n_lines);
        current = hood.region_to_span(&carried);
        debug!(
            target: "textobject.search",
            n_lines = opts.n_lines,
            line_start = hood.line_start(),
            lines = hood.lines().len(),
            "neighborhood_escalate"
        );
    }

    let Some(extraction) = extraction else {
        return Ok(None);
    };
    let local = extract_subspan(hood.slice(current), extraction, ai_type)?;
    let region = hood.span_to_region(local.offset(current.left - 1));
    debug!(target: "textobject.search", id = %id, region = %region, "search_found");
    Ok(Some(region))
}

use core_textobject::{
    AiType, ComposedPattern, Position, Region, Registry, SearchDefaults, SearchMethod, SearchOptions,
    TextobjectError, TextobjectSpec, find_textobject,
};
use core_text::LineSource;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn buffer(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

fn region(l1: usize, c1: usize, l2: usize, c2: usize) -> Region {
    Region::new(Position::new(l1, c1), Position::new(l2, c2))
}

fn find_with(
    lines: &[&str],
    cursor: (usize, usize),
    id: char,
    ai_type: AiType,
    opts: SearchOptions,
    registry: &Registry,
) -> core_textobject::Result<Option<Region>> {
    let src = buffer(lines);
    let resolved = opts.resolve(&SearchDefaults::default(), Position::new(cursor.0, cursor.1));
    find_textobject(&src, id, ai_type, &resolved, registry)
}

fn find(lines: &[&str], cursor: (usize, usize), id: char, ai_type: AiType, opts: SearchOptions) -> Option<Region> {
    find_with(lines, cursor, id, ai_type, opts, &Registry::new()).unwrap()
}

fn method(m: SearchMethod) -> SearchOptions {
    SearchOptions {
        search_method: Some(m),
        ..Default::default()
    }
}

#[test]
fn around_parens_under_cursor() {
    let found = find(&["aa(bb)cc"], (1, 3), ')', AiType::Around, SearchOptions::default());
    assert_eq!(found, Some(region(1, 3, 1, 6)));
}

#[test]
fn inside_parens_under_cursor() {
    let found = find(&["aa(bb)cc"], (1, 3), ')', AiType::Inside, SearchOptions::default());
    assert_eq!(found, Some(region(1, 4, 1, 5)));
}

#[test]
fn cover_fails_between_groups() {
    // Host column 4 (0-indexed) is the first `b`.
    let found = find(&["(aa)bbb(cc)"], (1, 5), ')', AiType::Around, method(SearchMethod::Cover));
    assert_eq!(found, None);
}

#[test]
fn cover_or_next_jumps_forward() {
    let found = find(&["(aa)bbb(cc)"], (1, 5), ')', AiType::Around, method(SearchMethod::CoverOrNext));
    assert_eq!(found, Some(region(1, 8, 1, 11)));
}

#[test]
fn cover_or_prev_jumps_backward() {
    let found = find(&["(aa)bbb(cc)"], (1, 5), ')', AiType::Around, method(SearchMethod::CoverOrPrev));
    assert_eq!(found, Some(region(1, 1, 1, 4)));
}

#[test]
fn cover_or_nearest_picks_closer_edge() {
    let found = find(&["(aa)bbb(cc)"], (1, 7), ')', AiType::Around, method(SearchMethod::CoverOrNearest));
    assert_eq!(found, Some(region(1, 8, 1, 11)));
}

#[test]
fn multiline_inside_ends_past_line_end() {
    let found = find(&["(", "aa", ")"], (2, 1), ')', AiType::Inside, SearchOptions::default());
    assert_eq!(found, Some(region(1, 2, 2, 3)));
}

#[test]
fn repeated_search_grows_outward() {
    let opts = SearchOptions {
        n_times: Some(2),
        ..Default::default()
    };
    let once = find(&["(aa(bb)cc)"], (1, 5), ')', AiType::Around, SearchOptions::default());
    assert_eq!(once, Some(region(1, 4, 1, 7)));
    let twice = find(&["(aa(bb)cc)"], (1, 5), ')', AiType::Around, opts);
    assert_eq!(twice, Some(region(1, 1, 1, 10)));
}

#[test]
fn reference_region_equal_to_match_is_skipped() {
    let opts = SearchOptions {
        reference_region: Some(region(1, 4, 1, 7)),
        ..Default::default()
    };
    let found = find(&["(aa(bb)cc)"], (1, 5), ')', AiType::Around, opts);
    assert_eq!(found, Some(region(1, 1, 1, 10)));
}

#[test]
fn escalation_carries_reference_into_larger_window() {
    let opts = SearchOptions {
        n_times: Some(2),
        ..Default::default()
    };
    let found = find(&["(", "x(y)", ")"], (2, 3), ')', AiType::Around, opts);
    assert_eq!(found, Some(region(1, 1, 3, 1)));
}

// Records every line window the search reads.
struct CountingSource {
    lines: Vec<String>,
    reads: RefCell<Vec<(usize, usize)>>,
}

impl LineSource for CountingSource {
    fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    fn lines(&self, start: usize, end: usize) -> Vec<String> {
        self.reads.borrow_mut().push((start, end));
        self.lines.lines(start, end)
    }
}

#[test]
fn not_found_after_single_escalation() {
    let src = CountingSource {
        lines: buffer(&["aa", "bb", "cc"]),
        reads: RefCell::new(Vec::new()),
    };
    let resolved = SearchOptions::default().resolve(&SearchDefaults::default(), Position::new(2, 1));
    let found = find_textobject(&src, ')', AiType::Around, &resolved, &Registry::new()).unwrap();
    assert_eq!(found, None);
    assert_eq!(*src.reads.borrow(), vec![(2, 2), (1, 3)]);
}

#[test]
fn zero_repeats_is_not_found() {
    let opts = SearchOptions {
        n_times: Some(0),
        ..Default::default()
    };
    assert_eq!(find(&["(a)"], (1, 2), ')', AiType::Around, opts), None);
}

#[test]
fn empty_inside_region() {
    let found = find(&["f()"], (1, 2), ')', AiType::Inside, SearchOptions::default()).unwrap();
    assert_eq!(found, region(1, 3, 1, 2));
    assert!(found.is_empty());
}

#[test]
fn opening_bracket_trims_whitespace() {
    let found = find(&["[  x  ]"], (1, 4), '[', AiType::Inside, SearchOptions::default());
    assert_eq!(found, Some(region(1, 4, 1, 4)));
}

#[test]
fn quote_textobject() {
    let found = find(&["say \"hi\" now"], (1, 6), 'q', AiType::Inside, SearchOptions::default());
    assert_eq!(found, Some(region(1, 6, 1, 7)));
}

#[test]
fn tag_textobject_prefers_innermost() {
    let found = find(&["<a><b>x</b></a>"], (1, 7), 't', AiType::Inside, SearchOptions::default());
    assert_eq!(found, Some(region(1, 7, 1, 7)));
    let found = find(&["<a><b>x</b></a>"], (1, 7), 't', AiType::Around, SearchOptions::default());
    assert_eq!(found, Some(region(1, 4, 1, 11)));
}

#[test]
fn function_call_arguments() {
    let found = find(&["x = foo(bar, baz)"], (1, 9), 'f', AiType::Inside, SearchOptions::default());
    assert_eq!(found, Some(region(1, 9, 1, 16)));
}

#[test]
fn punctuation_fallback() {
    let found = find(&["a_b_c_d"], (1, 3), '_', AiType::Inside, SearchOptions::default());
    assert_eq!(found, Some(region(1, 3, 1, 3)));
}

#[test]
fn unknown_id_is_not_found() {
    assert_eq!(find(&["(a)"], (1, 2), 'z', AiType::Around, SearchOptions::default()), None);
}

#[test]
fn callable_is_resolved_once_per_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut registry = Registry::new();
    registry.insert(
        'x',
        TextobjectSpec::callable(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ComposedPattern::new('x', ["%b()", "^.().*().$"])
        }),
    );
    let opts = SearchOptions {
        n_times: Some(2),
        ..Default::default()
    };
    // Needs an escalation and two iterations.
    let found = find_with(&["(", "x(y)", ")"], (2, 3), 'x', AiType::Around, opts, &registry).unwrap();
    assert_eq!(found, Some(region(1, 1, 3, 1)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn bad_extraction_is_an_error_not_a_miss() {
    let mut registry = Registry::new();
    registry.insert_levels('x', ["%b()", "^.(.*).$"]);
    let err = find_with(&["(ab)"], (1, 2), 'x', AiType::Inside, SearchOptions::default(), &registry).unwrap_err();
    assert!(matches!(err, TextobjectError::InvalidExtraction { .. }));
}

#[test]
fn alternatives_across_bracket_kinds() {
    let found = find(&["f([a], {b})"], (1, 9), 'b', AiType::Inside, SearchOptions::default());
    assert_eq!(found, Some(region(1, 9, 1, 9)));
}

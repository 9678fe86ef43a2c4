//! Textobject actions over the editor state.
//!
//! Each request resolves its settings once (built-in defaults, config file,
//! buffer-local overlay), builds the textobject registry from them and runs
//! one search. The reference region is the active selection when there is one,
//! else an empty region at the cursor, so repeating a selection grows it.
//!
//! Host coordinates (0-indexed line and byte) are converted to the engine's
//! 1-indexed regions at this boundary and nowhere else.

use anyhow::Result;
use core_config::{Config, PatternLevel, TextobjectConfig};
use core_state::{EditorState, SelectionSpan};
use core_text::{Buffer, Position as HostPosition};
use core_textobject::{
    AiType, Level, Position, Region, Registry, SearchDefaults, SearchMethod, SearchOptions, Side,
    find_textobject,
};
use std::collections::BTreeMap;
use tracing::info;

/// Registry with the built-ins plus every configured custom textobject.
/// Custom patterns are compiled only when their id is requested.
pub fn build_registry(custom: &BTreeMap<char, Vec<PatternLevel>>) -> Registry {
    let mut registry = Registry::new();
    for (id, levels) in custom {
        registry.insert_levels(*id, levels.iter().map(to_level));
    }
    registry
}

fn to_level(level: &PatternLevel) -> Level {
    match level {
        PatternLevel::One(s) => Level::Single(s.clone()),
        PatternLevel::Many(v) => Level::Alternatives(v.clone()),
    }
}

/// Select textobject `id`. On success the selection becomes the found region
/// and the cursor moves to its last character; otherwise a notice explains
/// what was searched.
pub fn select_textobject(
    state: &mut EditorState,
    config: &Config,
    id: char,
    ai_type: AiType,
    opts: &SearchOptions,
) -> Result<Option<Region>> {
    let Some(region) = search(state, config, id, ai_type, opts)? else {
        return Ok(None);
    };
    let span = region_to_selection(region);
    state.select(span);
    let cursor = span.last().unwrap_or(span.start);
    state.set_cursor(cursor);
    info!(target: "actions", id = %id, ai_type = %ai_type, region = %region, "textobject_selected");
    Ok(Some(region))
}

/// Move the cursor to the `side` edge of textobject `id`, leaving the
/// selection untouched. An empty region puts the cursor on its left edge.
pub fn move_cursor(
    state: &mut EditorState,
    config: &Config,
    side: Side,
    id: char,
    ai_type: AiType,
    opts: &SearchOptions,
) -> Result<Option<Region>> {
    let Some(region) = search(state, config, id, ai_type, opts)? else {
        return Ok(None);
    };
    let side = if region.is_empty() { Side::Left } else { side };
    let target = region.edge(side);
    state.set_cursor(HostPosition::new(
        target.line.saturating_sub(1),
        target.col.saturating_sub(1),
    ));
    info!(target: "actions", id = %id, side = %side, to = %target, "textobject_goto");
    Ok(Some(region))
}

fn search(
    state: &mut EditorState,
    config: &Config,
    id: char,
    ai_type: AiType,
    opts: &SearchOptions,
) -> Result<Option<Region>> {
    let effective = config.textobject(&state.textobject_local);
    let defaults = search_defaults(&effective)?;
    let registry = build_registry(&effective.custom);

    let mut opts = opts.clone();
    if opts.reference_region.is_none() {
        opts.reference_region = state
            .selection()
            .map(|span| selection_to_region(span, &state.buffer));
    }
    let resolved = opts.resolve(&defaults, Position::from_host(state.cursor));
    let found = find_textobject(&state.buffer, id, ai_type, &resolved, &registry)?;
    if found.is_none() {
        let msg = not_found_message(
            id,
            ai_type,
            resolved.n_times,
            resolved.n_lines,
            resolved.search_method,
        );
        info!(target: "actions", id = %id, ai_type = %ai_type, "textobject_not_found");
        state.set_notice(msg);
    }
    Ok(found)
}

/// Validates the configured search method before any search work.
pub fn search_defaults(effective: &TextobjectConfig) -> core_textobject::Result<SearchDefaults> {
    Ok(SearchDefaults {
        n_lines: effective.n_lines,
        search_method: effective.search_method.parse()?,
    })
}

/// User-facing explanation of an unsuccessful search.
pub fn not_found_message(
    id: char,
    ai_type: AiType,
    n_times: usize,
    n_lines: usize,
    method: SearchMethod,
) -> String {
    let relation = match method {
        SearchMethod::Cover => "covering",
        SearchMethod::CoverOrNext => "covering or next to",
        SearchMethod::CoverOrPrev => "covering or previous to",
        SearchMethod::CoverOrNearest => "covering or nearest to",
    };
    let times = if n_times > 1 {
        format!(" {n_times} times")
    } else {
        String::new()
    };
    let lines = if n_lines == 1 { "line" } else { "lines" };
    format!(
        "No textobject \"{ai_type}{id}\" found {relation} region{times} within {n_lines} {lines} and search_method = '{method}'."
    )
}

/// Found region as a half-open host selection.
pub fn region_to_selection(region: Region) -> SelectionSpan {
    let start = region.left.to_host();
    if region.is_empty() {
        return SelectionSpan::empty_at(start);
    }
    // Inclusive 1-indexed column == exclusive 0-indexed byte.
    let end = HostPosition::new(region.right.line.saturating_sub(1), region.right.col);
    SelectionSpan::new(start, end)
}

/// Host selection as an engine region.
pub fn selection_to_region(span: SelectionSpan, buffer: &Buffer) -> Region {
    let left = Position::from_host(span.start);
    if span.is_empty() {
        return Region::empty_at(left);
    }
    let right = if span.end.byte == 0 {
        // Ends at a line start: the last selected byte is the terminator of
        // the previous line.
        let prev = span.end.line.saturating_sub(1);
        Position::new(prev + 1, buffer.line_byte_len(prev) + 1)
    } else {
        Position::new(span.end.line + 1, span.end.byte)
    };
    Region::new(left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_textobject::SpecProvider;

    fn region(l1: usize, c1: usize, l2: usize, c2: usize) -> Region {
        Region::new(Position::new(l1, c1), Position::new(l2, c2))
    }

    #[test]
    fn not_found_message_mentions_request() {
        let msg = not_found_message(')', AiType::Around, 2, 50, SearchMethod::Cover);
        assert_eq!(
            msg,
            "No textobject \"a)\" found covering region 2 times within 50 lines and search_method = 'cover'."
        );
        let msg = not_found_message('q', AiType::Inside, 1, 1, SearchMethod::CoverOrNext);
        assert_eq!(
            msg,
            "No textobject \"iq\" found covering or next to region within 1 line and search_method = 'cover_or_next'."
        );
    }

    #[test]
    fn region_selection_round_trip() {
        let buffer = Buffer::from_str("t", "(\naa\n)\n").unwrap();
        for r in [region(1, 1, 3, 1), region(1, 2, 2, 3), region(2, 1, 2, 2)] {
            let span = region_to_selection(r);
            assert_eq!(selection_to_region(span, &buffer), r);
        }
    }

    #[test]
    fn empty_region_becomes_empty_selection() {
        let span = region_to_selection(Region::empty_at(Position::new(1, 3)));
        assert!(span.is_empty());
        assert_eq!(span.start, HostPosition::new(0, 2));
        let buffer = Buffer::from_str("t", "f()").unwrap();
        assert_eq!(
            selection_to_region(span, &buffer),
            Region::empty_at(Position::new(1, 3))
        );
    }

    #[test]
    fn custom_levels_become_registry_entries() {
        let custom = BTreeMap::from([(
            'z',
            vec![
                PatternLevel::Many(vec!["%b()".into(), "%b[]".into()]),
                PatternLevel::One("^.().*().$".into()),
            ],
        )]);
        let registry = build_registry(&custom);
        assert!(registry.custom_ids().any(|id| id == 'z'));
        let cp = registry.resolve('z').unwrap().unwrap();
        assert_eq!(cp.levels()[0].len(), 2);
        let bad = BTreeMap::from([('z', vec![PatternLevel::One("(".into())])]);
        assert!(build_registry(&bad).resolve('z').is_err());
    }

    #[test]
    fn invalid_configured_method_is_rejected() {
        let effective = TextobjectConfig {
            search_method: "closest".into(),
            ..Default::default()
        };
        assert!(search_defaults(&effective).is_err());
    }
}

//! Textobject search engine.
//!
//! Finds delimited spans of buffer text ("textobjects") described by composed
//! Lua-style patterns, relative to a reference region and a search method.
//! Coordinates exposed here are 1-indexed `(line, col)` byte positions; see
//! [`region::Position::from_host`] for converting host cursors.

pub mod compare;
pub mod composed;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod neighborhood;
pub mod pattern;
pub mod region;
pub mod search;
pub mod spec;

pub use compare::{SearchMethod, is_better_span};
pub use composed::{ComposedPattern, Level, NestedPattern};
pub use error::{Result, TextobjectError};
pub use extract::{AiType, extract_subspan};
pub use neighborhood::Neighborhood;
pub use pattern::{Pattern, PatternError};
pub use region::{Position, Region, Side, Span};
pub use search::{
    BestMatch, DEFAULT_N_LINES, ResolvedSearch, SearchDefaults, SearchOptions, find_best_match,
    find_textobject,
};
pub use spec::{Registry, SpecProvider, TextobjectSpec};

//! Editor actions built on the textobject engine.
//!
//! `text_object` holds the caller layer: selecting a textobject, jumping to
//! one of its edges and composing the message shown when nothing matched.

pub mod text_object;

pub use text_object::{
    build_registry, move_cursor, not_found_message, region_to_selection, search_defaults,
    select_textobject, selection_to_region,
};

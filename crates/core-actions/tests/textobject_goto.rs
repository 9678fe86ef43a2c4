mod common;
use common::*;

use core_actions::move_cursor;
use core_config::Config;
use core_state::Mode;
use core_text::Position;
use core_textobject::{AiType, SearchOptions, Side, TextobjectError};
use pretty_assertions::assert_eq;

#[test]
fn goto_left_and_right_edges() {
    let cfg = Config::default();
    let mut st = state_at("x = foo(bar)", 0, 0);
    move_cursor(&mut st, &cfg, Side::Right, ')', AiType::Around, &SearchOptions::default()).unwrap();
    assert_eq!(st.cursor, Position::new(0, 11));
    let mut st = state_at("x = foo(bar)", 0, 0);
    move_cursor(&mut st, &cfg, Side::Left, ')', AiType::Around, &SearchOptions::default()).unwrap();
    assert_eq!(st.cursor, Position::new(0, 7));
}

#[test]
fn goto_does_not_select() {
    let mut st = state_at("(ab)", 0, 1);
    move_cursor(&mut st, &Config::default(), Side::Right, ')', AiType::Inside, &SearchOptions::default()).unwrap();
    assert_eq!(st.cursor, Position::new(0, 2));
    assert!(st.selection().is_none());
    assert_eq!(st.mode, Mode::Normal);
}

#[test]
fn goto_empty_region_lands_on_left_edge() {
    let mut st = state_at("f()", 0, 0);
    move_cursor(&mut st, &Config::default(), Side::Right, ')', AiType::Inside, &SearchOptions::default()).unwrap();
    assert_eq!(st.cursor, Position::new(0, 2));
}

#[test]
fn goto_past_line_end_is_clamped() {
    let mut st = state_at("(\naa\n)\n", 1, 0);
    move_cursor(&mut st, &Config::default(), Side::Right, ')', AiType::Inside, &SearchOptions::default()).unwrap();
    assert_eq!(st.cursor, Position::new(1, 1));
}

#[test]
fn goto_miss_keeps_cursor() {
    let mut st = state_at("abc", 0, 1);
    let found = move_cursor(&mut st, &Config::default(), Side::Left, ')', AiType::Around, &SearchOptions::default()).unwrap();
    assert_eq!(found, None);
    assert_eq!(st.cursor, Position::new(0, 1));
    assert!(st.take_notice().is_some());
}

#[test]
fn side_names_are_validated() {
    assert_eq!("left".parse::<Side>().unwrap(), Side::Left);
    assert!(matches!("middle".parse::<Side>(), Err(TextobjectError::InvalidSide(_))));
}

//! Find-in-grid tests: matching over the whole dataset, wrap-around
//! navigation, keyboard shortcuts and the bar states.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{date, expense, expenses, Harness, AMOUNT, DATE, VENDOR};
use ledgergrid::{CellCoord, ClickOrigin, GridEvent, Key, KeyPress, SearchStatus, SortDirection};

fn three_rows() -> Harness {
    Harness::new(vec![
        expense(1, date(2024, 1, 15), "Acme", 100.0),
        expense(2, date(2024, 2, 3), "Globex", 250.0),
        expense(3, date(2024, 1, 28), "Initech", 75.5),
    ])
}

#[test]
fn test_date_substring_matches_and_cycles() {
    let mut h = three_rows();
    h.grid.open_search();
    h.grid.set_search_query("2024-01");

    let coords: Vec<CellCoord> = h.grid.search_matches().iter().map(|m| m.coord).collect();
    assert_eq!(
        coords,
        vec![CellCoord::new(0, DATE), CellCoord::new(2, DATE)]
    );
    assert_eq!(
        h.grid.search_status(),
        SearchStatus::Matches { current: 0, total: 2 }
    );

    h.grid.search_next();
    assert_eq!(
        h.grid.search_status(),
        SearchStatus::Matches { current: 1, total: 2 }
    );
    h.grid.search_next();
    assert_eq!(
        h.grid.search_status(),
        SearchStatus::Matches { current: 0, total: 2 }
    );
}

#[test]
fn test_prev_wraps_to_last() {
    let mut h = three_rows();
    h.grid.set_search_query("2024-01");
    h.grid.search_prev();
    assert_eq!(
        h.grid.search_status(),
        SearchStatus::Matches { current: 1, total: 2 }
    );
    assert_eq!(h.grid.selection(), Some(CellCoord::new(2, DATE)));
}

#[test]
fn test_current_match_becomes_selection() {
    let mut h = three_rows();
    h.grid.set_search_query("2024-01");
    assert_eq!(h.grid.selection(), Some(CellCoord::new(0, DATE)));
    h.grid.search_next();
    assert_eq!(h.grid.selection(), Some(CellCoord::new(2, DATE)));

    let frame = h.grid.render(0.0);
    let cell = frame.cell(CellCoord::new(2, DATE)).unwrap();
    assert!(cell.flags.current_match);
    assert!(cell.flags.selected);
    let other = frame.cell(CellCoord::new(0, DATE)).unwrap();
    assert!(other.flags.search_match);
    assert!(!other.flags.current_match);
}

#[test]
fn test_matching_ignores_case_and_keeps_original_text() {
    let mut h = three_rows();
    h.grid.set_search_query("GLOB");
    let matches = h.grid.search_matches();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].coord, CellCoord::new(1, VENDOR));
    assert_eq!(matches[0].matched_text, "Glob");
}

#[test]
fn test_same_row_matches_are_column_ordered() {
    let mut h = Harness::new(vec![expense(1, date(2024, 5, 5), "2024 Supplies", 2024.0)]);
    h.grid.set_search_query("2024");
    let cols: Vec<usize> = h
        .grid
        .search_matches()
        .iter()
        .map(|m| m.coord.col)
        .collect();
    assert_eq!(cols, vec![0, 1, 2]);
}

#[test]
fn test_bar_states() {
    let mut h = three_rows();
    assert_eq!(h.grid.search_status(), SearchStatus::Closed);
    h.grid.open_search();
    assert_eq!(h.grid.search_status(), SearchStatus::Empty);
    h.grid.set_search_query("zzz");
    assert_eq!(h.grid.search_status(), SearchStatus::NoMatches);
    // Navigation with no matches does nothing.
    h.grid.search_next();
    assert_eq!(h.grid.selection(), None);
    h.grid.close_search();
    assert_eq!(h.grid.search_status(), SearchStatus::Closed);
    assert_eq!(h.grid.search_query(), "");
    assert!(h.grid.search_matches().is_empty());
}

#[test]
fn test_offscreen_rows_are_searchable_and_scrolled_into_view() {
    let mut h = Harness::new(expenses(1000));
    let before = h.grid.render(0.0).window;
    assert!(!before.contains(999));

    h.grid.set_search_query("vendor 999");
    assert_eq!(h.grid.search_matches().len(), 1);
    assert_eq!(h.grid.selection(), Some(CellCoord::new(999, VENDOR)));

    let events = h.grid.drain_events();
    assert!(events.contains(&GridEvent::ScrollTo { offset: 39_400.0 }));
    // Hosts syncing from scroll notifications see the reveal too.
    assert!(events.contains(&GridEvent::ScrollChanged { offset: 39_400.0 }));
    let frame = h.grid.render(1.0);
    assert!(frame.contains_row(999));
}

#[test]
fn test_keyboard_shortcuts() {
    let mut h = three_rows();
    assert!(h.grid.handle_key(KeyPress::new(Key::Char('f')).with_ctrl(), 0.0));
    assert_eq!(h.grid.search_status(), SearchStatus::Empty);

    h.grid.set_search_query("2024-01");
    assert!(h.grid.handle_key(KeyPress::new(Key::Enter), 0.0));
    assert_eq!(
        h.grid.search_status(),
        SearchStatus::Matches { current: 1, total: 2 }
    );
    assert!(h.grid.handle_key(KeyPress::new(Key::Enter).with_shift(), 0.0));
    assert!(h.grid.handle_key(KeyPress::new(Key::Enter).with_shift(), 0.0));
    assert_eq!(
        h.grid.search_status(),
        SearchStatus::Matches { current: 1, total: 2 }
    );

    assert!(h.grid.handle_key(KeyPress::new(Key::Escape), 0.0));
    assert_eq!(h.grid.search_status(), SearchStatus::Closed);
    // With the bar closed, Enter is not the grid's.
    assert!(!h.grid.handle_key(KeyPress::new(Key::Enter), 0.0));
}

#[test]
fn test_dataset_change_rescans_query() {
    let mut h = three_rows();
    h.grid.set_search_query("2024-01");
    h.grid.search_next();
    h.grid.set_rows(vec![
        expense(1, date(2024, 1, 15), "Acme", 100.0),
        expense(4, date(2024, 1, 2), "Hooli", 9.0),
        expense(5, date(2024, 1, 3), "Umbrella", 9.0),
    ])
    .unwrap();
    assert_eq!(h.grid.search_query(), "2024-01");
    assert_eq!(
        h.grid.search_status(),
        SearchStatus::Matches { current: 0, total: 3 }
    );
}

#[test]
fn test_current_match_follows_its_row_through_sort() {
    let mut h = three_rows();
    h.grid.set_search_query("2024-01");
    h.grid.search_next();
    assert_eq!(h.grid.selection(), Some(CellCoord::new(2, DATE)));
    h.grid.click_cell(CellCoord::new(1, VENDOR), ClickOrigin::Cell);

    // Globex 250, Acme 100, Initech 75.5
    h.grid.sort_by("amount", SortDirection::Descending).unwrap();
    let coords: Vec<CellCoord> = h.grid.search_matches().iter().map(|m| m.coord).collect();
    assert_eq!(coords, vec![CellCoord::new(1, DATE), CellCoord::new(2, DATE)]);
    assert_eq!(
        h.grid.search_status(),
        SearchStatus::Matches { current: 1, total: 2 }
    );
    assert_eq!(h.grid.selection(), Some(CellCoord::new(2, DATE)));
}

// ============================================================================
// Committed values
// ============================================================================

#[test]
fn test_committed_value_is_what_search_finds() {
    let mut h = Harness::new(vec![
        expense(1, date(2024, 1, 15), "Acme", 1234.5),
        expense(2, date(2024, 2, 3), "Globex", 250.0),
    ]);
    let amount = CellCoord::new(0, AMOUNT);
    h.grid.begin_edit(amount);
    h.grid.set_draft("2000");
    h.grid.commit_edit();
    assert_eq!(h.grid.display_text(amount).unwrap(), "AED 2,000.00");

    h.grid.set_search_query("2000");
    let matches = h.grid.search_matches();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].coord, amount);

    h.grid.set_search_query("1234");
    assert!(h.grid.search_matches().is_empty());
    assert_eq!(h.grid.search_status(), SearchStatus::NoMatches);
}

#[test]
fn test_commit_rescans_open_search() {
    let mut h = Harness::new(vec![
        expense(1, date(2024, 1, 15), "Acme", 250.0),
        expense(2, date(2024, 2, 3), "Globex", 250.5),
        expense(3, date(2024, 1, 28), "Initech", 9.0),
    ]);
    h.grid.set_search_query("250");
    assert_eq!(h.grid.search_matches().len(), 2);
    assert_eq!(h.grid.selection(), Some(CellCoord::new(0, AMOUNT)));

    // The current match is edited away; the pointer moves to the next one.
    h.grid.begin_edit(CellCoord::new(0, AMOUNT));
    h.grid.set_draft("7");
    h.grid.commit_edit();
    assert_eq!(
        h.grid.search_status(),
        SearchStatus::Matches { current: 0, total: 1 }
    );
    assert_eq!(h.grid.selection(), Some(CellCoord::new(1, AMOUNT)));

    // A new match keeps the pointer where it was.
    h.grid.begin_edit(CellCoord::new(2, AMOUNT));
    h.grid.set_draft("2500");
    h.grid.commit_edit();
    let coords: Vec<CellCoord> = h.grid.search_matches().iter().map(|m| m.coord).collect();
    assert_eq!(
        coords,
        vec![CellCoord::new(1, AMOUNT), CellCoord::new(2, AMOUNT)]
    );
    assert_eq!(
        h.grid.search_status(),
        SearchStatus::Matches { current: 0, total: 2 }
    );
    assert_eq!(h.grid.selection(), Some(CellCoord::new(1, AMOUNT)));
}

#[test]
fn test_status_json_shape() {
    let status = SearchStatus::Matches { current: 0, total: 2 };
    let json = serde_json::to_value(status).unwrap();
    assert_eq!(json["state"], "matches");
    assert_eq!(json["total"], 2);
    let json = serde_json::to_value(SearchStatus::NoMatches).unwrap();
    assert_eq!(json["state"], "noMatches");
}

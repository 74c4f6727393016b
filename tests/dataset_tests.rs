//! Dataset replacement, sorting and JSON-driven grids.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{date, expense, Harness, MemoryClipboard, QueueSpawner, AMOUNT, VENDOR};
use ledgergrid::{
    CellCoord, CellValue, Clipboard, ColumnSpec, GridConfig, GridError, GridHost, JsonRecord,
    LedgerGrid, RowId, SaveFn, SaveFuture, SortDirection, TaskSpawner,
};
use serde_json::json;

fn ledger() -> Harness {
    Harness::new(vec![
        expense(1, date(2024, 1, 15), "Acme", 1234.5),
        expense(2, date(2024, 2, 3), "Globex", 250.0),
        expense(3, date(2024, 1, 28), "Initech", 0.0),
    ])
}

#[test]
fn test_duplicate_ids_rejected_and_old_rows_kept() {
    let mut h = ledger();
    let err = h
        .grid
        .set_rows(vec![
            expense(7, date(2024, 3, 1), "A", 1.0),
            expense(7, date(2024, 3, 2), "B", 2.0),
        ])
        .unwrap_err();
    assert!(matches!(err, GridError::DuplicateRowId(id) if id == "7"));
    assert_eq!(h.grid.model().row_count(), 3);
    assert_eq!(
        h.grid.display_text(CellCoord::new(0, VENDOR)).unwrap(),
        "Acme"
    );
}

#[test]
fn test_sort_orders_rows_and_keeps_ids_indexed() {
    let mut h = ledger();
    h.grid.sort_by("amount", SortDirection::Ascending).unwrap();
    let vendors: Vec<String> = (0..3)
        .map(|row| h.grid.display_text(CellCoord::new(row, VENDOR)).unwrap())
        .collect();
    assert_eq!(vendors, vec!["Initech", "Globex", "Acme"]);
    assert_eq!(h.grid.model().index_of(&RowId::from("1")), Some(2));
}

#[test]
fn test_committed_value_survives_sort_but_not_new_data() {
    let mut h = ledger();
    h.grid.begin_edit(CellCoord::new(0, AMOUNT));
    h.grid.set_draft("5");
    h.grid.commit_edit();

    h.grid.sort_by("amount", SortDirection::Ascending).unwrap();
    let acme = h.grid.model().index_of(&RowId::from("1")).unwrap();
    assert_eq!(
        h.grid.display_text(CellCoord::new(acme, AMOUNT)).unwrap(),
        "AED 5.00"
    );

    // The host refreshes with the saved data; its rows win.
    h.grid
        .set_rows(vec![expense(1, date(2024, 1, 15), "Acme", 6.0)])
        .unwrap();
    assert_eq!(
        h.grid.display_text(CellCoord::new(0, AMOUNT)).unwrap(),
        "AED 6.00"
    );
}

#[test]
fn test_sort_orders_committed_values_where_they_display() {
    let mut h = ledger();
    h.grid.begin_edit(CellCoord::new(2, AMOUNT));
    h.grid.set_draft("100000");
    h.grid.commit_edit();

    h.grid.sort_by("amount", SortDirection::Descending).unwrap();
    assert_eq!(h.grid.model().index_of(&RowId::from("3")), Some(0));
    assert_eq!(
        h.grid.display_text(CellCoord::new(0, AMOUNT)).unwrap(),
        "AED 100,000.00"
    );
}

#[test]
fn test_dataset_change_needs_render() {
    let mut h = ledger();
    h.grid.render(0.0);
    assert!(!h.grid.needs_render());
    h.grid.set_rows(Vec::new()).unwrap();
    assert!(h.grid.needs_render());
    let frame = h.grid.render(1.0);
    assert!(frame.cells.is_empty());
    assert_eq!(frame.total_height, 0.0);
}

#[test]
fn test_custom_renderer_feeds_frame_and_copy() {
    let saves = Rc::new(RefCell::new(Vec::new()));
    let mut columns = common::expense_columns(&saves);
    let vendor = columns.remove(VENDOR);
    columns.insert(
        VENDOR,
        vendor.with_renderer(|v| match v {
            CellValue::Text(s) => s.to_uppercase(),
            _ => String::new(),
        }),
    );
    let clipboard = Rc::new(MemoryClipboard::default());
    let host = GridHost {
        spawner: Rc::new(QueueSpawner::default()) as Rc<dyn TaskSpawner>,
        clipboard: Rc::clone(&clipboard) as Rc<dyn Clipboard>,
    };
    let mut grid = LedgerGrid::new(columns, GridConfig::default(), host).unwrap();
    grid.set_rows(vec![expense(1, date(2024, 1, 15), "Acme", 1.0)])
        .unwrap();
    grid.on_resize(400.0, 0.0);
    let frame = grid.render(0.0);
    assert_eq!(frame.cell(CellCoord::new(0, VENDOR)).unwrap().text, "ACME");

    grid.click_cell(CellCoord::new(0, VENDOR), ledgergrid::ClickOrigin::Cell);
    grid.copy_selection(0.0);
    assert_eq!(*clipboard.writes.borrow(), vec!["ACME".to_string()]);
}

// ============================================================================
// JSON rows
// ============================================================================

fn json_grid(spawner: Rc<QueueSpawner>) -> LedgerGrid<JsonRecord> {
    let specs: Vec<ColumnSpec> = serde_json::from_value(json!([
        {"key": "date", "header": "Date", "kind": "date"},
        {"key": "customer", "header": "Customer", "field": "customerName"},
        {"key": "total", "header": "Total", "kind": "currency", "editable": true}
    ]))
    .unwrap();
    let config = GridConfig::from_json(r#"{"currencyCode": "USD", "dateFormat": "%d/%m/%Y"}"#)
        .unwrap();
    let host = GridHost {
        spawner,
        clipboard: Rc::new(MemoryClipboard::default()),
    };
    let columns = specs.into_iter().map(ColumnSpec::into_column).collect();
    let mut grid = LedgerGrid::new(columns, config, host).unwrap();
    let rows: Vec<JsonRecord> = serde_json::from_value(json!([
        {"id": 10, "date": "2024-01-15", "customerName": "Acme", "total": 99.5},
        {"id": "s-11", "date": "2024-02-01T08:00:00Z", "customerName": "Globex", "total": "1500"}
    ]))
    .unwrap();
    grid.set_rows(rows).unwrap();
    grid.on_resize(400.0, 0.0);
    grid
}

#[test]
fn test_json_rows_render_with_config_formats() {
    let mut grid = json_grid(Rc::new(QueueSpawner::default()));
    let frame = grid.render(0.0);
    let row0: Vec<&str> = frame.row(0).unwrap().iter().map(|c| c.text.as_str()).collect();
    assert_eq!(row0, vec!["15/01/2024", "Acme", "USD 99.50"]);
    let row1: Vec<&str> = frame.row(1).unwrap().iter().map(|c| c.text.as_str()).collect();
    assert_eq!(row1, vec!["01/02/2024", "Globex", "USD 1,500.00"]);
    assert_eq!(grid.model().row_id(1), Some(RowId::from("s-11")));
}

#[test]
fn test_json_column_editable_after_save_attached() {
    let spawner = Rc::new(QueueSpawner::default());
    let mut grid = json_grid(Rc::clone(&spawner));
    let total = CellCoord::new(1, 2);
    assert!(!grid.begin_edit(total));

    let saved: Rc<RefCell<Vec<(RowId, CellValue)>>> = Rc::default();
    let sink = Rc::clone(&saved);
    let save: SaveFn = Rc::new(move |id: RowId, value: CellValue| -> SaveFuture {
        sink.borrow_mut().push((id, value));
        Box::pin(async { Ok::<(), GridError>(()) })
    });
    grid.set_column_save("total", Some(save)).unwrap();
    assert!(grid.begin_edit(total));
    assert_eq!(grid.edit_session().unwrap().draft, "1500.00");
    grid.set_draft("1750");
    grid.commit_edit();
    spawner.run_all();
    assert_eq!(
        *saved.borrow(),
        vec![(RowId::from("s-11"), CellValue::Number(1750.0))]
    );

    assert!(matches!(
        grid.set_column_save("nope", None),
        Err(GridError::UnknownColumn(_))
    ));
}

#[test]
fn test_save_on_read_only_json_column_does_not_open_edits() {
    let spec: ColumnSpec = serde_json::from_value(json!(
        {"key": "total", "header": "Total", "kind": "currency", "editable": false}
    ))
    .unwrap();
    let host = GridHost {
        spawner: Rc::new(QueueSpawner::default()),
        clipboard: Rc::new(MemoryClipboard::default()),
    };
    let mut grid = LedgerGrid::new(vec![spec.into_column()], GridConfig::default(), host).unwrap();
    grid.set_rows(vec![JsonRecord(json!({"id": 1, "total": 5}))])
        .unwrap();

    let save: SaveFn = Rc::new(|_id: RowId, _value: CellValue| -> SaveFuture {
        Box::pin(async { Ok::<(), GridError>(()) })
    });
    grid.set_column_save("total", Some(save)).unwrap();
    assert!(!grid.begin_edit(CellCoord::new(0, 0)));
    assert!(grid.edit_session().is_none());
}

#[test]
fn test_duplicate_column_keys_rejected() {
    let saves = Rc::new(RefCell::new(Vec::new()));
    let mut columns = common::expense_columns(&saves);
    let dup = common::expense_columns(&saves).remove(0);
    columns.push(dup);
    let host = GridHost {
        spawner: Rc::new(QueueSpawner::default()),
        clipboard: Rc::new(MemoryClipboard::default()),
    };
    assert!(LedgerGrid::new(columns, GridConfig::default(), host).is_err());
}

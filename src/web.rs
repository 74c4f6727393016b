//! JavaScript bindings.
//!
//! `WebGrid` wraps a [`LedgerGrid`] over JSON rows. The JS side owns the DOM:
//! it forwards scroll/resize/click/key events, paints the frames returned by
//! `render`, applies `scrollTo` events to its scroll container, and schedules
//! `tick` at `next_deadline`.

use std::rc::Rc;

use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::config::GridConfig;
use crate::error::GridError;
use crate::highlight::HighlightRequest;
use crate::host::{GridHost, NavigatorClipboard, WasmSpawner};
use crate::model::SortDirection;
use crate::selection::ClickOrigin;
use crate::types::{CellCoord, CellValue, ColumnSpec, JsonRecord, RowId, SaveFn, SaveFuture};
use crate::viewer::{Key, KeyPress, LedgerGrid};

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Wrap a JS `(rowId, value) => Promise` as a save callback.
fn js_save_fn(save: Function) -> SaveFn {
    Rc::new(move |row_id: RowId, value: CellValue| -> SaveFuture {
        let returned = serde_wasm_bindgen::to_value(&value)
            .map_err(|e| GridError::Save(e.to_string()))
            .and_then(|js_value| {
                save.call2(&JsValue::NULL, &JsValue::from_str(row_id.as_str()), &js_value)
                    .map_err(|e| GridError::Save(format!("{e:?}")))
            });
        Box::pin(async move {
            let returned = returned?;
            if let Ok(promise) = returned.dyn_into::<Promise>() {
                JsFuture::from(promise)
                    .await
                    .map_err(|e| GridError::Save(format!("{e:?}")))?;
            }
            Ok::<(), GridError>(())
        })
    })
}

#[wasm_bindgen]
pub struct WebGrid {
    grid: LedgerGrid<JsonRecord>,
}

#[wasm_bindgen]
impl WebGrid {
    /// Create a grid from an array of column specs and an optional config
    /// object.
    #[wasm_bindgen(constructor)]
    pub fn new(columns: JsValue, config: JsValue) -> Result<WebGrid, JsValue> {
        console_error_panic_hook::set_once();
        let specs: Vec<ColumnSpec> = serde_wasm_bindgen::from_value(columns)?;
        let config: GridConfig = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let host = GridHost {
            spawner: Rc::new(WasmSpawner),
            clipboard: Rc::new(NavigatorClipboard),
        };
        let columns = specs.into_iter().map(ColumnSpec::into_column).collect();
        let grid = LedgerGrid::new(columns, config, host)?;
        Ok(WebGrid { grid })
    }

    /// Attach a save function to a column declared `editable`. Pass
    /// `undefined` to make it read-only again.
    #[wasm_bindgen]
    pub fn set_column_save(&mut self, key: &str, save: Option<Function>) -> Result<(), JsValue> {
        self.grid.set_column_save(key, save.map(js_save_fn))?;
        Ok(())
    }

    /// Replace the dataset with an array of records carrying an `id` field.
    #[wasm_bindgen]
    pub fn set_rows(&mut self, rows: JsValue) -> Result<(), JsValue> {
        let rows: Vec<JsonRecord> = serde_wasm_bindgen::from_value(rows)?;
        self.grid.set_rows(rows)?;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn sort_by(&mut self, key: &str, descending: bool) -> Result<(), JsValue> {
        let direction = if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        self.grid.sort_by(key, direction)?;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn row_count(&self) -> usize {
        self.grid.model().row_count()
    }

    // ---- Scroll / layout ----

    #[wasm_bindgen]
    pub fn on_scroll(&mut self, scroll_top: f64, now_ms: f64) -> bool {
        self.grid.on_scroll(scroll_top, now_ms)
    }

    #[wasm_bindgen]
    pub fn on_resize(&mut self, container_height: f64, now_ms: f64) {
        self.grid.on_resize(container_height, now_ms);
    }

    #[wasm_bindgen]
    pub fn scroll_top(&self) -> f64 {
        self.grid.scroll_top()
    }

    #[wasm_bindgen]
    pub fn window(&self) -> Result<JsValue, JsValue> {
        to_js(&self.grid.window())
    }

    /// Build and return the frame for the current window.
    #[wasm_bindgen]
    pub fn render(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        let frame = self.grid.render(now_ms);
        to_js(frame)
    }

    #[wasm_bindgen]
    pub fn needs_render(&self) -> bool {
        self.grid.needs_render()
    }

    // ---- Pointer / keyboard ----

    /// `from_control` is true when the event target (or an ancestor inside
    /// the cell) is a button, input or select.
    #[wasm_bindgen]
    pub fn click_cell(&mut self, row: usize, col: usize, from_control: bool) -> bool {
        let origin = if from_control {
            ClickOrigin::Control
        } else {
            ClickOrigin::Cell
        };
        self.grid.click_cell(CellCoord::new(row, col), origin)
    }

    #[wasm_bindgen]
    pub fn get_selection(&self) -> Result<JsValue, JsValue> {
        to_js(&self.grid.selection())
    }

    #[wasm_bindgen]
    pub fn key_down(&mut self, key: &str, ctrl: bool, meta: bool, shift: bool, now_ms: f64) -> bool {
        let press = KeyPress {
            key: Key::from_dom(key),
            ctrl,
            meta,
            shift,
        };
        self.grid.handle_key(press, now_ms)
    }

    /// Wheel over the grid. Returns true when an open numeric edit consumed
    /// it (the host should prevent scrolling).
    #[wasm_bindgen]
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        self.grid.wheel(delta_y)
    }

    // ---- Editing ----

    #[wasm_bindgen]
    pub fn begin_edit(&mut self, row: usize, col: usize) -> bool {
        self.grid.begin_edit(CellCoord::new(row, col))
    }

    #[wasm_bindgen]
    pub fn set_draft(&mut self, text: &str) -> bool {
        self.grid.set_draft(text)
    }

    #[wasm_bindgen]
    pub fn edit_session(&self) -> Result<JsValue, JsValue> {
        to_js(&self.grid.edit_session())
    }

    /// Commit on Enter or blur.
    #[wasm_bindgen]
    pub fn commit_edit(&mut self) -> bool {
        self.grid.commit_edit().is_some()
    }

    #[wasm_bindgen]
    pub fn cancel_edit(&mut self) -> bool {
        self.grid.cancel_edit()
    }

    // ---- Find ----

    #[wasm_bindgen]
    pub fn open_search(&mut self) {
        self.grid.open_search();
    }

    #[wasm_bindgen]
    pub fn set_search_query(&mut self, query: &str) {
        self.grid.set_search_query(query);
    }

    #[wasm_bindgen]
    pub fn search_next(&mut self) {
        self.grid.search_next();
    }

    #[wasm_bindgen]
    pub fn search_prev(&mut self) {
        self.grid.search_prev();
    }

    #[wasm_bindgen]
    pub fn close_search(&mut self) {
        self.grid.close_search();
    }

    #[wasm_bindgen]
    pub fn search_status(&self) -> Result<JsValue, JsValue> {
        to_js(&self.grid.search_status())
    }

    // ---- Highlight / time ----

    /// Deep-link to a row. Unknown ids are ignored.
    #[wasm_bindgen]
    pub fn request_highlight(&mut self, row_id: &str, column_key: Option<String>, now_ms: f64) -> bool {
        let request = HighlightRequest {
            row_id: RowId::from(row_id),
            column_key,
        };
        self.grid.request_highlight(&request, now_ms)
    }

    #[wasm_bindgen]
    pub fn cancel_highlight(&mut self) -> bool {
        self.grid.cancel_highlight()
    }

    #[wasm_bindgen]
    pub fn tick(&mut self, now_ms: f64) {
        self.grid.tick(now_ms);
    }

    #[wasm_bindgen]
    pub fn next_deadline(&self) -> Option<f64> {
        self.grid.next_deadline()
    }

    /// Queued events (`selectionChanged`, `editCommitted`, `scrollChanged`,
    /// `scrollTo`) since the last call.
    #[wasm_bindgen]
    pub fn drain_events(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.grid.drain_events())
    }
}

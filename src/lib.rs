//! ledgergrid - virtualized data grid engine
//!
//! Headless grid logic for record-keeping tables (sales, expenses, payments):
//! - Row virtualization with exact scroll height for thousands of rows
//! - Single-cell selection with clipboard copy of the displayed text
//! - Live find-in-grid over the whole dataset with wrap-around navigation
//! - Type-aware in-place editing with fire-and-forget async saves
//! - "Go to row" deep links that scroll, wait for the row to render, and flash it
//!
//! The core is plain Rust driven by host events. On `wasm32`, [`web::WebGrid`]
//! exposes it to JavaScript.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { WebGrid } from 'ledgergrid';
//! await init();
//! const grid = new WebGrid(columns, {});
//! grid.set_column_save('amount', (rowId, value) => api.patch(rowId, { amount: value }));
//! grid.set_rows(rows);
//! const frame = grid.render(performance.now());
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod format;
pub mod highlight;
pub mod host;
pub mod layout;
pub mod model;
pub mod render;
pub mod search;
pub mod selection;
pub mod timing;
pub mod types;
pub mod viewer;

#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use config::GridConfig;
pub use error::{GridError, Result};
pub use highlight::{HighlightRequest, HighlightToken};
pub use host::{Clipboard, GridHost, LocalTask, TaskSpawner};
pub use layout::{compute_window, VirtualWindow, Virtualizer};
pub use model::{GridModel, SortDirection};
pub use render::{CellFlags, RenderFrame, RenderedCell};
pub use search::{CellSource, SearchMatch, SearchStatus};
pub use selection::ClickOrigin;
pub use types::*;
pub use viewer::{GridEvent, Key, KeyPress, LedgerGrid};

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

//! Clipboard copy for `LedgerGrid`.
//!
//! Copies what the user sees: the rendered text of the selected cell with
//! whitespace collapsed, never the raw value.

use super::LedgerGrid;
use crate::selection::collapse_whitespace;
use crate::types::{CellCoord, Record};

impl<R: Record> LedgerGrid<R> {
    /// Copy the selected cell (Ctrl/Cmd+C). Returns `true` if text reached
    /// the clipboard. Failures are logged, never raised.
    pub fn copy_selection(&mut self, now_ms: f64) -> bool {
        if !self.can_copy() {
            return false;
        }
        let Some(coord) = self.selection.selected() else {
            return false;
        };
        let Some(text) = self.rendered_text(coord) else {
            return false;
        };
        let text = collapse_whitespace(&text);
        match self.host.clipboard.write_text(&text) {
            Ok(()) => {
                self.selection
                    .mark_copied(coord, now_ms, self.config.copy_flash_ms);
                self.needs_render = true;
                true
            }
            Err(err) => {
                tracing::warn!(row = coord.row, col = coord.col, error = %err, "clipboard write failed");
                false
            }
        }
    }

    /// Text the renderer shows at `coord`. Cells outside the last frame are
    /// formatted on demand with the same renderer.
    pub fn rendered_text(&self, coord: CellCoord) -> Option<String> {
        if let Some(cell) = self.frame.cell(coord) {
            return Some(cell.text.clone());
        }
        self.display_text(coord)
    }

    /// Whether `coord` shows the copied acknowledgment at `now_ms`.
    pub fn is_copied(&self, coord: CellCoord, now_ms: f64) -> bool {
        self.selection.copied(now_ms) == Some(coord)
    }
}

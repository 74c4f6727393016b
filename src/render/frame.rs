use serde::Serialize;

use crate::layout::VirtualWindow;
use crate::types::CellCoord;

/// Per-cell visual state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFlags {
    pub selected: bool,
    pub copied: bool,
    pub editing: bool,
    pub search_match: bool,
    pub current_match: bool,
    /// Whole-row highlight flash.
    pub blinking: bool,
}

/// One drawn cell: what text it shows and how it is decorated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedCell {
    pub coord: CellCoord,
    pub text: String,
    pub flags: CellFlags,
}

/// Everything the renderer draws for one window, addressable by absolute
/// coordinate.
///
/// Cells are stored row-major for `window.start..window.end`, so the slot for
/// `(row, col)` is `(row - start) * columns + col`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub window: VirtualWindow,
    pub columns: usize,
    pub total_height: f64,
    pub cells: Vec<RenderedCell>,
}

impl RenderFrame {
    pub fn empty() -> Self {
        Self {
            window: VirtualWindow {
                start: 0,
                end: 0,
                top_padding: 0.0,
                bottom_padding: 0.0,
                virtualized: false,
            },
            columns: 0,
            total_height: 0.0,
            cells: Vec::new(),
        }
    }

    fn slot(&self, coord: CellCoord) -> Option<usize> {
        if !self.window.contains(coord.row) || coord.col >= self.columns {
            return None;
        }
        Some((coord.row - self.window.start) * self.columns + coord.col)
    }

    /// Rendered cell at an absolute coordinate, if it is in this frame.
    pub fn cell(&self, coord: CellCoord) -> Option<&RenderedCell> {
        self.cells.get(self.slot(coord)?)
    }

    /// Rendered cells of one row.
    pub fn row(&self, row: usize) -> Option<&[RenderedCell]> {
        let start = self.slot(CellCoord::new(row, 0))?;
        self.cells.get(start..start + self.columns)
    }

    pub fn contains_row(&self, row: usize) -> bool {
        self.window.contains(row)
    }
}

//! Single-cell selection and the transient "copied" acknowledgment.

use serde::{Deserialize, Serialize};

use crate::timing::TimedSlot;
use crate::types::CellCoord;

/// Where a click landed inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickOrigin {
    /// The cell body itself.
    #[default]
    Cell,
    /// A button/input/select (or a descendant of one) embedded in the cell.
    /// These stay independently clickable and never change selection.
    Control,
}

#[derive(Debug, Default)]
pub struct SelectionController {
    selected: Option<CellCoord>,
    copied: TimedSlot<CellCoord>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<CellCoord> {
        self.selected
    }

    pub fn is_selected(&self, coord: CellCoord) -> bool {
        self.selected == Some(coord)
    }

    /// Handle a click. Clicking the selected cell again clears the selection;
    /// clicking another cell replaces it. Returns `true` if the selection
    /// changed.
    pub fn click(&mut self, coord: CellCoord, origin: ClickOrigin) -> bool {
        if origin == ClickOrigin::Control {
            return false;
        }
        if self.selected == Some(coord) {
            self.selected = None;
        } else {
            self.selected = Some(coord);
        }
        true
    }

    /// Select programmatically (search, highlight). Never toggles.
    pub fn set(&mut self, coord: CellCoord) -> bool {
        if self.selected == Some(coord) {
            return false;
        }
        self.selected = Some(coord);
        true
    }

    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// Move (or drop) the selection after the row order changed.
    pub fn remap(&mut self, f: impl FnOnce(CellCoord) -> Option<CellCoord>) -> bool {
        let before = self.selected;
        self.selected = before.and_then(f);
        self.copied.clear();
        before != self.selected
    }

    pub fn mark_copied(&mut self, coord: CellCoord, now_ms: f64, duration_ms: f64) {
        self.copied.set(coord, now_ms, duration_ms);
    }

    pub fn copied(&self, now_ms: f64) -> Option<CellCoord> {
        self.copied.get(now_ms).copied()
    }

    pub fn copied_deadline(&self) -> Option<f64> {
        self.copied.deadline()
    }

    /// Drop an expired copied mark. Returns `true` if one was dropped.
    pub fn expire(&mut self, now_ms: f64) -> bool {
        self.copied.expire(now_ms)
    }
}

/// Collapse whitespace runs (including newlines) into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

//! Outbound notifications and keyboard routing for `LedgerGrid`.

use serde::Serialize;

use super::LedgerGrid;
use crate::types::{CellCoord, CellValue, Record, RowId};

/// Notifications for the host, drained with [`LedgerGrid::drain_events`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GridEvent {
    SelectionChanged {
        coord: Option<CellCoord>,
    },
    EditCommitted {
        row_id: RowId,
        column_key: String,
        value: CellValue,
    },
    /// The grid body scrolled (for sticky headers or companion panels).
    ScrollChanged {
        offset: f64,
    },
    /// The grid wants the host's scroll container moved to `offset`.
    ScrollTo {
        offset: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
        }
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Ctrl on Windows/Linux, Cmd on macOS.
    fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    fn is_command_char(&self, c: char) -> bool {
        self.command() && matches!(self.key, Key::Char(k) if k.eq_ignore_ascii_case(&c))
    }
}

impl<R: Record> LedgerGrid<R> {
    /// Route a key press. Returns `true` if the grid consumed it and the host
    /// should prevent the default action.
    ///
    /// An open edit takes every key first, then find-in-grid shortcuts, then
    /// copy.
    pub fn handle_key(&mut self, press: KeyPress, now_ms: f64) -> bool {
        if self.editor.is_editing() {
            return match press.key {
                Key::Enter => self.commit_edit().is_some(),
                Key::Escape => self.cancel_edit(),
                Key::ArrowUp => self.adjust_draft(1),
                Key::ArrowDown => self.adjust_draft(-1),
                _ => false,
            };
        }

        if press.is_command_char('f') {
            self.open_search();
            return true;
        }

        if self.search.is_open() {
            match press.key {
                Key::Enter if press.shift => {
                    self.search_prev();
                    return true;
                }
                Key::Enter => {
                    self.search_next();
                    return true;
                }
                Key::Escape => {
                    self.close_search();
                    return true;
                }
                _ => {}
            }
        }

        if press.is_command_char('c') {
            return self.copy_selection(now_ms);
        }
        false
    }

    /// Whether a cell is selected that the copy shortcut would act on.
    pub fn can_copy(&self) -> bool {
        !self.editor.is_editing() && self.selection.selected().is_some()
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_key_mapping() {
        assert_eq!(Key::from_dom("Enter"), Key::Enter);
        assert_eq!(Key::from_dom("c"), Key::Char('c'));
        assert_eq!(Key::from_dom("F5"), Key::Other);
        assert_eq!(Key::from_dom(""), Key::Other);
    }

    #[test]
    fn test_command_chars_ignore_case() {
        let press = KeyPress::new(Key::Char('F')).with_ctrl();
        assert!(press.is_command_char('f'));
        assert!(!KeyPress::new(Key::Char('f')).is_command_char('f'));
    }

    #[test]
    fn test_event_json_shape() {
        let event = GridEvent::EditCommitted {
            row_id: RowId::from("7"),
            column_key: "amount".to_string(),
            value: CellValue::Number(2000.0),
        };
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(json["type"], "editCommitted");
        assert_eq!(json["rowId"], "7");
        assert_eq!(json["value"], 2000.0);
    }
}

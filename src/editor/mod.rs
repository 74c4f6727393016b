//! In-place cell editing.
//!
//! `Idle -> Editing -> Idle`. Commit hands the parsed value to the column's
//! save callback on the host executor and returns to `Idle` immediately; the
//! editor never waits on, or reports, the outcome of the save.

mod draft;

pub use draft::{parse_draft, parse_lenient_number, seed_draft, step_value, strip_numeric};

use serde::Serialize;

use crate::host::TaskSpawner;
use crate::types::{CellCoord, CellValue, ColumnKind, RowId, SaveFn};

/// The single open edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSession {
    pub row_id: RowId,
    pub coord: CellCoord,
    pub column_key: String,
    pub kind: ColumnKind,
    pub draft: String,
}

/// A committed value, ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedEdit {
    pub row_id: RowId,
    pub coord: CellCoord,
    pub column_key: String,
    pub value: CellValue,
}

#[derive(Debug)]
pub struct CellEditor {
    session: Option<EditSession>,
    step: f64,
}

impl CellEditor {
    pub fn new(step: f64) -> Self {
        Self { session: None, step }
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_editing_cell(&self, coord: CellCoord) -> bool {
        self.session.as_ref().is_some_and(|s| s.coord == coord)
    }

    /// Open a session. An already-open session is committed first and its
    /// result returned, so at most one session ever exists.
    pub fn begin(&mut self, session: EditSession) -> Option<CommittedEdit> {
        let previous = self.commit();
        tracing::debug!(row = %session.row_id, column = %session.column_key, "edit started");
        self.session = Some(session);
        previous
    }

    pub fn set_draft(&mut self, text: &str) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.draft = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Nudge a numeric draft by `steps` increments (arrow keys).
    pub fn adjust(&mut self, steps: i32) -> bool {
        let step = self.step;
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.kind.is_numeric() {
            return false;
        }
        let next = step_value(parse_lenient_number(&session.draft), steps, step);
        session.draft = format!("{next:.2}");
        true
    }

    /// Wheel over the editing cell: scrolling up (negative delta) increments.
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        if delta_y < 0.0 {
            self.adjust(1)
        } else if delta_y > 0.0 {
            self.adjust(-1)
        } else {
            false
        }
    }

    /// Close the session and parse its draft.
    pub fn commit(&mut self) -> Option<CommittedEdit> {
        let session = self.session.take()?;
        let value = parse_draft(&session.draft, session.kind);
        tracing::debug!(row = %session.row_id, column = %session.column_key, "edit committed");
        Some(CommittedEdit {
            row_id: session.row_id,
            coord: session.coord,
            column_key: session.column_key,
            value,
        })
    }

    /// Discard the draft.
    pub fn cancel(&mut self) -> Option<EditSession> {
        let session = self.session.take();
        if let Some(s) = &session {
            tracing::debug!(row = %s.row_id, column = %s.column_key, "edit cancelled");
        }
        session
    }

    /// Re-point the session at its row's new index, or drop it if the row is
    /// gone. Returns `true` if the session was dropped.
    pub fn remap(&mut self, index_of: impl FnOnce(&RowId) -> Option<usize>) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match index_of(&session.row_id) {
            Some(row) => {
                session.coord.row = row;
                false
            }
            None => {
                self.session = None;
                true
            }
        }
    }
}

/// Run `save` for `edit` on the host executor. A rejected save is logged
/// here and goes no further.
pub(crate) fn spawn_save(spawner: &dyn TaskSpawner, save: &SaveFn, edit: &CommittedEdit) {
    let row_id = edit.row_id.clone();
    let column_key = edit.column_key.clone();
    let future = save(edit.row_id.clone(), edit.value.clone());
    spawner.spawn_local(Box::pin(async move {
        if let Err(err) = future.await {
            tracing::error!(row = %row_id, column = %column_key, error = %err, "cell save failed");
        }
    }));
}

//! `LedgerGrid`, the entry point that ties the grid components together.
//!
//! The grid owns:
//! - the dataset and schema ([`GridModel`])
//! - scroll state and the visible window ([`Virtualizer`])
//! - find-in-grid, selection, editing and highlight state
//! - the last [`RenderFrame`], which is the coordinate-addressed cell arena
//!
//! Every method runs synchronously in response to one host event. Outbound
//! notifications queue up until the host calls [`LedgerGrid::drain_events`].

mod clipboard;
mod events;
mod find;
mod scroll;

pub use events::{GridEvent, Key, KeyPress};

use std::collections::HashMap;

use crate::config::GridConfig;
use crate::editor::{seed_draft, spawn_save, CellEditor, CommittedEdit, EditSession};
use crate::error::{GridError, Result};
use crate::highlight::{HighlightController, HighlightRequest, HighlightTick, HighlightToken};
use crate::host::GridHost;
use crate::layout::{VirtualWindow, Virtualizer};
use crate::model::{GridModel, SortDirection};
use crate::render::{CellFlags, RenderFrame, RenderedCell};
use crate::search::{CellSource, SearchIndex};
use crate::selection::{ClickOrigin, SelectionController};
use crate::types::{CellCoord, CellValue, Column, Record, RowId, SaveFn};

type CommittedValues = HashMap<(RowId, usize), CellValue>;

/// The model as the user currently sees it: committed values win over the
/// record accessors.
struct CommittedView<'a, R> {
    model: &'a GridModel<R>,
    committed: &'a CommittedValues,
}

impl<R: Record> CellSource for CommittedView<'_, R> {
    fn row_count(&self) -> usize {
        self.model.row_count()
    }

    fn column_count(&self) -> usize {
        self.model.column_count()
    }

    fn value_at(&self, coord: CellCoord) -> Option<CellValue> {
        let row = self.model.row(coord.row)?;
        if let Some(value) = self.committed.get(&(row.id(), coord.col)) {
            return Some(value.clone());
        }
        self.model.value(coord)
    }
}

pub struct LedgerGrid<R> {
    config: GridConfig,
    model: GridModel<R>,
    virtualizer: Virtualizer,
    search: SearchIndex,
    selection: SelectionController,
    editor: CellEditor,
    highlight: HighlightController,
    host: GridHost,
    frame: RenderFrame,
    /// Values committed since the last dataset replacement. Displayed,
    /// searched and sorted on until the host supplies fresh rows.
    committed: CommittedValues,
    events: Vec<GridEvent>,
    needs_render: bool,
}

impl<R: Record> LedgerGrid<R> {
    /// Create an empty grid for `columns`.
    ///
    /// # Errors
    /// Returns an error if two columns share a key.
    pub fn new(columns: Vec<Column<R>>, config: GridConfig, host: GridHost) -> Result<Self> {
        let model = GridModel::new(columns)?;
        Ok(Self {
            virtualizer: Virtualizer::new(&config),
            search: SearchIndex::new(),
            selection: SelectionController::new(),
            editor: CellEditor::new(config.numeric_step),
            highlight: HighlightController::new(config.highlight_blink_ms, config.scroll_settle_ms),
            model,
            host,
            frame: RenderFrame::empty(),
            committed: HashMap::new(),
            events: Vec::new(),
            needs_render: true,
            config,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn model(&self) -> &GridModel<R> {
        &self.model
    }

    pub fn virtualizer(&self) -> &Virtualizer {
        &self.virtualizer
    }

    /// Attach (or detach) the save callback of a column. Only columns
    /// marked editable open for editing.
    ///
    /// # Errors
    /// Returns [`GridError::UnknownColumn`] if `key` is not in the schema.
    pub fn set_column_save(&mut self, key: &str, save: Option<SaveFn>) -> Result<()> {
        let column = self
            .model
            .column_mut(key)
            .ok_or_else(|| GridError::UnknownColumn(key.to_string()))?;
        column.set_save(save);
        if column.save_fn().is_some() && !column.is_editable() {
            tracing::warn!(column = key, "save attached to a read-only column");
        }
        Ok(())
    }

    /// Whether visual state changed since the last [`Self::render`].
    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- Dataset ----

    /// Replace the dataset wholesale.
    ///
    /// Selection and an open edit follow their row id to its new index and
    /// are dropped if the id is gone. Search keeps its query and rescans;
    /// see [`Self::sort_by`] for where the current match goes.
    /// Committed-value overrides are discarded in favor of the fresh data.
    ///
    /// # Errors
    /// Returns [`GridError::DuplicateRowId`] and keeps the previous dataset
    /// if two rows share an id.
    pub fn set_rows(&mut self, rows: Vec<R>) -> Result<()> {
        self.rekey(|model, committed| {
            model.replace_rows(rows)?;
            committed.clear();
            Ok(())
        })
    }

    /// Re-sort rows by a column, keeping transient state attached to rows.
    /// Committed values sort where they display.
    ///
    /// With the search bar open, the current match follows its row (or moves
    /// to the next match if that row is gone) and is scrolled into view and
    /// selected again.
    ///
    /// # Errors
    /// Returns [`GridError::UnknownColumn`] if `key` is not in the schema.
    pub fn sort_by(&mut self, key: &str, direction: SortDirection) -> Result<()> {
        let col = self
            .model
            .column_index(key)
            .ok_or_else(|| GridError::UnknownColumn(key.to_string()))?;
        let keys: Vec<CellValue> = (0..self.model.row_count())
            .map(|row| self.cell_value(CellCoord::new(row, col)).unwrap_or_default())
            .collect();
        self.rekey(|model, _| model.sort_with_keys(keys, direction))
    }

    fn rekey(
        &mut self,
        change: impl FnOnce(&mut GridModel<R>, &mut CommittedValues) -> Result<()>,
    ) -> Result<()> {
        let anchor_id = |coord: Option<CellCoord>| {
            coord.and_then(|c| self.model.row_id(c.row).map(|id| (id, c.col)))
        };
        let selected = anchor_id(self.selection.selected());
        let current_match = anchor_id(self.search.current_coord());

        change(&mut self.model, &mut self.committed)?;

        let model = &self.model;
        let selection_changed = self.selection.remap(|_| {
            let (id, col) = selected?;
            let row = model.index_of(&id)?;
            Some(CellCoord::new(row, col))
        });
        if self.editor.remap(|id| model.index_of(id)) {
            tracing::debug!("open edit dropped: row no longer in dataset");
        }
        self.highlight.remap(|id| model.index_of(id));
        let total = model.row_count();
        self.virtualizer
            .resize(self.virtualizer.container_height(), total);

        if selection_changed {
            self.events.push(GridEvent::SelectionChanged {
                coord: self.selection.selected(),
            });
        }
        if self.search.is_open() {
            let anchor = current_match
                .and_then(|(id, col)| Some(CellCoord::new(self.model.index_of(&id)?, col)));
            let view = CommittedView {
                model: &self.model,
                committed: &self.committed,
            };
            if let Some(coord) = self.search.refresh(&view, anchor) {
                self.focus_match(coord);
            }
        }
        // Old frame coordinates point at the previous row order.
        self.frame = RenderFrame::empty();
        self.needs_render = true;
        Ok(())
    }

    /// Current value at `coord`, including committed overrides.
    pub fn cell_value(&self, coord: CellCoord) -> Option<CellValue> {
        self.committed_view().value_at(coord)
    }

    fn committed_view(&self) -> CommittedView<'_, R> {
        CommittedView {
            model: &self.model,
            committed: &self.committed,
        }
    }

    /// Display text at `coord`, including committed overrides.
    pub fn display_text(&self, coord: CellCoord) -> Option<String> {
        let column = self.model.column(coord.col)?;
        let value = self.cell_value(coord)?;
        Some(column.render(&value, &self.config))
    }

    // ---- Rendering ----

    pub fn window(&self) -> VirtualWindow {
        self.virtualizer.window(self.model.row_count())
    }

    /// Build the frame for the current window.
    pub fn render(&mut self, now_ms: f64) -> &RenderFrame {
        let total = self.model.row_count();
        let window = self.virtualizer.window(total);
        let columns = self.model.column_count();
        let selected = self.selection.selected();
        let copied = self.selection.copied(now_ms);
        let blinking = self.highlight.blinking_row(now_ms);
        let current_match = self.search.current_coord();
        let session = self.editor.session();

        let mut cells = Vec::with_capacity(window.len() * columns);
        for row in window.rows() {
            let Some(record) = self.model.row(row) else {
                break;
            };
            let row_id = record.id();
            for (col, column) in self.model.columns().iter().enumerate() {
                let coord = CellCoord::new(row, col);
                let editing = session.filter(|s| s.coord == coord);
                let text = match editing {
                    Some(s) => s.draft.clone(),
                    None => {
                        let value = self
                            .committed
                            .get(&(row_id.clone(), col))
                            .cloned()
                            .unwrap_or_else(|| column.value(record));
                        column.render(&value, &self.config)
                    }
                };
                cells.push(RenderedCell {
                    coord,
                    text,
                    flags: CellFlags {
                        selected: selected == Some(coord),
                        copied: copied == Some(coord),
                        editing: editing.is_some(),
                        search_match: self.search.is_match(coord),
                        current_match: current_match == Some(coord),
                        blinking: blinking == Some(row),
                    },
                });
            }
        }

        self.frame = RenderFrame {
            window,
            columns,
            total_height: self.virtualizer.total_height(total),
            cells,
        };
        self.needs_render = false;
        if let Some(coord) = self.highlight.on_frame(&window, now_ms) {
            self.set_selection(coord);
            self.needs_render = true;
        }
        &self.frame
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    // ---- Selection ----

    pub fn selection(&self) -> Option<CellCoord> {
        self.selection.selected()
    }

    /// Click on a rendered cell. Clicking away from an open edit commits it
    /// (the input loses focus).
    pub fn click_cell(&mut self, coord: CellCoord, origin: ClickOrigin) -> bool {
        if origin == ClickOrigin::Control || !self.model.contains(coord) {
            return false;
        }
        if self.editor.is_editing() && !self.editor.is_editing_cell(coord) {
            self.commit_edit();
        }
        if !self.selection.click(coord, origin) {
            return false;
        }
        self.events.push(GridEvent::SelectionChanged {
            coord: self.selection.selected(),
        });
        self.needs_render = true;
        true
    }

    fn set_selection(&mut self, coord: CellCoord) {
        if self.selection.set(coord) {
            self.events
                .push(GridEvent::SelectionChanged { coord: Some(coord) });
            self.needs_render = true;
        }
    }

    // ---- Editing ----

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.editor.session()
    }

    /// Start editing `coord` (double click). Returns `false` for
    /// non-editable columns and out-of-range coordinates.
    pub fn begin_edit(&mut self, coord: CellCoord) -> bool {
        if self.editor.is_editing_cell(coord) {
            return true;
        }
        let Some(column) = self.model.column(coord.col) else {
            return false;
        };
        if !column.is_editable() {
            return false;
        }
        let (Some(row_id), Some(value)) = (self.model.row_id(coord.row), self.cell_value(coord))
        else {
            return false;
        };
        let session = EditSession {
            row_id,
            coord,
            column_key: column.key().to_string(),
            kind: column.kind(),
            draft: seed_draft(&value, column.kind()),
        };
        if let Some(previous) = self.editor.begin(session) {
            self.persist(&previous);
        }
        self.needs_render = true;
        true
    }

    pub fn set_draft(&mut self, text: &str) -> bool {
        let changed = self.editor.set_draft(text);
        self.needs_render |= changed;
        changed
    }

    /// Nudge a numeric draft by `steps` (arrow keys).
    pub fn adjust_draft(&mut self, steps: i32) -> bool {
        let changed = self.editor.adjust(steps);
        self.needs_render |= changed;
        changed
    }

    /// Wheel over the editing cell. Returns `true` if the wheel was consumed
    /// and should not scroll the grid.
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        let changed = self.editor.wheel(delta_y);
        self.needs_render |= changed;
        changed
    }

    /// Commit the open edit (Enter or blur). The save runs in the background;
    /// the editor is idle again when this returns.
    pub fn commit_edit(&mut self) -> Option<CommittedEdit> {
        let edit = self.editor.commit()?;
        self.persist(&edit);
        self.needs_render = true;
        Some(edit)
    }

    /// Discard the open edit (Escape). The save callback is never invoked.
    pub fn cancel_edit(&mut self) -> bool {
        let cancelled = self.editor.cancel().is_some();
        self.needs_render |= cancelled;
        cancelled
    }

    fn persist(&mut self, edit: &CommittedEdit) {
        if let Some(save) = self.model.column(edit.coord.col).and_then(Column::save_fn) {
            spawn_save(self.host.spawner.as_ref(), save, edit);
        }
        self.committed
            .insert((edit.row_id.clone(), edit.coord.col), edit.value.clone());
        self.events.push(GridEvent::EditCommitted {
            row_id: edit.row_id.clone(),
            column_key: edit.column_key.clone(),
            value: edit.value.clone(),
        });
        if self.search.is_open() {
            let before = self.search.current_coord();
            let view = CommittedView {
                model: &self.model,
                committed: &self.committed,
            };
            let after = self.search.refresh(&view, before);
            if let Some(coord) = after.filter(|&c| Some(c) != before) {
                self.focus_match(coord);
            }
            self.needs_render = true;
        }
    }

    // ---- Highlight ----

    /// Handle an external "go to row" request. Returns `false` (and changes
    /// nothing) if the row id is not in the current dataset.
    pub fn request_highlight(&mut self, request: &HighlightRequest, now_ms: f64) -> bool {
        let previous = self.virtualizer.scroll_top();
        let Some(scroll) =
            self.highlight
                .request(request, &self.model, &mut self.virtualizer, now_ms)
        else {
            return false;
        };
        self.events.push(GridEvent::ScrollTo {
            offset: scroll.offset,
        });
        if (scroll.offset - previous).abs() > f64::EPSILON {
            self.events.push(GridEvent::ScrollChanged {
                offset: scroll.offset,
            });
        }
        self.needs_render = true;
        true
    }

    /// Stop a pending or blinking highlight. Timers already scheduled for
    /// it become no-ops. Returns `false` if nothing was in flight.
    pub fn cancel_highlight(&mut self) -> bool {
        let cancelled = self.highlight.cancel();
        self.needs_render |= cancelled;
        cancelled
    }

    /// Row currently flashing.
    pub fn highlighted_row(&self, now_ms: f64) -> Option<usize> {
        self.highlight.blinking_row(now_ms)
    }

    pub fn highlight_pending(&self) -> bool {
        self.highlight.is_pending()
    }

    /// Timer callback scheduled from [`Self::next_deadline`]; a token from a
    /// superseded request is ignored.
    pub fn fire_highlight(&mut self, token: HighlightToken, now_ms: f64) {
        let tick = self.highlight.fire(token, now_ms);
        self.apply_highlight_tick(tick);
    }

    // ---- Time ----

    /// Advance every timed state to `now_ms`.
    pub fn tick(&mut self, now_ms: f64) {
        if self.selection.expire(now_ms) {
            self.needs_render = true;
        }
        let tick = self.highlight.tick(now_ms);
        self.apply_highlight_tick(tick);
    }

    fn apply_highlight_tick(&mut self, tick: HighlightTick) {
        if let Some(coord) = tick.select {
            self.set_selection(coord);
        }
        self.needs_render |= tick.changed;
    }

    /// Earliest time at which [`Self::tick`] has something to do.
    pub fn next_deadline(&self) -> Option<f64> {
        let copied = self.selection.copied_deadline();
        let highlight = self.highlight.next_deadline().map(|(_, at)| at);
        match (copied, highlight) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Highlight deadline with the token to hand back to
    /// [`Self::fire_highlight`].
    pub fn highlight_deadline(&self) -> Option<(HighlightToken, f64)> {
        self.highlight.next_deadline()
    }
}

//! Find-in-grid wiring: every match that becomes current is scrolled into
//! view and selected.

use super::{GridEvent, LedgerGrid};
use crate::search::{SearchMatch, SearchStatus};
use crate::types::{CellCoord, Record};

impl<R: Record> LedgerGrid<R> {
    pub fn open_search(&mut self) {
        self.search.open();
        self.needs_render = true;
    }

    /// New query text (every keystroke). Jumps to the first match.
    pub fn set_search_query(&mut self, query: &str) {
        let view = super::CommittedView {
            model: &self.model,
            committed: &self.committed,
        };
        if let Some(coord) = self.search.set_query(query, &view) {
            self.focus_match(coord);
        }
        self.needs_render = true;
    }

    pub fn search_next(&mut self) {
        if let Some(coord) = self.search.next() {
            self.focus_match(coord);
        }
    }

    pub fn search_prev(&mut self) {
        if let Some(coord) = self.search.prev() {
            self.focus_match(coord);
        }
    }

    pub fn close_search(&mut self) {
        self.search.close();
        self.needs_render = true;
    }

    pub fn search_status(&self) -> SearchStatus {
        self.search.status()
    }

    pub fn search_query(&self) -> &str {
        self.search.query()
    }

    pub fn search_matches(&self) -> &[SearchMatch] {
        self.search.matches()
    }

    pub(crate) fn focus_match(&mut self, coord: CellCoord) {
        let total = self.model.row_count();
        if let Some(offset) = self.virtualizer.scroll_into_view(coord.row, total) {
            self.events.push(GridEvent::ScrollTo { offset });
            self.events.push(GridEvent::ScrollChanged { offset });
        }
        self.set_selection(coord);
        self.needs_render = true;
    }
}

//! Find-in-grid.
//!
//! Matching always runs over the whole dataset, never the rendered window:
//! a row that is scrolled out of view is just as findable as one on screen.
//! Matches are kept in row-major order (row, then column), which is also the
//! navigation order.

use std::collections::HashSet;

use serde::Serialize;

use crate::types::{CellCoord, CellValue};

/// Anything that can be scanned cell by cell: the bare model, or the model
/// seen through values committed since the last dataset replacement.
pub trait CellSource {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn value_at(&self, coord: CellCoord) -> Option<CellValue>;
}

/// One match: where it is and the matched slice in its original casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub coord: CellCoord,
    pub matched_text: String,
}

/// What the search bar should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SearchStatus {
    /// Bar not open.
    Closed,
    /// Bar open, nothing typed yet.
    Empty,
    /// Query typed, nothing found.
    NoMatches,
    /// `current` is zero-based.
    Matches { current: usize, total: usize },
}

#[derive(Debug, Default)]
pub struct SearchIndex {
    open: bool,
    query: String,
    matches: Vec<SearchMatch>,
    current: usize,
    match_set: HashSet<CellCoord>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Close the bar and forget the query, matches and pointer.
    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.matches.clear();
        self.match_set.clear();
        self.current = 0;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    /// Replace the query and rescan. The pointer resets to the first match,
    /// which is returned.
    pub fn set_query(&mut self, query: &str, source: &impl CellSource) -> Option<CellCoord> {
        self.open = true;
        self.query = query.to_string();
        self.refresh(source, None)
    }

    /// Rescan the current query against `source` after its contents changed.
    ///
    /// The pointer lands on the first match at or after `anchor` in
    /// row-major order, wrapping to the first match. Without an anchor it
    /// resets to the first match.
    pub fn refresh(
        &mut self,
        source: &impl CellSource,
        anchor: Option<CellCoord>,
    ) -> Option<CellCoord> {
        self.matches = find_all(&self.query, source);
        self.match_set = self.matches.iter().map(|m| m.coord).collect();
        self.current = anchor
            .and_then(|anchor| self.matches.iter().position(|m| m.coord >= anchor))
            .unwrap_or(0);
        tracing::debug!(query = %self.query, matches = self.matches.len(), "search updated");
        self.current_coord()
    }

    /// Advance to the next match, wrapping after the last.
    pub fn next(&mut self) -> Option<CellCoord> {
        if self.matches.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.matches.len();
        self.current_coord()
    }

    /// Step back to the previous match, wrapping before the first.
    pub fn prev(&mut self) -> Option<CellCoord> {
        if self.matches.is_empty() {
            return None;
        }
        self.current = self
            .current
            .checked_sub(1)
            .unwrap_or(self.matches.len() - 1);
        self.current_coord()
    }

    pub fn current_match(&self) -> Option<&SearchMatch> {
        self.matches.get(self.current)
    }

    pub fn current_coord(&self) -> Option<CellCoord> {
        self.current_match().map(|m| m.coord)
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.matches.is_empty()).then_some(self.current)
    }

    pub fn is_match(&self, coord: CellCoord) -> bool {
        self.match_set.contains(&coord)
    }

    pub fn status(&self) -> SearchStatus {
        if !self.open {
            SearchStatus::Closed
        } else if self.query.is_empty() {
            SearchStatus::Empty
        } else if self.matches.is_empty() {
            SearchStatus::NoMatches
        } else {
            SearchStatus::Matches {
                current: self.current,
                total: self.matches.len(),
            }
        }
    }
}

fn find_all(query: &str, source: &impl CellSource) -> Vec<SearchMatch> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let columns = source.column_count();
    let mut matches = Vec::new();
    for row in 0..source.row_count() {
        for col in 0..columns {
            let coord = CellCoord::new(row, col);
            let Some(text) = source.value_at(coord).and_then(|v| v.search_text()) else {
                continue;
            };
            if let Some(matched) = find_ignore_case(&text, &needle) {
                matches.push(SearchMatch {
                    coord,
                    matched_text: matched.to_string(),
                });
            }
        }
    }
    matches
}

/// Find `needle` (already lowercased) in `haystack` ignoring case, returning
/// the matched slice of the original `haystack`.
pub(crate) fn find_ignore_case<'a>(haystack: &'a str, needle: &str) -> Option<&'a str> {
    if needle.is_empty() {
        return None;
    }
    // Lowercasing can change byte lengths, so track where each folded byte
    // came from in the original text.
    let mut folded = String::with_capacity(haystack.len());
    let mut origin: Vec<usize> = Vec::with_capacity(haystack.len());
    for (idx, ch) in haystack.char_indices() {
        for lower in ch.to_lowercase() {
            let before = folded.len();
            folded.push(lower);
            origin.resize(origin.len() + (folded.len() - before), idx);
        }
    }

    let start = folded.find(needle)?;
    let orig_start = *origin.get(start)?;
    let mut orig_end = origin
        .get(start + needle.len())
        .copied()
        .unwrap_or(haystack.len());
    if orig_end <= orig_start {
        // Match ended inside one expanded character; include all of it.
        orig_end = haystack
            .get(orig_start..)
            .and_then(|rest| rest.chars().next())
            .map_or(haystack.len(), |c| orig_start + c.len_utf8());
    }
    haystack.get(orig_start..orig_end)
}

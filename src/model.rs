//! Column schema plus the full current row sequence.
//!
//! Rows are addressed two ways: by absolute index into the current
//! (filtered/sorted) order, and by stable [`RowId`]. The id index is rebuilt
//! on every replacement or re-sort so the two never disagree.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::search::CellSource;
use crate::types::{CellCoord, CellValue, Column, Record, RowId};

/// Sort order for [`GridModel::sort_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

pub struct GridModel<R> {
    columns: Vec<Column<R>>,
    column_index: HashMap<String, usize>,
    rows: Vec<R>,
    row_index: HashMap<RowId, usize>,
}

impl<R: Record> GridModel<R> {
    /// Create an empty model for the given schema.
    ///
    /// # Errors
    /// Returns an error if two columns share a key.
    pub fn new(columns: Vec<Column<R>>) -> Result<Self> {
        let mut column_index = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            if column_index.insert(column.key().to_string(), idx).is_some() {
                return Err(GridError::Other(format!(
                    "duplicate column key: {}",
                    column.key()
                )));
            }
        }
        Ok(Self {
            columns,
            column_index,
            rows: Vec::new(),
            row_index: HashMap::new(),
        })
    }

    /// Replace the dataset wholesale.
    ///
    /// # Errors
    /// Returns [`GridError::DuplicateRowId`] if two rows share an id. The
    /// previous dataset is kept in that case.
    pub fn replace_rows(&mut self, rows: Vec<R>) -> Result<()> {
        let row_index = build_row_index(&rows)?;
        self.rows = rows;
        self.row_index = row_index;
        Ok(())
    }

    /// Stable sort by the accessor value of column `col`. Empty values sort
    /// last in both directions.
    pub fn sort_by(&mut self, col: usize, direction: SortDirection) -> Result<()> {
        let column = self
            .columns
            .get(col)
            .ok_or_else(|| GridError::UnknownColumn(col.to_string()))?;
        let keys = self.rows.iter().map(|row| column.value(row)).collect();
        self.sort_with_keys(keys, direction)
    }

    /// Stable sort by precomputed keys, one per row in the current order.
    ///
    /// # Errors
    /// Returns an error if `keys` does not have one entry per row.
    pub fn sort_with_keys(&mut self, keys: Vec<CellValue>, direction: SortDirection) -> Result<()> {
        if keys.len() != self.rows.len() {
            return Err(GridError::Other(format!(
                "sort keys: expected {}, got {}",
                self.rows.len(),
                keys.len()
            )));
        }
        let mut keyed: Vec<(CellValue, R)> = keys.into_iter().zip(self.rows.drain(..)).collect();
        keyed.sort_by(|(a, _), (b, _)| match (a.is_empty(), b.is_empty()) {
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            _ => match direction {
                SortDirection::Ascending => a.sort_cmp(b),
                SortDirection::Descending => b.sort_cmp(a),
            },
        });
        self.rows = keyed.into_iter().map(|(_, row)| row).collect();
        self.row_index = build_row_index(&self.rows)?;
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn column(&self, col: usize) -> Option<&Column<R>> {
        self.columns.get(col)
    }

    pub fn column_mut(&mut self, key: &str) -> Option<&mut Column<R>> {
        let idx = *self.column_index.get(key)?;
        self.columns.get_mut(idx)
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.column_index.get(key).copied()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&R> {
        self.rows.get(index)
    }

    pub fn row_id(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).map(Record::id)
    }

    /// Absolute index of the row with `id` in the current order.
    pub fn index_of(&self, id: &RowId) -> Option<usize> {
        self.row_index.get(id).copied()
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.row < self.rows.len() && coord.col < self.columns.len()
    }

    /// Raw accessor value at `coord`.
    pub fn value(&self, coord: CellCoord) -> Option<CellValue> {
        let row = self.rows.get(coord.row)?;
        let column = self.columns.get(coord.col)?;
        Some(column.value(row))
    }

    /// Formatted display text at `coord`.
    pub fn display_text(&self, coord: CellCoord, config: &GridConfig) -> Option<String> {
        let column = self.columns.get(coord.col)?;
        let value = self.value(coord)?;
        Some(column.render(&value, config))
    }
}

impl<R: Record> CellSource for GridModel<R> {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn value_at(&self, coord: CellCoord) -> Option<CellValue> {
        self.value(coord)
    }
}

fn build_row_index<R: Record>(rows: &[R]) -> Result<HashMap<RowId, usize>> {
    let mut index = HashMap::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let id = row.id();
        if index.contains_key(&id) {
            return Err(GridError::DuplicateRowId(id.to_string()));
        }
        index.insert(id, idx);
    }
    Ok(index)
}

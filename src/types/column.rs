use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use super::{CellValue, ColumnKind, RowId};
use crate::config::GridConfig;
use crate::error::Result;
use crate::format::display_text;

/// A row that can be shown in the grid.
pub trait Record {
    /// Stable unique id of the row.
    fn id(&self) -> RowId;
}

/// Future returned by a host save callback.
pub type SaveFuture = Pin<Box<dyn Future<Output = Result<()>>>>;

/// Host-supplied persistence for one editable column.
pub type SaveFn = Rc<dyn Fn(RowId, CellValue) -> SaveFuture>;

pub type Accessor<R> = Rc<dyn Fn(&R) -> CellValue>;

pub type Renderer = Rc<dyn Fn(&CellValue) -> String>;

/// One column of the schema.
pub struct Column<R> {
    key: String,
    header: String,
    kind: ColumnKind,
    accessor: Accessor<R>,
    renderer: Option<Renderer>,
    editable: bool,
    save: Option<SaveFn>,
    width: Option<f64>,
}

impl<R> Column<R> {
    pub fn new(
        key: impl Into<String>,
        header: impl Into<String>,
        kind: ColumnKind,
        accessor: impl Fn(&R) -> CellValue + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            kind,
            accessor: Rc::new(accessor),
            renderer: None,
            editable: false,
            save: None,
            width: None,
        }
    }

    /// Replace the default kind-based display formatting.
    #[must_use]
    pub fn with_renderer(mut self, renderer: impl Fn(&CellValue) -> String + 'static) -> Self {
        self.renderer = Some(Rc::new(renderer));
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Mark the column editable. Cells only open for editing once a save
    /// callback is attached as well.
    #[must_use]
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Make the column editable, persisting commits through `save`.
    #[must_use]
    pub fn editable<F, Fut>(mut self, save: F) -> Self
    where
        F: Fn(RowId, CellValue) -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        let save: SaveFn =
            Rc::new(move |id: RowId, value: CellValue| -> SaveFuture { Box::pin(save(id, value)) });
        self.editable = true;
        self.save = Some(save);
        self
    }

    pub fn set_save(&mut self, save: Option<SaveFn>) {
        self.save = save;
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn width(&self) -> Option<f64> {
        self.width
    }

    /// Marked editable and able to persist.
    pub fn is_editable(&self) -> bool {
        self.editable && self.save.is_some()
    }

    pub(crate) fn save_fn(&self) -> Option<&SaveFn> {
        self.save.as_ref()
    }

    /// Raw typed value of this column for `row`.
    pub fn value(&self, row: &R) -> CellValue {
        (self.accessor)(row)
    }

    /// Display text for an already-extracted value.
    pub fn render(&self, value: &CellValue, config: &GridConfig) -> String {
        match &self.renderer {
            Some(renderer) => renderer(value),
            None => display_text(value, self.kind, config),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("kind", &self.kind)
            .field("editable", &self.editable)
            .field("has_save", &self.save.is_some())
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

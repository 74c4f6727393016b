//! Structured error types for ledgergrid.

/// All errors that can occur while driving the grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Two rows in a supplied dataset share the same id.
    #[error("Duplicate row id: {0}")]
    DuplicateRowId(String),

    /// A column key that is not part of the schema.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Host save callback rejected a committed value.
    #[error("Save failed: {0}")]
    Save(String),

    /// Clipboard write was refused by the platform.
    #[error("Clipboard write failed: {0}")]
    Clipboard(String),

    /// Configuration or dataset JSON could not be decoded.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

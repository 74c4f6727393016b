//! Tunable grid parameters.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Grid configuration. Every field has a default, so a partial JSON object
/// (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Fixed row height in pixels.
    pub row_height: f64,
    /// Rows rendered beyond each viewport edge.
    pub overscan: usize,
    /// Datasets with fewer rows than this render every row directly.
    pub virtualization_threshold: usize,
    /// How long a copied cell stays marked, in milliseconds.
    pub copy_flash_ms: f64,
    /// How long a highlighted row blinks, in milliseconds.
    pub highlight_blink_ms: f64,
    /// Quiet period after the last scroll event before the grid treats the
    /// scroll-driven re-render as settled.
    pub scroll_settle_ms: f64,
    /// Increment applied by arrow keys / wheel while editing a numeric cell.
    pub numeric_step: f64,
    /// Currency code prefixed to currency display text.
    pub currency_code: String,
    /// `chrono` format string for date display text.
    pub date_format: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_height: 40.0,
            overscan: 10,
            virtualization_threshold: 100,
            copy_flash_ms: 500.0,
            highlight_blink_ms: 2500.0,
            scroll_settle_ms: 100.0,
            numeric_step: 0.01,
            currency_code: "AED".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl GridConfig {
    /// Parse a configuration from a JSON object, filling gaps with defaults.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

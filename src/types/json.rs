//! JSON-backed rows and column specs, used by the web bindings and the CLI.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CellValue, Column, ColumnKind, Record, RowId};
use crate::format::parse_iso_prefix;

/// A row decoded from JSON. The `id` field (string or number) is its row id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonRecord(pub Value);

impl Record for JsonRecord {
    fn id(&self) -> RowId {
        match self.0.get("id") {
            Some(Value::String(s)) => RowId::new(s.as_str()),
            Some(Value::Null) | None => RowId::new(""),
            // JS numbers arrive as floats; `7.0` and `7` are the same id.
            Some(Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => RowId::from(i.to_string()),
                (None, Some(f)) if f.fract() == 0.0 && f.abs() < 9.0e15 => {
                    RowId::from(format!("{f:.0}"))
                }
                _ => RowId::new(n.to_string()),
            },
            Some(other) => RowId::new(other.to_string()),
        }
    }
}

impl JsonRecord {
    /// Read `field` as a value of the given column kind.
    pub fn field(&self, field: &str, kind: ColumnKind) -> CellValue {
        let Some(raw) = self.0.get(field) else {
            return CellValue::Empty;
        };
        json_to_cell(raw, kind)
    }
}

fn json_to_cell(raw: &Value, kind: ColumnKind) -> CellValue {
    match (raw, kind) {
        (Value::Null, _) => CellValue::Empty,
        (Value::Bool(b), _) => CellValue::Bool(*b),
        (Value::Number(n), _) => n.as_f64().map_or(CellValue::Empty, CellValue::Number),
        (Value::String(s), ColumnKind::Number | ColumnKind::Currency) => s
            .trim()
            .parse::<f64>()
            .map_or_else(|_| CellValue::Text(s.clone()), CellValue::Number),
        (Value::String(s), ColumnKind::Date) => parse_iso_prefix(s)
            .map_or_else(|| CellValue::Text(s.clone()), CellValue::Date),
        (Value::String(s), ColumnKind::Text) => CellValue::Text(s.clone()),
        (other, _) => CellValue::Text(other.to_string()),
    }
}

/// Column description as supplied by a JSON host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub key: String,
    pub header: String,
    #[serde(default)]
    pub kind: ColumnKind,
    /// Record field to read; defaults to `key`.
    #[serde(default)]
    pub field: Option<String>,
    /// Whether cells may be edited. Edits still need a save callback.
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub width: Option<f64>,
}

impl ColumnSpec {
    pub fn into_column(self) -> Column<JsonRecord> {
        let field = self.field.unwrap_or_else(|| self.key.clone());
        let kind = self.kind;
        let column = Column::new(self.key, self.header, kind, move |row: &JsonRecord| {
            row.field(&field, kind)
        })
        .with_editable(self.editable);
        match self.width {
            Some(width) => column.with_width(width),
            None => column,
        }
    }
}

//! Per-user grid layout preferences (column order, visibility and width).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MAX_COLUMNS: usize = 64;
pub const MIN_COLUMN_WIDTH: i64 = 20;
pub const MAX_COLUMN_WIDTH: i64 = 1000;

static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_.\-]{0,63}$").expect("valid regex"));

/// One column of a grid, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridColumn {
    pub key: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub width: Option<i64>,
}

fn default_visible() -> bool {
    true
}

/// Grid keys (e.g. `invoice.lines`) and column keys share one format.
pub fn validate_key(field: &str, key: &str) -> Result<(), String> {
    if KEY_RE.is_match(key) {
        Ok(())
    } else {
        Err(format!(
            "Invalid {field} '{key}'. Use lower-case letters, digits, '_', '.' or '-'"
        ))
    }
}

/// Columns must be unique, well-formed, within width bounds, and at least
/// one must stay visible.
pub fn validate_columns(columns: &[GridColumn]) -> Result<(), String> {
    if columns.is_empty() {
        return Err("At least one column is required".to_string());
    }
    if columns.len() > MAX_COLUMNS {
        return Err(format!("A grid may hold at most {MAX_COLUMNS} columns"));
    }

    let mut seen = HashSet::with_capacity(columns.len());
    for col in columns {
        validate_key("column key", &col.key)?;
        if !seen.insert(col.key.as_str()) {
            return Err(format!("Duplicate column key '{}'", col.key));
        }
        if let Some(w) = col.width {
            if !(MIN_COLUMN_WIDTH..=MAX_COLUMN_WIDTH).contains(&w) {
                return Err(format!(
                    "Column '{}' width must be between {MIN_COLUMN_WIDTH} and {MAX_COLUMN_WIDTH}, got {w}",
                    col.key
                ));
            }
        }
    }

    if !columns.iter().any(|c| c.visible) {
        return Err("At least one column must stay visible".to_string());
    }
    Ok(())
}

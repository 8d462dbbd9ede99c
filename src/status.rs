//! Replication status row as returned by `SHOW SLAVE STATUS`.
//!
//! Every cell arrives from the server as text. Cells that parse as a base-10
//! `i64` become [`StatusValue::Int`]; everything else is kept verbatim as
//! [`StatusValue::Str`]. The coercion is purely syntactic and knows nothing
//! about what a column means.

use std::fmt;

/// A single status cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusValue {
    Int(i64),
    Str(String),
}

impl StatusValue {
    /// Coerce a raw text cell. SQL NULL is read as the empty string.
    pub fn from_text(raw: Option<&str>) -> Self {
        let text = raw.unwrap_or_default();
        match text.parse::<i64>() {
            Ok(n) => StatusValue::Int(n),
            Err(_) => StatusValue::Str(text.to_string()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            StatusValue::Int(n) => Some(*n),
            StatusValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StatusValue::Str(s) => Some(s),
            StatusValue::Int(_) => None,
        }
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusValue::Int(n) => write!(f, "{}", n),
            StatusValue::Str(s) => write!(f, "{:?}", s),
        }
    }
}

/// Column name to value mapping, in the column order of the result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicationStatus {
    columns: Vec<(String, StatusValue)>,
}

impl ReplicationStatus {
    /// Build a status from `(column, raw text)` pairs.
    pub fn from_text_cells<I, K, V>(cells: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let columns = cells
            .into_iter()
            .map(|(name, raw)| {
                let value = StatusValue::from_text(raw.as_ref().map(|v| v.as_ref()));
                (name.into(), value)
            })
            .collect();
        Self { columns }
    }

    /// First value stored under `column`. Lookup is case-sensitive.
    pub fn get(&self, column: &str) -> Option<&StatusValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatusValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

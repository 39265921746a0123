//! Code index construction
//!
//! Spreadsheet exports are messy: header cells pick up stray whitespace and
//! embedded line breaks, code cells carry dots and spaces, descriptions go
//! missing. All of that tolerance lives here. Rows are normalized into
//! [`CodeRecord`]s and anything without a usable code is dropped; nothing in
//! this module returns an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::code::digits_only;
use crate::resolve::{resolve, Outcome};

/// Normalize a header cell: trim surrounding whitespace, then drop any
/// embedded carriage returns or line feeds.
pub fn normalize_header(key: &str) -> String {
    key.trim().chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

/// One row of tabular source data as `(header, cell)` pairs in column order.
///
/// Headers are kept exactly as read; lookups go through [`normalize_header`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `(header, value)` pair
    pub fn push(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.fields.push((header.into(), value.into()));
    }

    /// Look up a cell by its normalized header name.
    ///
    /// When two raw headers normalize to the same name the rightmost column
    /// wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(header, _)| normalize_header(header) == name)
            .map(|(_, value)| value.as_str())
    }

    /// Normalized header names, in column order
    pub fn normalized_headers(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|(header, _)| normalize_header(header))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Header names identifying the code and description columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumns {
    pub code: String,
    pub description: String,
}

impl Default for IndexColumns {
    fn default() -> Self {
        Self {
            code: "HSNCode".to_string(),
            description: "Description".to_string(),
        }
    }
}

impl IndexColumns {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// A normalized row: digits-only code plus its description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRecord {
    pub code: String,
    pub description: String,
}

impl CodeRecord {
    /// Normalize a raw row, or `None` if it carries no digits in its code cell.
    pub fn from_raw(raw: &RawRecord, columns: &IndexColumns) -> Option<Self> {
        let code = digits_only(raw.get(&columns.code).unwrap_or_default());
        if code.is_empty() {
            return None;
        }

        Some(Self {
            code,
            description: raw
                .get(&columns.description)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// Immutable map from normalized code to description.
///
/// Built once before any request is served and shared read-only afterwards;
/// there is no way to mutate it after construction.
#[derive(Debug, Clone, Default)]
pub struct CodeIndex {
    entries: HashMap<String, String>,
}

impl CodeIndex {
    /// Build an index from raw tabular rows.
    ///
    /// Rows without a usable code are skipped; duplicate codes keep the
    /// description of the last row.
    pub fn build<I>(records: I, columns: &IndexColumns) -> Self
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut discarded = 0usize;
        let normalized = records.into_iter().filter_map(|raw| {
            let record = CodeRecord::from_raw(&raw, columns);
            if record.is_none() {
                discarded += 1;
            }
            record
        });

        let index = Self::from_records(normalized);
        debug!(
            indexed = index.len(),
            discarded,
            code_column = %columns.code,
            "Built code index"
        );
        index
    }

    /// Build an index from already-normalized records (last write wins)
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CodeRecord>,
    {
        let mut entries = HashMap::new();
        for record in records {
            entries.insert(record.code, record.description);
        }
        Self { entries }
    }

    /// Description for an exact code, if the code is known
    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A handful of codes in sorted order, for startup diagnostics
    pub fn sample_codes(&self, limit: usize) -> Vec<&str> {
        let mut codes: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes.truncate(limit);
        codes
    }

    /// Resolve a query against this index. See [`resolve`].
    pub fn resolve(&self, query: &str) -> Outcome {
        resolve(query, self)
    }
}

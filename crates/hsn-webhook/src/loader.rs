//! Loading HSN master data
//!
//! Reads the first worksheet of a spreadsheet, or a JSON export of one, into
//! [`RawRecord`]s and builds the [`CodeIndex`] from them. Row-level problems
//! are left to the index builder, which skips them; only an unreadable
//! source is an error here.

use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use hsn_core::{CodeIndex, IndexColumns, RawRecord};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{LoadError, LoadResult};

/// Number of codes shown in the startup log line
const SAMPLE_CODES: usize = 5;

/// Supported source formats, by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Spreadsheet,
    Json,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(Self::Spreadsheet),
            Some("json") => Ok(Self::Json),
            _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Read every data row of `path` as a raw record
pub fn load_records(path: &Path) -> LoadResult<Vec<RawRecord>> {
    match SourceFormat::from_path(path)? {
        SourceFormat::Spreadsheet => load_spreadsheet(path),
        SourceFormat::Json => load_json(path),
    }
}

/// Load `path` and build the code index from it
pub fn load_index(path: &Path, columns: &IndexColumns) -> LoadResult<CodeIndex> {
    let records = load_records(path)?;
    if let Some(first) = records.first() {
        debug!(headers = ?first.normalized_headers(), "Source header keys");
    }

    let rows = records.len();
    let index = CodeIndex::build(records, columns);
    info!(
        path = %path.display(),
        rows,
        indexed = index.len(),
        sample = ?index.sample_codes(SAMPLE_CODES),
        "HSN data indexed"
    );
    Ok(index)
}

fn load_spreadsheet(path: &Path) -> LoadResult<Vec<RawRecord>> {
    let workbook_error = |message: String| LoadError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::EmptyWorkbook(path.to_path_buf()))?;
    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| workbook_error(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(cell_text).collect();

    Ok(rows
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(column, header)| {
                    let value = row.get(column).map(cell_text).unwrap_or_default();
                    (header.clone(), value)
                })
                .collect::<RawRecord>()
        })
        .collect())
}

/// Render a cell the way it reads in the sheet.
///
/// Whole-number floats drop their `.0` so numeric code cells come through as
/// plain digits.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Object keys keep file order (`serde_json/preserve_order`), so a later
/// column that normalizes onto an earlier header still wins.
fn load_json(path: &Path) -> LoadResult<Vec<RawRecord>> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows: Vec<Map<String, Value>> =
        serde_json::from_str(&contents).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(header, value)| (header, json_text(value)))
                .collect::<RawRecord>()
        })
        .collect())
}

fn json_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

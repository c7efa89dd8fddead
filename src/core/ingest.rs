//! Parse an uploaded file into a [`RawTable`].

use crate::domain::model::{RawTable, Record};
use crate::utils::error::{ReportError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read};

pub const ACCEPTED_EXTENSIONS: [&str; 5] = ["csv", "xlsx", "xlsm", "xls", "ods"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Spreadsheet,
}

impl InputFormat {
    /// `.csv` is read as CSV, everything else as a workbook.
    pub fn from_path(path: &str) -> Self {
        if path.to_ascii_lowercase().ends_with(".csv") {
            InputFormat::Csv
        } else {
            InputFormat::Spreadsheet
        }
    }
}

pub fn parse_table(bytes: Vec<u8>, format: InputFormat) -> Result<RawTable> {
    match format {
        InputFormat::Csv => parse_csv(bytes.as_slice()),
        InputFormat::Spreadsheet => parse_workbook(bytes),
    }
}

/// Short rows are accepted and their missing trailing cells read as empty;
/// rows longer than the header are rejected.
pub fn parse_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = dedupe_headers(rdr.headers()?.iter().map(String::from).collect());
    if columns.is_empty() || columns.iter().all(|c| c.trim().is_empty()) {
        return Err(ReportError::EmptyInput {
            message: "no header row".to_string(),
        });
    }

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() > columns.len() {
            return Err(ReportError::MalformedRow {
                row: i + 1,
                expected: columns.len(),
                found: record.len(),
            });
        }
        let data = columns
            .iter()
            .zip(record.iter())
            .map(|(name, field)| (name.clone(), infer_value(field)))
            .collect();
        rows.push(Record { data });
    }

    tracing::debug!("Parsed CSV with {} columns and {} rows", columns.len(), rows.len());
    Ok(RawTable { columns, rows })
}

/// 讀取活頁簿的第一個工作表，第一列當作標題
pub fn parse_workbook(bytes: Vec<u8>) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::EmptyInput {
            message: "workbook has no worksheets".to_string(),
        })??;

    let mut sheet_rows = range.rows();
    let columns = match sheet_rows.next() {
        Some(header) => dedupe_headers(header.iter().map(|cell| cell.to_string()).collect()),
        None => {
            return Err(ReportError::EmptyInput {
                message: "first worksheet is empty".to_string(),
            })
        }
    };

    let rows: Vec<Record> = sheet_rows
        .map(|cells| {
            let data: HashMap<String, Value> = columns
                .iter()
                .zip(cells.iter())
                .map(|(name, cell)| (name.clone(), cell_value(cell)))
                .collect();
            Record { data }
        })
        .collect();

    tracing::debug!(
        "Parsed worksheet with {} columns and {} rows",
        columns.len(),
        rows.len()
    );
    Ok(RawTable { columns, rows })
}

/// Repeated header names get a `.1`, `.2`, ... suffix so each column keeps
/// its own cells. The first occurrence keeps the plain name.
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    headers
        .into_iter()
        .map(|name| {
            if seen.insert(name.clone()) {
                return name;
            }
            let count = counts.entry(name.clone()).or_insert(0);
            loop {
                *count += 1;
                let candidate = format!("{}.{}", name, count);
                if seen.insert(candidate.clone()) {
                    return candidate;
                }
            }
        })
        .collect()
}

/// Per-cell type inference for text sources.
pub fn infer_value(field: &str) -> Value {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(field.to_string())
}

pub fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => Value::String(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) => Value::String(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Value::Null,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(e) => Value::String(format!("#{:?}", e)),
    }
}

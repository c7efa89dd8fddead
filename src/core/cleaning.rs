//! Coerce the Date and Amount columns into [`CanonicalRow`]s.
//!
//! Dates are coerced first and rows with unparseable dates are dropped
//! silently. Amounts are coerced afterwards, only for surviving rows, and a
//! single bad amount aborts the run. The two fields are deliberately
//! handled differently.

use crate::domain::model::{CanonicalRow, ColumnMapping, RawTable};
use crate::utils::error::{ReportError, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::Value;

// 與 pandas Timestamp 可表示的年份範圍一致
const MIN_YEAR: i32 = 1677;
const MAX_YEAR: i32 = 2262;

const DATETIME_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

// Two-digit-year forms go before their four-digit twins: chrono's %Y
// happily reads "24" as year 24.
const DATE_FORMATS: [&str; 14] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
];

#[derive(Debug, Clone, Default)]
pub struct CleanedData {
    pub rows: Vec<CanonicalRow>,
    pub dropped: usize,
}

pub fn clean(table: &RawTable, mapping: &ColumnMapping) -> Result<CleanedData> {
    let dated: Vec<(usize, NaiveDate)> = table
        .rows
        .iter()
        .enumerate()
        .filter_map(|(i, record)| {
            coerce_date(record.get(&mapping.date_column)).map(|date| (i, date))
        })
        .collect();

    let dropped = table.rows.len() - dated.len();
    if dropped > 0 {
        tracing::info!("Dropped {} rows with unparseable dates", dropped);
    }

    let mut rows = Vec::with_capacity(dated.len());
    for (i, date) in dated {
        let raw = amount_text(table.rows[i].get(&mapping.amount_column));
        let amount = parse_amount(&raw).ok_or(ReportError::AmountParse {
            row: i + 1,
            value: raw,
        })?;
        rows.push(CanonicalRow { date, amount });
    }

    tracing::debug!("Cleaned {} rows", rows.len());
    Ok(CleanedData { rows, dropped })
}

/// Permissive date coercion. `None` means the row gets dropped.
pub fn coerce_date(value: &Value) -> Option<NaiveDate> {
    let date = match value {
        Value::String(s) => parse_date(s),
        Value::Number(n) => n.as_u64().and_then(|v| parse_compact_date(&v.to_string())),
        _ => None,
    }?;

    (MIN_YEAR..=MAX_YEAR).contains(&date.year()).then_some(date)
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    parse_compact_date(s).or_else(|| parse_year_month(s))
}

/// `YYYYMMDD`
fn parse_compact_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = s[0..4].parse().ok()?;
    let month = s[4..6].parse().ok()?;
    let day = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `YYYY-MM` or `YYYY/MM`, taken as the first of the month.
fn parse_year_month(s: &str) -> Option<NaiveDate> {
    let (year, month) = s.split_once(['-', '/'])?;
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// Render a cell the way a string conversion would before cleaning.
pub fn amount_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Null => "nan".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

/// Strip thousands separators and the rupee sign, then parse.
///
/// `"nan"` parses to NaN; the monthly sum skips it.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "")
        .replace('₹', "")
        .trim()
        .parse::<f64>()
        .ok()
}

//! Monthly resampling of cleaned rows.

use crate::domain::model::{CanonicalRow, MonthlyPoint};
use crate::utils::error::{ReportError, Result};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Sum amounts per calendar month, labelled by month-end date.
///
/// The result is dense: every month between the first and last populated
/// month is present, with a zero sum when it had no rows. NaN amounts are
/// skipped by the sum.
pub fn monthly_totals(rows: &[CanonicalRow]) -> Result<Vec<MonthlyPoint>> {
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for row in rows {
        let total = buckets
            .entry((row.date.year(), row.date.month()))
            .or_insert(0.0);
        if !row.amount.is_nan() {
            *total += row.amount;
        }
    }

    let (&first, _) = buckets.first_key_value().ok_or(ReportError::EmptyDataset)?;
    let (&last, _) = buckets.last_key_value().ok_or(ReportError::EmptyDataset)?;

    let mut monthly = Vec::new();
    let mut current = first;
    while current <= last {
        let amount = buckets.get(&current).copied().unwrap_or(0.0);
        monthly.push(MonthlyPoint {
            month: month_end(current.0, current.1)?,
            amount,
            time_index: monthly.len(),
        });
        current = next_month(current);
    }

    tracing::debug!(
        "Aggregated {} rows into {} months ({} populated)",
        rows.len(),
        monthly.len(),
        buckets.len()
    );
    Ok(monthly)
}

pub fn next_month((year, month): (i32, u32)) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

pub fn month_end(year: i32, month: u32) -> Result<NaiveDate> {
    let (ny, nm) = next_month((year, month));
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .ok_or(ReportError::CalendarOverflow { year, month })
}

/// The `count` month-ends following `last`.
pub fn following_months(last: NaiveDate, count: usize) -> Result<Vec<NaiveDate>> {
    let mut current = (last.year(), last.month());
    let mut months = Vec::with_capacity(count);
    for _ in 0..count {
        current = next_month(current);
        months.push(month_end(current.0, current.1)?);
    }
    Ok(months)
}

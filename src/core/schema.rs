//! Column alias resolution for the Date and Amount roles.

use crate::domain::model::{ColumnMapping, RawTable};
use crate::utils::error::{ReportError, Result};

pub const AMOUNT_ALIASES: [&str; 6] = [
    "Amount",
    "Sales",
    "Sales_Amount",
    "Revenue",
    "Total_Sales",
    "Weekly_Sales",
];

pub const DATE_ALIASES: [&str; 5] = [
    "Date",
    "date",
    "Order Date",
    "order_date",
    "Transaction Date",
];

/// Scan the columns in table order and pick the alias match for each role.
///
/// Matching is exact (after trimming surrounding whitespace from the header).
/// When several columns match a role the *last* one in table order wins.
/// This mirrors the upload tool this report replaces and is likely
/// accidental; a "first wins" rule would be the obvious alternative.
pub fn resolve_columns(columns: &[String]) -> Result<ColumnMapping> {
    let mut amount_col = None;
    let mut date_col = None;

    for col in columns {
        let name = col.trim();
        if AMOUNT_ALIASES.contains(&name) {
            amount_col = Some(col.clone());
        }
        if DATE_ALIASES.contains(&name) {
            date_col = Some(col.clone());
        }
    }

    match (date_col, amount_col) {
        (Some(date_column), Some(amount_column)) => Ok(ColumnMapping {
            date_column,
            amount_column,
        }),
        _ => Err(ReportError::SchemaResolution {
            detected: columns.iter().map(|c| c.trim().to_string()).collect(),
        }),
    }
}

pub fn normalize(table: &RawTable) -> Result<ColumnMapping> {
    let mapping = resolve_columns(&table.columns)?;
    tracing::info!(
        "Using '{}' as Date and '{}' as Amount",
        mapping.date_column,
        mapping.amount_column
    );
    Ok(mapping)
}

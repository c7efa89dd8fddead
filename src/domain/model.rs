use chrono::NaiveDate;
use std::collections::HashMap;

/// One uploaded row, keyed by the column name as it appeared in the file.
#[derive(Debug, Clone, Default)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn get(&self, column: &str) -> &serde_json::Value {
        self.data.get(column).unwrap_or(&serde_json::Value::Null)
    }
}

/// The uploaded file as parsed, before any schema is known.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column names in file order.
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl RawTable {
    pub fn head(&self, n: usize) -> RawTable {
        RawTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

/// Which uploaded columns play the Date and Amount roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date_column: String,
    pub amount_column: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRow {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPoint {
    /// Month-end date labelling the bucket.
    pub month: NaiveDate,
    pub amount: f64,
    pub time_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub month: NaiveDate,
    pub lr_value: f64,
    pub hw_value: f64,
}

/// MAE/RMSE of each model's forecast head against the last observed months.
/// These months were part of the fitted data, so this is a fit-quality proxy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationResult {
    pub mae_lr: f64,
    pub rmse_lr: f64,
    pub mae_hw: f64,
    pub rmse_hw: f64,
}

/// Scores from refitting on all but the last `holdout` months.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backtest {
    pub holdout: usize,
    pub metrics: EvaluationResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insight {
    Upward,
    StableOrDeclining,
}

impl Insight {
    pub fn message(&self) -> &'static str {
        match self {
            Insight::Upward => {
                "Forecast indicates an upward sales trend. \
                 Inventory expansion and growth planning are recommended."
            }
            Insight::StableOrDeclining => {
                "Sales trend appears stable or declining. \
                 Marketing and demand optimization strategies are advised."
            }
        }
    }
}

/// Everything the presenter needs for one run.
#[derive(Debug, Clone)]
pub struct SalesReport {
    pub preview: RawTable,
    pub mapping: ColumnMapping,
    pub dropped_rows: usize,
    pub monthly: Vec<MonthlyPoint>,
    pub forecast: Vec<ForecastPoint>,
    pub evaluation: EvaluationResult,
    pub backtest: Option<Backtest>,
    pub insight: Insight,
}

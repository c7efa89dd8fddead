//! Error metrics, holdout backtest and the insight rule.

use crate::core::forecast::fit_and_forecast;
use crate::domain::model::{Backtest, EvaluationResult, ForecastPoint, Insight, MonthlyPoint};

pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n as f64
}

pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return f64::NAN;
    }
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n as f64;
    mse.sqrt()
}

fn score(actual: &[f64], lr: &[f64], hw: &[f64]) -> EvaluationResult {
    EvaluationResult {
        mae_lr: mean_absolute_error(actual, lr),
        rmse_lr: root_mean_squared_error(actual, lr),
        mae_hw: mean_absolute_error(actual, hw),
        rmse_hw: root_mean_squared_error(actual, hw),
    }
}

/// Compare the first forecast values with the last `horizon` actual months.
///
/// The compared months are inside the data both models were fit on and the
/// forecasts belong to later months, so the numbers describe fit quality at
/// best. When fewer than `horizon` months exist, all of them are used.
pub fn evaluate(monthly: &[MonthlyPoint], forecast: &[ForecastPoint], horizon: usize) -> EvaluationResult {
    let start = monthly.len().saturating_sub(horizon);
    let actual: Vec<f64> = monthly[start..].iter().map(|p| p.amount).collect();

    let lr: Vec<f64> = forecast.iter().take(actual.len()).map(|p| p.lr_value).collect();
    let hw: Vec<f64> = forecast.iter().take(actual.len()).map(|p| p.hw_value).collect();

    score(&actual, &lr, &hw)
}

/// Refit on all but the last `horizon` months and score the forecasts of
/// those months. `None` when fewer than two training months would remain or
/// the refit fails.
pub fn holdout_backtest(monthly: &[MonthlyPoint], horizon: usize) -> Option<Backtest> {
    let split = monthly.len().checked_sub(horizon)?;
    if split < 2 {
        tracing::info!(
            "Skipping holdout backtest: {} months leave {} for training",
            monthly.len(),
            split
        );
        return None;
    }

    let series: Vec<f64> = monthly.iter().map(|p| p.amount).collect();
    let (train, test) = series.split_at(split);

    match fit_and_forecast(train, horizon) {
        Ok((lr, hw)) => Some(Backtest {
            holdout: horizon,
            metrics: score(test, &lr, &hw),
        }),
        Err(e) => {
            tracing::warn!("Holdout backtest skipped: {}", e);
            None
        }
    }
}

/// Upward when the smoothing forecast averages above the monthly history.
pub fn insight(monthly: &[MonthlyPoint], forecast: &[ForecastPoint]) -> Insight {
    let mean = |values: Vec<f64>| values.iter().sum::<f64>() / values.len() as f64;

    let forecast_mean = mean(forecast.iter().map(|p| p.hw_value).collect());
    let history_mean = mean(monthly.iter().map(|p| p.amount).collect());

    if forecast_mean > history_mean {
        Insight::Upward
    } else {
        Insight::StableOrDeclining
    }
}

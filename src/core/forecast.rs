//! Trend (OLS on the month index) and Holt additive-trend smoothing.
//!
//! Both models are fit on the full monthly series and project `horizon`
//! months past the last observation.
//!
//! ```text
//! Trend:    ŷ_t = b₀ + b₁ t
//! Level:    L_t = α y_t + (1 - α)(L_{t-1} + T_{t-1})
//! Slope:    T_t = β (L_t - L_{t-1}) + (1 - β) T_{t-1}
//! Forecast: F_{t+h} = L_t + h T_t
//! ```

use crate::core::aggregate::following_months;
use crate::domain::model::{ForecastPoint, MonthlyPoint};
use crate::utils::error::{ReportError, Result};

pub trait TrendModel: Sized {
    const NAME: &'static str;

    fn fit(series: &[f64]) -> Result<Self>;

    /// Point forecasts for the next `steps` periods.
    fn forecast(&self, steps: usize) -> Vec<f64>;
}

fn ensure_finite(model: &str, series: &[f64]) -> Result<()> {
    match series.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(ReportError::ModelFit {
            model: model.to_string(),
            message: format!("month {} has a non-finite total ({})", i, series[i]),
        }),
        None => Ok(()),
    }
}

/// Ordinary least squares of amount on the zero-based month index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub intercept: f64,
    pub slope: f64,
    n: usize,
}

impl LinearTrend {
    pub fn predict(&self, index: f64) -> f64 {
        self.intercept + self.slope * index
    }
}

impl TrendModel for LinearTrend {
    const NAME: &'static str = "Linear Regression";

    fn fit(series: &[f64]) -> Result<Self> {
        if series.is_empty() {
            return Err(ReportError::InsufficientData {
                model: Self::NAME.to_string(),
                required: 1,
                actual: 0,
            });
        }
        ensure_finite(Self::NAME, series)?;

        let n = series.len();
        let mean_x = (n - 1) as f64 / 2.0;
        let mean_y = series.iter().sum::<f64>() / n as f64;

        let (sxx, sxy) = series
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(sxx, sxy), (i, &y)| {
                let dx = i as f64 - mean_x;
                (sxx + dx * dx, sxy + dx * (y - mean_y))
            });

        // 只有一個點時斜率為 0
        let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
        Ok(Self {
            intercept: mean_y - slope * mean_x,
            slope,
            n,
        })
    }

    fn forecast(&self, steps: usize) -> Vec<f64> {
        (self.n..self.n + steps)
            .map(|i| self.predict(i as f64))
            .collect()
    }
}

/// Holt's linear method with α and β picked by minimizing one-step SSE.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoltLinear {
    pub alpha: f64,
    pub beta: f64,
    pub level: f64,
    pub trend: f64,
    pub sse: f64,
}

const COARSE_STEP: f64 = 0.05;
const FINE_STEP: f64 = 0.005;

impl HoltLinear {
    /// Run the recursion with fixed parameters; returns (level, trend, sse).
    fn run(series: &[f64], alpha: f64, beta: f64) -> (f64, f64, f64) {
        let mut level = series[0];
        let mut trend = series[1] - series[0];
        let mut sse = 0.0;

        for &y in &series[1..] {
            let err = y - (level + trend);
            sse += err * err;

            let prev_level = level;
            level = alpha * y + (1.0 - alpha) * (level + trend);
            trend = beta * (level - prev_level) + (1.0 - beta) * trend;
        }

        (level, trend, sse)
    }

    fn search(series: &[f64], alphas: &[f64], betas: &[f64], best: &mut (f64, f64, f64)) {
        for &alpha in alphas {
            for &beta in betas {
                let (_, _, sse) = Self::run(series, alpha, beta);
                if sse < best.2 {
                    *best = (alpha, beta, sse);
                }
            }
        }
    }
}

fn grid(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let lo = lo.max(0.0);
    let hi = hi.min(1.0);
    let count = ((hi - lo) / step).round() as usize;
    (0..=count).map(|i| (lo + i as f64 * step).min(1.0)).collect()
}

impl TrendModel for HoltLinear {
    const NAME: &'static str = "Holt-Winters";

    fn fit(series: &[f64]) -> Result<Self> {
        if series.len() < 2 {
            return Err(ReportError::InsufficientData {
                model: Self::NAME.to_string(),
                required: 2,
                actual: series.len(),
            });
        }
        ensure_finite(Self::NAME, series)?;

        let mut best = (0.0, 0.0, f64::INFINITY);
        let coarse = grid(0.0, 1.0, COARSE_STEP);
        Self::search(series, &coarse, &coarse, &mut best);

        let (a, b, _) = best;
        Self::search(
            series,
            &grid(a - COARSE_STEP, a + COARSE_STEP, FINE_STEP),
            &grid(b - COARSE_STEP, b + COARSE_STEP, FINE_STEP),
            &mut best,
        );

        let (alpha, beta, sse) = best;
        if !sse.is_finite() {
            return Err(ReportError::ModelFit {
                model: Self::NAME.to_string(),
                message: "smoothing did not converge to a finite error".to_string(),
            });
        }

        let (level, trend, _) = Self::run(series, alpha, beta);
        tracing::debug!(
            "Holt fit: alpha={:.3}, beta={:.3}, sse={:.3}, level={:.3}, trend={:.3}",
            alpha,
            beta,
            sse,
            level,
            trend
        );

        Ok(Self {
            alpha,
            beta,
            level,
            trend,
            sse,
        })
    }

    fn forecast(&self, steps: usize) -> Vec<f64> {
        (1..=steps)
            .map(|h| self.level + h as f64 * self.trend)
            .collect()
    }
}

/// Fit both models on `series` and return their forecasts (trend, smoothing).
pub fn fit_and_forecast(series: &[f64], horizon: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    let lr = LinearTrend::fit(series)?;
    let hw = HoltLinear::fit(series)?;
    Ok((lr.forecast(horizon), hw.forecast(horizon)))
}

/// Forecast table anchored on the months after the last observed month.
pub fn forecast_table(monthly: &[MonthlyPoint], horizon: usize) -> Result<Vec<ForecastPoint>> {
    let series: Vec<f64> = monthly.iter().map(|p| p.amount).collect();
    let (lr, hw) = fit_and_forecast(&series, horizon)?;

    let last = monthly
        .last()
        .map(|p| p.month)
        .ok_or(ReportError::EmptyDataset)?;
    let months = following_months(last, horizon)?;

    Ok(months
        .into_iter()
        .zip(lr.into_iter().zip(hw))
        .map(|(month, (lr_value, hw_value))| ForecastPoint {
            month,
            lr_value,
            hw_value,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < tol, "got {a}, expected {e}");
        }
    }

    #[test]
    fn test_linear_trend_continues_progression() {
        let series = [1000.0, 2000.0, 3000.0, 4000.0, 5000.0];
        let lr = LinearTrend::fit(&series).unwrap();

        assert!((lr.slope - 1000.0).abs() < 1e-9);
        assert!((lr.intercept - 1000.0).abs() < 1e-9);
        assert_close(&lr.forecast(3), &[6000.0, 7000.0, 8000.0], 1e-6);
    }

    #[test]
    fn test_linear_trend_single_point_is_flat() {
        let lr = LinearTrend::fit(&[42.0]).unwrap();
        assert_eq!(lr.slope, 0.0);
        assert_close(&lr.forecast(2), &[42.0, 42.0], 1e-12);
    }

    #[test]
    fn test_linear_trend_noisy_fit() {
        let series = [2.1, 3.9, 6.1, 7.9, 10.1];
        let lr = LinearTrend::fit(&series).unwrap();
        assert!((lr.slope - 2.0).abs() < 0.1);
    }

    #[test]
    fn test_linear_trend_empty_fails() {
        assert!(matches!(
            LinearTrend::fit(&[]),
            Err(ReportError::InsufficientData { required: 1, .. })
        ));
    }

    #[test]
    fn test_holt_linear_series_is_exact() {
        let series = [1000.0, 2000.0, 3000.0, 4000.0, 5000.0, 6000.0];
        let hw = HoltLinear::fit(&series).unwrap();

        assert!(hw.sse < 1e-9);
        assert_close(&hw.forecast(3), &[7000.0, 8000.0, 9000.0], 1e-6);
    }

    #[test]
    fn test_holt_constant_series_is_flat() {
        let hw = HoltLinear::fit(&[500.0; 12]).unwrap();
        assert_close(&hw.forecast(4), &[500.0; 4], 1e-9);
    }

    #[test]
    fn test_holt_parameters_within_bounds() {
        let series = [120.0, 135.0, 128.0, 150.0, 160.0, 149.0, 171.0, 180.0, 176.0, 195.0];
        let hw = HoltLinear::fit(&series).unwrap();

        assert!((0.0..=1.0).contains(&hw.alpha));
        assert!((0.0..=1.0).contains(&hw.beta));
        let f = hw.forecast(6);
        assert!(f.iter().all(|v| v.is_finite()));
        assert!(f[5] > f[0], "upward series should forecast upward");
    }

    #[test]
    fn test_holt_needs_two_points() {
        assert!(matches!(
            HoltLinear::fit(&[10.0]),
            Err(ReportError::InsufficientData { required: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_non_finite_series_fails() {
        assert!(matches!(
            HoltLinear::fit(&[1.0, f64::INFINITY, 3.0]),
            Err(ReportError::ModelFit { .. })
        ));
        assert!(matches!(
            LinearTrend::fit(&[1.0, f64::INFINITY]),
            Err(ReportError::ModelFit { .. })
        ));
    }

    #[test]
    fn test_grid_covers_bounds() {
        let g = grid(0.0, 1.0, COARSE_STEP);
        assert_eq!(g.len(), 21);
        assert_eq!(g[0], 0.0);
        assert_eq!(*g.last().unwrap(), 1.0);

        let clipped = grid(-0.05, 0.05, FINE_STEP);
        assert_eq!(clipped[0], 0.0);
    }

    #[test]
    fn test_forecast_table_months_follow_history() {
        let monthly: Vec<MonthlyPoint> = [(2024, 10, 31), (2024, 11, 30), (2024, 12, 31)]
            .iter()
            .enumerate()
            .map(|(i, &(y, m, d))| MonthlyPoint {
                month: ymd(y, m, d),
                amount: 100.0 * (i + 1) as f64,
                time_index: i,
            })
            .collect();

        let table = forecast_table(&monthly, 4).unwrap();

        let months: Vec<NaiveDate> = table.iter().map(|p| p.month).collect();
        assert_eq!(
            months,
            vec![ymd(2025, 1, 31), ymd(2025, 2, 28), ymd(2025, 3, 31), ymd(2025, 4, 30)]
        );
        assert!((table[0].lr_value - 400.0).abs() < 1e-6);
        assert!((table[0].hw_value - 400.0).abs() < 1e-6);
    }
}

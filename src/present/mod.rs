//! Text rendering of a [`SalesReport`].

pub mod chart;
pub mod table;

use crate::domain::model::{EvaluationResult, Insight, SalesReport};
use table::{display_cell, money, TextTable};

const PANEL_WIDTH: usize = 32;

#[derive(Debug, Clone, Copy)]
pub struct Presenter {
    pub chart_width: u16,
    pub chart_height: u16,
}

impl Presenter {
    pub fn new(chart_width: u16, chart_height: u16) -> Self {
        Self {
            chart_width,
            chart_height,
        }
    }

    /// Sections in order: preview, monthly table, trend chart, forecast
    /// table, overlay chart, metrics, insight.
    pub fn render(&self, report: &SalesReport) -> String {
        let mut sections = vec![
            "Sales Prediction Using Trend Analysis\n\
             Time-series based sales forecasting and trend analysis"
                .to_string(),
        ];

        sections.push(section("Dataset Preview", &preview_table(report)));
        sections.push(format!(
            "Date column: {}    Amount column: {}",
            report.mapping.date_column.trim(),
            report.mapping.amount_column.trim()
        ));
        if report.dropped_rows > 0 {
            sections.push(format!(
                "({} rows without a recognizable date were left out)",
                report.dropped_rows
            ));
        }

        let mut monthly = TextTable::new(["Date", "Amount"]);
        for point in &report.monthly {
            monthly.push_row(vec![point.month.to_string(), money(point.amount)]);
        }
        sections.push(section("Monthly Aggregated Sales", &monthly.render()));

        sections.push(section(
            "Monthly Sales Trend",
            &chart::trend_chart(&report.monthly, self.chart_width, self.chart_height),
        ));

        let mut forecast = TextTable::new([
            "Month",
            "Linear Regression Forecast",
            "Holt-Winters Forecast",
        ]);
        for point in &report.forecast {
            forecast.push_row(vec![
                point.month.to_string(),
                money(point.lr_value),
                money(point.hw_value),
            ]);
        }
        sections.push(section("Forecast Results", &forecast.render()));

        sections.push(chart::forecast_chart(
            &report.monthly,
            &report.forecast,
            self.chart_width,
            self.chart_height,
        ));

        let mut evaluation = metric_panels(&report.evaluation);
        evaluation.push_str(
            "\n\nCompared with the last observed months, which both models were fit on.",
        );
        sections.push(section("Model Evaluation", &evaluation));

        let backtest = match &report.backtest {
            Some(bt) => format!(
                "Refit without the last {} months, scored on those months:\n\n{}",
                bt.holdout,
                metric_panels(&bt.metrics)
            ),
            None => "Not enough history to hold out the forecast window.".to_string(),
        };
        sections.push(section("Holdout Backtest", &backtest));

        let marker = match report.insight {
            Insight::Upward => "[+]",
            Insight::StableOrDeclining => "[!]",
        };
        sections.push(section(
            "Business Insights",
            &format!("{} {}", marker, report.insight.message()),
        ));

        let mut out = sections.join("\n\n");
        out.push('\n');
        out
    }
}

fn section(title: &str, body: &str) -> String {
    format!("## {}\n\n{}", title, body)
}

fn preview_table(report: &SalesReport) -> String {
    let preview = &report.preview;
    let mut table = TextTable::new(preview.columns.iter().cloned());
    for record in &preview.rows {
        table.push_row(
            preview
                .columns
                .iter()
                .map(|c| display_cell(record.get(c)))
                .collect(),
        );
    }
    table.render()
}

fn metric_panels(metrics: &EvaluationResult) -> String {
    let left = [
        "Linear Regression".to_string(),
        format!("MAE: {:.2}", metrics.mae_lr),
        format!("RMSE: {:.2}", metrics.rmse_lr),
    ];
    let right = [
        "Holt-Winters".to_string(),
        format!("MAE: {:.2}", metrics.mae_hw),
        format!("RMSE: {:.2}", metrics.rmse_hw),
    ];

    left.iter()
        .zip(right.iter())
        .map(|(l, r)| format!("{:<width$}{}", l, r, width = PANEL_WIDTH))
        .collect::<Vec<_>>()
        .join("\n")
}

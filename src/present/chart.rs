//! Line charts drawn with ratatui into an off-screen buffer and flattened to
//! text, one line per buffer row.

use crate::domain::model::{ForecastPoint, MonthlyPoint};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};

struct Series {
    name: &'static str,
    points: Vec<(f64, f64)>,
    marker: Marker,
    color: Color,
}

/// Historical monthly totals.
pub fn trend_chart(monthly: &[MonthlyPoint], width: u16, height: u16) -> String {
    let series = vec![history_series(monthly)];
    let labels = month_labels(monthly, &[]);
    render(" Monthly Sales Trend ", series, labels, width, height)
}

/// History plus both model forecasts; forecasts are drawn dotted.
pub fn forecast_chart(
    monthly: &[MonthlyPoint],
    forecast: &[ForecastPoint],
    width: u16,
    height: u16,
) -> String {
    let offset = monthly.len();
    let project = |value: fn(&ForecastPoint) -> f64| -> Vec<(f64, f64)> {
        forecast
            .iter()
            .enumerate()
            .map(|(i, p)| ((offset + i) as f64, value(p)))
            .collect()
    };

    let series = vec![
        history_series(monthly),
        Series {
            name: "Linear Regression",
            points: project(|p| p.lr_value),
            marker: Marker::Dot,
            color: Color::Yellow,
        },
        Series {
            name: "Holt-Winters",
            points: project(|p| p.hw_value),
            marker: Marker::Dot,
            color: Color::Green,
        },
    ];
    let labels = month_labels(monthly, forecast);
    render(" Sales Forecast ", series, labels, width, height)
}

fn history_series(monthly: &[MonthlyPoint]) -> Series {
    Series {
        name: "Historical",
        points: monthly
            .iter()
            .map(|p| (p.time_index as f64, p.amount))
            .collect(),
        marker: Marker::Braille,
        color: Color::Cyan,
    }
}

fn month_labels(monthly: &[MonthlyPoint], forecast: &[ForecastPoint]) -> Vec<String> {
    let first = monthly.first().map(|p| p.month);
    let last = forecast
        .last()
        .map(|p| p.month)
        .or_else(|| monthly.last().map(|p| p.month));

    match (first, last) {
        (Some(first), Some(last)) => vec![
            first.format("%Y-%m").to_string(),
            last.format("%Y-%m").to_string(),
        ],
        _ => Vec::new(),
    }
}

fn value_bounds(series: &[Series]) -> [f64; 2] {
    let (min, max) = series
        .iter()
        .flat_map(|s| s.points.iter().map(|&(_, y)| y))
        .filter(|y| y.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

    if !min.is_finite() {
        return [0.0, 1.0];
    }
    let pad = if max > min {
        (max - min) * 0.05
    } else {
        min.abs().max(1.0) * 0.1
    };
    [min - pad, max + pad]
}

fn render(title: &str, series: Vec<Series>, x_labels: Vec<String>, width: u16, height: u16) -> String {
    let x_max = series
        .iter()
        .flat_map(|s| s.points.iter().map(|&(x, _)| x))
        .fold(0.0, f64::max)
        .max(1.0);
    let [y_min, y_max] = value_bounds(&series);

    let datasets: Vec<Dataset> = series
        .iter()
        .map(|s| {
            Dataset::default()
                .name(s.name)
                .marker(s.marker)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(s.color))
                .data(&s.points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)))
        .x_axis(
            Axis::default()
                .title("Month")
                .bounds([0.0, x_max])
                .labels(x_labels.into_iter().map(Span::raw).collect::<Vec<_>>()),
        )
        .y_axis(
            Axis::default()
                .title("Sales Amount")
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{:.0}", y_min)),
                    Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
                    Span::raw(format!("{:.0}", y_max)),
                ]),
        );

    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    chart.render(area, &mut buffer);
    buffer_to_text(&buffer)
}

fn buffer_to_text(buffer: &Buffer) -> String {
    let width = usize::from(buffer.area.width).max(1);
    buffer
        .content
        .chunks(width)
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

//! Trend chart rendering.
//!
//! Plots the three vital series from the trend history on one time axis.

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::Metric;

/// Render the Trends view: one chart, three series.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.history.is_empty() {
        let placeholder = Paragraph::new("Collecting samples...")
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(bordered_block(app, " Vital Trends "));
        frame.render_widget(placeholder, area);
        return;
    }

    let temperature = app.history.series(Metric::BodyTemperature);
    let heart_rate = app.history.series(Metric::HeartRate);
    let respiration = app.history.series(Metric::RespirationRate);

    let datasets = vec![
        Dataset::default()
            .name(format!("{} ({})", Metric::BodyTemperature.label(), Metric::BodyTemperature.unit()))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.series_temperature))
            .data(&temperature),
        Dataset::default()
            .name(format!("{} ({})", Metric::HeartRate.label(), Metric::HeartRate.unit()))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.series_heart_rate))
            .data(&heart_rate),
        Dataset::default()
            .name(format!("{} ({})", Metric::RespirationRate.label(), Metric::RespirationRate.unit()))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.series_respiration))
            .data(&respiration),
    ];

    let (x_bounds, x_labels) = time_axis(app);
    let (y_bounds, y_labels) = value_axis(app);

    let chart = Chart::new(datasets)
        .block(bordered_block(
            app,
            &format!(" Vital Trends ({} ticks) ", app.history.tick_count()),
        ))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds(y_bounds)
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

fn bordered_block<'a>(app: &App, title: &str) -> Block<'a> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

/// X axis: unix-second bounds with wall-clock labels.
fn time_axis(app: &App) -> ([f64; 2], Vec<Span<'static>>) {
    let Some((first, last)) = app.history.time_bounds() else {
        return ([0.0, 1.0], Vec::new());
    };

    let lo = first.timestamp() as f64;
    // A single tick still needs a non-empty span to render
    let hi = (last.timestamp() as f64).max(lo + 1.0);

    let labels = vec![
        time_label(first),
        time_label(middle(first, last)),
        time_label(last),
    ];

    ([lo, hi], labels)
}

fn time_label(t: DateTime<Local>) -> Span<'static> {
    Span::raw(t.format("%H:%M:%S").to_string())
}

fn middle(first: DateTime<Local>, last: DateTime<Local>) -> DateTime<Local> {
    first + (last - first) / 2
}

/// Y axis: padded min/max across all three series.
fn value_axis(app: &App) -> ([f64; 2], Vec<Span<'static>>) {
    let (lo, hi) = app.history.value_bounds().unwrap_or((0.0, 1.0));

    // Pad so flat series don't hug the frame
    let pad = ((hi - lo) * 0.1).max(1.0);
    let lo = lo - pad;
    let hi = hi + pad;

    let labels = vec![
        Span::raw(format!("{:.0}", lo)),
        Span::raw(format!("{:.0}", (lo + hi) / 2.0)),
        Span::raw(format!("{:.0}", hi)),
    ];

    ([lo, hi], labels)
}

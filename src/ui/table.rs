//! Roster table rendering.
//!
//! Displays the sorted/filtered roster with per-vital warning indicators
//! and a whole-row alert state.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::{AnnotatedReading, Metric, SortKey};

/// Render the Roster view showing all soldiers in a sortable table.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows_order = app.visible_rows();
    let Some(ref data) = app.data else {
        return;
    };

    let header = Row::new(vec![
        Cell::from(format_header("Soldier ID", SortKey::Id, app)),
        Cell::from(format_header("Body Temp (°C)", SortKey::BodyTemperature, app)),
        Cell::from(format_header("Heart Rate (bpm)", SortKey::HeartRate, app)),
        Cell::from(format_header("Respiration (br/min)", SortKey::RespirationRate, app)),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = rows_order
        .iter()
        .map(|&i| {
            let soldier = &data.soldiers[i];
            let alert = soldier.flags.is_alert();

            let row = Row::new(vec![
                Cell::from(soldier.id.clone()),
                vital_cell(app, soldier, Metric::BodyTemperature),
                vital_cell(app, soldier, Metric::HeartRate),
                vital_cell(app, soldier, Metric::RespirationRate),
                Cell::from(if alert { "ALERT" } else { "OK" })
                    .style(app.theme.status_style(alert)),
            ]);

            if alert {
                row.style(Style::default().fg(app.theme.alert))
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Min(7),
    ];

    let selected_visual_index = app.selected_index.min(rows_order.len().saturating_sub(1));

    let sort_dir = if app.view_state.sort_ascending { "↑" } else { "↓" };

    // Build title with filter info
    let filter_info = if app.filter_active {
        format!(" /{}_", app.view_state.filter_text)
    } else if !app.view_state.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.view_state.filter_text)
    } else {
        String::new()
    };

    let position_info = if !rows_order.is_empty() {
        format!(" [{}/{}]", selected_visual_index + 1, rows_order.len())
    } else {
        String::new()
    };

    let title = format!(
        " Soldiers ({}/{}) [s:sort {}{}]{}{} ",
        rows_order.len(),
        data.soldiers.len(),
        app.view_state.sort_key.label(),
        sort_dir,
        filter_info,
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected_visual_index));

    frame.render_stateful_widget(table, area, &mut state);
}

/// Build one vital cell: formatted value plus a warning mark when flagged.
fn vital_cell(app: &App, soldier: &AnnotatedReading, metric: Metric) -> Cell<'static> {
    let value = soldier.vitals.get(metric);
    let warning = soldier.flags.get(metric);

    let text = if value.is_finite() {
        if warning {
            format!("{:.1} ⚠", value)
        } else {
            format!("{:.1}", value)
        }
    } else {
        "invalid ⚠".to_string()
    };

    Cell::from(text).style(app.theme.vital_style(warning))
}

fn format_header(name: &str, key: SortKey, app: &App) -> Span<'static> {
    if app.view_state.sort_key == key {
        let arrow = if app.view_state.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, the help
//! overlay, and the full-screen loading/error states.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

/// Render the header bar with a roster health overview.
///
/// Displays: overall status indicator, ok/alert counts, roster size,
/// time of the last applied fetch.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let line = Line::from(vec![
            Span::styled(
                " VITALWATCH ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let total = data.soldiers.len();
    let alerts = data.alert_count();
    let ok = total - alerts;

    let status_style = if alerts > 0 {
        Style::default().fg(app.theme.alert).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.healthy)
    };

    let updated = app
        .last_updated()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let line = Line::from(vec![
        Span::styled(" ● ", status_style),
        Span::styled("VITALWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(format!("{}", ok), Style::default().fg(app.theme.healthy)),
        Span::raw(" ok "),
        if alerts > 0 {
            Span::styled(
                format!("{}", alerts),
                Style::default().fg(app.theme.alert).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" alert │ "),
        Span::styled(format!("{}", total), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" soldiers │ "),
        Span::raw(format!("updated {}", updated)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Roster "), Line::from(" 2:Trends ")];

    let selected = match app.current_view {
        View::Roster => 0,
        View::Trends => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: source description, time since last update, available controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(ref err) = app.load_error {
        format!(" Error: {} | retrying on next tick | q:quit ", err)
    } else if let Some(updated) = app.last_updated() {
        let controls = if app.filter_active {
            "Type to search | Enter:apply Esc:cancel"
        } else {
            match app.current_view {
                View::Roster => "/:search s:sort S:reverse Tab:switch ?:help q:quit",
                View::Trends => "Tab:switch ?:help q:quit",
            }
        };

        let elapsed = elapsed_secs(updated);
        format!(
            " {} | Updated {:.1}s ago | {}",
            app.source_description(),
            elapsed,
            controls,
        )
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

fn elapsed_secs(updated: chrono::DateTime<chrono::Local>) -> f64 {
    (chrono::Local::now() - updated).num_milliseconds() as f64 / 1000.0
}

/// Render the full-area loading screen shown before any fetch completes.
pub fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = Paragraph::new("Loading roster...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.highlight))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );
    frame.render_widget(paragraph, area);
}

/// Render the full-area error screen shown while the last fetch failed.
///
/// The scheduler keeps ticking underneath; the next successful fetch
/// clears this screen.
pub fn render_error(frame: &mut Frame, app: &App, area: Rect, error: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Error fetching roster",
            Style::default().fg(app.theme.alert).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Retrying on the next refresh tick",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.alert)),
    );
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate roster"),
        Line::from("  PgUp/PgDn   Jump 10 rows"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Roster",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  /         Start filter (by soldier id)"),
        Line::from("  c         Clear filter"),
        Line::from("  s         Cycle sort column"),
        Line::from("  S         Toggle sort direction"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Apply queued fetch results now"),
        Line::from("  ?         Toggle this help"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(Span::styled(
            " Press any key to close ",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let width = 46u16.min(area.width);
    let height = (help_text.len() as u16 + 2).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay);
    let paragraph = Paragraph::new(help_text).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.highlight)),
    );
    frame.render_widget(paragraph, overlay);
}

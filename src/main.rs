// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

mod app;
mod data;
mod events;
mod fetch;
mod scheduler;
mod source;
mod ui;

use app::{App, View};
use data::{parse_range, Thresholds};
use fetch::HttpRosterFetcher;
use scheduler::RefreshScheduler;
use source::RosterSource;

#[derive(Parser, Debug)]
#[command(name = "vitalwatch")]
#[command(about = "Live TUI dashboard for monitoring soldier vital signs")]
struct Args {
    /// Roster endpoint URL
    #[arg(short, long, default_value = fetch::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Refresh interval in seconds
    #[arg(short, long, default_value = "5")]
    refresh: u64,

    /// Safe body temperature range in °C (e.g., "35:38")
    #[arg(long, default_value = "35:38")]
    temp_range: String,

    /// Safe heart rate range in bpm (e.g., "60:100")
    #[arg(long, default_value = "60:100")]
    hr_range: String,

    /// Safe respiration rate range in breaths/min (e.g., "12:20")
    #[arg(long, default_value = "12:20")]
    resp_range: String,

    /// Number of refresh ticks retained for the trend chart
    #[arg(long, default_value = "120")]
    history: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Parse threshold ranges, falling back to the defaults on bad input
    let defaults = Thresholds::default();
    let thresholds = Thresholds {
        body_temperature: parse_range(&args.temp_range).unwrap_or(defaults.body_temperature),
        heart_rate: parse_range(&args.hr_range).unwrap_or(defaults.heart_rate),
        respiration_rate: parse_range(&args.resp_range).unwrap_or(defaults.respiration_rate),
    };

    // Build a tokio runtime; the scheduler's tasks run on its workers
    // while the TUI owns the main thread.
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let fetcher = HttpRosterFetcher::builder()
        .endpoint(&args.endpoint)
        .build();
    let (mut scheduler, source) =
        RefreshScheduler::channel(fetcher, Duration::from_secs(args.refresh.max(1)));
    scheduler.start();

    let result = run_tui(Box::new(source), thresholds, args.history);

    scheduler.stop();

    result
}

/// Run the TUI with the given roster source
fn run_tui(
    source: Box<dyn RosterSource>,
    thresholds: Thresholds,
    history_ticks: usize,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(source, thresholds, history_ticks);

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Apply any completed fetches before drawing
        app.refresh();

        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            // Error replaces the dashboard until a fetch succeeds again;
            // before the first completed fetch a loading screen shows.
            if let Some(err) = app.load_error.clone() {
                ui::common::render_error(frame, app, chunks[2], &err);
            } else if app.loading {
                ui::common::render_loading(frame, app, chunks[2]);
            } else {
                match app.current_view {
                    View::Roster => ui::table::render(frame, app, chunks[2]),
                    View::Trends => ui::chart::render(frame, app, chunks[2]),
                }
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}

//! Application state and navigation logic.

use chrono::{DateTime, Local};

use crate::data::{RosterData, SortKey, Thresholds, TrendHistory, ViewCache, ViewState};
use crate::scheduler::FetchEvent;
use crate::source::RosterSource;
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Sortable/filterable roster table with anomaly indicators.
    Roster,
    /// Rolling three-series vital trend chart.
    Trends,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Roster => View::Trends,
            View::Trends => View::Roster,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Roster => "Roster",
            View::Trends => "Trends",
        }
    }
}

/// Main application state.
///
/// Owns every piece of mutable dashboard state — the latest roster, the
/// trend history, the user's sort/filter configuration and the
/// error/loading flags — and mutates it only on the UI thread, either
/// when fetch events are drained or on user input.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data source
    source: Box<dyn RosterSource>,
    pub data: Option<RosterData>,
    pub history: TrendHistory,
    pub load_error: Option<String>,
    /// True until the first fetch event (success or failure) arrives.
    pub loading: bool,
    pub thresholds: Thresholds,

    // Sort/filter state
    pub view_state: ViewState,
    pub filter_active: bool,
    cache: ViewCache,
    /// Sequence of the newest applied event, success or failure.
    last_seq: Option<u64>,

    // Navigation state
    pub selected_index: usize,

    // UI
    pub theme: Theme,
}

impl App {
    /// Create a new App with the given source and thresholds.
    pub fn new(source: Box<dyn RosterSource>, thresholds: Thresholds, history_ticks: usize) -> Self {
        Self {
            running: true,
            current_view: View::Roster,
            show_help: false,
            source,
            data: None,
            history: TrendHistory::new(history_ticks),
            load_error: None,
            loading: true,
            thresholds,
            view_state: ViewState::new(),
            filter_active: false,
            cache: ViewCache::new(),
            last_seq: None,
            selected_index: 0,
            theme: Theme::auto_detect(),
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Drain all queued fetch events and apply them in delivery order.
    ///
    /// Returns true if any event mutated state.
    pub fn refresh(&mut self) -> bool {
        let mut changed = false;
        while let Some(event) = self.source.poll() {
            changed |= self.apply_event(event);
        }
        changed
    }

    /// Apply one fetch event to the dashboard state.
    ///
    /// Events carrying a sequence number at or below the last applied one
    /// are stale completions and are discarded whole. A successful event
    /// atomically replaces the roster, records one tick of trend samples
    /// and clears any standing error; a failed one sets the error and
    /// leaves data and history untouched.
    pub fn apply_event(&mut self, event: FetchEvent) -> bool {
        if self.last_seq.is_some_and(|last| event.seq <= last) {
            return false;
        }

        self.last_seq = Some(event.seq);
        self.loading = false;

        match event.result {
            Ok(snapshot) => {
                let roster = RosterData::from_snapshot(
                    snapshot,
                    &self.thresholds,
                    event.seq,
                    event.captured_at,
                );
                self.history.record(&roster);
                self.data = Some(roster);
                self.load_error = None;
                self.clamp_selection();
            }
            Err(err) => {
                self.load_error = Some(err.to_string());
            }
        }
        true
    }

    /// Timestamp of the roster currently on display.
    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.data.as_ref().map(|d| d.captured_at)
    }

    /// Visible row order for the current roster and view state.
    ///
    /// Memoized on `(snapshot, sort key, direction, filter)`; an
    /// unchanged frame costs a cache lookup, not a re-sort.
    pub fn visible_rows(&mut self) -> Vec<usize> {
        match self.data {
            Some(ref roster) => self.cache.rows(roster, &self.view_state).to_vec(),
            None => Vec::new(),
        }
    }

    /// Number of rows visible under the current filter.
    pub fn visible_count(&mut self) -> usize {
        self.visible_rows().len()
    }

    // --- view navigation ---

    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    // --- selection ---

    /// Move selection down by one row.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one row.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n rows.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.visible_count().saturating_sub(1);
        self.selected_index = (self.selected_index + n).min(max);
    }

    /// Move selection up by n rows.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    /// Jump to the first row.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last row.
    pub fn select_last(&mut self) {
        self.selected_index = self.visible_count().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_count();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    // --- sorting ---

    /// Cycle to the next sort key.
    pub fn cycle_sort(&mut self) {
        self.view_state.sort_key = self.view_state.sort_key.next();
    }

    /// Sort by a specific key.
    pub fn set_sort(&mut self, key: SortKey) {
        self.view_state.sort_key = key;
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        self.view_state.sort_ascending = !self.view_state.sort_ascending;
    }

    // --- filtering ---

    /// Enter filter input mode (starts capturing keystrokes).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.view_state.filter_text.clear();
        self.filter_active = false;
        self.clamp_selection();
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.view_state.filter_text.push(c);
        self.clamp_selection();
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.view_state.filter_text.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::source::{ScheduledSource, SerializedReading};
    use tokio::sync::mpsc;

    fn reading(id: &str, temp: f64) -> SerializedReading {
        SerializedReading {
            soldier_id: id.to_string(),
            body_temperature: temp,
            heart_rate: 72.0,
            respiration_rate: 16.0,
        }
    }

    fn ok_event(seq: u64, readings: Vec<SerializedReading>) -> FetchEvent {
        FetchEvent {
            seq,
            captured_at: Local::now(),
            result: Ok(readings),
        }
    }

    fn err_event(seq: u64) -> FetchEvent {
        FetchEvent {
            seq,
            captured_at: Local::now(),
            result: Err(FetchError::Status(503)),
        }
    }

    fn test_app() -> (mpsc::Sender<FetchEvent>, App) {
        let (tx, rx) = mpsc::channel(16);
        let source = ScheduledSource::new(rx, "test");
        let app = App::new(Box::new(source), Thresholds::default(), 120);
        (tx, app)
    }

    #[test]
    fn loading_until_first_event() {
        let (tx, mut app) = test_app();
        assert!(app.loading);

        tx.try_send(ok_event(0, vec![reading("S1", 36.6)])).unwrap();
        assert!(app.refresh());
        assert!(!app.loading);
        assert!(app.data.is_some());
    }

    #[test]
    fn failures_then_success_clear_error_and_record_once() {
        let (tx, mut app) = test_app();

        tx.try_send(err_event(0)).unwrap();
        tx.try_send(err_event(1)).unwrap();
        app.refresh();

        assert!(app.load_error.is_some());
        assert!(!app.loading);
        // Failed ticks append nothing
        assert_eq!(app.history.sample_count(), 0);

        tx.try_send(ok_event(2, vec![reading("S1", 36.6)])).unwrap();
        app.refresh();

        assert!(app.load_error.is_none());
        assert_eq!(app.history.tick_count(), 1);
        assert_eq!(app.history.sample_count(), 1);
    }

    #[test]
    fn stale_completion_is_discarded() {
        let (tx, mut app) = test_app();

        tx.try_send(ok_event(3, vec![reading("S1", 36.6)])).unwrap();
        app.refresh();
        assert_eq!(app.data.as_ref().unwrap().seq, 3);

        // An older fetch completing late must not overwrite the roster
        tx.try_send(ok_event(1, vec![reading("S9", 40.0)])).unwrap();
        let changed = app.refresh();

        assert!(!changed);
        assert_eq!(app.data.as_ref().unwrap().seq, 3);
        assert_eq!(app.data.as_ref().unwrap().soldiers[0].id, "S1");
        assert_eq!(app.history.tick_count(), 1);
    }

    #[test]
    fn late_success_does_not_clear_newer_error() {
        let (tx, mut app) = test_app();

        tx.try_send(err_event(2)).unwrap();
        app.refresh();
        assert!(app.load_error.is_some());

        // A fetch issued before the failing one completes late
        tx.try_send(ok_event(1, vec![reading("S1", 36.6)])).unwrap();
        app.refresh();

        assert!(app.load_error.is_some());
        assert!(app.data.is_none());
    }

    #[test]
    fn snapshot_replacement_is_whole() {
        let (tx, mut app) = test_app();

        tx.try_send(ok_event(0, vec![reading("S1", 36.6), reading("S2", 36.6)])).unwrap();
        app.refresh();
        tx.try_send(ok_event(1, vec![reading("S3", 39.0)])).unwrap();
        app.refresh();

        let roster = app.data.as_ref().unwrap();
        assert_eq!(roster.soldiers.len(), 1);
        assert_eq!(roster.soldiers[0].id, "S3");
        assert!(roster.soldiers[0].flags.temperature_warning);
    }

    #[test]
    fn error_keeps_stale_roster_on_display() {
        let (tx, mut app) = test_app();

        tx.try_send(ok_event(0, vec![reading("S1", 36.6)])).unwrap();
        app.refresh();
        tx.try_send(err_event(1)).unwrap();
        app.refresh();

        assert!(app.load_error.is_some());
        // Table holds the stale roster; only rendering is gated on the error
        assert_eq!(app.data.as_ref().unwrap().soldiers[0].id, "S1");
    }

    #[test]
    fn selection_clamps_when_roster_shrinks() {
        let (tx, mut app) = test_app();

        tx.try_send(ok_event(0, (0..5).map(|i| reading(&format!("S{i}"), 36.6)).collect()))
            .unwrap();
        app.refresh();
        app.select_last();
        assert_eq!(app.selected_index, 4);

        tx.try_send(ok_event(1, vec![reading("S1", 36.6)])).unwrap();
        app.refresh();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn filter_and_sort_drive_visible_rows() {
        let (tx, mut app) = test_app();

        tx.try_send(ok_event(
            0,
            vec![reading("A1-alpha", 36.6), reading("B2-bravo", 36.6)],
        ))
        .unwrap();
        app.refresh();

        app.start_filter();
        app.filter_push('a');
        app.filter_push('1');
        assert_eq!(app.visible_count(), 1);

        app.clear_filter();
        assert_eq!(app.visible_count(), 2);
    }
}

//! Roster processing and anomaly classification.
//!
//! This module transforms raw roster snapshots into annotated readings
//! with per-vital anomaly flags computed against the configured safe
//! ranges, and derives the sorted/filtered list the table view consumes.

use std::cmp::Ordering;

use chrono::{DateTime, Local};

use super::thresholds::{Metric, Thresholds};
use crate::source::{RosterSnapshot, SerializedReading};

/// The three vital readings of one soldier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalSigns {
    pub body_temperature: f64,
    pub heart_rate: f64,
    pub respiration_rate: f64,
}

impl VitalSigns {
    /// Returns the reading for a given metric.
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::BodyTemperature => self.body_temperature,
            Metric::HeartRate => self.heart_rate,
            Metric::RespirationRate => self.respiration_rate,
        }
    }
}

/// Per-vital anomaly flags for one reading.
///
/// Derived deterministically from the current thresholds; never stored
/// apart from the reading they were computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnomalyFlags {
    pub temperature_warning: bool,
    pub heart_rate_warning: bool,
    pub respiration_warning: bool,
}

impl AnomalyFlags {
    /// Whether any vital is out of its safe range.
    pub fn is_alert(&self) -> bool {
        self.temperature_warning || self.heart_rate_warning || self.respiration_warning
    }

    /// Returns the flag for a given metric.
    pub fn get(&self, metric: Metric) -> bool {
        match metric {
            Metric::BodyTemperature => self.temperature_warning,
            Metric::HeartRate => self.heart_rate_warning,
            Metric::RespirationRate => self.respiration_warning,
        }
    }
}

/// Classify one soldier's vitals against the safe ranges.
///
/// A vital flags when it lies strictly outside its inclusive range; the
/// bounds themselves are safe. Non-finite readings fail the containment
/// check and therefore flag.
pub fn classify(vitals: &VitalSigns, thresholds: &Thresholds) -> AnomalyFlags {
    AnomalyFlags {
        temperature_warning: !thresholds.body_temperature.contains(vitals.body_temperature),
        heart_rate_warning: !thresholds.heart_rate.contains(vitals.heart_rate),
        respiration_warning: !thresholds.respiration_rate.contains(vitals.respiration_rate),
    }
}

/// One soldier's reading with its anomaly flags, as consumed by the table.
#[derive(Debug, Clone)]
pub struct AnnotatedReading {
    pub id: String,
    pub vitals: VitalSigns,
    pub flags: AnomalyFlags,
}

impl From<SerializedReading> for VitalSigns {
    fn from(r: SerializedReading) -> Self {
        Self {
            body_temperature: r.body_temperature,
            heart_rate: r.heart_rate,
            respiration_rate: r.respiration_rate,
        }
    }
}

/// Complete processed roster data ready for display.
///
/// Replaced whole on every applied fetch, so a view never observes a
/// half-updated roster.
#[derive(Debug, Clone)]
pub struct RosterData {
    /// Annotated readings in fetch order.
    pub soldiers: Vec<AnnotatedReading>,
    /// Sequence number of the fetch this roster came from.
    pub seq: u64,
    /// Capture instant shared by every reading in this roster.
    pub captured_at: DateTime<Local>,
}

impl RosterData {
    /// Convert a raw snapshot into annotated roster data.
    pub fn from_snapshot(
        snapshot: RosterSnapshot,
        thresholds: &Thresholds,
        seq: u64,
        captured_at: DateTime<Local>,
    ) -> Self {
        let soldiers = snapshot
            .into_iter()
            .map(|reading| {
                let id = reading.soldier_id.clone();
                let vitals = VitalSigns::from(reading);
                let flags = classify(&vitals, thresholds);
                AnnotatedReading { id, vitals, flags }
            })
            .collect();

        Self {
            soldiers,
            seq,
            captured_at,
        }
    }

    /// Number of soldiers currently in alert state.
    pub fn alert_count(&self) -> usize {
        self.soldiers.iter().filter(|s| s.flags.is_alert()).count()
    }
}

/// Column to sort the roster table by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Sort by soldier id lexicographically.
    #[default]
    Id,
    /// Sort by body temperature.
    BodyTemperature,
    /// Sort by heart rate.
    HeartRate,
    /// Sort by respiration rate.
    RespirationRate,
}

impl SortKey {
    /// Cycle to the next sort key.
    pub fn next(self) -> Self {
        match self {
            SortKey::Id => SortKey::BodyTemperature,
            SortKey::BodyTemperature => SortKey::HeartRate,
            SortKey::HeartRate => SortKey::RespirationRate,
            SortKey::RespirationRate => SortKey::Id,
        }
    }

    /// Returns the display label for this sort key.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::BodyTemperature => "temp",
            SortKey::HeartRate => "heart",
            SortKey::RespirationRate => "resp",
        }
    }
}

/// User-controlled sort/filter configuration, independent of fetched data.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub sort_key: SortKey,
    pub sort_ascending: bool,
    pub filter_text: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            sort_key: SortKey::default(),
            sort_ascending: true,
            filter_text: String::new(),
        }
    }
}

/// Three-way comparison of two readings on a sort key.
///
/// Vitals compare numerically; non-finite values compare equal, so with a
/// stable sort they keep fetch order. Ids compare lexicographically.
fn compare(a: &AnnotatedReading, b: &AnnotatedReading, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::BodyTemperature | SortKey::HeartRate | SortKey::RespirationRate => {
            let metric = match key {
                SortKey::BodyTemperature => Metric::BodyTemperature,
                SortKey::HeartRate => Metric::HeartRate,
                _ => Metric::RespirationRate,
            };
            a.vitals
                .get(metric)
                .partial_cmp(&b.vitals.get(metric))
                .unwrap_or(Ordering::Equal)
        }
    }
}

/// Derive the visible row order for a roster under the given view state.
///
/// Filtering keeps soldiers whose id contains the filter text as a
/// case-insensitive substring (empty filter matches all) and is applied
/// before sorting. The sort is stable, so equal keys keep fetch order.
/// Returns indices into `roster.soldiers`.
pub fn visible_indices(roster: &RosterData, view: &ViewState) -> Vec<usize> {
    let needle = view.filter_text.to_lowercase();

    let mut rows: Vec<usize> = roster
        .soldiers
        .iter()
        .enumerate()
        .filter(|(_, s)| needle.is_empty() || s.id.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect();

    rows.sort_by(|&a, &b| {
        let ord = compare(&roster.soldiers[a], &roster.soldiers[b], view.sort_key);
        if view.sort_ascending {
            ord
        } else {
            ord.reverse()
        }
    });

    rows
}

/// Memoized wrapper around [`visible_indices`].
///
/// The derivation is a pure function of `(roster, view_state)`; the cache
/// keys on the roster's sequence number plus the view state so unchanged
/// inputs skip the recompute.
#[derive(Debug, Default)]
pub struct ViewCache {
    key: Option<(u64, SortKey, bool, String)>,
    rows: Vec<usize>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the visible rows, recomputing only when inputs changed.
    pub fn rows(&mut self, roster: &RosterData, view: &ViewState) -> &[usize] {
        let key = (
            roster.seq,
            view.sort_key,
            view.sort_ascending,
            view.filter_text.clone(),
        );
        if self.key.as_ref() != Some(&key) {
            self.rows = visible_indices(roster, view);
            self.key = Some(key);
        }
        &self.rows
    }

    /// Drop the cached result (e.g. when thresholds change under test).
    pub fn invalidate(&mut self) {
        self.key = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(id: &str, temp: f64, hr: f64, resp: f64) -> SerializedReading {
        SerializedReading {
            soldier_id: id.to_string(),
            body_temperature: temp,
            heart_rate: hr,
            respiration_rate: resp,
        }
    }

    fn roster_from(readings: Vec<SerializedReading>) -> RosterData {
        RosterData::from_snapshot(readings, &Thresholds::default(), 0, Local::now())
    }

    #[test]
    fn boundary_values_never_flag() {
        let vitals = VitalSigns {
            body_temperature: 35.0,
            heart_rate: 60.0,
            respiration_rate: 12.0,
        };
        assert!(!classify(&vitals, &Thresholds::default()).is_alert());

        let vitals = VitalSigns {
            body_temperature: 38.0,
            heart_rate: 100.0,
            respiration_rate: 20.0,
        };
        assert!(!classify(&vitals, &Thresholds::default()).is_alert());
    }

    #[test]
    fn strictly_outside_flags() {
        let vitals = VitalSigns {
            body_temperature: 38.1,
            heart_rate: 59.9,
            respiration_rate: 20.1,
        };
        let flags = classify(&vitals, &Thresholds::default());
        assert!(flags.temperature_warning);
        assert!(flags.heart_rate_warning);
        assert!(flags.respiration_warning);
    }

    #[test]
    fn non_finite_values_flag() {
        let vitals = VitalSigns {
            body_temperature: f64::NAN,
            heart_rate: f64::INFINITY,
            respiration_rate: f64::NEG_INFINITY,
        };
        let flags = classify(&vitals, &Thresholds::default());
        assert!(flags.temperature_warning);
        assert!(flags.heart_rate_warning);
        assert!(flags.respiration_warning);
    }

    #[test]
    fn fever_scenario_marks_alert() {
        let roster = roster_from(vec![reading("S1", 39.0, 80.0, 16.0)]);
        let s1 = &roster.soldiers[0];
        assert!(s1.flags.temperature_warning);
        assert!(!s1.flags.heart_rate_warning);
        assert!(!s1.flags.respiration_warning);
        assert!(s1.flags.is_alert());
        assert_eq!(roster.alert_count(), 1);
    }

    #[test]
    fn empty_filter_matches_all() {
        let roster = roster_from(vec![
            reading("A1-alpha", 36.5, 72.0, 16.0),
            reading("B2-bravo", 36.5, 72.0, 16.0),
        ]);
        let rows = visible_indices(&roster, &ViewState::new());
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let roster = roster_from(vec![
            reading("A1-alpha", 36.5, 72.0, 16.0),
            reading("B2-bravo", 36.5, 72.0, 16.0),
        ]);
        let mut view = ViewState::new();
        view.filter_text = "a1".to_string();
        let rows = visible_indices(&roster, &view);
        assert_eq!(rows.len(), 1);
        assert_eq!(roster.soldiers[rows[0]].id, "A1-alpha");
    }

    #[test]
    fn sort_by_heart_rate_ascending() {
        let roster = roster_from(vec![
            reading("S1", 36.5, 72.0, 16.0),
            reading("S2", 36.5, 110.0, 16.0),
            reading("S3", 36.5, 58.0, 16.0),
        ]);
        let mut view = ViewState::new();
        view.sort_key = SortKey::HeartRate;
        let rows = visible_indices(&roster, &view);
        let rates: Vec<f64> = rows.iter().map(|&i| roster.soldiers[i].vitals.heart_rate).collect();
        assert_eq!(rates, vec![58.0, 72.0, 110.0]);
    }

    #[test]
    fn sort_descending_reverses() {
        let roster = roster_from(vec![
            reading("S1", 36.5, 72.0, 16.0),
            reading("S2", 36.5, 110.0, 16.0),
        ]);
        let mut view = ViewState::new();
        view.sort_key = SortKey::HeartRate;
        view.sort_ascending = false;
        let rows = visible_indices(&roster, &view);
        assert_eq!(roster.soldiers[rows[0]].vitals.heart_rate, 110.0);
    }

    #[test]
    fn sort_by_id_is_lexicographic() {
        let roster = roster_from(vec![
            reading("S10", 36.5, 72.0, 16.0),
            reading("S2", 36.5, 72.0, 16.0),
        ]);
        let rows = visible_indices(&roster, &ViewState::new());
        // "S10" < "S2" as strings
        assert_eq!(roster.soldiers[rows[0]].id, "S10");
    }

    #[test]
    fn equal_keys_keep_fetch_order() {
        let roster = roster_from(vec![
            reading("S3", 36.5, 72.0, 16.0),
            reading("S1", 36.5, 72.0, 16.0),
            reading("S2", 36.5, 72.0, 16.0),
        ]);
        let mut view = ViewState::new();
        view.sort_key = SortKey::HeartRate;
        let rows = visible_indices(&roster, &view);
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn derivation_is_idempotent() {
        let roster = roster_from(vec![
            reading("S2", 36.5, 90.0, 16.0),
            reading("S1", 36.5, 70.0, 16.0),
        ]);
        let mut view = ViewState::new();
        view.sort_key = SortKey::HeartRate;
        view.filter_text = "s".to_string();
        let first = visible_indices(&roster, &view);
        let second = visible_indices(&roster, &view);
        assert_eq!(first, second);
    }

    #[test]
    fn cache_reuses_unchanged_inputs() {
        let roster = roster_from(vec![
            reading("S2", 36.5, 90.0, 16.0),
            reading("S1", 36.5, 70.0, 16.0),
        ]);
        let mut cache = ViewCache::new();
        let view = ViewState::new();

        let first: Vec<usize> = cache.rows(&roster, &view).to_vec();
        let second: Vec<usize> = cache.rows(&roster, &view).to_vec();
        assert_eq!(first, second);
        assert_eq!(first, visible_indices(&roster, &view));
    }

    #[test]
    fn cache_recomputes_on_view_change() {
        let roster = roster_from(vec![
            reading("S2", 36.5, 90.0, 16.0),
            reading("S1", 36.5, 70.0, 16.0),
        ]);
        let mut cache = ViewCache::new();
        let mut view = ViewState::new();

        let by_id: Vec<usize> = cache.rows(&roster, &view).to_vec();
        assert_eq!(roster.soldiers[by_id[0]].id, "S1");

        view.sort_key = SortKey::HeartRate;
        let by_rate: Vec<usize> = cache.rows(&roster, &view).to_vec();
        assert_eq!(roster.soldiers[by_rate[0]].vitals.heart_rate, 70.0);
    }
}

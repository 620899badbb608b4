//! Trend history feeding the chart view.
//!
//! Records one sample per soldier per successful fetch tick. Samples from
//! the same tick share a single capture instant. The history is a ring of
//! the most recent ticks, so a long-running process holds a fixed amount
//! of memory.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use super::roster::RosterData;
use super::thresholds::Metric;

/// Default number of fetch ticks retained.
pub const DEFAULT_HISTORY_TICKS: usize = 120;

/// One soldier's vitals at one fetch tick.
#[derive(Debug, Clone)]
pub struct TrendSample {
    pub soldier_id: String,
    pub at: DateTime<Local>,
    pub body_temperature: f64,
    pub heart_rate: f64,
    pub respiration_rate: f64,
}

impl TrendSample {
    /// Returns the sampled value for a given metric.
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::BodyTemperature => self.body_temperature,
            Metric::HeartRate => self.heart_rate,
            Metric::RespirationRate => self.respiration_rate,
        }
    }
}

/// Bounded time-series history of roster vitals.
#[derive(Debug, Clone)]
pub struct TrendHistory {
    /// One entry per successful tick, oldest first.
    ticks: VecDeque<Vec<TrendSample>>,
    /// Maximum number of ticks retained.
    capacity: usize,
}

impl Default for TrendHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_TICKS)
    }
}

impl TrendHistory {
    /// Create an empty history retaining at most `capacity` ticks.
    pub fn new(capacity: usize) -> Self {
        Self {
            ticks: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record one tick's samples from an applied roster.
    ///
    /// Appends one sample per soldier, all stamped with the roster's
    /// capture instant, and evicts the oldest tick when over capacity.
    pub fn record(&mut self, roster: &RosterData) {
        let samples: Vec<TrendSample> = roster
            .soldiers
            .iter()
            .map(|s| TrendSample {
                soldier_id: s.id.clone(),
                at: roster.captured_at,
                body_temperature: s.vitals.body_temperature,
                heart_rate: s.vitals.heart_rate,
                respiration_rate: s.vitals.respiration_rate,
            })
            .collect();

        self.ticks.push_back(samples);
        if self.ticks.len() > self.capacity {
            self.ticks.pop_front();
        }
    }

    /// Number of ticks currently retained.
    pub fn tick_count(&self) -> usize {
        self.ticks.len()
    }

    /// Total number of samples across all retained ticks.
    pub fn sample_count(&self) -> usize {
        self.ticks.iter().map(|t| t.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// All retained samples in fetch order, oldest tick first.
    pub fn samples(&self) -> impl Iterator<Item = &TrendSample> {
        self.ticks.iter().flatten()
    }

    /// Chart points for one metric: `(unix seconds, value)` in fetch order.
    ///
    /// Non-finite values are skipped; they have no position on the chart.
    pub fn series(&self, metric: Metric) -> Vec<(f64, f64)> {
        self.samples()
            .map(|s| (s.at.timestamp() as f64, s.get(metric)))
            .filter(|(_, v)| v.is_finite())
            .collect()
    }

    /// Earliest and latest sample timestamps, if any samples exist.
    pub fn time_bounds(&self) -> Option<(DateTime<Local>, DateTime<Local>)> {
        let first = self.ticks.front()?.first()?.at;
        let last = self.ticks.back()?.first()?.at;
        Some((first, last))
    }

    /// Min and max finite values across all three metrics.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut bounds: Option<(f64, f64)> = None;
        for sample in self.samples() {
            for metric in [Metric::BodyTemperature, Metric::HeartRate, Metric::RespirationRate] {
                let v = sample.get(metric);
                if !v.is_finite() {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (v, v),
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                });
            }
        }
        bounds
    }
}

//! Safe-range configuration for vital signs.
//!
//! Each monitored vital has an inclusive safe range. Ranges are fixed at
//! process start (optionally overridden on the command line) and never
//! change afterwards.

use anyhow::{bail, Result};

/// The three vitals carried by every roster reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    BodyTemperature,
    HeartRate,
    RespirationRate,
}

impl Metric {
    /// Returns the display label for this metric.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::BodyTemperature => "Body Temp",
            Metric::HeartRate => "Heart Rate",
            Metric::RespirationRate => "Respiration",
        }
    }

    /// Returns the measurement unit for this metric.
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::BodyTemperature => "°C",
            Metric::HeartRate => "bpm",
            Metric::RespirationRate => "br/min",
        }
    }
}

/// An inclusive safe range for a single vital.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalRange {
    pub min: f64,
    pub max: f64,
}

impl VitalRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether a value lies inside the safe range, bounds included.
    ///
    /// Non-finite values are never contained: a NaN comparison fails both
    /// bounds, so a garbage reading counts as out of range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Safe ranges for all monitored vitals.
#[derive(Debug, Clone)]
pub struct Thresholds {
    /// Safe body temperature range in °C.
    pub body_temperature: VitalRange,
    /// Safe heart rate range in beats per minute.
    pub heart_rate: VitalRange,
    /// Safe respiration rate range in breaths per minute.
    pub respiration_rate: VitalRange,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            body_temperature: VitalRange::new(35.0, 38.0),
            heart_rate: VitalRange::new(60.0, 100.0),
            respiration_rate: VitalRange::new(12.0, 20.0),
        }
    }
}

impl Thresholds {
    /// Look up the safe range for a metric.
    pub fn range_for(&self, metric: Metric) -> VitalRange {
        match metric {
            Metric::BodyTemperature => self.body_temperature,
            Metric::HeartRate => self.heart_rate,
            Metric::RespirationRate => self.respiration_rate,
        }
    }
}

/// Parse range strings like "35:38" or "60:100" into a [`VitalRange`].
pub fn parse_range(s: &str) -> Result<VitalRange> {
    let s = s.trim();

    if let Some((min_str, max_str)) = s.split_once(':') {
        let min: f64 = min_str.trim().parse()?;
        let max: f64 = max_str.trim().parse()?;
        if !min.is_finite() || !max.is_finite() || min > max {
            bail!("Invalid range bounds: {}", s);
        }
        return Ok(VitalRange::new(min, max));
    }

    bail!("Unknown range format: {}", s)
}

//! Shared types for roster snapshots.
//!
//! These types match the JSON shape served by the roster backend at
//! `/api/soldier_data`. Field names are case-sensitive and fixed; the
//! serde renames below are the compatibility contract with that backend.

use serde::{Deserialize, Serialize};

/// A complete snapshot of the monitored roster.
///
/// One fetch returns one snapshot. The order of entries is whatever the
/// backend produced; display order is computed separately.
pub type RosterSnapshot = Vec<SerializedReading>;

/// One soldier's readings as serialized by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedReading {
    /// Unique soldier identifier within a snapshot.
    #[serde(rename = "SoldierID")]
    pub soldier_id: String,

    /// Body temperature in °C.
    #[serde(rename = "BodyTemperature")]
    pub body_temperature: f64,

    /// Heart rate in beats per minute.
    #[serde(rename = "HeartRate")]
    pub heart_rate: f64,

    /// Respiration rate in breaths per minute.
    #[serde(rename = "RespirationRate")]
    pub respiration_rate: f64,
}

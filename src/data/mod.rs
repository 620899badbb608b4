//! Data models and processing for roster snapshots.
//!
//! This module handles the transformation of raw roster snapshots into
//! annotated, display-ready data.
//!
//! ## Submodules
//!
//! - [`thresholds`]: Safe-range configuration ([`Thresholds`], [`VitalRange`])
//!   and `"MIN:MAX"` parsing for CLI overrides
//! - [`roster`]: Anomaly classification and the sorted/filtered roster view
//!   ([`RosterData`], [`AnnotatedReading`], [`ViewState`])
//! - [`trend`]: Bounded time-series history feeding the chart
//!   ([`TrendHistory`], [`TrendSample`])
//!
//! ## Data Flow
//!
//! ```text
//! RosterSnapshot (raw JSON)
//!        │
//!        ▼
//! RosterData::from_snapshot()
//!        │
//!        ├──▶ AnnotatedReading (flags computed from Thresholds)
//!        │
//!        └──▶ TrendHistory::record() (one sample per soldier per tick)
//! ```

pub mod roster;
pub mod thresholds;
pub mod trend;

pub use roster::{
    classify, visible_indices, AnnotatedReading, AnomalyFlags, RosterData, SortKey, ViewCache,
    ViewState, VitalSigns,
};
pub use thresholds::{parse_range, Metric, Thresholds, VitalRange};
pub use trend::{TrendHistory, TrendSample, DEFAULT_HISTORY_TICKS};

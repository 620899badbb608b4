// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # vitalwatch
//!
//! A live TUI dashboard and library for monitoring soldier vital signs.
//!
//! This crate polls a roster endpoint on a fixed cadence, classifies each
//! soldier's body temperature, heart rate and respiration rate against
//! configured safe ranges, and displays the annotated roster in a
//! sortable/filterable table alongside a rolling trend chart.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │(classify)│    │(render) │    │         │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘  │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐      ┌───────────┐      ┌─────────┐            │
//! │  │ source  │◀─────│ scheduler │◀─────│  fetch  │──▶ backend │
//! │  │ (poll)  │      │ (cadence) │      │ (HTTP)  │            │
//! │  └─────────┘      └───────────┘      └─────────┘            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and fetch-event
//!   application (sequence-checked, error/loading handling)
//! - **[`fetch`]**: The HTTP roster boundary ([`RosterFetcher`] trait,
//!   [`HttpRosterFetcher`], [`FetchError`])
//! - **[`scheduler`]**: Fixed-cadence refresh driver with start/stop
//!   lifecycle, per-fetch sequence numbers and stale-completion discard
//! - **[`source`]**: Non-blocking event delivery to the UI thread
//!   ([`RosterSource`] trait, [`ScheduledSource`])
//! - **[`data`]**: Threshold table, anomaly classification, the memoized
//!   sorted/filtered view, and the bounded trend history
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll the default endpoint every 5 seconds
//! vitalwatch
//!
//! # Custom endpoint and cadence
//! vitalwatch --endpoint http://base.local:5000/api/soldier_data --refresh 2
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::time::Duration;
//! use vitalwatch::{App, HttpRosterFetcher, RefreshScheduler, Thresholds};
//!
//! # tokio_test::block_on(async {
//! let fetcher = HttpRosterFetcher::builder()
//!     .endpoint("http://127.0.0.1:5000/api/soldier_data")
//!     .build();
//! let (mut scheduler, source) = RefreshScheduler::channel(fetcher, Duration::from_secs(5));
//! scheduler.start();
//!
//! let mut app = App::new(Box::new(source), Thresholds::default(), 120);
//! // ... drive app.refresh() from the UI loop ...
//! scheduler.stop();
//! # });
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod fetch;
pub mod scheduler;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use data::{
    classify, AnnotatedReading, AnomalyFlags, Metric, RosterData, SortKey, Thresholds,
    TrendHistory, TrendSample, ViewState, VitalRange, VitalSigns,
};
pub use fetch::{FetchError, HttpRosterFetcher, RosterFetcher, DEFAULT_ENDPOINT};
pub use scheduler::{FetchEvent, RefreshScheduler, DEFAULT_REFRESH_PERIOD};
pub use source::{RosterSnapshot, RosterSource, ScheduledSource, SerializedReading};

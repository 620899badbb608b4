//! Terminal rendering using ratatui.
//!
//! - [`common`]: header, tabs, status bar, help overlay, loading/error screens
//! - [`table`]: the sortable/filterable roster table
//! - [`chart`]: the three-series vital trend chart
//! - [`theme`]: light/dark styling with terminal detection

pub mod chart;
pub mod common;
pub mod table;
pub mod theme;

pub use theme::Theme;

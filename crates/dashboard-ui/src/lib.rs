//! Terminal UI layer for the admin dashboard.
//!
//! Provides themes, the header component, chart and table views, and the
//! application event loop built on top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod table_view;
pub mod themes;

pub use dashboard_core as core;

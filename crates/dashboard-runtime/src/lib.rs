//! Runtime layer for the admin dashboard.
//!
//! Turns the count-by-day sources into fresh reports on demand and on a
//! refresh interval.

pub mod orchestrator;
pub mod report_service;

pub use dashboard_core as core;
pub use dashboard_data as data;

//! Data layer for the admin dashboard.
//!
//! Per-day count sources (in-memory and JSONL-file backed), the gap-filling
//! time-series aggregator, and report assembly.

pub mod aggregator;
pub mod reader;
pub mod report;
pub mod source;

pub use dashboard_core as core;

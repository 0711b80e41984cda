//! Shared domain types for the admin dashboard.
//!
//! Entity kinds and day buckets, the report date window, the injectable
//! clock, CLI settings and the common error type.

pub mod clock;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{DashboardError, Result};

//! Report generation with concurrent source fetching and retry.
//!
//! [`ReportService::generate`] reads "now" from the injected clock, derives
//! the trailing window, fetches both per-day sources on the blocking pool in
//! parallel, and aggregates them. Each fetch is attempted up to three times
//! with linear back-off; a source that still fails surfaces as
//! [`DashboardError::ReportUnavailable`].

use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use dashboard_core::clock::Clock;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{DailyCounts, EntityKind};
use dashboard_core::time_utils::DateWindow;
use dashboard_data::report::DashboardReport;
use dashboard_data::source::CountByDay;

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Default report window length in calendar months.
pub const DEFAULT_WINDOW_MONTHS: u32 = 1;

/// Maximum number of fetch attempts per source.
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Back-off added per retry (attempt 2 waits one step, attempt 3 two steps).
const DEFAULT_RETRY_STEP: Duration = Duration::from_millis(100);

// ── ReportService ─────────────────────────────────────────────────────────────

/// Produces [`DashboardReport`]s from one count-by-day capability.
pub struct ReportService {
    store: Arc<dyn CountByDay>,
    clock: Arc<dyn Clock>,
    tz: Tz,
    window_months: u32,
    series_a: EntityKind,
    series_b: EntityKind,
    retry_step: Duration,
}

impl ReportService {
    /// Users vs. products over the last month, days bucketed in `tz`.
    pub fn new(store: Arc<dyn CountByDay>, clock: Arc<dyn Clock>, tz: Tz) -> Self {
        Self {
            store,
            clock,
            tz,
            window_months: DEFAULT_WINDOW_MONTHS,
            series_a: EntityKind::Users,
            series_b: EntityKind::Products,
            retry_step: DEFAULT_RETRY_STEP,
        }
    }

    pub fn with_window_months(mut self, months: u32) -> Self {
        self.window_months = months;
        self
    }

    pub fn with_series(mut self, series_a: EntityKind, series_b: EntityKind) -> Self {
        self.series_a = series_a;
        self.series_b = series_b;
        self
    }

    pub fn with_retry_step(mut self, step: Duration) -> Self {
        self.retry_step = step;
        self
    }

    pub fn series(&self) -> (EntityKind, EntityKind) {
        (self.series_a, self.series_b)
    }

    /// The window a report generated right now would cover.
    pub fn current_window(&self) -> DateWindow {
        DateWindow::trailing_months(self.clock.now(), self.tz, self.window_months)
    }

    /// Build a fresh report for the current window.
    pub async fn generate(&self) -> Result<DashboardReport> {
        let window = self.current_window();
        tracing::debug!(%window, "generating dashboard report");

        let (counts_a, counts_b) = tokio::try_join!(
            self.fetch_with_retry(self.series_a, window),
            self.fetch_with_retry(self.series_b, window),
        )?;

        let report = DashboardReport::from_counts(
            window,
            self.series_a,
            self.series_b,
            &counts_a,
            &counts_b,
        );

        let totals = report.totals();
        tracing::info!(
            %window,
            series_a = %self.series_a,
            series_b = %self.series_b,
            total_a = totals.series_a,
            total_b = totals.series_b,
            "dashboard report ready"
        );

        Ok(report)
    }

    // ── Private helpers ───────────────────────────────────────────────────

    async fn fetch_with_retry(&self, kind: EntityKind, window: DateWindow) -> Result<DailyCounts> {
        let mut last_err = String::new();

        for attempt in 0..MAX_RETRY_ATTEMPTS {
            if attempt > 0 {
                let delay = self.retry_step * attempt;
                tracing::debug!(%kind, attempt, ?delay, "retrying fetch after back-off");
                tokio::time::sleep(delay).await;
            }

            let store = Arc::clone(&self.store);
            let fetched =
                tokio::task::spawn_blocking(move || store.count_by_day(kind, &window)).await;

            match fetched {
                Ok(Ok(counts)) => return Ok(counts),
                Ok(Err(e)) => {
                    tracing::warn!(%kind, attempt, error = %e, "fetch attempt failed");
                    last_err = e.to_string();
                }
                Err(e) => {
                    tracing::warn!(%kind, attempt, error = %e, "fetch task did not complete");
                    last_err = e.to_string();
                }
            }
        }

        Err(DashboardError::ReportUnavailable {
            kind,
            reason: last_err,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Merging of two per-day count sources into one contiguous daily series.

use chrono::NaiveDate;

use dashboard_core::models::{DailyCounts, DateBucket};
use dashboard_core::time_utils::DateWindow;

// ── SeriesTotals ──────────────────────────────────────────────────────────────

/// Per-series sums across a run of buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesTotals {
    pub series_a: u64,
    pub series_b: u64,
    /// Number of days (buckets) summed.
    pub days: u32,
}

impl SeriesTotals {
    pub fn add_bucket(&mut self, bucket: &DateBucket) {
        self.series_a += bucket.series_a;
        self.series_b += bucket.series_b;
        self.days += 1;
    }

    /// Largest single-day count in either series, used for chart scaling.
    pub fn peak(buckets: &[DateBucket]) -> u64 {
        buckets
            .iter()
            .map(|b| b.series_a.max(b.series_b))
            .max()
            .unwrap_or(0)
    }
}

// ── TimeSeriesAggregator ──────────────────────────────────────────────────────

/// Stateless helper that lays two sparse per-day sources over a date window.
pub struct TimeSeriesAggregator;

impl TimeSeriesAggregator {
    /// One bucket per calendar day in `start..=end`, ascending.
    ///
    /// Days missing from a source count as zero for that series. Source
    /// entries outside the window are ignored. An inverted window
    /// (`start > end`) yields an empty series.
    pub fn aggregate(
        start: NaiveDate,
        end: NaiveDate,
        source_a: &DailyCounts,
        source_b: &DailyCounts,
    ) -> Vec<DateBucket> {
        let window = DateWindow::new(start, end);
        let mut buckets = Vec::with_capacity(window.days());

        for date in window.iter_days() {
            let a = source_a.get(&date).copied().unwrap_or(0);
            let b = source_b.get(&date).copied().unwrap_or(0);
            buckets.push(DateBucket::new(date, a, b));
        }

        buckets
    }

    /// [`aggregate`](Self::aggregate) over a [`DateWindow`].
    pub fn aggregate_window(
        window: &DateWindow,
        source_a: &DailyCounts,
        source_b: &DailyCounts,
    ) -> Vec<DateBucket> {
        Self::aggregate(window.start, window.end, source_a, source_b)
    }

    /// Sum both series across `buckets`.
    pub fn calculate_totals(buckets: &[DateBucket]) -> SeriesTotals {
        let mut totals = SeriesTotals::default();
        for bucket in buckets {
            totals.add_bucket(bucket);
        }
        totals
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

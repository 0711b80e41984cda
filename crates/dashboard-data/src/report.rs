//! The dashboard report: two per-day sources merged over one window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dashboard_core::error::Result;
use dashboard_core::models::{DailyCounts, DateBucket, EntityKind};
use dashboard_core::time_utils::DateWindow;

use crate::aggregator::{SeriesTotals, TimeSeriesAggregator};
use crate::source::CountByDay;

/// A computed dashboard report. Derived on every request, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardReport {
    pub window: DateWindow,
    pub series_a: EntityKind,
    pub series_b: EntityKind,
    pub buckets: Vec<DateBucket>,
}

/// Wire envelope handed to presentation consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(rename = "seriesALabel")]
    pub series_a_label: EntityKind,
    #[serde(rename = "seriesBLabel")]
    pub series_b_label: EntityKind,
    pub chart_data: Vec<DateBucket>,
}

impl DashboardReport {
    /// Build a report from two already-fetched sources.
    pub fn from_counts(
        window: DateWindow,
        series_a: EntityKind,
        series_b: EntityKind,
        counts_a: &DailyCounts,
        counts_b: &DailyCounts,
    ) -> Self {
        let buckets = TimeSeriesAggregator::aggregate_window(&window, counts_a, counts_b);
        Self {
            window,
            series_a,
            series_b,
            buckets,
        }
    }

    pub fn totals(&self) -> SeriesTotals {
        TimeSeriesAggregator::calculate_totals(&self.buckets)
    }

    /// `true` when no entity of either kind was created inside the window.
    pub fn is_empty(&self) -> bool {
        self.buckets
            .iter()
            .all(|b| b.series_a == 0 && b.series_b == 0)
    }

    pub fn peak(&self) -> u64 {
        SeriesTotals::peak(&self.buckets)
    }

    /// The ordered `{date, seriesA, seriesB}` records.
    pub fn chart_points(&self) -> &[DateBucket] {
        &self.buckets
    }

    pub fn chart_data(&self) -> ChartData {
        ChartData {
            start: self.window.start,
            end: self.window.end,
            series_a_label: self.series_a,
            series_b_label: self.series_b,
            chart_data: self.buckets.clone(),
        }
    }
}

/// Fetch both series from one count-by-day capability and aggregate them.
pub fn build_report<S>(
    store: &S,
    window: DateWindow,
    series_a: EntityKind,
    series_b: EntityKind,
) -> Result<DashboardReport>
where
    S: CountByDay + ?Sized,
{
    let counts_a = store.count_by_day(series_a, &window)?;
    let counts_b = store.count_by_day(series_b, &window)?;

    tracing::debug!(
        %window,
        %series_a,
        %series_b,
        days_a = counts_a.len(),
        days_b = counts_b.len(),
        "building dashboard report"
    );

    Ok(DashboardReport::from_counts(
        window, series_a, series_b, &counts_a, &counts_b,
    ))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryStore;
    use chrono::{TimeZone, Utc};
    use dashboard_core::error::DashboardError;
    use dashboard_core::models::EntityRecord;
    use dashboard_core::time_utils::TimezoneHandler;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new(TimezoneHandler::new("UTC"));
        let at = |day: u32, h: u32| {
            EntityRecord::created(Utc.with_ymd_and_hms(2025, 1, day, h, 0, 0).unwrap())
        };
        store
            .extend(
                EntityKind::Users,
                vec![at(1, 1), at(1, 2), at(1, 3), at(1, 4), at(1, 5), at(3, 9), at(3, 10)],
            )
            .unwrap();
        store
            .extend(EntityKind::Products, (0..7).map(|h| at(2, h)))
            .unwrap();
        store
    }

    struct FailingStore;

    impl CountByDay for FailingStore {
        fn count_by_day(&self, _kind: EntityKind, _window: &DateWindow) -> Result<DailyCounts> {
            Err(DashboardError::DataPathNotFound("/nowhere".into()))
        }
    }

    #[test]
    fn test_build_report_users_and_products() {
        let store = seeded_store();
        let window = DateWindow::new(d("2025-01-01"), d("2025-01-03"));

        let report =
            build_report(&store, window, EntityKind::Users, EntityKind::Products).unwrap();

        assert_eq!(
            report.buckets,
            vec![
                DateBucket::new(d("2025-01-01"), 5, 0),
                DateBucket::new(d("2025-01-02"), 0, 7),
                DateBucket::new(d("2025-01-03"), 2, 0),
            ]
        );
        assert_eq!(report.totals().series_a, 7);
        assert_eq!(report.totals().series_b, 7);
        assert_eq!(report.peak(), 7);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_build_report_same_kind_twice() {
        let store = seeded_store();
        let window = DateWindow::new(d("2025-01-01"), d("2025-01-01"));

        let report = build_report(&store, window, EntityKind::Users, EntityKind::Users).unwrap();

        assert_eq!(report.buckets, vec![DateBucket::new(d("2025-01-01"), 5, 5)]);
    }

    #[test]
    fn test_build_report_inverted_window() {
        let store = seeded_store();
        let window = DateWindow::new(d("2025-01-10"), d("2025-01-01"));

        let report =
            build_report(&store, window, EntityKind::Users, EntityKind::Products).unwrap();

        assert!(report.buckets.is_empty());
        assert!(report.is_empty());
    }

    #[test]
    fn test_build_report_propagates_source_failure() {
        let window = DateWindow::new(d("2025-01-01"), d("2025-01-03"));
        let err = build_report(&FailingStore, window, EntityKind::Users, EntityKind::Products)
            .unwrap_err();
        assert!(matches!(err, DashboardError::DataPathNotFound(_)));
    }

    #[test]
    fn test_chart_data_wire_format() {
        let window = DateWindow::new(d("2025-01-05"), d("2025-01-05"));
        let counts_b: DailyCounts = [(d("2025-01-05"), 3)].into_iter().collect();
        let report = DashboardReport::from_counts(
            window,
            EntityKind::Users,
            EntityKind::Products,
            &DailyCounts::new(),
            &counts_b,
        );

        let value = serde_json::to_value(report.chart_data()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "start": "2025-01-05",
                "end": "2025-01-05",
                "seriesALabel": "users",
                "seriesBLabel": "products",
                "chartData": [
                    {"date": "2025-01-05", "seriesA": 0, "seriesB": 3}
                ]
            })
        );
    }
}

//! The count-by-day capability consumed by the dashboard report.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{into_daily_counts, DailyCounts, EntityKind, EntityRecord, RawCount};
use dashboard_core::time_utils::{DateWindow, TimezoneHandler};

/// "How many entities of `kind` were created on each calendar day of
/// `window`?"
///
/// The returned mapping is sparse: days with no records are absent. Both
/// window edges are inclusive.
pub trait CountByDay: Send + Sync {
    fn count_by_day(&self, kind: EntityKind, window: &DateWindow) -> Result<DailyCounts>;
}

impl<T: CountByDay + ?Sized> CountByDay for Arc<T> {
    fn count_by_day(&self, kind: EntityKind, window: &DateWindow) -> Result<DailyCounts> {
        (**self).count_by_day(kind, window)
    }
}

/// Group `records` by their local creation date, keeping only dates inside
/// `window`. Records sharing an `id` are counted once.
pub fn count_records<'a, I>(records: I, tz: &TimezoneHandler, window: &DateWindow) -> DailyCounts
where
    I: IntoIterator<Item = &'a EntityRecord>,
{
    let mut seen_ids: HashSet<&str> = HashSet::new();

    let raw = records.into_iter().filter_map(|record| {
        if let Some(id) = record.id.as_deref() {
            if !seen_ids.insert(id) {
                return None;
            }
        }
        let date = tz.local_date(record.created_at);
        window.contains(date).then(|| RawCount::new(date, 1))
    });

    into_daily_counts(raw)
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

/// In-process record store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tz: TimezoneHandler,
    records: RwLock<HashMap<EntityKind, Vec<EntityRecord>>>,
}

impl MemoryStore {
    /// Empty store bucketing days in `tz`.
    pub fn new(tz: TimezoneHandler) -> Self {
        Self {
            tz,
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, kind: EntityKind, record: EntityRecord) -> Result<()> {
        let mut guard = self.records.write().map_err(|_| poisoned())?;
        guard.entry(kind).or_default().push(record);
        Ok(())
    }

    pub fn extend<I>(&self, kind: EntityKind, records: I) -> Result<()>
    where
        I: IntoIterator<Item = EntityRecord>,
    {
        let mut guard = self.records.write().map_err(|_| poisoned())?;
        guard.entry(kind).or_default().extend(records);
        Ok(())
    }

    /// Number of stored records of `kind`.
    pub fn len(&self, kind: EntityKind) -> usize {
        self.records
            .read()
            .map(|g| g.get(&kind).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.records
            .read()
            .map(|g| g.values().all(Vec::is_empty))
            .unwrap_or(true)
    }
}

impl CountByDay for MemoryStore {
    fn count_by_day(&self, kind: EntityKind, window: &DateWindow) -> Result<DailyCounts> {
        let guard = self.records.read().map_err(|_| poisoned())?;
        let counts = match guard.get(&kind) {
            Some(records) => count_records(records, &self.tz, window),
            None => DailyCounts::new(),
        };
        tracing::debug!(%kind, %window, days = counts.len(), "memory store counts");
        Ok(counts)
    }
}

fn poisoned() -> DashboardError {
    DashboardError::Io(std::io::Error::other("memory store lock poisoned"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

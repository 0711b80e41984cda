use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// Sparse per-day counts emitted by one source. Days with no records are
/// absent rather than zero.
pub type DailyCounts = BTreeMap<NaiveDate, u64>;

/// The kinds of entity managed by the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Users,
    Products,
    ProductCategories,
}

impl EntityKind {
    /// Every kind, in display order.
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Users,
        EntityKind::Products,
        EntityKind::ProductCategories,
    ];

    /// Stable lowercase identifier, also used as the record directory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Users => "users",
            EntityKind::Products => "products",
            EntityKind::ProductCategories => "product_categories",
        }
    }

    /// Human-readable label for chart legends and table headers.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Users => "Users",
            EntityKind::Products => "Products",
            EntityKind::ProductCategories => "Categories",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = DashboardError;

    /// Accepts the snake_case identifier as well as the common camelCase and
    /// hyphenated spellings of product categories.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "users" | "user" => Ok(EntityKind::Users),
            "products" | "product" => Ok(EntityKind::Products),
            "product_categories" | "product-categories" | "productcategory"
            | "productcategories" | "categories" => Ok(EntityKind::ProductCategories),
            _ => Err(DashboardError::UnknownEntity(s.to_string())),
        }
    }
}

/// A single persisted entity as seen by the report: only its identity and
/// creation time matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Primary key, when the store provides one. Used for de-duplication.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name (user name, product name, category name).
    #[serde(default)]
    pub name: Option<String>,
    /// UTC instant the entity was created.
    pub created_at: DateTime<Utc>,
}

impl EntityRecord {
    /// Build a record with only a creation time.
    pub fn created(created_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name: None,
            created_at,
        }
    }
}

/// A `(date, count)` pair as emitted by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCount {
    pub date: NaiveDate,
    pub count: u64,
}

impl RawCount {
    pub fn new(date: NaiveDate, count: u64) -> Self {
        Self { date, count }
    }
}

impl From<(NaiveDate, u64)> for RawCount {
    fn from((date, count): (NaiveDate, u64)) -> Self {
        Self { date, count }
    }
}

/// Fold raw counts into a [`DailyCounts`] mapping, summing repeated dates.
pub fn into_daily_counts<I>(raw: I) -> DailyCounts
where
    I: IntoIterator<Item = RawCount>,
{
    let mut counts = DailyCounts::new();
    for rc in raw {
        *counts.entry(rc.date).or_insert(0) += rc.count;
    }
    counts
}

/// One calendar day of the dashboard series.
///
/// Serialises as `{"date": "YYYY-MM-DD", "seriesA": n, "seriesB": n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateBucket {
    pub date: NaiveDate,
    pub series_a: u64,
    pub series_b: u64,
}

impl DateBucket {
    pub fn new(date: NaiveDate, series_a: u64, series_b: u64) -> Self {
        Self {
            date,
            series_a,
            series_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_entity_kind_from_str() {
        assert_eq!("users".parse::<EntityKind>().unwrap(), EntityKind::Users);
        assert_eq!("Products".parse::<EntityKind>().unwrap(), EntityKind::Products);
        assert_eq!(
            "productCategory".parse::<EntityKind>().unwrap(),
            EntityKind::ProductCategories
        );
        assert_eq!(
            "product-categories".parse::<EntityKind>().unwrap(),
            EntityKind::ProductCategories
        );
    }

    #[test]
    fn test_entity_kind_from_str_unknown() {
        let err = "orders".parse::<EntityKind>().unwrap_err();
        assert!(matches!(err, DashboardError::UnknownEntity(ref s) if s == "orders"));
    }

    #[test]
    fn test_entity_kind_display_matches_serde() {
        for kind in EntityKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }

    #[test]
    fn test_into_daily_counts_sums_repeated_dates() {
        let counts = into_daily_counts(vec![
            RawCount::new(d("2025-01-02"), 1),
            RawCount::new(d("2025-01-01"), 4),
            RawCount::new(d("2025-01-02"), 2),
        ]);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&d("2025-01-01")], 4);
        assert_eq!(counts[&d("2025-01-02")], 3);
    }

    #[test]
    fn test_date_bucket_wire_format() {
        let bucket = DateBucket::new(d("2025-01-03"), 2, 0);
        let value = serde_json::to_value(bucket).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"date": "2025-01-03", "seriesA": 2, "seriesB": 0})
        );
    }

    #[test]
    fn test_entity_record_deserialize_defaults() {
        let rec: EntityRecord =
            serde_json::from_str(r#"{"created_at": "2025-01-01T10:00:00Z"}"#).unwrap();
        assert!(rec.id.is_none());
        assert!(rec.name.is_none());
        assert_eq!(rec.created_at.date_naive(), d("2025-01-01"));
    }
}

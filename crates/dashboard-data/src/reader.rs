//! JSONL record store.
//!
//! Each entity kind lives in its own directory under the store root
//! (`users/`, `products/`, `product_categories/`), holding any number of
//! `.jsonl` files with one record object per line:
//!
//! ```text
//! {"id": 17, "name": "Ada", "created_at": "2025-01-03 09:12:44"}
//! ```

use std::io::BufRead;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{DailyCounts, EntityKind, EntityRecord};
use dashboard_core::time_utils::{DateWindow, TimezoneHandler};
use tracing::{debug, warn};

use crate::source::{count_records, CountByDay};

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.jsonl` files recursively under `dir`, sorted by path.
pub fn find_jsonl_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "jsonl")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Resolve the store root: use `data_path` when given, otherwise
/// `~/.admin-dashboard/data`.
pub fn resolve_data_path(data_path: Option<&Path>) -> PathBuf {
    if let Some(p) = data_path {
        return p.to_path_buf();
    }
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".admin-dashboard").join("data")
}

/// File-backed [`CountByDay`] source.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    root: PathBuf,
    tz: TimezoneHandler,
}

impl JsonlStore {
    pub fn new(root: impl Into<PathBuf>, tz: TimezoneHandler) -> Self {
        Self {
            root: root.into(),
            tz,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the record files for `kind`.
    pub fn kind_dir(&self, kind: EntityKind) -> PathBuf {
        self.root.join(kind.as_str())
    }

    /// Read every record of `kind`, in file order.
    ///
    /// A missing kind directory is treated as "no records". Lines that are
    /// blank, not JSON, or lack a usable `created_at` are skipped.
    pub fn load_records(&self, kind: EntityKind) -> Result<Vec<EntityRecord>> {
        if !self.root.exists() {
            return Err(DashboardError::DataPathNotFound(self.root.clone()));
        }

        let dir = self.kind_dir(kind);
        if !dir.exists() {
            warn!("No record directory for {} at {}", kind, dir.display());
            return Ok(Vec::new());
        }

        let files = find_jsonl_files(&dir);
        let mut records = Vec::new();
        for file_path in &files {
            records.extend(read_records_file(file_path, &self.tz)?);
        }

        debug!(
            "Loaded {} {} records from {} files",
            records.len(),
            kind,
            files.len()
        );

        Ok(records)
    }
}

impl CountByDay for JsonlStore {
    fn count_by_day(&self, kind: EntityKind, window: &DateWindow) -> Result<DailyCounts> {
        let records = self.load_records(kind)?;
        Ok(count_records(&records, &self.tz, window))
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Parse one JSONL file into records.
fn read_records_file(file_path: &Path, tz: &TimezoneHandler) -> Result<Vec<EntityRecord>> {
    let file = std::fs::File::open(file_path).map_err(|source| DashboardError::FileRead {
        path: file_path.to_path_buf(),
        source,
    })?;

    let reader = std::io::BufReader::new(file);
    let mut records = Vec::new();
    let mut lines_read = 0u64;
    let mut lines_skipped = 0u64;

    for line_result in reader.lines() {
        let line = line_result.map_err(|source| DashboardError::FileRead {
            path: file_path.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        lines_read += 1;

        let parsed = serde_json::from_str::<serde_json::Value>(trimmed)
            .map_err(DashboardError::from)
            .and_then(|data| map_to_record(&data, tz));

        match parsed {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!("Skipping line in {}: {}", file_path.display(), e);
                lines_skipped += 1;
            }
        }
    }

    debug!(
        "File {}: {} read, {} skipped",
        file_path.display(),
        lines_read,
        lines_skipped,
    );

    Ok(records)
}

/// Map a raw JSON value to an [`EntityRecord`].
fn map_to_record(data: &serde_json::Value, tz: &TimezoneHandler) -> Result<EntityRecord> {
    let created_at = match data.get("created_at") {
        Some(value) => parse_created_at(value, tz)?,
        None => {
            return Err(DashboardError::TimestampParse(
                "missing created_at".to_string(),
            ))
        }
    };

    let id = data.get("id").and_then(|v| match v {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    let name = data
        .get("name")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Ok(EntityRecord {
        id,
        name,
        created_at,
    })
}

/// `created_at` may be a timestamp string or integer Unix seconds.
fn parse_created_at(value: &serde_json::Value, tz: &TimezoneHandler) -> Result<DateTime<Utc>> {
    let parsed = match value {
        serde_json::Value::String(s) => tz.parse_timestamp(s),
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    };
    parsed.ok_or_else(|| DashboardError::TimestampParse(value.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::TempDir;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn write_lines(dir: &Path, rel: &str, lines: &[&str]) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut f = std::fs::File::create(path).unwrap();
        for line in lines {
            writeln!(f, "{}", line).unwrap();
        }
    }

    fn jan_window() -> DateWindow {
        DateWindow::new(d("2025-01-01"), d("2025-01-03"))
    }

    #[test]
    fn test_find_jsonl_files_recursive_and_sorted() {
        let tmp = TempDir::new().unwrap();
        write_lines(tmp.path(), "b.jsonl", &[]);
        write_lines(tmp.path(), "nested/a.jsonl", &[]);
        write_lines(tmp.path(), "notes.txt", &[]);

        let files = find_jsonl_files(tmp.path());

        assert_eq!(files.len(), 2);
        assert!(files.windows(2).all(|w| w[0] <= w[1]));
        assert!(files.iter().all(|p| p.extension().unwrap() == "jsonl"));
    }

    #[test]
    fn test_find_jsonl_files_missing_dir() {
        let files = find_jsonl_files(Path::new("/definitely/not/here"));
        assert!(files.is_empty());
    }

    #[test]
    fn test_count_by_day_reads_kind_directory() {
        let tmp = TempDir::new().unwrap();
        write_lines(
            tmp.path(),
            "users/2025-01.jsonl",
            &[
                r#"{"id": 1, "name": "Ada", "created_at": "2025-01-01T08:00:00Z"}"#,
                r#"{"id": 2, "name": "Linus", "created_at": "2025-01-01 17:30:00"}"#,
                r#"{"id": 3, "name": "Grace", "created_at": "2025-01-03T23:59:59Z"}"#,
            ],
        );
        write_lines(
            tmp.path(),
            "products/all.jsonl",
            &[r#"{"id": "p-1", "created_at": "2025-01-02T12:00:00Z"}"#],
        );

        let store = JsonlStore::new(tmp.path(), TimezoneHandler::new("UTC"));

        let users = store.count_by_day(EntityKind::Users, &jan_window()).unwrap();
        assert_eq!(users.get(&d("2025-01-01")), Some(&2));
        assert_eq!(users.get(&d("2025-01-03")), Some(&1));
        assert_eq!(users.get(&d("2025-01-02")), None);

        let products = store
            .count_by_day(EntityKind::Products, &jan_window())
            .unwrap();
        assert_eq!(products.get(&d("2025-01-02")), Some(&1));
    }

    #[test]
    fn test_count_by_day_skips_bad_lines() {
        let tmp = TempDir::new().unwrap();
        write_lines(
            tmp.path(),
            "users/u.jsonl",
            &[
                "",
                "{broken",
                r#"{"id": 1}"#,
                r#"{"id": 2, "created_at": "someday"}"#,
                r#"{"id": 3, "created_at": true}"#,
                r#"{"id": 4, "created_at": "2025-01-02T10:00:00Z"}"#,
            ],
        );

        let store = JsonlStore::new(tmp.path(), TimezoneHandler::new("UTC"));
        let users = store.count_by_day(EntityKind::Users, &jan_window()).unwrap();

        assert_eq!(users.values().sum::<u64>(), 1);
        assert_eq!(users.get(&d("2025-01-02")), Some(&1));
    }

    #[test]
    fn test_count_by_day_accepts_unix_seconds() {
        let tmp = TempDir::new().unwrap();
        // 1735819200 = 2025-01-02T12:00:00Z
        write_lines(
            tmp.path(),
            "products/p.jsonl",
            &[r#"{"id": 9, "created_at": 1735819200}"#],
        );

        let store = JsonlStore::new(tmp.path(), TimezoneHandler::new("UTC"));
        let products = store
            .count_by_day(EntityKind::Products, &jan_window())
            .unwrap();
        assert_eq!(products.get(&d("2025-01-02")), Some(&1));
    }

    #[test]
    fn test_duplicate_ids_across_files_counted_once() {
        let tmp = TempDir::new().unwrap();
        let line = r#"{"id": 7, "created_at": "2025-01-01T09:00:00Z"}"#;
        write_lines(tmp.path(), "users/a.jsonl", &[line]);
        write_lines(tmp.path(), "users/b.jsonl", &[line]);

        let store = JsonlStore::new(tmp.path(), TimezoneHandler::new("UTC"));
        let users = store.count_by_day(EntityKind::Users, &jan_window()).unwrap();
        assert_eq!(users.get(&d("2025-01-01")), Some(&1));
    }

    #[test]
    fn test_missing_kind_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = JsonlStore::new(tmp.path(), TimezoneHandler::new("UTC"));

        let categories = store
            .count_by_day(EntityKind::ProductCategories, &jan_window())
            .unwrap();
        assert!(categories.is_empty());
    }

    #[test]
    fn test_missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("gone");
        let store = JsonlStore::new(&root, TimezoneHandler::new("UTC"));

        let err = store
            .count_by_day(EntityKind::Users, &jan_window())
            .unwrap_err();
        assert!(matches!(err, DashboardError::DataPathNotFound(p) if p == root));
    }

    #[test]
    fn test_unreadable_file_is_file_read_error() {
        let tmp = TempDir::new().unwrap();
        let users = tmp.path().join("users");
        std::fs::create_dir_all(&users).unwrap();
        let bad = users.join("broken.jsonl");
        let mut bytes = br#"{"id": 1, "created_at": "2025-01-01T10:00:00Z"}"#.to_vec();
        bytes.extend_from_slice(b"\n\xff\xfe\xfd\n");
        std::fs::write(&bad, bytes).unwrap();

        let store = JsonlStore::new(tmp.path(), TimezoneHandler::new("UTC"));
        let err = store
            .count_by_day(EntityKind::Users, &jan_window())
            .unwrap_err();

        assert!(matches!(err, DashboardError::FileRead { ref path, .. } if *path == bad));
    }

    #[test]
    fn test_parse_created_at_reports_bad_value() {
        let tz = TimezoneHandler::new("UTC");
        let err = parse_created_at(&serde_json::json!("someday"), &tz).unwrap_err();
        assert!(matches!(err, DashboardError::TimestampParse(ref v) if v == "\"someday\""));

        let err = map_to_record(&serde_json::json!({"id": 1}), &tz).unwrap_err();
        assert!(matches!(err, DashboardError::TimestampParse(_)));
    }

    #[test]
    fn test_resolve_data_path_prefers_explicit() {
        let explicit = Path::new("/srv/dashboard");
        assert_eq!(resolve_data_path(Some(explicit)), PathBuf::from("/srv/dashboard"));
        assert!(resolve_data_path(None).ends_with(".admin-dashboard/data"));
    }
}

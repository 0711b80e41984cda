use chrono::NaiveDate;

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Short axis label for a chart date, e.g. `"Jan 05"`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use dashboard_core::formatting::format_axis_date;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
/// assert_eq!(format_axis_date(date), "Jan 05");
/// ```
pub fn format_axis_date(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

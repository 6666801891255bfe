//! Formatting helpers shared across UIs.
//!
//! Backend timestamps are ISO strings whose exact shape depends on how they
//! were stored (with or without offset, `T` or space separator), so most
//! helpers slice by character position rather than parsing.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Characters `start..end` of `s`, clamped to its length.
pub fn char_slice(s: &str, start: usize, end: usize) -> String {
    s.chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

/// Calendar date of an ISO timestamp (`"2024-05-01T10:00:00"` -> `"2024-05-01"`).
pub fn date_part(ts: &str) -> String {
    char_slice(ts, 0, 10)
}

/// Wall-clock time of an ISO timestamp (`"2024-05-01T10:11:12.5"` -> `"10:11:12"`).
pub fn clock_part(ts: &str) -> String {
    char_slice(ts, 11, 19)
}

/// Month, day, hour and minute (`"2024-05-01T10:11:12"` -> `"05-01 10:11"`).
pub fn short_timestamp(ts: &str) -> String {
    char_slice(ts, 5, 16).replace('T', " ")
}

/// ISO timestamp with the date/time separator shown as a space.
pub fn spaced_timestamp(ts: &str) -> String {
    ts.replace('T', " ")
}

/// Integer with thousands separators (`12345` -> `"12,345"`).
pub fn thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}

/// Parse a backend timestamp, with or without offset. Offset-less values are UTC.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(ts, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Format a timestamp as relative time (e.g., "2m ago").
pub fn format_relative_time(ts: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(ts);

    if duration.num_seconds() < 0 {
        "just now".to_string()
    } else if duration.num_seconds() < 60 {
        format!("{}s ago", duration.num_seconds())
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else {
        ts.format("%b %d").to_string()
    }
}

/// Relative time for a raw backend timestamp, or `"-"` when it does not parse.
pub fn relative_from_str(ts: &str) -> String {
    match parse_timestamp(ts) {
        Some(ts) => format_relative_time(ts),
        None => "-".to_string(),
    }
}

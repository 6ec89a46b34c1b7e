use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Weekday};

// ── Start-time parsing ────────────────────────────────────────────────────────

/// Layouts seen in the city exports, most common first.
const FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a trip timestamp as local wall-clock time.
///
/// Timestamps carrying an RFC 3339 offset keep their local reading; the
/// offset is dropped rather than converted. Returns `None` for empty strings
/// or unrecognised layouts.
pub fn parse_start_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local())
}

// ── Derived calendar fields ───────────────────────────────────────────────────

/// Calendar fields derived once per trip from its start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    /// 1–12.
    pub month: u32,
    pub weekday: Weekday,
    /// 0–23.
    pub hour: u32,
}

impl CalendarFields {
    pub fn from_timestamp(ts: &NaiveDateTime) -> Self {
        Self {
            month: ts.month(),
            weekday: ts.weekday(),
            hour: ts.hour(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

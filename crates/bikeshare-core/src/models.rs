use std::fmt;

use chrono::{NaiveDateTime, Weekday};
use serde::Serialize;

use crate::catalog::ALL;
use crate::formatting::normalize_token;
use crate::time_utils::CalendarFields;

// ── Column names ──────────────────────────────────────────────────────────────

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

/// Columns every city file must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    START_TIME,
    END_TIME,
    TRIP_DURATION,
    START_STATION,
    END_STATION,
    USER_TYPE,
];

// ── Filter criteria ───────────────────────────────────────────────────────────

/// A month or day choice: everything, or one lower-case name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    All,
    Named(String),
}

impl Selection {
    /// Normalize `token`; `"all"` in any case selects everything.
    pub fn parse(token: &str) -> Self {
        let token = normalize_token(token);
        if token == ALL {
            Selection::All
        } else {
            Selection::Named(token)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Selection::All => ALL,
            Selection::Named(name) => name,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one session iteration loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filters {
    pub city: String,
    pub month: Selection,
    pub day: Selection,
}

impl Filters {
    pub fn new(city: &str, month: &str, day: &str) -> Self {
        Self {
            city: normalize_token(city),
            month: Selection::parse(month),
            day: Selection::parse(day),
        }
    }
}

// ── Trips ─────────────────────────────────────────────────────────────────────

/// A single trip as read from a city file.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    /// Kept verbatim; no statistic reads it.
    pub end_time: String,
    pub duration_secs: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

/// A trip together with the calendar fields derived from its start time.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub record: TripRecord,
    pub calendar: CalendarFields,
}

impl Trip {
    pub fn new(record: TripRecord) -> Self {
        let calendar = CalendarFields::from_timestamp(&record.start_time);
        Self { record, calendar }
    }

    pub fn month(&self) -> u32 {
        self.calendar.month
    }

    pub fn weekday(&self) -> Weekday {
        self.calendar.weekday
    }

    pub fn hour(&self) -> u32 {
        self.calendar.hour
    }

    /// Directional `"<start> TO <end>"` key.
    pub fn station_pair(&self) -> String {
        format!(
            "{} TO {}",
            self.record.start_station, self.record.end_station
        )
    }
}

/// Optional columns present in a city's header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl Schema {
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut schema = Schema::default();
        for header in headers {
            match header.trim() {
                GENDER => schema.has_gender = true,
                BIRTH_YEAR => schema.has_birth_year = true,
                _ => {}
            }
        }
        schema
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

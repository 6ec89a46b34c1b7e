//! Immutable lookup tables: city → source file, month and day names.
//!
//! A [`Catalog`] is built once at startup and passed by reference to the
//! prompt, loader and reporters, so none of them depend on module globals.

use std::path::{Path, PathBuf};

use chrono::{Month, Weekday};

use crate::error::{BikeshareError, Result};
use crate::formatting::title_case;

/// Token that disables filtering on the month or day axis.
pub const ALL: &str = "all";

/// A city and the CSV file holding its trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitySource {
    pub name: String,
    pub file_name: String,
}

impl CitySource {
    fn new(name: &str, file_name: &str) -> Self {
        Self {
            name: name.to_string(),
            file_name: file_name.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    /// Directory the city files are resolved against.
    pub data_dir: PathBuf,
    /// Cities in prompt order.
    pub cities: Vec<CitySource>,
    /// Lower-case month names; position + 1 is the calendar month.
    pub months: Vec<String>,
    /// Lower-case day names starting at Monday.
    pub days: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            cities: vec![
                CitySource::new("chicago", "chicago.csv"),
                CitySource::new("new york city", "new_york_city.csv"),
                CitySource::new("washington", "washington.csv"),
            ],
            months: ["january", "february", "march", "april", "may", "june"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            days: [
                "monday",
                "tuesday",
                "wednesday",
                "thursday",
                "friday",
                "saturday",
                "sunday",
            ]
            .iter()
            .map(|d| d.to_string())
            .collect(),
        }
    }
}

impl Catalog {
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    /// City names accepted by the city prompt.
    pub fn city_names(&self) -> Vec<String> {
        self.cities.iter().map(|c| c.name.clone()).collect()
    }

    /// Month names accepted by the month prompt, `"all"` first.
    pub fn month_choices(&self) -> Vec<String> {
        with_all(&self.months)
    }

    /// Day names accepted by the day prompt, `"all"` first.
    pub fn day_choices(&self) -> Vec<String> {
        with_all(&self.days)
    }

    /// Resolve `city` to the full path of its source file.
    pub fn source_path(&self, city: &str) -> Result<PathBuf> {
        self.cities
            .iter()
            .find(|c| c.name == city)
            .map(|c| self.data_dir.join(&c.file_name))
            .ok_or_else(|| BikeshareError::UnknownCity(city.to_string()))
    }

    /// 1-based calendar month for a month name from the table.
    pub fn month_index(&self, month: &str) -> Result<u32> {
        self.months
            .iter()
            .position(|m| m == month)
            .map(|i| i as u32 + 1)
            .ok_or_else(|| BikeshareError::InvalidMonth(month.to_string()))
    }

    /// Display name for a calendar month.
    ///
    /// Months past the end of the table fall back to the calendar name so a
    /// stray July row still renders.
    pub fn month_name(&self, month: u32) -> String {
        if let Some(name) = month
            .checked_sub(1)
            .and_then(|i| self.months.get(i as usize))
        {
            return title_case(name);
        }
        u8::try_from(month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name().to_string())
            .unwrap_or_else(|| month.to_string())
    }

    /// Position of `day` in the day table (0 = Monday).
    pub fn day_index(&self, day: &str) -> Result<usize> {
        self.days
            .iter()
            .position(|d| d == day)
            .ok_or_else(|| BikeshareError::InvalidDay(day.to_string()))
    }

    /// Display name for a weekday, e.g. `"Wednesday"`.
    pub fn day_name(&self, weekday: Weekday) -> String {
        self.days
            .get(weekday.num_days_from_monday() as usize)
            .map(|d| title_case(d))
            .unwrap_or_else(|| weekday.to_string())
    }
}

fn with_all(names: &[String]) -> Vec<String> {
    std::iter::once(ALL.to_string())
        .chain(names.iter().cloned())
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

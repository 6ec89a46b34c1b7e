//! The four descriptive reports computed over a [`Dataset`].
//!
//! Reporters are pure: they read the dataset and return a typed report. A
//! statistic with no value over zero rows surfaces as
//! [`BikeshareError::EmptyDataset`]; missing optional columns surface as
//! [`Availability::NotAvailable`].

use bikeshare_core::catalog::Catalog;
use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::formatting::percentage;
use chrono::Weekday;
use serde::Serialize;
use tracing::debug;

use crate::dataset::Dataset;
use crate::stats::{mode, value_counts, ValueCount};

// ── Report types ──────────────────────────────────────────────────────────────

/// A most-frequent value with its display label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popular<T> {
    pub value: T,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStatsReport {
    /// Calendar month, 1–12.
    pub month: Popular<u32>,
    /// 0 = Monday … 6 = Sunday.
    pub day: Popular<u32>,
    /// 0–23.
    pub hour: Popular<u32>,
}

/// A station (or station pair) and its share of all trips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationShare {
    pub name: String,
    pub count: usize,
    /// Percentage of trips, two decimals.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStatsReport {
    pub start: StationShare,
    pub end: StationShare,
    /// Most frequent `"<start> TO <end>"` trip.
    pub pair: StationShare,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStatsReport {
    pub total_seconds: f64,
    pub trip_count: usize,
}

impl DurationStatsReport {
    /// Arithmetic mean in seconds; undefined for zero trips.
    pub fn mean_seconds(&self) -> Result<f64> {
        if self.trip_count == 0 {
            return Err(BikeshareError::EmptyDataset("mean trip duration"));
        }
        Ok(self.total_seconds / self.trip_count as f64)
    }
}

/// Whether a city's schema carries an optional column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "data")]
pub enum Availability<T> {
    Available(T),
    NotAvailable,
}

impl<T> Availability<T> {
    /// Turn a `MissingColumn` failure into [`Availability::NotAvailable`];
    /// any other error is passed through.
    fn from_column(column: Result<T>) -> Result<Self> {
        match column {
            Ok(value) => Ok(Availability::Available(value)),
            Err(BikeshareError::MissingColumn(name)) => {
                debug!("{} not in schema; reporting as not available", name);
                Ok(Availability::NotAvailable)
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: ValueCount<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStatsReport {
    pub user_types: Vec<ValueCount<String>>,
    pub genders: Availability<Vec<ValueCount<String>>>,
    /// `Available(None)` when the column exists but no selected trip has a
    /// birth year.
    pub birth_years: Availability<Option<BirthYearStats>>,
}

// ── Reporters ─────────────────────────────────────────────────────────────────

/// Most popular month, day of week and start hour.
pub fn report_time_stats(ds: &Dataset, catalog: &Catalog) -> Result<TimeStatsReport> {
    let trips = ds.trips();

    let month = mode(trips.iter().map(|t| t.month()))
        .ok_or(BikeshareError::EmptyDataset("most popular month"))?;
    let day = mode(trips.iter().map(|t| t.weekday().num_days_from_monday()))
        .ok_or(BikeshareError::EmptyDataset("most popular day"))?;
    let hour = mode(trips.iter().map(|t| t.hour()))
        .ok_or(BikeshareError::EmptyDataset("most popular start hour"))?;

    let day_label = u8::try_from(day.value)
        .ok()
        .and_then(|d| Weekday::try_from(d).ok())
        .map(|w| catalog.day_name(w))
        .unwrap_or_else(|| day.value.to_string());

    Ok(TimeStatsReport {
        month: Popular {
            value: month.value,
            label: catalog.month_name(month.value),
            count: month.count,
        },
        day: Popular {
            value: day.value,
            label: day_label,
            count: day.count,
        },
        hour: Popular {
            value: hour.value,
            label: hour.value.to_string(),
            count: hour.count,
        },
    })
}

/// Most common start station, end station and directional trip.
pub fn report_station_stats(ds: &Dataset) -> Result<StationStatsReport> {
    let trips = ds.trips();
    let total = trips.len() as f64;
    let share = |vc: ValueCount<String>| StationShare {
        share: percentage(vc.count as f64, total, 2),
        name: vc.value,
        count: vc.count,
    };

    let start = mode(trips.iter().map(|t| t.record.start_station.as_str()))
        .ok_or(BikeshareError::EmptyDataset("most common start station"))?
        .map(str::to_string);
    let end = mode(trips.iter().map(|t| t.record.end_station.as_str()))
        .ok_or(BikeshareError::EmptyDataset("most common end station"))?
        .map(str::to_string);
    let pair = mode(trips.iter().map(|t| t.station_pair()))
        .ok_or(BikeshareError::EmptyDataset("most common trip"))?;

    Ok(StationStatsReport {
        start: share(start),
        end: share(end),
        pair: share(pair),
    })
}

/// Total duration and trip count; the mean is derived on demand.
pub fn report_duration_stats(ds: &Dataset) -> DurationStatsReport {
    DurationStatsReport {
        total_seconds: ds.trips().iter().map(|t| t.record.duration_secs).sum(),
        trip_count: ds.len(),
    }
}

/// User type counts plus gender and birth-year stats where the city has them.
pub fn report_user_stats(ds: &Dataset) -> Result<UserStatsReport> {
    let user_types: Vec<ValueCount<String>> = value_counts(
        ds.trips()
            .iter()
            .filter_map(|t| t.record.user_type.as_deref()),
    )
    .into_iter()
    .map(|vc| vc.map(str::to_string))
    .collect();

    let genders: Availability<Vec<ValueCount<String>>> =
        Availability::from_column(ds.genders().map(|values| {
            value_counts(values)
                .into_iter()
                .map(|vc| vc.map(str::to_string))
                .collect()
        }))?;

    let birth_years = Availability::from_column(ds.birth_years().map(|years| {
        let most_common = mode(years.iter().copied())?;
        Some(BirthYearStats {
            earliest: years.iter().copied().min()?,
            most_recent: years.iter().copied().max()?,
            most_common,
        })
    }))?;

    Ok(UserStatsReport {
        user_types,
        genders,
        birth_years,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

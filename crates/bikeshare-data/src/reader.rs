//! CSV loading for the city trip files.
//!
//! Reads every row of a city file into a [`Dataset`], deriving calendar
//! fields on the way, then applies the month/day filters from [`Filters`].

use std::fs::File;
use std::io::Read;
use std::time::Instant;

use bikeshare_core::catalog::Catalog;
use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{Filters, Schema, Trip, TripRecord, REQUIRED_COLUMNS};
use bikeshare_core::time_utils::parse_start_time;
use serde::Deserialize;
use tracing::{debug, info};

use crate::dataset::Dataset;

// ── Raw CSV row ───────────────────────────────────────────────────────────────

/// One CSV row before timestamp parsing. Unknown columns are ignored.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time", default)]
    end_time: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station", default)]
    start_station: String,
    #[serde(rename = "End Station", default)]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

impl RawTrip {
    /// `row` is the 1-based data row, used in error messages.
    fn into_record(self, row: usize) -> Result<TripRecord> {
        let start_time =
            parse_start_time(&self.start_time).ok_or_else(|| BikeshareError::TimestampParse {
                row,
                value: self.start_time.clone(),
            })?;

        Ok(TripRecord {
            start_time,
            end_time: self.end_time,
            duration_secs: self.trip_duration,
            start_station: self.start_station,
            end_station: self.end_station,
            user_type: non_blank(self.user_type),
            gender: non_blank(self.gender),
            birth_year: self
                .birth_year
                .filter(|y| y.is_finite())
                .map(|y| y.trunc() as i32),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the trips for `filters.city` and apply its month/day filters.
///
/// The returned dataset may be empty; that is not an error.
pub fn load(catalog: &Catalog, filters: &Filters) -> Result<Dataset> {
    let path = catalog.source_path(&filters.city)?;
    let start = Instant::now();

    let file = File::open(&path).map_err(|source| BikeshareError::FileRead {
        path: path.clone(),
        source,
    })?;
    let dataset = read_trips(&filters.city, file)?;
    let total = dataset.len();

    let dataset = dataset.apply_filters(catalog, &filters.month, &filters.day)?;

    info!(
        "Loaded {} trips for {} from {} ({} after month={}, day={}) in {:.3}s",
        total,
        filters.city,
        path.display(),
        dataset.len(),
        filters.month,
        filters.day,
        start.elapsed().as_secs_f64()
    );

    Ok(dataset)
}

/// Parse a whole city file from `reader` without filtering.
///
/// Fails with `MissingColumn` when a required header is absent and with
/// `TimestampParse` on the first unreadable `Start Time`.
pub fn read_trips<R: Read>(city: &str, reader: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(BikeshareError::MissingColumn(*missing));
    }
    let schema = Schema::from_headers(headers.iter());
    debug!(
        "{}: {} columns, gender={}, birth year={}",
        city,
        headers.len(),
        schema.has_gender,
        schema.has_birth_year
    );

    let mut trips = Vec::new();
    for (i, result) in rdr.deserialize::<RawTrip>().enumerate() {
        let raw = result?;
        trips.push(Trip::new(raw.into_record(i + 1)?));
    }

    Ok(Dataset::new(city, schema, trips))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::report_duration_stats;
    use bikeshare_core::models::{Selection, TRIP_DURATION};
    use chrono::Weekday;
    use std::io::Write;
    use tempfile::TempDir;

    const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,Female,1992.0
9031,2017-01-04 08:27:49,2017-01-04 08:34:45,416,May St & Taylor St,Wood St & Taylor St,Subscriber,Male,1981.0
304487,2017-03-06 13:49:38,2017-03-06 13:55:28,350,Christiana Ave & Lawrence Ave,St. Louis Ave & Balmoral Ave,Subscriber,Male,1986.0
45207,2017-01-17 14:53:07,2017-01-17 15:02:01,534,Clark St & Randolph St,Desplaines St & Jackson Blvd,Subscriber,Male,1975.0
1473887,2017-03-26 09:01:20,2017-03-26 09:41:06,2386,Clinton St & Washington Blvd,Canal St & Taylor St,Customer,,
961916,2017-03-26 17:33:01,2017-03-26 17:38:38,337,Daley Center Plaza,Canal St & Madison St,Subscriber,Female,1990.0
";

    const WASHINGTON: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
482740,2017-03-11 10:40:00,2017-03-11 10:46:00,402.549,Yuma St & Tenley Circle NW,Connecticut Ave & Yuma St NW,Subscriber
";

    fn write_city(dir: &TempDir, file: &str, contents: &str) {
        let mut f = File::create(dir.path().join(file)).expect("create csv");
        f.write_all(contents.as_bytes()).expect("write csv");
    }

    fn catalog_with(contents: &[(&str, &str)]) -> (TempDir, Catalog) {
        let tmp = TempDir::new().expect("tempdir");
        for (file, body) in contents {
            write_city(&tmp, file, body);
        }
        let catalog = Catalog::default().with_data_dir(tmp.path());
        (tmp, catalog)
    }

    // ── read_trips ────────────────────────────────────────────────────────────

    #[test]
    fn test_read_trips_parses_every_row() {
        let ds = read_trips("chicago", CHICAGO.as_bytes()).unwrap();
        assert_eq!(ds.len(), 7);
        assert!(ds.schema().has_gender);
        assert!(ds.schema().has_birth_year);

        let first = &ds.trips()[0];
        assert_eq!(first.record.start_station, "Wood St & Hubbard St");
        assert_eq!(first.record.duration_secs, 321.0);
        assert_eq!(first.record.birth_year, Some(1992));
        assert_eq!(first.month(), 6);
        assert_eq!(first.weekday(), Weekday::Fri);
        assert_eq!(first.hour(), 15);
    }

    #[test]
    fn test_read_trips_blank_optional_fields_are_none() {
        let ds = read_trips("chicago", CHICAGO.as_bytes()).unwrap();
        let customer = &ds.trips()[5];
        assert_eq!(customer.record.user_type.as_deref(), Some("Customer"));
        assert!(customer.record.gender.is_none());
        assert!(customer.record.birth_year.is_none());
    }

    #[test]
    fn test_read_trips_washington_schema() {
        let ds = read_trips("washington", WASHINGTON.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(!ds.schema().has_gender);
        assert!(!ds.schema().has_birth_year);
        assert!((ds.trips()[0].record.duration_secs - 489.066).abs() < 1e-9);
    }

    #[test]
    fn test_read_trips_bad_timestamp_is_fatal() {
        let csv = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 00:00:00,x,60,A,B,Subscriber
not a time,x,60,A,B,Subscriber
";
        let err = read_trips("chicago", csv.as_bytes()).unwrap_err();
        match err {
            BikeshareError::TimestampParse { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "not a time");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_trips_missing_required_column() {
        let csv = "Start Time,End Time,Start Station,End Station,User Type\n";
        let err = read_trips("chicago", csv.as_bytes()).unwrap_err();
        assert!(matches!(err, BikeshareError::MissingColumn(TRIP_DURATION)));
    }

    #[test]
    fn test_read_trips_non_numeric_duration_is_csv_error() {
        let csv = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 00:00:00,x,long,A,B,Subscriber
";
        let err = read_trips("chicago", csv.as_bytes()).unwrap_err();
        assert!(matches!(err, BikeshareError::Csv(_)));
    }

    // ── load ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_march_keeps_only_month_three() {
        let (_tmp, catalog) = catalog_with(&[("chicago.csv", CHICAGO)]);
        let ds = load(&catalog, &Filters::new("chicago", "march", "all")).unwrap();

        assert_eq!(ds.len(), 3);
        assert!(ds.trips().iter().all(|t| t.month() == 3));

        let durations = report_duration_stats(&ds);
        assert_eq!(durations.trip_count, 3);
        assert_eq!(durations.total_seconds, 350.0 + 2386.0 + 337.0);
    }

    #[test]
    fn test_load_all_all_keeps_every_row() {
        let (_tmp, catalog) = catalog_with(&[("chicago.csv", CHICAGO)]);
        let ds = load(&catalog, &Filters::new("chicago", "all", "all")).unwrap();
        assert_eq!(ds.len(), 7);
    }

    #[test]
    fn test_load_day_filter() {
        let (_tmp, catalog) = catalog_with(&[("chicago.csv", CHICAGO)]);
        // 2017-03-26 was a Sunday.
        let ds = load(&catalog, &Filters::new("chicago", "march", "Sunday")).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(ds.trips().iter().all(|t| t.weekday() == Weekday::Sun));
        assert_eq!(ds.trips()[0].record.end_station, "Canal St & Taylor St");
    }

    #[test]
    fn test_load_every_combination_matches_filter() {
        let (_tmp, catalog) = catalog_with(&[("chicago.csv", CHICAGO)]);
        for month in catalog.month_choices() {
            for day in catalog.day_choices() {
                let filters = Filters::new("chicago", &month, &day);
                let ds = load(&catalog, &filters).unwrap();
                for trip in ds.trips() {
                    if let Selection::Named(m) = &filters.month {
                        assert_eq!(trip.month(), catalog.month_index(m).unwrap());
                    }
                    if let Selection::Named(d) = &filters.day {
                        assert_eq!(
                            trip.weekday().num_days_from_monday() as usize,
                            catalog.day_index(d).unwrap()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_load_unknown_city() {
        let (_tmp, catalog) = catalog_with(&[]);
        let err = load(&catalog, &Filters::new("boston", "all", "all")).unwrap_err();
        assert!(matches!(err, BikeshareError::UnknownCity(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let (_tmp, catalog) = catalog_with(&[]);
        let err = load(&catalog, &Filters::new("washington", "all", "all")).unwrap_err();
        assert!(matches!(err, BikeshareError::FileRead { .. }));
    }
}

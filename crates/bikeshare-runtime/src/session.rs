//! Interactive session loop: prompt → load → four reports → restart.
//!
//! Each round loads its own [`Dataset`](bikeshare_data::dataset::Dataset) and
//! drops it before the restart question; nothing is carried between rounds.
//! Reports go to their own sink so JSON output is never mixed with prompts.

use std::io::{BufRead, Write};
use std::time::Instant;

use bikeshare_core::catalog::Catalog;
use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::Filters;
use bikeshare_core::settings::OutputFormat;
use bikeshare_data::reader;
use bikeshare_data::reports::{
    report_duration_stats, report_station_stats, report_time_stats, report_user_stats,
};
use tracing::info;

use crate::prompt::{FilterPresets, Prompter};
use crate::render::{self, Rendered};

pub struct Session<'a, R, W, O> {
    catalog: &'a Catalog,
    prompter: Prompter<R, W>,
    reports: O,
    format: OutputFormat,
    /// Consumed by the first round.
    presets: FilterPresets,
}

impl<'a, R: BufRead, W: Write, O: Write> Session<'a, R, W, O> {
    pub fn new(
        catalog: &'a Catalog,
        prompter: Prompter<R, W>,
        reports: O,
        format: OutputFormat,
    ) -> Self {
        Self {
            catalog,
            prompter,
            reports,
            format,
            presets: FilterPresets::default(),
        }
    }

    pub fn with_presets(mut self, presets: FilterPresets) -> Self {
        self.presets = presets;
        self
    }

    pub fn into_parts(self) -> (Prompter<R, W>, O) {
        (self.prompter, self.reports)
    }

    /// Run rounds until the user declines to restart or input ends.
    ///
    /// Returns the number of completed rounds. Loader failures are fatal.
    pub fn run(&mut self) -> Result<usize> {
        let mut rounds = 0;
        loop {
            let presets = std::mem::take(&mut self.presets);
            let filters = match self.prompter.ask_filters(self.catalog, &presets) {
                Ok(filters) => filters,
                Err(BikeshareError::InputClosed) => {
                    info!("Input closed while choosing filters; ending session");
                    break;
                }
                Err(e) => return Err(e),
            };

            self.run_round(&filters)?;
            rounds += 1;

            if !self.prompter.confirm_restart()? {
                break;
            }
        }
        Ok(rounds)
    }

    /// Load the selection and print the four reports in order.
    pub fn run_round(&mut self, filters: &Filters) -> Result<()> {
        info!(
            "Round: city={}, month={}, day={}",
            filters.city, filters.month, filters.day
        );
        let ds = reader::load(self.catalog, filters)?;
        info!("{}: {} trips after filtering", ds.city(), ds.len());

        let start = Instant::now();
        let rendered = render::time_stats(&report_time_stats(&ds, self.catalog))?;
        self.emit(rendered, start)?;

        let start = Instant::now();
        let rendered = render::station_stats(&report_station_stats(&ds))?;
        self.emit(rendered, start)?;

        let start = Instant::now();
        let rendered = render::duration_stats(&report_duration_stats(&ds))?;
        self.emit(rendered, start)?;

        let start = Instant::now();
        let rendered = render::user_stats(&report_user_stats(&ds)?)?;
        self.emit(rendered, start)?;

        Ok(())
    }

    fn emit(&mut self, rendered: Rendered, start: Instant) -> Result<()> {
        let elapsed = start.elapsed();
        rendered.write_to(&mut self.reports, self.format, elapsed)?;
        self.reports.flush()?;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{GREETING, RESTART_QUESTION};
    use crate::render::{Section, SEPARATOR};
    use serde_json::Value;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1,2017-03-06 08:00:00,2017-03-06 08:10:00,600,Canal St,Clark St,Subscriber,Male,1990.0
2,2017-03-13 08:30:00,2017-03-13 08:40:00,400,Canal St,Clark St,Subscriber,Female,1985.0
3,2017-01-02 17:00:00,2017-01-02 17:20:00,1200,Clark St,Canal St,Customer,,
";

    const WASHINGTON: &str = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-06-21 08:36:34,2017-06-21 08:44:43,489,14th & Belmont St NW,15th & K St NW,Subscriber
";

    fn data_dir() -> (TempDir, Catalog) {
        let tmp = TempDir::new().expect("tempdir");
        fs::write(tmp.path().join("chicago.csv"), CHICAGO).expect("write chicago");
        fs::write(tmp.path().join("washington.csv"), WASHINGTON).expect("write washington");
        let catalog = Catalog::default().with_data_dir(tmp.path());
        (tmp, catalog)
    }

    struct Outcome {
        result: Result<usize>,
        prompts: String,
        reports: String,
    }

    fn run_with(
        catalog: &Catalog,
        input: &str,
        format: OutputFormat,
        presets: FilterPresets,
    ) -> Outcome {
        let prompter = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let mut session = Session::new(catalog, prompter, Vec::new(), format).with_presets(presets);
        let result = session.run();
        let (prompter, reports) = session.into_parts();
        Outcome {
            result,
            prompts: String::from_utf8(prompter.into_output()).unwrap(),
            reports: String::from_utf8(reports).unwrap(),
        }
    }

    fn run(catalog: &Catalog, input: &str, format: OutputFormat) -> Outcome {
        run_with(catalog, input, format, FilterPresets::default())
    }

    #[test]
    fn test_single_round_prints_all_sections_in_order() {
        let (_tmp, catalog) = data_dir();
        let outcome = run(&catalog, "chicago\nmarch\nall\nno\n", OutputFormat::Text);

        assert_eq!(outcome.result.unwrap(), 1);
        let out = outcome.reports;
        let positions: Vec<usize> = [
            Section::Time,
            Section::Stations,
            Section::Duration,
            Section::Users,
        ]
        .iter()
        .map(|s| out.find(s.heading()).expect("section printed"))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(out.contains("March (count: 2)"));
        assert!(out.contains("Canal St TO Clark St (count: 2, 100.00% of trips)"));
        assert!(out.contains("Total travel time:\n1,000.00 seconds"));
        assert_eq!(out.matches(SEPARATOR).count(), 4);
        assert!(outcome.prompts.ends_with(&format!("{}\n{}", SEPARATOR, RESTART_QUESTION)));
        assert!(!out.contains(GREETING));
    }

    #[test]
    fn test_restart_runs_another_round() {
        let (_tmp, catalog) = data_dir();
        let input = "chicago\nall\nall\nYes\nwashington\nall\nall\nno\n";
        let outcome = run(&catalog, input, OutputFormat::Text);

        assert_eq!(outcome.result.unwrap(), 2);
        let out = outcome.reports;
        assert!(out.contains("The dataset does not have Gender as a column."));
        assert!(out.contains("The dataset does not have Birth Year as a column."));
    }

    #[test]
    fn test_empty_selection_reports_notices() {
        let (_tmp, catalog) = data_dir();
        let outcome = run(&catalog, "chicago\nfebruary\nall\nno\n", OutputFormat::Text);

        assert_eq!(outcome.result.unwrap(), 1);
        let out = outcome.reports;
        assert!(out.contains("No data to compute most popular month"));
        assert!(out.contains("No data to compute most common start station"));
        assert!(out.contains("Total travel time:\n0.00 seconds (0s)"));
        assert!(out.contains("No data to compute mean trip duration"));
    }

    #[test]
    fn test_input_closed_before_filters_ends_cleanly() {
        let (_tmp, catalog) = data_dir();
        let outcome = run(&catalog, "chicago\n", OutputFormat::Text);
        assert_eq!(outcome.result.unwrap(), 0);
        assert!(outcome.reports.is_empty());
    }

    #[test]
    fn test_missing_city_file_is_fatal() {
        let (_tmp, catalog) = data_dir();
        let outcome = run(&catalog, "new york city\nall\nall\n", OutputFormat::Text);
        assert!(matches!(outcome.result, Err(BikeshareError::FileRead { .. })));
    }

    #[test]
    fn test_presets_skip_prompts() {
        let (_tmp, catalog) = data_dir();
        let presets = FilterPresets {
            city: Some("washington".to_string()),
            month: Some("june".to_string()),
            day: Some("wednesday".to_string()),
        };
        let outcome = run_with(&catalog, "no\n", OutputFormat::Text, presets);

        assert_eq!(outcome.result.unwrap(), 1);
        assert!(outcome.reports.contains("June (count: 1)"));
        assert!(outcome.reports.contains("Wednesday (count: 1)"));
        assert!(!outcome.prompts.contains("Would you like to get information"));
    }

    #[test]
    fn test_json_output_emits_one_document_per_section() {
        let (_tmp, catalog) = data_dir();
        let outcome = run(&catalog, "chicago\nall\nall\nno\n", OutputFormat::Json);

        assert_eq!(outcome.result.unwrap(), 1);
        for key in ["\"time\"", "\"stations\"", "\"duration\"", "\"users\""] {
            assert!(
                outcome.reports.contains(&format!("\"section\": {}", key)),
                "missing {key}"
            );
        }
    }

    #[test]
    fn test_json_report_stream_parses_with_presets() {
        let (_tmp, catalog) = data_dir();
        let presets = FilterPresets {
            city: Some("washington".to_string()),
            month: Some("all".to_string()),
            day: Some("all".to_string()),
        };
        let outcome = run_with(&catalog, "no\n", OutputFormat::Json, presets);
        assert_eq!(outcome.result.unwrap(), 1);

        let docs: Vec<Value> = serde_json::Deserializer::from_str(&outcome.reports)
            .into_iter::<Value>()
            .collect::<std::result::Result<_, _>>()
            .expect("reports parse as JSON");
        let sections: Vec<&str> = docs
            .iter()
            .map(|d| d["section"].as_str().expect("section key"))
            .collect();
        assert_eq!(sections, vec!["time", "stations", "duration", "users"]);

        assert!(outcome.prompts.starts_with(GREETING));
        assert!(outcome.prompts.ends_with(RESTART_QUESTION));
    }
}

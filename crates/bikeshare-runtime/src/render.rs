//! Text and JSON rendering of the four report sections.

use std::io::Write;
use std::time::Duration;

use bikeshare_core::error::Result;
use bikeshare_core::formatting::{format_duration, format_number};
use bikeshare_core::settings::OutputFormat;
use bikeshare_data::reports::{
    Availability, DurationStatsReport, StationShare, StationStatsReport, TimeStatsReport,
    UserStatsReport,
};
use bikeshare_data::stats::ValueCount;
use serde::Serialize;
use serde_json::{json, Value};

pub const SEPARATOR: &str = "----------------------------------------";

/// The four report sections, in the order a session prints them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Time,
    Stations,
    Duration,
    Users,
}

impl Section {
    pub fn heading(&self) -> &'static str {
        match self {
            Section::Time => "Calculating The Most Frequent Times of Travel...",
            Section::Stations => "Calculating The Most Popular Stations and Trip...",
            Section::Duration => "Calculating Trip Duration...",
            Section::Users => "Calculating User Stats...",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Section::Time => "time",
            Section::Stations => "stations",
            Section::Duration => "duration",
            Section::Users => "users",
        }
    }
}

/// A section ready to print in either output format.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub section: Section,
    pub lines: Vec<String>,
    pub json: Value,
}

impl Rendered {
    /// Write the section followed by its timing and the separator.
    pub fn write_to<W: Write>(
        &self,
        out: &mut W,
        format: OutputFormat,
        elapsed: Duration,
    ) -> Result<()> {
        match format {
            OutputFormat::Text => {
                writeln!(out, "\n{}\n", self.section.heading())?;
                for line in &self.lines {
                    writeln!(out, "{}", line)?;
                }
                writeln!(out, "\nThis took {} seconds.", elapsed.as_secs_f64())?;
                writeln!(out, "{}", SEPARATOR)?;
            }
            OutputFormat::Json => {
                let doc = json!({
                    "section": self.section.key(),
                    "elapsed_seconds": elapsed.as_secs_f64(),
                    "report": self.json,
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

// ── Per-report rendering ──────────────────────────────────────────────────────

pub fn time_stats(report: &Result<TimeStatsReport>) -> Result<Rendered> {
    let lines = match report {
        Ok(r) => vec![
            "Most Popular Month:".to_string(),
            with_count(&r.month.label, r.month.count),
            "Most Popular Day:".to_string(),
            with_count(&r.day.label, r.day.count),
            "Most Popular Start Hour:".to_string(),
            with_count(&r.hour.label, r.hour.count),
        ],
        Err(e) => unavailable(e),
    };
    Ok(Rendered {
        section: Section::Time,
        lines,
        json: outcome_json(report)?,
    })
}

pub fn station_stats(report: &Result<StationStatsReport>) -> Result<Rendered> {
    let lines = match report {
        Ok(r) => vec![
            "Most commonly used start station:".to_string(),
            station_line(&r.start),
            String::new(),
            "Most commonly used end station:".to_string(),
            station_line(&r.end),
            String::new(),
            "Most frequent combination of start and end station trips:".to_string(),
            station_line(&r.pair),
        ],
        Err(e) => unavailable(e),
    };
    Ok(Rendered {
        section: Section::Stations,
        lines,
        json: outcome_json(report)?,
    })
}

pub fn duration_stats(report: &DurationStatsReport) -> Result<Rendered> {
    let mut lines = vec![
        "Total travel time:".to_string(),
        seconds_line(report.total_seconds),
        String::new(),
        "Mean travel time:".to_string(),
    ];
    let mean = report.mean_seconds();
    match &mean {
        Ok(m) => lines.push(seconds_line(*m)),
        Err(e) => lines.extend(unavailable(e)),
    }

    let json = json!({
        "total_seconds": report.total_seconds,
        "trip_count": report.trip_count,
        "mean_seconds": mean.ok(),
    });
    Ok(Rendered {
        section: Section::Duration,
        lines,
        json,
    })
}

pub fn user_stats(report: &UserStatsReport) -> Result<Rendered> {
    let mut lines = vec!["Counts of user types:".to_string()];
    lines.extend(count_lines(&report.user_types));

    lines.push(String::new());
    match &report.genders {
        Availability::Available(genders) => {
            lines.push("Counts of gender:".to_string());
            lines.extend(count_lines(genders));
        }
        Availability::NotAvailable => {
            lines.push("The dataset does not have Gender as a column.".to_string())
        }
    }

    lines.push(String::new());
    match &report.birth_years {
        Availability::Available(Some(years)) => {
            lines.push(format!("Earliest year of birth:\n{}", years.earliest));
            lines.push(format!("Most recent year of birth:\n{}", years.most_recent));
            lines.push(format!(
                "Most common year of birth:\n{}",
                with_count(&years.most_common.value.to_string(), years.most_common.count)
            ));
        }
        Availability::Available(None) => {
            lines.push("No birth year recorded for the selected trips.".to_string())
        }
        Availability::NotAvailable => {
            lines.push("The dataset does not have Birth Year as a column.".to_string())
        }
    }

    Ok(Rendered {
        section: Section::Users,
        lines,
        json: serde_json::to_value(report)?,
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn with_count(label: &str, count: usize) -> String {
    format!("{} (count: {})", label, format_number(count as f64, 0))
}

fn station_line(share: &StationShare) -> String {
    format!(
        "{} (count: {}, {:.2}% of trips)",
        share.name,
        format_number(share.count as f64, 0),
        share.share
    )
}

fn seconds_line(seconds: f64) -> String {
    format!(
        "{} seconds ({})",
        format_number(seconds, 2),
        format_duration(seconds)
    )
}

fn count_lines(counts: &[ValueCount<String>]) -> Vec<String> {
    if counts.is_empty() {
        return vec!["  (none)".to_string()];
    }
    counts
        .iter()
        .map(|c| format!("  {}: {}", c.value, format_number(c.count as f64, 0)))
        .collect()
}

fn unavailable(err: &impl std::fmt::Display) -> Vec<String> {
    vec![format!("No trips match the selected filters: {}.", err)]
}

fn outcome_json<T: Serialize>(report: &Result<T>) -> Result<Value> {
    Ok(match report {
        Ok(r) => serde_json::to_value(r)?,
        Err(e) => json!({ "error": e.to_string() }),
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────

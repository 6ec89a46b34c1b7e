//! Console prompts with validation against a fixed set of answers.
//!
//! [`Prompter`] reads from any [`BufRead`] and writes to any [`Write`], so
//! sessions can be driven from stdin in the binary and from in-memory
//! buffers in tests.

use std::io::{BufRead, Write};

use bikeshare_core::catalog::Catalog;
use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::formatting::{normalize_token, title_case};
use bikeshare_core::models::Filters;
use tracing::{debug, warn};

use crate::render::SEPARATOR;

pub const GREETING: &str = "Hello! Let's explore some US bike-share data!";
pub const INVALID_INPUT: &str = "Invalid input. Please try another time: ";
pub const RESTART_QUESTION: &str = "\nWould you like to restart? Enter yes or no.\n";

/// Normalized `choice` when it is one of `accepted`.
pub fn check_input_validity(choice: &str, accepted: &[String]) -> Option<String> {
    let choice = normalize_token(choice);
    accepted.contains(&choice).then_some(choice)
}

/// Filter values supplied up front (e.g. on the command line).
///
/// A preset skips its question; an invalid preset falls back to re-prompting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPresets {
    pub city: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
    /// `None` re-prompts until a valid answer arrives.
    max_attempts: Option<usize>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<usize>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Ask `question` until the answer is one of `accepted`.
    ///
    /// A given `initial` answer is validated first and the question is only
    /// printed when there is none.
    pub fn ask(
        &mut self,
        initial: Option<&str>,
        question: &str,
        accepted: &[String],
    ) -> Result<String> {
        let mut answer = match initial {
            Some(value) => value.to_string(),
            None => {
                self.write_prompt(question)?;
                self.read_answer()?
            }
        };

        let mut attempts = 0;
        loop {
            if let Some(valid) = check_input_validity(&answer, accepted) {
                debug!("Accepted answer {:?}", valid);
                return Ok(valid);
            }

            attempts += 1;
            warn!("Rejected answer {:?} (attempt {})", answer.trim(), attempts);
            if self.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(BikeshareError::InvalidInput { attempts });
            }

            self.write_prompt(INVALID_INPUT)?;
            answer = self.read_answer()?;
        }
    }

    /// Ask for city, month and day, skipping questions answered by `presets`.
    pub fn ask_filters(&mut self, catalog: &Catalog, presets: &FilterPresets) -> Result<Filters> {
        writeln!(self.output, "{}", GREETING)?;

        let city = self.ask(
            presets.city.as_deref(),
            &city_question(catalog),
            &catalog.city_names(),
        )?;
        let month = self.ask(
            presets.month.as_deref(),
            &range_question("month", &catalog.months),
            &catalog.month_choices(),
        )?;
        let day = self.ask(
            presets.day.as_deref(),
            &range_question("day", &catalog.days),
            &catalog.day_choices(),
        )?;

        writeln!(self.output, "{}", SEPARATOR)?;
        Ok(Filters::new(&city, &month, &day))
    }

    /// `true` only for a case-insensitive `yes`; end of input means no.
    ///
    /// Only the line terminator is stripped, so a padded answer is a no.
    pub fn confirm_restart(&mut self) -> Result<bool> {
        self.write_prompt(RESTART_QUESTION)?;
        match self.read_answer() {
            Ok(answer) => Ok(answer.trim_end_matches(['\r', '\n']).to_lowercase() == "yes"),
            Err(BikeshareError::InputClosed) => Ok(false),
            Err(e) => Err(e),
        }
    }

    // ── Private ───────────────────────────────────────────────────────────

    fn write_prompt(&mut self, text: &str) -> Result<()> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    /// One raw line; `InputClosed` at end of input.
    fn read_answer(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(BikeshareError::InputClosed);
        }
        Ok(line)
    }
}

fn city_question(catalog: &Catalog) -> String {
    let names = catalog.city_names();
    let listed = match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    };
    format!("Would you like to get information for {}'s bike-shares? ", listed)
}

fn range_question(axis: &str, names: &[String]) -> String {
    let first = names.first().map(|n| title_case(n)).unwrap_or_default();
    let last = names.last().map(|n| title_case(n)).unwrap_or_default();
    format!(
        "Enter the {} (\"{}\" to \"{}\") or enter \"all\" if you need all information for all {}s: ",
        axis, first, last, axis
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────

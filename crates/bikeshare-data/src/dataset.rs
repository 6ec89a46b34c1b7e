//! In-memory trip table for one city and its month/day filters.

use bikeshare_core::catalog::Catalog;
use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::formatting::title_case;
use bikeshare_core::models::{Schema, Selection, Trip, BIRTH_YEAR, GENDER};
use tracing::debug;

/// Trips loaded for one session round.
///
/// Rows are only ever removed; surviving rows keep their file order.
#[derive(Debug, Clone)]
pub struct Dataset {
    city: String,
    schema: Schema,
    trips: Vec<Trip>,
}

impl Dataset {
    pub fn new(city: impl Into<String>, schema: Schema, trips: Vec<Trip>) -> Self {
        Self {
            city: city.into(),
            schema,
            trips,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    // ── Filtering ─────────────────────────────────────────────────────────

    /// Apply the month filter, then the day filter.
    pub fn apply_filters(
        self,
        catalog: &Catalog,
        month: &Selection,
        day: &Selection,
    ) -> Result<Self> {
        self.filter_month(catalog, month)?.filter_day(catalog, day)
    }

    /// Keep trips that started in `month`; [`Selection::All`] keeps every row.
    pub fn filter_month(mut self, catalog: &Catalog, month: &Selection) -> Result<Self> {
        let Selection::Named(name) = month else {
            return Ok(self);
        };
        let index = catalog.month_index(name)?;
        let before = self.trips.len();
        self.trips.retain(|t| t.month() == index);
        debug!(
            "Month filter {} (#{}): {} → {} trips",
            name,
            index,
            before,
            self.trips.len()
        );
        Ok(self)
    }

    /// Keep trips whose weekday name equals the title-cased `day`.
    pub fn filter_day(mut self, catalog: &Catalog, day: &Selection) -> Result<Self> {
        let Selection::Named(name) = day else {
            return Ok(self);
        };
        catalog.day_index(name)?;
        let wanted = title_case(name);
        let before = self.trips.len();
        self.trips.retain(|t| catalog.day_name(t.weekday()) == wanted);
        debug!(
            "Day filter {}: {} → {} trips",
            wanted,
            before,
            self.trips.len()
        );
        Ok(self)
    }

    // ── Optional columns ──────────────────────────────────────────────────

    /// Non-empty gender values, or `MissingColumn` when the city has none.
    pub fn genders(&self) -> Result<Vec<&str>> {
        if !self.schema.has_gender {
            return Err(BikeshareError::MissingColumn(GENDER));
        }
        Ok(self
            .trips
            .iter()
            .filter_map(|t| t.record.gender.as_deref())
            .collect())
    }

    /// Non-null birth years, or `MissingColumn` when the city has none.
    pub fn birth_years(&self) -> Result<Vec<i32>> {
        if !self.schema.has_birth_year {
            return Err(BikeshareError::MissingColumn(BIRTH_YEAR));
        }
        Ok(self
            .trips
            .iter()
            .filter_map(|t| t.record.birth_year)
            .collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

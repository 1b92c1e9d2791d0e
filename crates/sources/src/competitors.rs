//! Competitor Source - releases inside a date window
//!
//! Two movies compete when their release dates are at most `window_days`
//! apart (inclusive on both sides).
//!
//! ## Algorithm
//! For each movie with a parsed release date:
//! 1. Scan the whole catalog for movies dated within ±window_days
//! 2. Drop every movie carrying the same title (this also drops the movie
//!    itself, and duplicate-titled entries exclude each other)
//! 3. Sort by release date ascending, ties in file order
//! 4. Keep the first `max_competitors` and join their titles with ", "
//!
//! Movies without a date get an empty string and never appear in another
//! movie's window. The scan is O(n²), fine for catalogs in the thousands.

use crate::types::join_titles;
use chrono::{Days, NaiveDate};
use data_loader::{Catalog, RowId};
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Produces the "competitor titles" list of every movie
#[derive(Debug, Clone)]
pub struct CompetitorSource {
    /// Half-width of the window in days
    window_days: u64,

    /// Maximum number of competitors per movie
    max_competitors: usize,
}

impl CompetitorSource {
    pub fn new() -> Self {
        Self {
            window_days: 7,
            max_competitors: 5,
        }
    }

    /// Configure the window half-width in days (default: 7)
    pub fn with_window_days(mut self, days: u64) -> Self {
        self.window_days = days;
        self
    }

    /// Configure how many competitors to keep (default: 5)
    pub fn with_max_competitors(mut self, max: usize) -> Self {
        self.max_competitors = max;
        self
    }

    pub fn window_days(&self) -> u64 {
        self.window_days
    }

    /// Inclusive date range around `date`, clamped to the calendar limits.
    pub fn window(&self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        let days = Days::new(self.window_days);
        (
            date.checked_sub_days(days).unwrap_or(NaiveDate::MIN),
            date.checked_add_days(days).unwrap_or(NaiveDate::MAX),
        )
    }

    /// Competitor rows of the movie at `row`, date ascending.
    pub fn competitors_for(&self, catalog: &Catalog, row: RowId) -> Vec<RowId> {
        let Some(subject) = catalog.get_movie(row) else {
            return Vec::new();
        };
        let Some(date) = subject.release_date else {
            return Vec::new();
        };
        let (start, end) = self.window(date);

        let mut within: Vec<(NaiveDate, RowId)> = catalog
            .movies()
            .iter()
            .filter(|other| other.title != subject.title)
            .filter_map(|other| {
                let other_date = other.release_date?;
                (start <= other_date && other_date <= end).then_some((other_date, other.position))
            })
            .collect();

        // Stable sort on the date only: same-day releases stay in file order
        within.sort_by_key(|&(date, _)| date);
        within.truncate(self.max_competitors);
        within.into_iter().map(|(_, row)| row).collect()
    }

    /// Competitor-titles cell for every catalog row, in row order.
    #[instrument(skip_all, fields(movies = catalog.len(), window_days = self.window_days))]
    pub fn competitor_titles(&self, catalog: &Catalog) -> Vec<String> {
        let output: Vec<String> = (0..catalog.len())
            .into_par_iter()
            .map(|row| join_titles(catalog, &self.competitors_for(catalog, row)))
            .collect();

        debug!(
            "Computed competitors for {} movies ({} with at least one)",
            output.len(),
            output.iter().filter(|s| !s.is_empty()).count()
        );
        output
    }
}

impl Default for CompetitorSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{ColumnNames, RawTable};

    fn catalog(rows: &[(&str, &str)]) -> Catalog {
        let raw = RawTable {
            headers: vec![
                "title".to_string(),
                "keywords".to_string(),
                "releaseDate".to_string(),
            ],
            rows: rows
                .iter()
                .map(|(title, date)| vec![title.to_string(), String::new(), date.to_string()])
                .collect(),
            has_bom: false,
        };
        Catalog::from_table(raw, ColumnNames::standard()).unwrap()
    }

    #[test]
    fn test_xyz_scenario() {
        let catalog = catalog(&[("X", "20240101"), ("Y", "20240103"), ("Z", "20240115")]);
        let titles = CompetitorSource::new().competitor_titles(&catalog);
        assert_eq!(titles, vec!["Y", "X", ""]);
    }

    #[test]
    fn test_window_is_inclusive() {
        let catalog = catalog(&[
            ("Center", "20240110"),
            ("EdgeBefore", "20240103"),
            ("EdgeAfter", "20240117"),
            ("TooEarly", "20240102"),
            ("TooLate", "20240118"),
        ]);
        let titles = CompetitorSource::new().competitor_titles(&catalog);
        assert_eq!(titles[0], "EdgeBefore, EdgeAfter");
    }

    #[test]
    fn test_sorted_by_date_and_capped() {
        let catalog = catalog(&[
            ("Subject", "20240110"),
            ("F", "20240116"),
            ("E", "20240115"),
            ("D", "20240112"),
            ("C", "20240109"),
            ("B", "20240105"),
            ("A", "20240104"),
        ]);
        let titles = CompetitorSource::new().competitor_titles(&catalog);
        assert_eq!(titles[0], "A, B, C, D, E");
    }

    #[test]
    fn test_same_day_keeps_file_order() {
        let catalog = catalog(&[
            ("Subject", "20240110"),
            ("Second", "20240111"),
            ("First", "20240111"),
        ]);
        let titles = CompetitorSource::new().competitor_titles(&catalog);
        assert_eq!(titles[0], "Second, First");
    }

    #[test]
    fn test_duplicate_titles_exclude_each_other() {
        let catalog = catalog(&[
            ("Twin", "20240101"),
            ("Twin", "20240104"),
            ("Other", "20240102"),
        ]);
        let titles = CompetitorSource::new().competitor_titles(&catalog);
        assert_eq!(titles, vec!["Other", "Other", "Twin, Twin"]);
    }

    #[test]
    fn test_malformed_dates() {
        let catalog = catalog(&[
            ("Good", "20240101"),
            ("Short", "2024010"),
            ("Dashed", "2024-01-02"),
            ("Blank", ""),
            ("Near", "20240102"),
        ]);
        let titles = CompetitorSource::new().competitor_titles(&catalog);
        assert_eq!(titles, vec!["Near", "", "", "", "Good"]);
    }

    #[test]
    fn test_configurable_window() {
        let catalog = catalog(&[("A", "20240101"), ("B", "20240120")]);
        let titles = CompetitorSource::new()
            .with_window_days(30)
            .with_max_competitors(1)
            .competitor_titles(&catalog);
        assert_eq!(titles, vec!["B", "A"]);
    }
}

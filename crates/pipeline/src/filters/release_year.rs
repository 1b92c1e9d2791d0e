//! Filter on release year.
//!
//! Works on the raw release-date cell rather than the parsed date, so a
//! movie with a partially valid date (e.g. "2024-05") still matches its year.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::{Catalog, RowId};

/// Keeps movies whose release-date cell starts with one of the years.
pub struct ReleaseYearFilter {
    years: Vec<String>,
}

impl ReleaseYearFilter {
    pub fn new(years: Vec<String>) -> Self {
        Self { years }
    }
}

/// Year prefix of a raw release-date cell (first four characters)
pub fn year_prefix(cell: &str) -> String {
    cell.trim().chars().take(4).collect()
}

impl Filter for ReleaseYearFilter {
    fn name(&self) -> &str {
        "ReleaseYearFilter"
    }

    fn apply(&self, rows: Vec<RowId>, catalog: &Catalog) -> Result<Vec<RowId>> {
        if self.years.is_empty() {
            return Ok(rows);
        }
        let header = &catalog.columns().release_date;
        let filtered = rows
            .into_iter()
            .filter(|&row| {
                catalog
                    .field(row, header)
                    .is_some_and(|cell| self.years.contains(&year_prefix(cell)))
            })
            .collect();
        Ok(filtered)
    }
}

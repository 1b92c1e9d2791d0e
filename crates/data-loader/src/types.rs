//! Core domain types for the movie catalog.
//!
//! The catalog is a flat table (one row per movie) produced by the upstream
//! scraper. We keep the raw cells untouched so the table can be written back
//! with every original column in place, and derive a typed [`MovieRecord`]
//! per row for the fields the recommendation engine reads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{DataLoadError, Result};

// =============================================================================
// Type Aliases and Constants
// =============================================================================

/// Position of a movie in the original file (0-based, header excluded).
///
/// Assigned once at load time and never recomputed, so it can serve as the
/// final deterministic tie-break no matter how the rows are processed.
pub type RowId = usize;

/// Sort key used for a movie whose popularity is missing or not a number.
///
/// Ranks below every real popularity value.
pub const MISSING_POPULARITY: f64 = f64::NEG_INFINITY;

// =============================================================================
// Column Configuration
// =============================================================================

/// Header names of the columns the engine reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    // Required inputs
    pub title: String,
    pub keywords: String,
    pub release_date: String,

    // Optional inputs
    pub popularity: String,
    pub genre: String,
    pub country: String,

    // Outputs
    pub similar_titles: String,
    pub competitor_titles: String,
    pub predicted_attractiveness: String,
}

impl ColumnNames {
    /// English headers.
    pub fn standard() -> Self {
        Self {
            title: "title".to_string(),
            keywords: "keywords".to_string(),
            release_date: "releaseDate".to_string(),
            popularity: "popularity".to_string(),
            genre: "genre".to_string(),
            country: "country".to_string(),
            similar_titles: "similarTitles".to_string(),
            competitor_titles: "competitorTitles".to_string(),
            predicted_attractiveness: "predictedAttractiveness".to_string(),
        }
    }

    /// Headers written by the Naver search scraper.
    pub fn naver() -> Self {
        Self {
            title: "영화명".to_string(),
            keywords: "Gemini 키워드".to_string(),
            release_date: "개봉일".to_string(),
            popularity: "매력도".to_string(),
            genre: "장르".to_string(),
            country: "국가".to_string(),
            similar_titles: "유사작".to_string(),
            competitor_titles: "경쟁작".to_string(),
            predicted_attractiveness: "예측 매력도".to_string(),
        }
    }

    /// Columns that must be present for a run to proceed.
    pub fn required(&self) -> [&str; 3] {
        [&self.title, &self.keywords, &self.release_date]
    }

    /// Columns the engine reads and therefore must never overwrite.
    pub fn inputs(&self) -> [&str; 4] {
        [
            &self.title,
            &self.keywords,
            &self.release_date,
            &self.popularity,
        ]
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Movie Record
// =============================================================================

/// Typed view of one catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Position in the original file
    pub position: RowId,
    pub title: String,
    /// Trimmed, non-empty keyword tags in their original order.
    ///
    /// `None` when the cell is missing; `Some(vec![])` when the cell only
    /// contained separators or whitespace.
    pub keywords: Option<Vec<String>>,
    /// Parsed from `YYYYMMDD`; `None` when missing or malformed
    pub release_date: Option<NaiveDate>,
    pub popularity: Option<f64>,
}

impl MovieRecord {
    /// Whether this movie takes part in keyword similarity at all.
    pub fn has_keywords(&self) -> bool {
        self.keywords.as_ref().is_some_and(|tags| !tags.is_empty())
    }

    /// Popularity as a sort key, with [`MISSING_POPULARITY`] for gaps.
    pub fn popularity_key(&self) -> f64 {
        self.popularity.unwrap_or(MISSING_POPULARITY)
    }
}

// =============================================================================
// Catalog - The In-Memory Table
// =============================================================================

/// The loaded table plus typed records and lookup indices.
///
/// Raw cells are kept verbatim; only output columns can be changed through
/// [`Catalog::set_column`].
#[derive(Debug, Clone)]
pub struct Catalog {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
    pub(crate) columns: ColumnNames,

    /// One record per row, `movies[i].position == i`
    pub(crate) movies: Vec<MovieRecord>,

    /// Rows sharing each title (duplicates are allowed)
    pub(crate) title_index: HashMap<String, Vec<RowId>>,

    /// Whether the source file started with a UTF-8 byte order mark
    pub(crate) has_bom: bool,
}

impl Catalog {
    /// Number of movies (rows) in the catalog
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// All records in original row order
    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn get_movie(&self, row: RowId) -> Option<&MovieRecord> {
        self.movies.get(row)
    }

    /// Rows whose title matches exactly.
    pub fn find_by_title(&self, title: &str) -> &[RowId] {
        self.title_index
            .get(title)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    pub fn has_bom(&self) -> bool {
        self.has_bom
    }

    /// Position of header `name`, ignoring padding around the stored header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Raw cell of `row` under header `column`.
    ///
    /// Returns `None` when the column is absent or the cell counts as
    /// missing (see [`crate::parser::is_missing_cell`]).
    pub fn field(&self, row: RowId, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        let cell = self.rows.get(row)?.get(col)?;
        if crate::parser::is_missing_cell(cell) {
            None
        } else {
            Some(cell.as_str())
        }
    }

    /// Write an output column, appending it if new.
    ///
    /// Existing columns keep their position; input columns are refused.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if self.columns.inputs().contains(&name) {
            return Err(DataLoadError::ProtectedColumn {
                column: name.to_string(),
            });
        }
        if values.len() != self.rows.len() {
            return Err(DataLoadError::ColumnLengthMismatch {
                column: name.to_string(),
                expected: self.rows.len(),
                found: values.len(),
            });
        }

        match self.column_index(name) {
            Some(col) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[col] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }
}

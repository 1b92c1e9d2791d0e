//! Shared types for the similar-title and competitor sources.

use data_loader::{Catalog, RowId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Separator used when a list of titles is stored in a single cell
pub const TITLE_SEPARATOR: &str = ", ";

/// One entry of a per-query similarity ranking. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub row: RowId,
    pub similarity: f64,
    /// Popularity sort key; `MISSING_POPULARITY` when unknown
    pub popularity: f64,
    /// Original file position, the final tie-break
    pub position: RowId,
}

impl RankedCandidate {
    /// Ranking order: similarity DESC, popularity DESC, position ASC.
    ///
    /// Positions are unique, so this is a total order over a catalog.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .similarity
            .partial_cmp(&self.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                other
                    .popularity
                    .partial_cmp(&self.popularity)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| self.position.cmp(&other.position))
    }
}

/// Join the titles of `rows` into one cell value.
///
/// Example: rows of "Y" and "Z" -> "Y, Z"; no rows -> ""
pub fn join_titles(catalog: &Catalog, rows: &[RowId]) -> String {
    rows.iter()
        .filter_map(|&row| catalog.get_movie(row))
        .map(|movie| movie.title.as_str())
        .collect::<Vec<_>>()
        .join(TITLE_SEPARATOR)
}

//! Filter on a free-text title query.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::{Catalog, RowId};

/// Keeps movies whose title contains the query, ignoring case.
///
/// A blank query keeps every movie.
pub struct TitleQueryFilter {
    query: String,
}

impl TitleQueryFilter {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into().trim().to_lowercase(),
        }
    }
}

impl Filter for TitleQueryFilter {
    fn name(&self) -> &str {
        "TitleQueryFilter"
    }

    fn apply(&self, rows: Vec<RowId>, catalog: &Catalog) -> Result<Vec<RowId>> {
        if self.query.is_empty() {
            return Ok(rows);
        }
        let filtered = rows
            .into_iter()
            .filter(|&row| {
                catalog
                    .get_movie(row)
                    .is_some_and(|movie| movie.title.to_lowercase().contains(&self.query))
            })
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{ColumnNames, RawTable};

    fn create_test_catalog() -> Catalog {
        let raw = RawTable {
            headers: vec![
                "title".to_string(),
                "keywords".to_string(),
                "releaseDate".to_string(),
            ],
            rows: ["The Host", "Host Club", "Parasite", ""]
                .iter()
                .map(|t| vec![t.to_string(), String::new(), String::new()])
                .collect(),
            has_bom: false,
        };
        Catalog::from_table(raw, ColumnNames::standard()).unwrap()
    }

    #[test]
    fn test_case_insensitive_substring() {
        let catalog = create_test_catalog();
        let filter = TitleQueryFilter::new("HOST");
        let rows = filter.apply(vec![0, 1, 2, 3], &catalog).unwrap();
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn test_blank_query_keeps_everything() {
        let catalog = create_test_catalog();
        let filter = TitleQueryFilter::new("   ");
        let rows = filter.apply(vec![0, 1, 2, 3], &catalog).unwrap();
        assert_eq!(rows.len(), 4);
    }
}

//! Filter on comma-separated tag columns (genre, country, keywords).
//!
//! A movie is kept when at least one of its trimmed tags equals one of the
//! selected values. Movies with a missing cell are removed.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::{Catalog, ColumnNames, RowId, split_tags};

/// Which tag column a [`TagListFilter`] reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagColumn {
    Genre,
    Country,
    Keywords,
}

impl TagColumn {
    fn header<'a>(&self, columns: &'a ColumnNames) -> &'a str {
        match self {
            TagColumn::Genre => &columns.genre,
            TagColumn::Country => &columns.country,
            TagColumn::Keywords => &columns.keywords,
        }
    }
}

/// Keeps movies tagged with any of the selected values.
///
/// ## Algorithm
/// 1. With no selected values, keep everything
/// 2. Otherwise split the movie's cell on commas and trim each tag
/// 3. Keep the movie if any tag is selected
pub struct TagListFilter {
    column: TagColumn,
    selected: Vec<String>,
    name: String,
}

impl TagListFilter {
    pub fn new(column: TagColumn, selected: Vec<String>) -> Self {
        Self {
            column,
            selected,
            name: format!("TagListFilter({:?})", column),
        }
    }
}

impl Filter for TagListFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, rows: Vec<RowId>, catalog: &Catalog) -> Result<Vec<RowId>> {
        if self.selected.is_empty() {
            return Ok(rows);
        }
        let header = self.column.header(catalog.columns());
        let filtered = rows
            .into_iter()
            .filter(|&row| match catalog.field(row, header) {
                Some(cell) => split_tags(cell)
                    .iter()
                    .any(|tag| self.selected.contains(tag)),
                None => false,
            })
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::RawTable;

    fn create_test_catalog() -> Catalog {
        let raw = RawTable {
            headers: vec![
                "title".to_string(),
                "keywords".to_string(),
                "releaseDate".to_string(),
                "genre".to_string(),
            ],
            rows: vec![
                vec!["A".into(), "dark, revenge".into(), "".into(), "Drama, Thriller".into()],
                vec!["B".into(), "family".into(), "".into(), "Comedy".into()],
                vec!["C".into(), "".into(), "".into(), "".into()],
                vec!["D".into(), "revenge ".into(), "".into(), "Dramatic".into()],
            ],
            has_bom: false,
        };
        Catalog::from_table(raw, ColumnNames::standard()).unwrap()
    }

    #[test]
    fn test_genre_exact_tag_match() {
        let catalog = create_test_catalog();
        let filter = TagListFilter::new(TagColumn::Genre, vec!["Drama".to_string()]);
        let rows = filter.apply(vec![0, 1, 2, 3], &catalog).unwrap();
        // "Dramatic" is not "Drama", and the missing cell is dropped
        assert_eq!(rows, vec![0]);
    }

    #[test]
    fn test_any_of_selected() {
        let catalog = create_test_catalog();
        let filter = TagListFilter::new(
            TagColumn::Keywords,
            vec!["family".to_string(), "revenge".to_string()],
        );
        let rows = filter.apply(vec![0, 1, 2, 3], &catalog).unwrap();
        assert_eq!(rows, vec![0, 1, 3]);
    }

    #[test]
    fn test_absent_column_rejects_when_selected() {
        let catalog = create_test_catalog();
        let filter = TagListFilter::new(TagColumn::Country, vec!["Korea".to_string()]);
        assert!(filter.apply(vec![0, 1], &catalog).unwrap().is_empty());

        let filter = TagListFilter::new(TagColumn::Country, vec![]);
        assert_eq!(filter.apply(vec![0, 1], &catalog).unwrap(), vec![0, 1]);
    }
}

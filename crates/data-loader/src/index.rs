//! Catalog building, validation and write-back.
//!
//! - Check the header for the required columns
//! - Derive a typed record per row, positions assigned in file order
//! - Build the title lookup index
//! - Write the (possibly enriched) table back to disk

use crate::error::{DataLoadError, Result};
use crate::parser::{self, RawTable};
use crate::types::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

impl Catalog {
    /// Load a catalog from a CSV file.
    ///
    /// Fails if the file cannot be read or a required column is missing.
    /// Individual malformed cells never fail the load.
    pub fn load_from_file(path: &Path, columns: ColumnNames) -> Result<Self> {
        info!("Loading movie catalog from {:?}", path);

        let table = parser::read_table(path)?;
        let catalog = Self::from_table(table, columns)?;

        info!(
            "Loaded {} movies ({} with keywords, {} with release dates)",
            catalog.len(),
            catalog.movies.iter().filter(|m| m.has_keywords()).count(),
            catalog
                .movies
                .iter()
                .filter(|m| m.release_date.is_some())
                .count()
        );
        Ok(catalog)
    }

    /// Build a catalog from an in-memory table.
    pub fn from_table(table: RawTable, columns: ColumnNames) -> Result<Self> {
        let RawTable {
            headers,
            rows,
            has_bom,
        } = table;

        for (idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(DataLoadError::ParseError {
                    file: "<table>".to_string(),
                    line: idx + 2,
                    reason: format!(
                        "expected {} fields but found {}",
                        headers.len(),
                        row.len()
                    ),
                });
            }
        }

        let mut catalog = Catalog {
            headers,
            rows,
            columns,
            movies: Vec::new(),
            title_index: HashMap::new(),
            has_bom,
        };
        catalog.validate()?;
        catalog.parse_records();
        catalog.build_secondary_indices();
        Ok(catalog)
    }

    /// Check that every required column is present.
    pub fn validate(&self) -> Result<()> {
        for column in self.columns.required() {
            if self.column_index(column).is_none() {
                return Err(DataLoadError::MissingColumn {
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Derive typed records from the raw cells.
    fn parse_records(&mut self) {
        let title_col = self.column_index(&self.columns.title);
        let keywords_col = self.column_index(&self.columns.keywords);
        let date_col = self.column_index(&self.columns.release_date);
        let popularity_col = self.column_index(&self.columns.popularity);
        if popularity_col.is_none() {
            debug!(
                "No {} column, every movie uses the missing-popularity sentinel",
                self.columns.popularity
            );
        }

        let cell = |row: &Vec<String>, col: Option<usize>| -> Option<String> {
            col.and_then(|c| row.get(c)).cloned()
        };

        self.movies = self
            .rows
            .iter()
            .enumerate()
            .map(|(position, row)| MovieRecord {
                position,
                title: cell(row, title_col)
                    .filter(|t| !parser::is_missing_cell(t))
                    .unwrap_or_default(),
                keywords: cell(row, keywords_col).and_then(|c| parser::parse_keywords(&c)),
                release_date: cell(row, date_col).and_then(|c| parser::parse_release_date(&c)),
                popularity: cell(row, popularity_col).and_then(|c| parser::parse_popularity(&c)),
            })
            .collect();
    }

    /// Build lookup indices after records are parsed
    pub fn build_secondary_indices(&mut self) {
        self.title_index.clear();
        for movie in &self.movies {
            self.title_index
                .entry(movie.title.clone())
                .or_insert_with(Vec::new)
                .push(movie.position);
        }
    }

    /// Write the table, including any output columns, to `path`.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        info!(
            "Writing {} rows x {} columns to {:?}",
            self.rows.len(),
            self.headers.len(),
            path
        );
        let table = RawTable {
            headers: self.headers.clone(),
            rows: self.rows.clone(),
            has_bom: self.has_bom,
        };
        parser::write_table(path, &table)
    }
}

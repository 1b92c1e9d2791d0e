//! Distinct values offered as search selections.

use crate::filters::release_year::year_prefix;
use data_loader::{Catalog, split_tags};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOptions {
    /// Sorted ascending
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub keywords: Vec<String>,
    /// Sorted descending (newest first)
    pub years: Vec<String>,
}

impl FacetOptions {
    /// Collect the facet values present in the catalog.
    ///
    /// Absent columns and missing cells contribute nothing.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let names = catalog.columns();
        let collect_tags = |column: &str| -> Vec<String> {
            (0..catalog.len())
                .filter_map(|row| catalog.field(row, column))
                .flat_map(split_tags)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };

        let years: BTreeSet<String> = (0..catalog.len())
            .filter_map(|row| catalog.field(row, &names.release_date))
            .map(year_prefix)
            .filter(|year| !year.is_empty())
            .collect();

        Self {
            genres: collect_tags(&names.genre),
            countries: collect_tags(&names.country),
            keywords: collect_tags(&names.keywords),
            years: years.into_iter().rev().collect(),
        }
    }
}

//! Catalog search.
//!
//! A [`SearchRequest`] collects the user's selections; [`search`] turns them
//! into a [`FilterPipeline`] and returns matching rows in catalog order.

use crate::filter_pipeline::FilterPipeline;
use crate::filters::{ReleaseYearFilter, TagColumn, TagListFilter, TitleQueryFilter};
use anyhow::Result;
use data_loader::{Catalog, RowId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 30;

/// Search selections. Empty selections do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub genres: Vec<String>,
    pub years: Vec<String>,
    pub countries: Vec<String>,
    pub keywords: Vec<String>,
    pub limit: Option<usize>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_genres(mut self, genres: Vec<String>) -> Self {
        self.genres = genres;
        self
    }

    pub fn with_years(mut self, years: Vec<String>) -> Self {
        self.years = years;
        self
    }

    pub fn with_countries(mut self, countries: Vec<String>) -> Self {
        self.countries = countries;
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Effective result limit, clamped to 1..=30
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Build the filter pipeline for these selections.
    pub fn pipeline(&self) -> FilterPipeline {
        let mut pipeline = FilterPipeline::new();
        if !self.query.trim().is_empty() {
            pipeline = pipeline.add_filter(TitleQueryFilter::new(self.query.clone()));
        }
        if !self.genres.is_empty() {
            pipeline = pipeline.add_filter(TagListFilter::new(TagColumn::Genre, self.genres.clone()));
        }
        if !self.years.is_empty() {
            pipeline = pipeline.add_filter(ReleaseYearFilter::new(self.years.clone()));
        }
        if !self.countries.is_empty() {
            pipeline =
                pipeline.add_filter(TagListFilter::new(TagColumn::Country, self.countries.clone()));
        }
        if !self.keywords.is_empty() {
            pipeline =
                pipeline.add_filter(TagListFilter::new(TagColumn::Keywords, self.keywords.clone()));
        }
        pipeline
    }
}

/// Run a search over the catalog.
#[instrument(skip(catalog, request))]
pub fn search(catalog: &Catalog, request: &SearchRequest) -> Result<Vec<RowId>> {
    let pipeline = request.pipeline();
    debug!("Search pipeline has {} filters", pipeline.len());

    let mut rows = pipeline.apply((0..catalog.len()).collect(), catalog)?;
    rows.truncate(request.limit());
    Ok(rows)
}

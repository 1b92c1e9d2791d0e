//! Search and attractiveness scoring over the movie catalog.
//!
//! This crate provides:
//! - Filter trait and implementations for catalog search
//! - FilterPipeline for composing filters
//! - FacetOptions for the values a search can select
//! - top_by_popularity for the most popular movies
//! - FeatureEngineer and the AttractivenessModel seam for scoring
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FeatureEngineer, SearchRequest, score_catalog, search};
//!
//! // Search
//! let request = SearchRequest::new()
//!     .with_query("host")
//!     .with_genres(vec!["Drama".to_string()]);
//! let rows = search(&catalog, &request)?;
//!
//! // Score every movie with an injected model
//! let scores = score_catalog(&FeatureEngineer::default(), &catalog, model.as_ref())?;
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod search;
pub mod facets;
pub mod popular;
pub mod features;
pub mod scoring;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
pub use search::{SearchRequest, search};
pub use facets::FacetOptions;
pub use popular::top_by_popularity;
pub use features::{FeatureColumns, FeatureEngineer, FeatureRow, parse_audience_count};
pub use scoring::{AttractivenessModel, ScoringError, format_score, score_catalog};

//! Filter implementations for catalog search.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod release_year;
pub mod tag_list;
pub mod title_query;

// Re-export for convenience
pub use release_year::ReleaseYearFilter;
pub use tag_list::{TagColumn, TagListFilter};
pub use title_query::TitleQueryFilter;

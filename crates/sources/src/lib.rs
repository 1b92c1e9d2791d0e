//! # Sources Crate
//!
//! The recommendation engine behind the catalog's two list columns.
//!
//! ## Components
//!
//! ### Similar Titles Source
//! Content-based neighbors from keyword tags:
//! - TF-IDF vectors over keyword unigrams and bigrams (`vectorizer`)
//! - Dense pairwise cosine similarity (`similarity`)
//! - Deterministic three-key ranking, top 5 per movie (`neighbors`)
//!
//! ### Competitor Source
//! Market competitors by release date:
//! - Other titles released within ±7 days, earliest first, at most 5
//!   (`competitors`)
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{CompetitorSource, SimilarTitlesSource};
//! use data_loader::{Catalog, ColumnNames};
//!
//! let catalog = Catalog::load_from_file(path, ColumnNames::standard())?;
//!
//! let similar = SimilarTitlesSource::new().with_top_k(5).similar_titles(&catalog);
//! let competitors = CompetitorSource::new().competitor_titles(&catalog);
//! assert_eq!(similar.len(), catalog.len());
//! ```
//!
//! Both sources read the catalog only and can run at the same time.

// Public modules
pub mod types;
pub mod vectorizer;
pub mod similarity;
pub mod neighbors;
pub mod competitors;

// Re-export commonly used types
pub use types::{RankedCandidate, TITLE_SEPARATOR, join_titles};
pub use vectorizer::{FeatureSet, FeatureVector, KeywordVectorizer};
pub use similarity::{SimilarityMatrix, cosine_similarity};
pub use neighbors::SimilarTitlesSource;
pub use competitors::CompetitorSource;

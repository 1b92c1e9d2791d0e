//! Similar Titles Source - keyword-based nearest neighbors
//!
//! For every movie with keywords, ranks all other keyworded movies and keeps
//! the best `top_k` titles.
//!
//! ## Algorithm
//! 1. Vectorize keywords (TF-IDF, unigrams + bigrams)
//! 2. Build the dense cosine similarity matrix
//! 3. For each movie, rank every other vectorized movie by
//!    - similarity, descending
//!    - popularity, descending (missing ranks last)
//!    - original position, ascending
//! 4. Keep the first `top_k` and join their titles with ", "
//!
//! There is no similarity threshold: a candidate with score 0 still ranks.
//! Movies without keywords get an empty string.

use crate::similarity::SimilarityMatrix;
use crate::types::{RankedCandidate, join_titles};
use crate::vectorizer::KeywordVectorizer;
use data_loader::{Catalog, MISSING_POPULARITY, RowId};
use rayon::prelude::*;
use tracing::{debug, info, instrument};

/// Produces the "similar titles" list of every movie
#[derive(Debug, Clone)]
pub struct SimilarTitlesSource {
    vectorizer: KeywordVectorizer,

    /// Maximum number of titles per movie
    top_k: usize,
}

impl SimilarTitlesSource {
    pub fn new() -> Self {
        Self {
            vectorizer: KeywordVectorizer::new(),
            top_k: 5,
        }
    }

    /// Configure how many similar titles to keep (default: 5)
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Replace the keyword vectorizer
    pub fn with_vectorizer(mut self, vectorizer: KeywordVectorizer) -> Self {
        self.vectorizer = vectorizer;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Vectorize the catalog and score every pair.
    pub fn build_matrix(&self, catalog: &Catalog) -> SimilarityMatrix {
        let features = self.vectorizer.fit_transform(catalog.movies());
        SimilarityMatrix::build(&features)
    }

    /// Full ranking of candidates for the movie at `local` (self excluded).
    pub fn rank_candidates(
        &self,
        catalog: &Catalog,
        matrix: &SimilarityMatrix,
        local: usize,
    ) -> Vec<RankedCandidate> {
        let mut ranking: Vec<RankedCandidate> = (0..matrix.len())
            .filter(|&other| other != local)
            .filter_map(|other| {
                let row = matrix.row_at(other);
                let similarity = matrix.get(local, other)?;
                let popularity = catalog
                    .get_movie(row)
                    .map(|m| m.popularity_key())
                    .unwrap_or(MISSING_POPULARITY);
                Some(RankedCandidate {
                    row,
                    similarity,
                    popularity,
                    position: row,
                })
            })
            .collect();

        // slice::sort_by is stable; the position key makes the order total anyway
        ranking.sort_by(|a, b| a.rank_cmp(b));
        ranking
    }

    /// Top `top_k` neighbor rows for the movie at `local`.
    pub fn get_neighbors(
        &self,
        catalog: &Catalog,
        matrix: &SimilarityMatrix,
        local: usize,
    ) -> Vec<RowId> {
        let mut ranking = self.rank_candidates(catalog, matrix, local);
        ranking.truncate(self.top_k);
        ranking.into_iter().map(|c| c.row).collect()
    }

    /// Similar-titles cell for every catalog row, in row order.
    #[instrument(skip_all, fields(movies = catalog.len(), top_k = self.top_k))]
    pub fn similar_titles(&self, catalog: &Catalog) -> Vec<String> {
        let mut output = vec![String::new(); catalog.len()];

        let matrix = self.build_matrix(catalog);
        if matrix.is_empty() {
            info!("No movie has keywords; similar titles left empty");
            return output;
        }

        // Parallel per query, collected back in local order
        let neighbors: Vec<Vec<RowId>> = (0..matrix.len())
            .into_par_iter()
            .map(|local| self.get_neighbors(catalog, &matrix, local))
            .collect();

        for (local, rows) in neighbors.iter().enumerate() {
            output[matrix.row_at(local)] = join_titles(catalog, rows);
        }

        debug!(
            "Computed similar titles for {} of {} movies",
            matrix.len(),
            catalog.len()
        );
        output
    }
}

impl Default for SimilarTitlesSource {
    fn default() -> Self {
        Self::new()
    }
}

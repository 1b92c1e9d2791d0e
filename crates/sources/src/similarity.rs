//! Dense pairwise cosine similarity over the vectorized movies.
//!
//! Candidate pools are catalog-sized, so every pair is scored. The upper
//! triangle is computed (rows in parallel) and mirrored, which makes the
//! matrix exactly symmetric.

use crate::vectorizer::{FeatureSet, FeatureVector};
use data_loader::RowId;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Cosine similarity of two sparse vectors; 0 when either has zero norm.
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let na = a.norm();
    let nb = b.norm();
    if na > 0.0 && nb > 0.0 {
        a.dot(b) / (na * nb)
    } else {
        0.0
    }
}

/// Square similarity matrix indexed by "local" positions (the order of the
/// feature set), with a mapping back to catalog rows.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    rows: Vec<RowId>,
    local_index: HashMap<RowId, usize>,
    /// Row-major `n * n` scores; diagonal entries are never read
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Score every pair of vectors in `features`.
    #[instrument(skip_all, fields(movies = features.len()))]
    pub fn build(features: &FeatureSet) -> Self {
        let n = features.len();
        let vectors = &features.vectors;

        let upper: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                (i + 1..n)
                    .map(|j| cosine_similarity(&vectors[i], &vectors[j]))
                    .collect()
            })
            .collect();

        let mut scores = vec![f64::NAN; n * n];
        for (i, row) in upper.into_iter().enumerate() {
            for (offset, score) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                scores[i * n + j] = score;
                scores[j * n + i] = score;
            }
        }

        debug!("Built {}x{} similarity matrix", n, n);

        Self {
            rows: features.rows.clone(),
            local_index: features
                .rows
                .iter()
                .enumerate()
                .map(|(local, &row)| (row, local))
                .collect(),
            scores,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Catalog rows in local order
    pub fn rows(&self) -> &[RowId] {
        &self.rows
    }

    pub fn row_at(&self, local: usize) -> RowId {
        self.rows[local]
    }

    pub fn local_index(&self, row: RowId) -> Option<usize> {
        self.local_index.get(&row).copied()
    }

    /// Score between two local positions; `None` on the diagonal or out of range.
    pub fn get(&self, a: usize, b: usize) -> Option<f64> {
        let n = self.len();
        if a == b || a >= n || b >= n {
            return None;
        }
        Some(self.scores[a * n + b])
    }

    /// Score between two catalog rows, if both have vectors.
    pub fn between(&self, row_a: RowId, row_b: RowId) -> Option<f64> {
        self.get(self.local_index(row_a)?, self.local_index(row_b)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::KeywordVectorizer;
    use data_loader::{MovieRecord, split_tags};

    fn features(keywords: &[&str]) -> FeatureSet {
        let movies: Vec<MovieRecord> = keywords
            .iter()
            .enumerate()
            .map(|(position, k)| MovieRecord {
                position,
                title: format!("M{position}"),
                keywords: Some(split_tags(k)),
                release_date: None,
                popularity: None,
            })
            .collect();
        KeywordVectorizer::new().fit_transform(&movies)
    }

    #[test]
    fn test_identical_keywords_score_one() {
        let matrix = SimilarityMatrix::build(&features(&["action, hero", "action, hero", "romance"]));
        assert!((matrix.get(0, 1).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(matrix.get(0, 2), Some(0.0));
        assert_eq!(matrix.get(1, 2), Some(0.0));
    }

    #[test]
    fn test_symmetric_and_bounded() {
        let matrix = SimilarityMatrix::build(&features(&[
            "action, hero, city",
            "hero, drama",
            "city, noir, drama",
            "family",
        ]));
        for a in 0..matrix.len() {
            for b in 0..matrix.len() {
                if a == b {
                    assert_eq!(matrix.get(a, b), None);
                    continue;
                }
                let s = matrix.get(a, b).unwrap();
                assert_eq!(s.to_bits(), matrix.get(b, a).unwrap().to_bits());
                assert!((0.0..=1.0 + 1e-12).contains(&s));
            }
        }
    }

    #[test]
    fn test_lookup_by_catalog_row() {
        let matrix = SimilarityMatrix::build(&features(&["a1, b1", "a1"]));
        assert_eq!(matrix.rows(), &[0, 1]);
        assert_eq!(matrix.between(0, 1), matrix.get(0, 1));
        assert_eq!(matrix.between(0, 7), None);
    }

    #[test]
    fn test_empty_features() {
        let matrix = SimilarityMatrix::build(&FeatureSet::default());
        assert!(matrix.is_empty());
        assert_eq!(matrix.get(0, 1), None);
    }

    #[test]
    fn test_cosine_zero_norm() {
        let empty = FeatureVector::default();
        let other = FeatureVector::from_entries(vec![(0, 1.0)]);
        assert_eq!(cosine_similarity(&empty, &other), 0.0);
    }
}

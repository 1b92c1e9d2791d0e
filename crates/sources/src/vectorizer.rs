//! Keyword Vectorizer - TF-IDF over keyword n-grams
//!
//! Turns each movie's keyword tags into a sparse, L2-normalized TF-IDF
//! vector over unigrams and bigrams.
//!
//! ## Algorithm
//! 1. Normalize tags into a keyword blob: trim each tag, drop empty tags,
//!    join with single spaces
//! 2. Lowercase and split the blob on whitespace, then emit every n-gram
//!    (n = 1..=max_ngram) over the token sequence
//! 3. Count document frequencies and build a lexicographically ordered
//!    vocabulary from the current batch only
//! 4. Weight raw term counts by smoothed IDF:
//!    `idf(t) = ln((1 + n) / (1 + df(t))) + 1`
//! 5. L2-normalize each vector
//!
//! Movies without keywords get no vector and take no part in similarity.
//! Because the vocabulary is rebuilt every run, scores shift as the catalog
//! grows.

use data_loader::{MovieRecord, RowId};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// Index of a term in the batch vocabulary
pub type TermId = usize;

/// Sparse feature vector with entries sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(TermId, f64)>,
}

impl FeatureVector {
    /// Build from unsorted entries; zero weights are dropped.
    pub fn from_entries(mut entries: Vec<(TermId, f64)>) -> Self {
        entries.retain(|&(_, w)| w != 0.0);
        entries.sort_by_key(|&(term, _)| term);
        Self { entries }
    }

    pub fn entries(&self) -> &[(TermId, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Sparse dot product (merge over the sorted term ids).
    pub fn dot(&self, other: &FeatureVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ta, wa) = self.entries[i];
            let (tb, wb) = other.entries[j];
            if ta == tb {
                sum += wa * wb;
                i += 1;
                j += 1;
            } else if ta < tb {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for entry in &mut self.entries {
                entry.1 /= norm;
            }
        }
    }
}

/// Vectors for every keyworded movie, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    /// Terms in vocabulary order (`vocabulary[term_id]`)
    pub vocabulary: Vec<String>,
    /// Catalog row of each vector
    pub rows: Vec<RowId>,
    pub vectors: Vec<FeatureVector>,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector of a catalog row, if that movie has keywords
    pub fn get(&self, row: RowId) -> Option<&FeatureVector> {
        let local = self.rows.binary_search(&row).ok()?;
        self.vectors.get(local)
    }
}

/// TF-IDF vectorizer for keyword tags
#[derive(Debug, Clone)]
pub struct KeywordVectorizer {
    /// Largest n-gram size (default: 2)
    max_ngram: usize,
    /// Lowercase tokens before counting (default: true)
    lowercase: bool,
}

impl KeywordVectorizer {
    pub fn new() -> Self {
        Self {
            max_ngram: 2,
            lowercase: true,
        }
    }

    /// Configure the largest n-gram size (default: 2)
    pub fn with_max_ngram(mut self, max_ngram: usize) -> Self {
        self.max_ngram = max_ngram.max(1);
        self
    }

    /// Configure lowercasing (default: true)
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Normalized keyword blob, or `None` if no tag survives trimming.
    ///
    /// Example: [" action", "", "super hero "] -> Some("action super hero")
    pub fn keyword_blob(tags: &[String]) -> Option<String> {
        let parts: Vec<&str> = tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// All n-grams of the blob, unigrams first.
    pub fn terms(&self, blob: &str) -> Vec<String> {
        let tokens: Vec<String> = blob
            .split_whitespace()
            .map(|t| {
                if self.lowercase {
                    t.to_lowercase()
                } else {
                    t.to_string()
                }
            })
            .collect();

        let mut terms = Vec::new();
        for n in 1..=self.max_ngram {
            if tokens.len() < n {
                break;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Fit the vocabulary on `movies` and return their vectors.
    #[instrument(skip_all, fields(movies = movies.len()))]
    pub fn fit_transform(&self, movies: &[MovieRecord]) -> FeatureSet {
        // Terms of every movie that has a usable keyword blob
        let docs: Vec<(RowId, Vec<String>)> = movies
            .iter()
            .filter_map(|movie| {
                let blob = Self::keyword_blob(movie.keywords.as_deref()?)?;
                let terms = self.terms(&blob);
                (!terms.is_empty()).then_some((movie.position, terms))
            })
            .collect();

        if docs.is_empty() {
            debug!("No movie has keywords, nothing to vectorize");
            return FeatureSet::default();
        }

        // Document frequency per term; BTreeMap keeps the vocabulary sorted
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for (_, terms) in &docs {
            let mut seen: Vec<&str> = terms.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n_docs = docs.len() as f64;
        let term_ids: HashMap<&str, TermId> = doc_freq
            .keys()
            .enumerate()
            .map(|(id, term)| (*term, id))
            .collect();
        let idf: Vec<f64> = doc_freq
            .values()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let mut rows = Vec::with_capacity(docs.len());
        let mut vectors = Vec::with_capacity(docs.len());
        for (row, terms) in &docs {
            let mut counts: HashMap<TermId, usize> = HashMap::new();
            for term in terms {
                *counts.entry(term_ids[term.as_str()]).or_insert(0) += 1;
            }
            let mut vector = FeatureVector::from_entries(
                counts
                    .into_iter()
                    .map(|(term, count)| (term, count as f64 * idf[term]))
                    .collect(),
            );
            vector.normalize();
            rows.push(*row);
            vectors.push(vector);
        }

        debug!(
            "Vectorized {} movies over {} terms",
            vectors.len(),
            doc_freq.len()
        );

        FeatureSet {
            vocabulary: doc_freq.keys().map(|t| t.to_string()).collect(),
            rows,
            vectors,
        }
    }
}

impl Default for KeywordVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

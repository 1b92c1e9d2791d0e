//! # Enrichment Orchestrator
//!
//! This module coordinates one enrichment run over a catalog file:
//! 1. Load the catalog
//! 2. Compute similar titles and competitor titles in parallel
//! 3. Score attractiveness (only when a model is injected)
//! 4. Write the output columns into the table
//! 5. Overwrite the source file
//!
//! Both stages read the same immutable snapshot (`Arc<Catalog>`) and produce
//! disjoint columns, so no locking is involved. Nothing is written unless
//! every stage succeeds.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, info, instrument};

use data_loader::{Catalog, ColumnNames};
use pipeline::{AttractivenessModel, FeatureColumns, FeatureEngineer, format_score, score_catalog};
use sources::{CompetitorSource, SimilarTitlesSource};

#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("{stage} task did not complete")]
    TaskFailed {
        stage: &'static str,
        #[source]
        source: JoinError,
    },
}

// ============================================================================
// Configuration
// ============================================================================

/// Knobs of an enrichment run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Similar titles kept per movie
    pub top_k: usize,
    /// Half-width of the competitor window in days
    pub window_days: u64,
    /// Competitors kept per movie
    pub max_competitors: usize,
    pub columns: ColumnNames,
    pub feature_columns: FeatureColumns,
}

impl EnrichmentConfig {
    pub fn new() -> Self {
        Self {
            top_k: 5,
            window_days: 7,
            max_competitors: 5,
            columns: ColumnNames::standard(),
            feature_columns: FeatureColumns::standard(),
        }
    }

    /// Headers of the scraped Naver catalog for every column
    pub fn naver() -> Self {
        Self::new()
            .with_columns(ColumnNames::naver())
            .with_feature_columns(FeatureColumns::naver())
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_window_days(mut self, days: u64) -> Self {
        self.window_days = days;
        self
    }

    pub fn with_max_competitors(mut self, max: usize) -> Self {
        self.max_competitors = max;
        self
    }

    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_feature_columns(mut self, columns: FeatureColumns) -> Self {
        self.feature_columns = columns;
        self
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Results
// ============================================================================

/// Output columns of one run, aligned to catalog row order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentColumns {
    pub similar_titles: Vec<String>,
    pub competitor_titles: Vec<String>,
    /// Present only when a model was injected
    pub predicted_attractiveness: Option<Vec<String>>,
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct EnrichmentReport {
    pub path: PathBuf,
    pub movies: usize,
    pub with_similar: usize,
    pub with_competitors: usize,
    pub scored: bool,
    pub elapsed: Duration,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Main orchestrator that fills the recommendation columns
#[derive(Clone)]
pub struct EnrichmentOrchestrator {
    config: EnrichmentConfig,
    similar: SimilarTitlesSource,
    competitors: CompetitorSource,
    feature_engineer: FeatureEngineer,
    model: Option<Arc<dyn AttractivenessModel>>,
}

impl EnrichmentOrchestrator {
    pub fn new(config: EnrichmentConfig) -> Self {
        let similar = SimilarTitlesSource::new().with_top_k(config.top_k);
        let competitors = CompetitorSource::new()
            .with_window_days(config.window_days)
            .with_max_competitors(config.max_competitors);
        let feature_engineer = FeatureEngineer::new(config.feature_columns.clone());
        Self {
            config,
            similar,
            competitors,
            feature_engineer,
            model: None,
        }
    }

    /// Also score every movie with `model`
    pub fn with_model(mut self, model: Arc<dyn AttractivenessModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Main entry point: enrich the catalog at `path` and overwrite it
    #[instrument(skip(self))]
    pub async fn run(&self, path: &Path) -> Result<EnrichmentReport> {
        let start_time = Instant::now();

        let catalog = self.load(path).await?;
        let movies = catalog.len();
        let catalog = Arc::new(catalog);

        let columns = self.enrich(catalog.clone()).await?;
        let with_similar = columns.similar_titles.iter().filter(|s| !s.is_empty()).count();
        let with_competitors = columns
            .competitor_titles
            .iter()
            .filter(|s| !s.is_empty())
            .count();
        let scored = columns.predicted_attractiveness.is_some();

        // Both stage tasks have finished, so the snapshot is normally unshared
        let mut catalog = Arc::try_unwrap(catalog).unwrap_or_else(|shared| (*shared).clone());
        self.apply(&mut catalog, columns)?;
        self.write(catalog, path).await?;

        let report = EnrichmentReport {
            path: path.to_path_buf(),
            movies,
            with_similar,
            with_competitors,
            scored,
            elapsed: start_time.elapsed(),
        };
        info!(
            "Enriched {:?}: {} movies, {} with similar titles, {} with competitors in {:.2?}",
            report.path, report.movies, report.with_similar, report.with_competitors, report.elapsed
        );
        Ok(report)
    }

    /// Load the catalog with the configured column names
    pub async fn load(&self, path: &Path) -> Result<Catalog> {
        let columns = self.config.columns.clone();
        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || Catalog::load_from_file(&owned, columns))
            .await
            .map_err(|source| EnrichmentError::TaskFailed {
                stage: "Load",
                source,
            })?
            .with_context(|| format!("Failed to load catalog from {:?}", path))
    }

    /// Compute every output column from one catalog snapshot
    pub async fn enrich(&self, catalog: Arc<Catalog>) -> Result<EnrichmentColumns> {
        // Use tokio::join! to run both stages in parallel
        let (similar_result, competitor_result) = tokio::join!(
            tokio::task::spawn_blocking({
                let similar = self.similar.clone();
                let catalog = catalog.clone();
                move || similar.similar_titles(&catalog)
            }),
            tokio::task::spawn_blocking({
                let competitors = self.competitors.clone();
                let catalog = catalog.clone();
                move || competitors.competitor_titles(&catalog)
            })
        );

        let similar_titles = similar_result.map_err(|source| EnrichmentError::TaskFailed {
            stage: "Similar titles",
            source,
        })?;
        let competitor_titles = competitor_result.map_err(|source| EnrichmentError::TaskFailed {
            stage: "Competitor titles",
            source,
        })?;
        debug!(
            "Computed {} similar-title cells and {} competitor cells",
            similar_titles.len(),
            competitor_titles.len()
        );

        let predicted_attractiveness = match &self.model {
            Some(model) => Some(self.score(catalog, model.clone()).await?),
            None => None,
        };

        Ok(EnrichmentColumns {
            similar_titles,
            competitor_titles,
            predicted_attractiveness,
        })
    }

    /// Score every movie with the injected model
    async fn score(
        &self,
        catalog: Arc<Catalog>,
        model: Arc<dyn AttractivenessModel>,
    ) -> Result<Vec<String>> {
        let engineer = self.feature_engineer.clone();
        let scores = tokio::task::spawn_blocking(move || {
            score_catalog(&engineer, &catalog, model.as_ref())
        })
        .await
        .map_err(|source| EnrichmentError::TaskFailed {
            stage: "Scoring",
            source,
        })?
        .context("Failed to score attractiveness")?;

        info!("Scored {} movies", scores.len());
        Ok(scores.into_iter().map(format_score).collect())
    }

    /// Write the output columns into the catalog.
    ///
    /// Existing output columns are overwritten in place; new ones are appended.
    pub fn apply(&self, catalog: &mut Catalog, columns: EnrichmentColumns) -> Result<()> {
        let names = &self.config.columns;
        catalog
            .set_column(&names.similar_titles, columns.similar_titles)
            .context("Failed to write similar titles")?;
        catalog
            .set_column(&names.competitor_titles, columns.competitor_titles)
            .context("Failed to write competitor titles")?;
        if let Some(scores) = columns.predicted_attractiveness {
            catalog
                .set_column(&names.predicted_attractiveness, scores)
                .context("Failed to write predicted attractiveness")?;
        }
        Ok(())
    }

    async fn write(&self, catalog: Catalog, path: &Path) -> Result<()> {
        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || catalog.write_to_file(&owned))
            .await
            .map_err(|source| EnrichmentError::TaskFailed {
                stage: "Write",
                source,
            })?
            .with_context(|| format!("Failed to write catalog to {:?}", path))
    }
}

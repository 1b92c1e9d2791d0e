//! Attractiveness scoring through an injected model.
//!
//! The model itself lives outside this workspace; callers hand in anything
//! implementing [`AttractivenessModel`].

use crate::features::{FeatureEngineer, FeatureRow};
use data_loader::Catalog;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Model {model} failed: {source}")]
    ModelFailure {
        model: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Model {model} returned {found} scores for {expected} rows")]
    InvalidResponse {
        model: String,
        expected: usize,
        found: usize,
    },
}

/// A trained attractiveness predictor.
pub trait AttractivenessModel: Send + Sync {
    /// Returns the name of this model (for logging/debugging)
    fn name(&self) -> &str;

    /// Predict one score per feature row, in the same order.
    fn predict(&self, rows: &[FeatureRow]) -> anyhow::Result<Vec<f64>>;
}

/// Score every catalog row.
///
/// Fails when the model errors or does not return exactly one score per row.
#[instrument(skip(engineer, catalog, model), fields(model = model.name()))]
pub fn score_catalog(
    engineer: &FeatureEngineer,
    catalog: &Catalog,
    model: &dyn AttractivenessModel,
) -> Result<Vec<f64>, ScoringError> {
    let features = engineer.compute_features(catalog);
    debug!("Computed {} feature rows", features.len());

    let scores = model
        .predict(&features)
        .map_err(|source| ScoringError::ModelFailure {
            model: model.name().to_string(),
            source,
        })?;

    if scores.len() != features.len() {
        return Err(ScoringError::InvalidResponse {
            model: model.name().to_string(),
            expected: features.len(),
            found: scores.len(),
        });
    }
    Ok(scores)
}

/// Render a score for the output column: at most four decimals, trailing
/// zeros dropped, non-finite scores left empty.
///
/// Example: 1234.5 -> "1234.5", 0.123456 -> "0.1235", 3.0 -> "3"
pub fn format_score(score: f64) -> String {
    if !score.is_finite() {
        return String::new();
    }
    let fixed = format!("{:.4}", score);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{ColumnNames, RawTable};

    struct ConstantModel {
        score: f64,
        extra: usize,
    }

    impl AttractivenessModel for ConstantModel {
        fn name(&self) -> &str {
            "constant"
        }

        fn predict(&self, rows: &[FeatureRow]) -> anyhow::Result<Vec<f64>> {
            Ok(vec![self.score; rows.len() + self.extra])
        }
    }

    struct FailingModel;

    impl AttractivenessModel for FailingModel {
        fn name(&self) -> &str {
            "failing"
        }

        fn predict(&self, _rows: &[FeatureRow]) -> anyhow::Result<Vec<f64>> {
            anyhow::bail!("model file unreadable")
        }
    }

    fn create_test_catalog() -> Catalog {
        let raw = RawTable {
            headers: vec![
                "title".to_string(),
                "keywords".to_string(),
                "releaseDate".to_string(),
            ],
            rows: vec![
                vec!["A".into(), "x".into(), "20240101".into()],
                vec!["B".into(), "y".into(), "20240102".into()],
            ],
            has_bom: false,
        };
        Catalog::from_table(raw, ColumnNames::standard()).unwrap()
    }

    #[test]
    fn test_score_catalog() {
        let catalog = create_test_catalog();
        let model = ConstantModel { score: 42.0, extra: 0 };
        let scores = score_catalog(&FeatureEngineer::default(), &catalog, &model).unwrap();
        assert_eq!(scores, vec![42.0, 42.0]);
    }

    #[test]
    fn test_score_count_mismatch() {
        let catalog = create_test_catalog();
        let model = ConstantModel { score: 1.0, extra: 1 };
        let err = score_catalog(&FeatureEngineer::default(), &catalog, &model).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::InvalidResponse {
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_model_failure() {
        let catalog = create_test_catalog();
        let err = score_catalog(&FeatureEngineer::default(), &catalog, &FailingModel).unwrap_err();
        assert!(matches!(err, ScoringError::ModelFailure { .. }));
        assert!(err.to_string().contains("failing"));
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(1234.5), "1234.5");
        assert_eq!(format_score(0.123456), "0.1235");
        assert_eq!(format_score(3.0), "3");
        assert_eq!(format_score(0.0), "0");
        assert_eq!(format_score(-0.00001), "0");
        assert_eq!(format_score(f64::NAN), "");
    }
}

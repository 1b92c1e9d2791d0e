//! Feature engineering for attractiveness scoring.
//!
//! This module turns every catalog row into a flat [`FeatureRow`] that an
//! [`crate::scoring::AttractivenessModel`] consumes.

use chrono::Datelike;
use data_loader::{Catalog, RowId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Header names of the columns only the feature engineer reads.
///
/// Genre, country, keywords and release date come from the catalog's
/// [`data_loader::ColumnNames`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureColumns {
    pub director: String,
    pub production: String,
    pub audience_rating: String,
    pub netizen_rating: String,
    pub interest: String,
    pub audience_count: String,
}

impl FeatureColumns {
    pub fn standard() -> Self {
        Self {
            director: "director".to_string(),
            production: "production".to_string(),
            audience_rating: "audienceRating".to_string(),
            netizen_rating: "netizenRating".to_string(),
            interest: "interest".to_string(),
            audience_count: "audienceCount".to_string(),
        }
    }

    /// Headers of the scraped Naver catalog
    pub fn naver() -> Self {
        Self {
            director: "감독".to_string(),
            production: "제작사".to_string(),
            audience_rating: "실관람객 평점".to_string(),
            netizen_rating: "네티즌 평점".to_string(),
            interest: "네이버 관심도(찜)".to_string(),
            audience_count: "누적 관객수".to_string(),
        }
    }
}

impl Default for FeatureColumns {
    fn default() -> Self {
        Self::standard()
    }
}

/// Features computed for each catalog row.
///
/// Text features are empty and numeric features are zero when the source
/// cell is missing or unparseable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub row: RowId,

    // Categorical
    pub genre: String,
    pub director: String,
    pub production: String,
    pub country: String,

    // Audience signals
    pub audience_rating: f64,
    pub netizen_rating: f64,
    pub interest: f64,
    pub audience_count: u64,

    // First three keyword tags
    pub tone: String,
    pub era: String,
    pub theme: String,

    // Release
    pub release_year: i32,
    pub release_month: u32,
}

/// Computes feature rows for the whole catalog in parallel.
#[derive(Debug, Clone, Default)]
pub struct FeatureEngineer {
    columns: FeatureColumns,
}

impl FeatureEngineer {
    pub fn new(columns: FeatureColumns) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &FeatureColumns {
        &self.columns
    }

    /// Compute one feature row per catalog row, in catalog order.
    pub fn compute_features(&self, catalog: &Catalog) -> Vec<FeatureRow> {
        (0..catalog.len())
            .into_par_iter()
            .map(|row| self.compute_single(catalog, row))
            .collect()
    }

    fn compute_single(&self, catalog: &Catalog, row: RowId) -> FeatureRow {
        let names = catalog.columns();
        let first_tag = |column: &str| -> String {
            catalog
                .field(row, column)
                .and_then(|cell| cell.split(',').next())
                .map(|tag| tag.trim().to_string())
                .unwrap_or_default()
        };
        let number = |column: &str| -> f64 {
            catalog.field(row, column).map(parse_number).unwrap_or(0.0)
        };

        // Positional: ",retro,revenge" has no tone but keeps its era and theme
        let mut keyword_slots = catalog
            .field(row, &names.keywords)
            .map(|cell| {
                cell.split(',')
                    .map(|tag| tag.trim().to_string())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
            .into_iter();

        let release_date = catalog.get_movie(row).and_then(|movie| movie.release_date);

        FeatureRow {
            row,
            genre: first_tag(&names.genre),
            director: catalog
                .field(row, &self.columns.director)
                .map(|cell| cell.trim().to_string())
                .unwrap_or_default(),
            production: first_tag(&self.columns.production),
            country: first_tag(&names.country),
            audience_rating: number(&self.columns.audience_rating),
            netizen_rating: number(&self.columns.netizen_rating),
            interest: number(&self.columns.interest),
            audience_count: catalog
                .field(row, &self.columns.audience_count)
                .map(parse_audience_count)
                .unwrap_or(0),
            tone: keyword_slots.next().unwrap_or_default(),
            era: keyword_slots.next().unwrap_or_default(),
            theme: keyword_slots.next().unwrap_or_default(),
            release_year: release_date.map(|date| date.year()).unwrap_or(0),
            release_month: release_date.map(|date| date.month()).unwrap_or(0),
        }
    }
}

/// Parse a plain number that may carry thousands separators; otherwise 0.
fn parse_number(cell: &str) -> f64 {
    let cleaned: String = cell.chars().filter(|c| *c != ',').collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

const MAN: f64 = 10_000.0;
const EOK: f64 = 100_000_000.0;

/// Parse a cumulative audience count.
///
/// Understands thousands separators, the Korean units `만` (10 000) and
/// `억` (100 000 000) alone or combined, and plain integers. A trailing
/// `명` is ignored. Anything else is 0.
///
/// Example: "1억 2,345만" -> 123_450_000, "12.5만" -> 125_000, "8,421" -> 8_421
pub fn parse_audience_count(cell: &str) -> u64 {
    let cleaned: String = cell
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    let cleaned = cleaned.trim_end_matches('명');
    if cleaned.is_empty() {
        return 0;
    }

    let mut total = 0.0;
    let mut rest = cleaned;
    for (unit, scale) in [('억', EOK), ('만', MAN)] {
        if let Some((amount, tail)) = rest.split_once(unit) {
            match parse_amount(amount) {
                Some(value) => total += value * scale,
                None => return 0,
            }
            rest = tail;
        }
    }
    if !rest.is_empty() {
        match parse_amount(rest) {
            Some(value) => total += value,
            None => return 0,
        }
    }
    total as u64
}

fn parse_amount(s: &str) -> Option<f64> {
    s.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{ColumnNames, RawTable};

    fn create_test_catalog() -> Catalog {
        let headers = [
            "영화명",
            "Gemini 키워드",
            "개봉일",
            "장르",
            "국가",
            "감독",
            "제작사",
            "실관람객 평점",
            "네티즌 평점",
            "네이버 관심도(찜)",
            "누적 관객수",
        ];
        let rows = vec![
            vec![
                "기생충",
                "dark, modern, class",
                "20190530",
                "드라마, 스릴러",
                "한국",
                "봉준호",
                "바른손이앤에이, CJ",
                "9.1",
                "8.5",
                "1,234",
                "1,031만",
            ],
            vec!["빈 영화", "", "2019", "", "", "", "", "N/A", "", "", "N/A"],
        ];
        let raw = RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(str::to_string).collect())
                .collect(),
            has_bom: false,
        };
        Catalog::from_table(raw, ColumnNames::naver()).unwrap()
    }

    #[test]
    fn test_feature_computation() {
        let catalog = create_test_catalog();
        let engineer = FeatureEngineer::new(FeatureColumns::naver());

        let features = engineer.compute_features(&catalog);
        assert_eq!(features.len(), 2);

        let first = &features[0];
        assert_eq!(first.row, 0);
        assert_eq!(first.genre, "드라마");
        assert_eq!(first.director, "봉준호");
        assert_eq!(first.production, "바른손이앤에이");
        assert_eq!(first.country, "한국");
        assert_eq!(first.audience_rating, 9.1);
        assert_eq!(first.netizen_rating, 8.5);
        assert_eq!(first.interest, 1234.0);
        assert_eq!(first.audience_count, 10_310_000);
        assert_eq!(
            (first.tone.as_str(), first.era.as_str(), first.theme.as_str()),
            ("dark", "modern", "class")
        );
        assert_eq!((first.release_year, first.release_month), (2019, 5));
    }

    #[test]
    fn test_missing_cells_default() {
        let catalog = create_test_catalog();
        let engineer = FeatureEngineer::new(FeatureColumns::naver());

        let empty = &engineer.compute_features(&catalog)[1];
        assert_eq!(empty.genre, "");
        assert_eq!(empty.director, "");
        assert_eq!(empty.audience_rating, 0.0);
        assert_eq!(empty.audience_count, 0);
        assert_eq!(empty.tone, "");
        assert_eq!((empty.release_year, empty.release_month), (0, 0));
    }

    #[test]
    fn test_absent_feature_columns() {
        // Standard feature headers do not exist in the Naver table
        let catalog = create_test_catalog();
        let engineer = FeatureEngineer::default();

        let first = &engineer.compute_features(&catalog)[0];
        assert_eq!(first.genre, "드라마");
        assert_eq!(first.director, "");
        assert_eq!(first.interest, 0.0);
    }

    #[test]
    fn test_parse_audience_count() {
        assert_eq!(parse_audience_count("1,031만"), 10_310_000);
        assert_eq!(parse_audience_count("12.5만"), 125_000);
        assert_eq!(parse_audience_count("1억 2,345만"), 123_450_000);
        assert_eq!(parse_audience_count("2억"), 200_000_000);
        assert_eq!(parse_audience_count("8,421"), 8_421);
        assert_eq!(parse_audience_count("8,421명"), 8_421);
        assert_eq!(parse_audience_count("3만 5000"), 35_000);
    }

    #[test]
    fn test_parse_audience_count_malformed() {
        assert_eq!(parse_audience_count(""), 0);
        assert_eq!(parse_audience_count("N/A"), 0);
        assert_eq!(parse_audience_count("만"), 0);
        assert_eq!(parse_audience_count("약 10만"), 0);
        assert_eq!(parse_audience_count("-5"), 0);
    }
}

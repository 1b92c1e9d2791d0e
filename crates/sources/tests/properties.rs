//! Property checks for the similar-title and competitor sources over a
//! mid-sized synthetic catalog.

use chrono::Days;
use data_loader::{Catalog, ColumnNames, RawTable, RowId};
use sources::{CompetitorSource, SimilarTitlesSource, TITLE_SEPARATOR};

const TAGS: &[&str] = &[
    "action", "hero", "romance", "city", "noir", "family", "space", "war", "heist", "comedy",
];

fn synthetic_catalog(size: usize) -> Catalog {
    let rows = (0..size)
        .map(|i| {
            // Every 7th movie has no keywords, every 9th a malformed date
            let keywords = if i % 7 == 3 {
                String::new()
            } else {
                let picks = [i % TAGS.len(), (i * 3 + 1) % TAGS.len(), (i / 2) % TAGS.len()];
                picks.iter().map(|&t| TAGS[t]).collect::<Vec<_>>().join(", ")
            };
            let date = if i % 9 == 4 {
                "2024-13-01".to_string()
            } else {
                format!("202401{:02}", 1 + (i * 5) % 28)
            };
            let popularity = if i % 5 == 0 {
                "n/a".to_string()
            } else {
                ((i * 37) % 11).to_string()
            };
            // A few duplicate titles on purpose
            let title = format!("Movie {}", if i % 13 == 12 { i - 1 } else { i });
            vec![title, keywords, date, popularity]
        })
        .collect();

    let raw = RawTable {
        headers: vec![
            "title".to_string(),
            "keywords".to_string(),
            "releaseDate".to_string(),
            "popularity".to_string(),
        ],
        rows,
        has_bom: false,
    };
    Catalog::from_table(raw, ColumnNames::standard()).unwrap()
}

fn split(cell: &str) -> Vec<&str> {
    if cell.is_empty() {
        Vec::new()
    } else {
        cell.split(TITLE_SEPARATOR).collect()
    }
}

#[test]
fn similarity_is_symmetric() {
    let catalog = synthetic_catalog(60);
    let matrix = SimilarTitlesSource::new().build_matrix(&catalog);
    for a in 0..matrix.len() {
        for b in 0..matrix.len() {
            assert_eq!(matrix.get(a, b), matrix.get(b, a));
        }
    }
}

#[test]
fn similar_lists_follow_the_ranking_prefix() {
    let catalog = synthetic_catalog(60);
    let source = SimilarTitlesSource::new();
    let matrix = source.build_matrix(&catalog);
    let similar = source.similar_titles(&catalog);

    assert_eq!(similar.len(), catalog.len());
    for local in 0..matrix.len() {
        let row = matrix.row_at(local);
        let ranking = source.rank_candidates(&catalog, &matrix, local);
        assert!(ranking.iter().all(|c| c.row != row));

        let expected: Vec<&str> = ranking
            .iter()
            .take(source.top_k())
            .map(|c| catalog.get_movie(c.row).unwrap().title.as_str())
            .collect();
        let actual = split(&similar[row]);
        assert!(actual.len() <= source.top_k());
        assert_eq!(actual, expected);

        for pair in ranking.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }
}

#[test]
fn movies_without_keywords_have_no_similar_titles() {
    let catalog = synthetic_catalog(60);
    let similar = SimilarTitlesSource::new().similar_titles(&catalog);
    for movie in catalog.movies() {
        if !movie.has_keywords() {
            assert_eq!(similar[movie.position], "");
        }
    }
}

#[test]
fn competitor_lists_respect_window_title_and_order() {
    let catalog = synthetic_catalog(60);
    let source = CompetitorSource::new();
    let competitors = source.competitor_titles(&catalog);

    for movie in catalog.movies() {
        let rows: Vec<RowId> = source.competitors_for(&catalog, movie.position);
        let Some(date) = movie.release_date else {
            assert_eq!(competitors[movie.position], "");
            assert!(rows.is_empty());
            continue;
        };
        assert!(rows.len() <= 5);

        let start = date.checked_sub_days(Days::new(7)).unwrap();
        let end = date.checked_add_days(Days::new(7)).unwrap();
        let mut previous = None;
        for row in &rows {
            let other = catalog.get_movie(*row).unwrap();
            let other_date = other.release_date.unwrap();
            assert!(start <= other_date && other_date <= end);
            assert_ne!(other.title, movie.title);
            if let Some(prev) = previous {
                assert!(prev <= other_date);
            }
            previous = Some(other_date);
        }
        assert_eq!(split(&competitors[movie.position]).len(), rows.len());
    }
}

#[test]
fn recomputation_is_idempotent() {
    let catalog = synthetic_catalog(80);
    let similar = SimilarTitlesSource::new();
    let competitors = CompetitorSource::new();

    assert_eq!(similar.similar_titles(&catalog), similar.similar_titles(&catalog));
    assert_eq!(
        competitors.competitor_titles(&catalog),
        competitors.competitor_titles(&catalog)
    );
}

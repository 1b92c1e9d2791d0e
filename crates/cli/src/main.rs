use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{Catalog, RowId};
use enrichment::{EnrichmentColumns, EnrichmentConfig, EnrichmentOrchestrator};
use pipeline::{top_by_popularity, FacetOptions, SearchRequest};
use sources::TITLE_SEPARATOR;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Movie Enricher - similar titles and release competitors for a movie catalog
#[derive(Parser)]
#[command(name = "movie-enricher")]
#[command(about = "Fill similar-title and competitor columns of a movie catalog CSV", long_about = None)]
struct Cli {
    /// Path to the catalog CSV file
    #[arg(short, long, default_value = "data/movies.csv")]
    catalog: PathBuf,

    /// Header naming scheme of the catalog
    #[arg(long, value_enum, default_value_t = HeaderPreset::Standard)]
    headers: HeaderPreset,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HeaderPreset {
    /// title, keywords, releaseDate, popularity, ...
    Standard,
    /// Headers written by the Naver scraper (영화명, Gemini 키워드, 개봉일, ...)
    Naver,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the recommendation columns and overwrite the catalog file
    Enrich {
        /// Similar titles kept per movie
        #[arg(long, default_value = "5")]
        top_k: usize,

        /// Competitor window half-width in days
        #[arg(long, default_value = "7")]
        window_days: u64,

        /// Competitors kept per movie
        #[arg(long, default_value = "5")]
        max_competitors: usize,
    },

    /// Search the catalog
    Search {
        /// Case-insensitive substring of the title
        #[arg(long, default_value = "")]
        query: String,

        /// Genre to match (repeatable)
        #[arg(long)]
        genre: Vec<String>,

        /// Release year to match (repeatable)
        #[arg(long)]
        year: Vec<String>,

        /// Country to match (repeatable)
        #[arg(long)]
        country: Vec<String>,

        /// Keyword to match (repeatable)
        #[arg(long)]
        keyword: Vec<String>,

        /// Number of results (1-30)
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Show one movie with its similar titles and competitors
    Show {
        /// Exact title of the movie
        #[arg(long)]
        title: String,
    },

    /// List the values the search filters accept
    Facets,

    /// Show the most popular movies
    Top {
        /// Number of movies to show
        #[arg(long, default_value_t = pipeline::popular::DEFAULT_TOP_N)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let base_config = match cli.headers {
        HeaderPreset::Standard => EnrichmentConfig::new(),
        HeaderPreset::Naver => EnrichmentConfig::naver(),
    };
    debug!("Using column names {:?}", base_config.columns);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Enrich {
            top_k,
            window_days,
            max_competitors,
        } => {
            let config = base_config
                .with_top_k(top_k)
                .with_window_days(window_days)
                .with_max_competitors(max_competitors);
            handle_enrich(config, cli.catalog).await?
        }
        Commands::Search {
            query,
            genre,
            year,
            country,
            keyword,
            limit,
        } => {
            let request = SearchRequest::new()
                .with_query(query)
                .with_genres(genre)
                .with_years(year)
                .with_countries(country)
                .with_keywords(keyword)
                .with_limit(limit);
            handle_search(base_config, cli.catalog, request).await?
        }
        Commands::Show { title } => handle_show(base_config, cli.catalog, title).await?,
        Commands::Facets => handle_facets(base_config, cli.catalog).await?,
        Commands::Top { limit } => handle_top(base_config, cli.catalog, limit).await?,
    }

    Ok(())
}

/// Handle the 'enrich' command
async fn handle_enrich(config: EnrichmentConfig, path: PathBuf) -> Result<()> {
    println!("Enriching {}...", path.display());
    let orchestrator = EnrichmentOrchestrator::new(config);
    let report = orchestrator.run(&path).await?;

    println!(
        "{} Wrote {} movies in {:?}",
        "✓".green(),
        report.movies,
        report.elapsed
    );
    println!(
        "{}{} with similar titles",
        "• ".cyan(),
        report.with_similar
    );
    println!(
        "{}{} with competitors",
        "• ".cyan(),
        report.with_competitors
    );
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(
    config: EnrichmentConfig,
    path: PathBuf,
    request: SearchRequest,
) -> Result<()> {
    let (catalog, columns) = load_and_enrich(config, path).await?;

    let rows = pipeline::search(&catalog, &request).context("Search failed")?;
    println!("{}", format!("{} results:", rows.len()).bold().blue());
    for (rank, row) in rows.iter().enumerate() {
        print_movie_summary(rank + 1, &catalog, &columns, *row);
    }
    Ok(())
}

/// Handle the 'show' command
async fn handle_show(config: EnrichmentConfig, path: PathBuf, title: String) -> Result<()> {
    let (catalog, columns) = load_and_enrich(config, path).await?;

    let rows = catalog.find_by_title(&title);
    if rows.is_empty() {
        return Err(anyhow!("Movie '{}' not found", title));
    }

    for &row in rows {
        let movie = catalog
            .get_movie(row)
            .ok_or_else(|| anyhow!("Row {} out of range", row))?;
        let names = catalog.columns();

        println!("{}", movie.title.bold().blue());
        println!("{}Row: {}", "• ".green(), row);
        println!("{}Released: {}", "• ".green(), release_label(&catalog, row));
        for (label, column) in [
            ("Genre", &names.genre),
            ("Country", &names.country),
            ("Keywords", &names.keywords),
        ] {
            println!(
                "{}{}: {}",
                "• ".green(),
                label,
                catalog.field(row, column).unwrap_or("-")
            );
        }
        match movie.popularity {
            Some(popularity) => println!("{}Popularity: {}", "• ".green(), popularity),
            None => println!("{}Popularity: -", "• ".green()),
        }

        println!("Similar titles:");
        print_title_list(&catalog, &columns.similar_titles[row]);
        println!("Competitors:");
        print_title_list(&catalog, &columns.competitor_titles[row]);
    }
    Ok(())
}

/// Handle the 'facets' command
async fn handle_facets(config: EnrichmentConfig, path: PathBuf) -> Result<()> {
    let orchestrator = EnrichmentOrchestrator::new(config);
    let catalog = orchestrator.load(&path).await?;
    let facets = FacetOptions::from_catalog(&catalog);

    for (label, values) in [
        ("Genres", &facets.genres),
        ("Countries", &facets.countries),
        ("Keywords", &facets.keywords),
        ("Years", &facets.years),
    ] {
        println!("{} ({})", label.bold().blue(), values.len());
        if !values.is_empty() {
            println!("  {}", values.join(", "));
        }
    }
    Ok(())
}

/// Handle the 'top' command
async fn handle_top(config: EnrichmentConfig, path: PathBuf, limit: usize) -> Result<()> {
    let orchestrator = EnrichmentOrchestrator::new(config);
    let catalog = orchestrator.load(&path).await?;
    let rows = top_by_popularity(&catalog, limit);

    println!(
        "{}",
        format!("Top {} by {}:", rows.len(), catalog.columns().popularity)
            .bold()
            .blue()
    );
    for (rank, &row) in rows.iter().enumerate() {
        let Some(movie) = catalog.get_movie(row) else {
            continue;
        };
        println!(
            "{}. {} ({}) - {}",
            (rank + 1).to_string().green(),
            movie.title,
            release_label(&catalog, row),
            catalog.field(row, &catalog.columns().popularity).unwrap_or("-")
        );
    }
    Ok(())
}

/// Load the catalog and compute its recommendation columns without writing
async fn load_and_enrich(
    config: EnrichmentConfig,
    path: PathBuf,
) -> Result<(Arc<Catalog>, EnrichmentColumns)> {
    let start = Instant::now();
    let orchestrator = EnrichmentOrchestrator::new(config);
    let catalog = Arc::new(orchestrator.load(&path).await?);
    let columns = orchestrator.enrich(catalog.clone()).await?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );
    Ok((catalog, columns))
}

fn release_label(catalog: &Catalog, row: RowId) -> String {
    match catalog.get_movie(row).and_then(|movie| movie.release_date) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "unknown".to_string(),
    }
}

/// Helper function to print one search result
fn print_movie_summary(rank: usize, catalog: &Catalog, columns: &EnrichmentColumns, row: RowId) {
    let Some(movie) = catalog.get_movie(row) else {
        return;
    };
    println!(
        "{}. {} ({})",
        rank.to_string().green(),
        movie.title,
        release_label(catalog, row)
    );
    println!("   Similar: {}", or_dash(&columns.similar_titles[row]));
    println!("   Competitors: {}", or_dash(&columns.competitor_titles[row]));
}

fn print_title_list(catalog: &Catalog, cell: &str) {
    let lines = describe_titles(catalog, cell);
    if lines.is_empty() {
        println!("  -");
    }
    for line in lines {
        println!("  - {}", line);
    }
}

/// One line per listed title, with the genre and keywords of its first
/// catalog match. Titles missing from the catalog are printed bare.
fn describe_titles(catalog: &Catalog, cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    let names = catalog.columns();
    cell.split(TITLE_SEPARATOR)
        .map(|title| match catalog.find_by_title(title).first() {
            Some(&row) => format!(
                "{} [{}] {}",
                title,
                catalog.field(row, &names.genre).unwrap_or("-"),
                catalog.field(row, &names.keywords).unwrap_or("-")
            ),
            None => title.to_string(),
        })
        .collect()
}

fn or_dash(cell: &str) -> &str {
    if cell.is_empty() {
        "-"
    } else {
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{ColumnNames, RawTable};

    fn create_test_catalog() -> Catalog {
        let raw = RawTable {
            headers: ["title", "keywords", "releaseDate", "popularity", "genre"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            rows: vec![
                vec!["Heat".into(), "heist, city".into(), "".into(), "".into(), "Crime".into()],
                vec!["Ronin".into(), "".into(), "".into(), "".into(), "Action".into()],
                vec!["Heat".into(), "remake".into(), "".into(), "".into(), "Drama".into()],
            ],
            has_bom: false,
        };
        Catalog::from_table(raw, ColumnNames::standard()).unwrap()
    }

    #[test]
    fn test_describe_titles_looks_up_first_match() {
        let catalog = create_test_catalog();
        let lines = describe_titles(&catalog, "Heat, Ronin, Unlisted");
        assert_eq!(
            lines,
            vec!["Heat [Crime] heist, city", "Ronin [Action] -", "Unlisted"]
        );
    }

    #[test]
    fn test_describe_titles_empty_cell() {
        let catalog = create_test_catalog();
        assert!(describe_titles(&catalog, "").is_empty());
    }
}

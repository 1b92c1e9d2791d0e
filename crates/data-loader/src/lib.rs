//! # Data Loader Crate
//!
//! Loads the scraped movie catalog (a CSV table) and exposes it to the
//! recommendation engine.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, Catalog, ColumnNames)
//! - **parser**: Read/write the CSV file and parse individual cells
//! - **index**: Build the catalog, check its schema, write it back
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Catalog, ColumnNames};
//! use std::path::Path;
//!
//! let mut catalog = Catalog::load_from_file(Path::new("data/movies.csv"), ColumnNames::standard())?;
//! let movie = catalog.get_movie(0).unwrap();
//! println!("{} released {:?}", movie.title, movie.release_date);
//!
//! catalog.set_column("similarTitles", similar)?;
//! catalog.write_to_file(Path::new("data/movies.csv"))?;
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use parser::{RawTable, parse_release_date, split_tags};
pub use types::{Catalog, ColumnNames, MISSING_POPULARITY, MovieRecord, RowId};

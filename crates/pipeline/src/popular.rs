//! Most popular movies of the catalog.

use data_loader::{Catalog, RowId};
use std::cmp::Ordering;
use tracing::debug;

pub const DEFAULT_TOP_N: usize = 5;

/// The `n` most popular movies, popularity descending.
///
/// Movies without a popularity value are left out. Equal popularity keeps
/// file order.
pub fn top_by_popularity(catalog: &Catalog, n: usize) -> Vec<RowId> {
    let mut ranked: Vec<(f64, RowId)> = catalog
        .movies()
        .iter()
        .filter_map(|movie| movie.popularity.map(|popularity| (popularity, movie.position)))
        .collect();
    debug!("{} of {} movies have a popularity", ranked.len(), catalog.len());

    // Stable: ties stay in file order
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    ranked.truncate(n);
    ranked.into_iter().map(|(_, row)| row).collect()
}

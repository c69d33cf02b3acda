//! Top-N leaderboard over the catalog.
//!
//! Ties on the average keep catalog declaration order. There is deliberately
//! no secondary key (rating count, recency) in the ordering.

use crate::catalog::{Catalog, Location};
use crate::ratings::RatingStore;
use serde::Serialize;

pub const DEFAULT_TOP_N: usize = 3;

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry<'a> {
    pub location: &'a Location,
    pub average_stars: f64,
    /// Informational; not used for ordering.
    pub rating_count: usize,
}

/// The `n` best-rated locations, best first. Unrated locations are skipped.
pub fn top_n<'a>(catalog: &'a Catalog, store: &RatingStore, n: usize) -> Vec<LeaderboardEntry<'a>> {
    let mut entries: Vec<LeaderboardEntry<'a>> = catalog
        .iter()
        .filter_map(|location| {
            store.average_stars(location.id).map(|average_stars| LeaderboardEntry {
                location,
                average_stars,
                rating_count: store.rating_count(location.id),
            })
        })
        .collect();

    entries.sort_by(|a, b| b.average_stars.total_cmp(&a.average_stars));
    entries.truncate(n);
    entries
}

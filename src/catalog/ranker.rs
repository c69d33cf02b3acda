//! Distance-sorted, text-filtered views of the catalog.
//!
//! Flow: annotate distances (if a position is known) → stable sort → filter.
//! Filtering runs after sorting so the filtered list keeps distance order.

use super::types::{Location, RankedLocation, UserPosition};

/// Rank catalog entries for a user.
///
/// With a position, entries are ordered by ascending distance, equal
/// distances keeping declaration order. Without one, declaration order is
/// kept and no distance is attached. `query` is matched case-insensitively
/// as a substring of `"{display_name} {city_name}"`; empty matches all.
pub fn rank<'a>(
    catalog: impl IntoIterator<Item = &'a Location>,
    position: Option<UserPosition>,
    query: &str,
) -> Vec<RankedLocation<'a>> {
    let mut ranked: Vec<RankedLocation<'a>> = catalog
        .into_iter()
        .map(|location| RankedLocation {
            location,
            distance_km: position.map(|p| p.distance_km_to(location)),
        })
        .collect();

    if position.is_some() {
        ranked.sort_by(|a, b| {
            let da = a.distance_km.unwrap_or(f64::INFINITY);
            let db = b.distance_km.unwrap_or(f64::INFINITY);
            da.total_cmp(&db)
        });
    }

    let needle = query.to_lowercase();
    if needle.is_empty() {
        return ranked;
    }

    ranked
        .into_iter()
        .filter(|r| r.location.search_text().contains(&needle))
        .collect()
}

//! Plain-text renderings for the terminal.

use crate::catalog::{Location, RankedLocation};
use crate::format::{format_distance, format_stars, SauceVerdict};
use crate::leaderboard::LeaderboardEntry;
use crate::ratings::{Rating, RatingStore};

/// Store list: one line per store, distance and average when known.
pub fn render_store_list(ranked: &[RankedLocation<'_>], store: &RatingStore) -> String {
    if ranked.is_empty() {
        return "  No store found.\n".to_string();
    }

    let mut out = String::new();
    for r in ranked {
        let loc = r.location;
        let avg = match store.average_stars(loc.id) {
            Some(a) => format!("\u{2B50} {}", format_stars(a)),
            None => "no ratings".to_string(),
        };
        let dist = r.distance_km.map(format_distance).unwrap_or_default();
        out.push_str(&format!(
            "  [{:>3}] {} \u{00B7} {:<32} {:>10}  {}\n",
            loc.id, loc.display_name, loc.city_name, dist, avg
        ));
    }
    out
}

/// Detail view for one store: average plus every rating, newest first.
pub fn render_store_detail(location: &Location, store: &RatingStore) -> String {
    let mut out = format!("  {} \u{00B7} {}\n", location.display_name, location.city_name);

    match store.average_stars(location.id) {
        Some(avg) => out.push_str(&format!("  \u{2B50} Average: {}\n", format_stars(avg))),
        None => {
            out.push_str("  No ratings here yet.\n");
            return out;
        }
    }

    for rating in store.ratings_for(location.id) {
        out.push_str(&render_rating(rating));
    }
    out
}

fn render_rating(r: &Rating) -> String {
    let mixin = if r.has_mixin { "with mix-in" } else { "without mix-in" };
    let mut line = format!(
        "    - {} \u{00B7} {} \u{00B7} sauce {} \u{00B7} {} \u{00B7} {}\n",
        format_stars(r.stars as f64),
        r.texture,
        SauceVerdict::from_level(r.sauce_level),
        mixin,
        r.created_at.format("%Y-%m-%d %H:%M"),
    );
    if !r.comment.is_empty() {
        line.push_str(&format!("      \u{201E}{}\u{201C}\n", r.comment));
    }
    line
}

pub fn render_leaderboard(entries: &[LeaderboardEntry<'_>]) -> String {
    if entries.is_empty() {
        return "  No ratings yet, be the first.\n".to_string();
    }

    let mut out = String::from("  \u{1F525} Top stores\n");
    for (i, e) in entries.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} \u{00B7} {} \u{00B7} \u{2B50} {} ({} ratings)\n",
            i + 1,
            e.location.display_name,
            e.location.city_name,
            format_stars(e.average_stars),
            e.rating_count,
        ));
    }
    out
}

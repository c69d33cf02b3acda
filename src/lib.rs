//! flurry_rank: a rating engine for a fixed catalog of store locations.
//!
//! The catalog is ranked by distance and text query, ratings are kept in an
//! append-only store, and leaderboards are derived from the store on demand.

pub mod catalog;
pub mod config;
pub mod format;
pub mod geo;
pub mod leaderboard;
pub mod position;
pub mod ratings;
pub mod report;
pub mod server;

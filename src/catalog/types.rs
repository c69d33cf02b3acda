//! Core types for the store catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A store in the fixed catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u32,
    pub display_name: String,
    pub city_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Text the catalog search matches against: "name city", lowercased.
    pub(crate) fn search_text(&self) -> String {
        format!("{} {}", self.display_name, self.city_name).to_lowercase()
    }
}

/// The user's current position. Lives for one session, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl UserPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn distance_km_to(&self, location: &Location) -> f64 {
        crate::geo::distance_km(
            self.latitude,
            self.longitude,
            location.latitude,
            location.longitude,
        )
    }
}

/// A catalog entry as seen from a (possibly unknown) user position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedLocation<'a> {
    #[serde(flatten)]
    pub location: &'a Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Catalog construction errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate location id {0}")]
    DuplicateId(u32),
    #[error("location {id} has invalid coordinates ({lat}, {lon})")]
    InvalidCoordinates { id: u32, lat: f64, lon: f64 },
    #[error("cannot read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}

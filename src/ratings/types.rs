//! Core types for the rating subsystem.
//!
//! Two shapes exist for every rating: the backend wire record
//! (`restaurant_id`, `consistency`, `has_choco`, `sauce_amount`) and the
//! domain `Rating` the rest of the crate works with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier assigned by the persistence backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RatingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Texture of the dessert. Stored values are the German labels the
/// ratings table has always used; English names are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Texture {
    #[serde(rename = "eisig", alias = "icy")]
    Icy,
    #[default]
    #[serde(rename = "cremig", alias = "creamy")]
    Creamy,
    #[serde(rename = "weich", alias = "soft")]
    Soft,
}

impl fmt::Display for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Icy => write!(f, "icy"),
            Self::Creamy => write!(f, "creamy"),
            Self::Soft => write!(f, "soft"),
        }
    }
}

impl FromStr for Texture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "icy" | "eisig" => Ok(Self::Icy),
            "creamy" | "cremig" => Ok(Self::Creamy),
            "soft" | "weich" => Ok(Self::Soft),
            _ => Err(format!("Unknown texture '{}'. Use 'icy', 'creamy' or 'soft'.", s)),
        }
    }
}

/// A persisted rating. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rating {
    pub id: RatingId,
    pub location_id: u32,
    pub texture: Texture,
    pub stars: u8,
    pub has_mixin: bool,
    pub sauce_level: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A rating the user wants to submit: everything but `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRating {
    pub location_id: u32,
    #[serde(default)]
    pub texture: Texture,
    pub stars: u8,
    #[serde(default)]
    pub has_mixin: bool,
    pub sauce_level: u8,
    #[serde(default)]
    pub comment: String,
}

impl NewRating {
    pub(crate) fn to_record(&self) -> NewRatingRecord {
        NewRatingRecord {
            restaurant_id: self.location_id,
            consistency: self.texture,
            stars: self.stars,
            has_choco: self.has_mixin,
            sauce_amount: self.sauce_level,
            comment: self.comment.clone(),
        }
    }
}

// ─── Backend wire records ────────────────────────────────────────

/// A row of the `ratings` table as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub id: RatingId,
    pub restaurant_id: u32,
    pub consistency: Texture,
    pub stars: u8,
    pub has_choco: bool,
    pub sauce_amount: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the `ratings` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRatingRecord {
    pub restaurant_id: u32,
    pub consistency: Texture,
    pub stars: u8,
    pub has_choco: bool,
    pub sauce_amount: u8,
    pub comment: String,
}

impl From<RatingRecord> for Rating {
    fn from(r: RatingRecord) -> Self {
        Self {
            id: r.id,
            location_id: r.restaurant_id,
            texture: r.consistency,
            stars: r.stars,
            has_mixin: r.has_choco,
            sauce_level: r.sauce_amount,
            comment: r.comment.unwrap_or_default(),
            created_at: r.created_at,
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────

/// Failures talking to the persistence backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for BackendError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(status, response) => Self::Status {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            other => Self::Network(other.to_string()),
        }
    }
}

/// Rating subsystem errors. None of them is fatal; the store is always
/// left in its last consistent state.
#[derive(Debug, Error)]
pub enum RatingError {
    /// `load_all` failed; the store kept its previous contents.
    #[error("could not load ratings: {0}")]
    ExternalReadFailure(#[source] BackendError),
    /// `insert` failed; nothing was added to the store.
    #[error("could not save rating: {0}")]
    ExternalWriteFailure(#[source] BackendError),
    #[error("unknown location id {0}")]
    UnknownLocation(u32),
    #[error("{field} must be between 1 and 5, got {value}")]
    OutOfRange { field: &'static str, value: u8 },
}

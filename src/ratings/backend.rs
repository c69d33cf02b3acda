//! Persistence backends for the `ratings` table.
//!
//! `RestBackend` talks to a PostgREST-style HTTP endpoint; `FileBackend`
//! (see `file.rs`) keeps everything in a local JSON file for offline use.

use super::types::{BackendError, NewRatingRecord, RatingRecord};
use std::time::Duration;

const USER_AGENT: &str = "FlurryRank/0.3 (rating-engine)";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The persistence collaborator behind a `RatingStore`.
pub trait RatingBackend: Send {
    /// All ratings, newest first.
    fn fetch_all(&self) -> Result<Vec<RatingRecord>, BackendError>;

    /// Persist one rating and return the canonical row (with `id` and
    /// `created_at` filled in by the backend).
    fn insert(&self, record: &NewRatingRecord) -> Result<RatingRecord, BackendError>;
}

impl<B: RatingBackend + ?Sized> RatingBackend for Box<B> {
    fn fetch_all(&self) -> Result<Vec<RatingRecord>, BackendError> {
        (**self).fetch_all()
    }

    fn insert(&self, record: &NewRatingRecord) -> Result<RatingRecord, BackendError> {
        (**self).insert(record)
    }
}

// ─── REST (PostgREST / Supabase) ─────────────────────────────────

/// HTTP backend speaking the PostgREST dialect.
pub struct RestBackend {
    base_url: String,
    api_key: String,
    table: String,
    timeout: Duration,
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: "ratings".into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), self.table)
    }

    fn list_url(&self) -> String {
        format!("{}?select=*&order=created_at.desc", self.table_url())
    }

    fn authed(&self, request: ureq::Request) -> ureq::Request {
        request
            .set("User-Agent", USER_AGENT)
            .set("apikey", &self.api_key)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
    }
}

impl RatingBackend for RestBackend {
    fn fetch_all(&self) -> Result<Vec<RatingRecord>, BackendError> {
        let response = self.authed(ureq::get(&self.list_url())).call()?;

        response
            .into_json()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    fn insert(&self, record: &NewRatingRecord) -> Result<RatingRecord, BackendError> {
        let response = self
            .authed(ureq::post(&self.table_url()))
            .set("Prefer", "return=representation")
            .send_json(record)?;

        let mut rows: Vec<RatingRecord> = response
            .into_json()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        match rows.len() {
            1 => Ok(rows.remove(0)),
            n => Err(BackendError::InvalidResponse(format!(
                "insert returned {} rows, expected 1",
                n
            ))),
        }
    }
}

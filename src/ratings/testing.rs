//! In-memory backend for tests, with switchable read/write failures.

use super::backend::RatingBackend;
use super::types::{BackendError, NewRatingRecord, RatingId, RatingRecord, Texture};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MemoryState {
    rows: Vec<RatingRecord>,
    fail_reads: bool,
    fail_writes: bool,
}

/// Cloning shares the table, so a test can keep a handle after moving the
/// backend into a store.
#[derive(Clone, Default)]
pub(crate) struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

impl MemoryBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Seed with `(location_id, stars)` rows, oldest first.
    pub(crate) fn seeded(rows: &[(u32, u8)]) -> Self {
        let backend = Self::new();
        {
            let mut state = backend.state.lock().unwrap();
            for &(location_id, stars) in rows {
                let n = state.rows.len() as i64 + 1;
                state.rows.push(row(n, location_id, stars));
            }
        }
        backend
    }

    pub(crate) fn fail_reads(&self, on: bool) {
        self.state.lock().unwrap().fail_reads = on;
    }

    pub(crate) fn fail_writes(&self, on: bool) {
        self.state.lock().unwrap().fail_writes = on;
    }

    pub(crate) fn row_count(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }
}

fn row(n: i64, location_id: u32, stars: u8) -> RatingRecord {
    RatingRecord {
        id: RatingId::Int(n),
        restaurant_id: location_id,
        consistency: Texture::Creamy,
        stars,
        has_choco: false,
        sauce_amount: 3,
        comment: None,
        created_at: epoch() + Duration::minutes(n),
    }
}

impl RatingBackend for MemoryBackend {
    fn fetch_all(&self) -> Result<Vec<RatingRecord>, BackendError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(BackendError::Network("connection reset".into()));
        }
        let mut rows = state.rows.clone();
        rows.reverse();
        Ok(rows)
    }

    fn insert(&self, record: &NewRatingRecord) -> Result<RatingRecord, BackendError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(BackendError::Status { status: 503, body: "unavailable".into() });
        }
        let n = state.rows.len() as i64 + 1;
        let mut stored = row(n, record.restaurant_id, record.stars);
        stored.consistency = record.consistency;
        stored.has_choco = record.has_choco;
        stored.sauce_amount = record.sauce_amount;
        stored.comment = Some(record.comment.clone());
        state.rows.push(stored.clone());
        Ok(stored)
    }
}

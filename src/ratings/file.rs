//! File-based rating backend at ~/.flurry/ratings.json.
//!
//! The file holds every row plus the next id to hand out. A missing file is
//! an empty table; a malformed one is an error, never silently reset.

use super::backend::RatingBackend;
use super::types::{BackendError, NewRatingRecord, RatingId, RatingRecord};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize)]
struct TableFile {
    #[serde(default = "first_id")]
    next_id: i64,
    #[serde(default)]
    ratings: Vec<RatingRecord>,
}

fn first_id() -> i64 {
    1
}

/// Local JSON-file backend.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Backend over the default file (~/.flurry/ratings.json).
    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    /// Backend over a specific file (created on first insert).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".flurry")
            .join("ratings.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<TableFile, BackendError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(TableFile { next_id: first_id(), ratings: Vec::new() })
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&data).map_err(|e| {
            BackendError::InvalidResponse(format!("{}: {}", self.path.display(), e))
        })
    }

    fn write_table(&self, table: &TableFile) -> Result<(), BackendError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(table)
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        // Write beside the target and rename over it, so a crash mid-write
        // never leaves a truncated table behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl RatingBackend for FileBackend {
    fn fetch_all(&self) -> Result<Vec<RatingRecord>, BackendError> {
        let mut rows = self.read_table()?.ratings;
        // Rows are appended, so equal timestamps resolve to latest-written first.
        rows.reverse();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    fn insert(&self, record: &NewRatingRecord) -> Result<RatingRecord, BackendError> {
        let mut table = self.read_table()?;

        // Never reuse an id, even if the file was edited by hand.
        let max_existing = table
            .ratings
            .iter()
            .filter_map(|r| match r.id {
                RatingId::Int(n) => Some(n),
                RatingId::Text(_) => None,
            })
            .max()
            .unwrap_or(0);
        let id = table.next_id.max(max_existing + 1);

        let row = RatingRecord {
            id: RatingId::Int(id),
            restaurant_id: record.restaurant_id,
            consistency: record.consistency,
            stars: record.stars,
            has_choco: record.has_choco,
            sauce_amount: record.sauce_amount,
            comment: Some(record.comment.clone()),
            created_at: Utc::now(),
        };

        table.next_id = id + 1;
        table.ratings.push(row.clone());
        self.write_table(&table)?;
        Ok(row)
    }
}

//! The session's rating collection.
//!
//! Append-only, newest first. Every aggregate is recomputed from the
//! current contents on each call, so it can never drift from the ratings.

use super::backend::RatingBackend;
use super::types::{NewRating, Rating, RatingError};
use tracing::{info, warn};

/// Owned rating state for one session, backed by a persistence backend.
pub struct RatingStore {
    backend: Box<dyn RatingBackend>,
    ratings: Vec<Rating>,
}

impl RatingStore {
    /// An empty store; call `load_all` to fill it.
    pub fn new(backend: impl RatingBackend + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    pub fn from_boxed(backend: Box<dyn RatingBackend>) -> Self {
        Self { backend, ratings: Vec::new() }
    }

    /// Replace the contents with everything the backend has, newest first.
    ///
    /// On failure the previous contents are kept.
    pub fn load_all(&mut self) -> Result<&[Rating], RatingError> {
        let records = self.backend.fetch_all().map_err(|e| {
            warn!(error = %e, kept = self.ratings.len(), "rating load failed");
            RatingError::ExternalReadFailure(e)
        })?;

        let mut ratings: Vec<Rating> = records.into_iter().map(Rating::from).collect();
        ratings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.ratings = ratings;

        info!(count = self.ratings.len(), "ratings loaded");
        Ok(&self.ratings)
    }

    /// Persist a submission and prepend the backend's canonical row.
    ///
    /// The candidate is not validated here; see `NewRating::validate`. On
    /// failure nothing is added and the caller still owns the candidate.
    pub fn insert(&mut self, candidate: &NewRating) -> Result<Rating, RatingError> {
        let record = self.backend.insert(&candidate.to_record()).map_err(|e| {
            warn!(error = %e, location_id = candidate.location_id, "rating insert failed");
            RatingError::ExternalWriteFailure(e)
        })?;

        let rating = Rating::from(record);
        info!(id = %rating.id, location_id = rating.location_id, stars = rating.stars, "rating saved");
        self.ratings.insert(0, rating.clone());
        Ok(rating)
    }

    /// Ratings for one location, newest first.
    pub fn ratings_for(&self, location_id: u32) -> Vec<&Rating> {
        self.ratings
            .iter()
            .filter(|r| r.location_id == location_id)
            .collect()
    }

    /// Mean star score for a location; `None` when it has no ratings.
    pub fn average_stars(&self, location_id: u32) -> Option<f64> {
        let (sum, count) = self
            .ratings
            .iter()
            .filter(|r| r.location_id == location_id)
            .fold((0u32, 0u32), |(sum, count), r| (sum + r.stars as u32, count + 1));

        if count == 0 {
            None
        } else {
            Some(sum as f64 / count as f64)
        }
    }

    pub fn rating_count(&self, location_id: u32) -> usize {
        self.ratings.iter().filter(|r| r.location_id == location_id).count()
    }

    /// All ratings, newest first.
    pub fn all(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratings::testing::MemoryBackend;
    use crate::ratings::types::{RatingId, Texture};
    use approx::assert_relative_eq;

    fn submission(location_id: u32, stars: u8) -> NewRating {
        NewRating {
            location_id,
            texture: Texture::Soft,
            stars,
            has_mixin: true,
            sauce_level: 4,
            comment: "lecker".into(),
        }
    }

    fn loaded(rows: &[(u32, u8)]) -> (RatingStore, MemoryBackend) {
        let backend = MemoryBackend::seeded(rows);
        let mut store = RatingStore::new(backend.clone());
        store.load_all().unwrap();
        (store, backend)
    }

    #[test]
    fn test_load_all_newest_first() {
        let (store, _backend) = loaded(&[(1, 3), (2, 4), (1, 5)]);
        assert_eq!(store.len(), 3);
        let ids: Vec<&RatingId> = store.all().iter().map(|r| &r.id).collect();
        assert_eq!(ids, vec![&RatingId::Int(3), &RatingId::Int(2), &RatingId::Int(1)]);
        assert!(store.all().windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn test_load_failure_keeps_previous_contents() {
        let (mut store, backend) = loaded(&[(1, 3), (2, 4)]);
        backend.fail_reads(true);

        let err = store.load_all().unwrap_err();
        assert!(matches!(err, RatingError::ExternalReadFailure(_)));
        assert_eq!(store.len(), 2);
        assert_eq!(store.average_stars(2), Some(4.0));
    }

    #[test]
    fn test_load_replaces_contents() {
        let (mut store, backend) = loaded(&[(1, 3)]);
        backend.insert(&submission(2, 5).to_record()).unwrap();
        store.load_all().unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].location_id, 2);
    }

    #[test]
    fn test_insert_prepends_canonical_rating() {
        let (mut store, _backend) = loaded(&[(1, 3), (1, 4)]);
        let saved = store.insert(&submission(1, 5)).unwrap();

        assert_eq!(saved.id, RatingId::Int(3));
        assert_eq!(saved.texture, Texture::Soft);
        assert!(saved.has_mixin);
        assert_eq!(saved.comment, "lecker");
        assert_eq!(store.all()[0], saved);
        assert_eq!(store.ratings_for(1)[0], &saved);
    }

    #[test]
    fn test_every_insert_lands_first() {
        let (mut store, _backend) = loaded(&[(4, 2)]);
        for (location, stars) in [(4, 3), (5, 1), (4, 5), (4, 4)] {
            let saved = store.insert(&submission(location, stars)).unwrap();
            assert_eq!(store.ratings_for(location)[0].id, saved.id);
            assert_eq!(store.all()[0].id, saved.id);
        }
        let stars: Vec<u8> = store.ratings_for(4).iter().map(|r| r.stars).collect();
        assert_eq!(stars, vec![4, 5, 3, 2]);
    }

    #[test]
    fn test_insert_failure_leaves_store_untouched() {
        let (mut store, backend) = loaded(&[(1, 3)]);
        backend.fail_writes(true);

        let candidate = submission(1, 5);
        let err = store.insert(&candidate).unwrap_err();
        assert!(matches!(err, RatingError::ExternalWriteFailure(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.average_stars(1), Some(3.0));
        assert_eq!(backend.row_count(), 1);

        // Resubmitting the same candidate works once the backend recovers.
        backend.fail_writes(false);
        store.insert(&candidate).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_average_absent_without_ratings() {
        let (store, _backend) = loaded(&[(1, 3)]);
        assert_eq!(store.average_stars(2), None);
        assert!(store.ratings_for(2).is_empty());
        assert_eq!(store.rating_count(2), 0);
    }

    #[test]
    fn test_average_is_exact_mean() {
        let (store, _backend) = loaded(&[(7, 4), (7, 5), (7, 3), (8, 1)]);
        assert_relative_eq!(store.average_stars(7).unwrap(), 4.0);
        assert_relative_eq!(store.average_stars(8).unwrap(), 1.0);
        assert_eq!(store.rating_count(7), 3);
    }

    #[test]
    fn test_average_tracks_inserts() {
        let (mut store, _backend) = loaded(&[(1, 4)]);
        store.insert(&submission(1, 5)).unwrap();
        assert_relative_eq!(store.average_stars(1).unwrap(), 4.5);
        store.insert(&submission(1, 1)).unwrap();
        assert_relative_eq!(store.average_stars(1).unwrap(), 10.0 / 3.0);
    }

    #[test]
    fn test_fresh_store_is_empty() {
        let store = RatingStore::new(MemoryBackend::new());
        assert!(store.is_empty());
        assert_eq!(store.average_stars(1), None);
    }
}

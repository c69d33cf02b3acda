//! The submission path: validation against the catalog and the caller-held
//! pending form (including photos that are never persisted).

use super::store::RatingStore;
use super::types::{NewRating, Rating, RatingError, Texture};
use crate::catalog::Catalog;
use std::ops::RangeInclusive;

const SCORE_RANGE: RangeInclusive<u8> = 1..=5;

impl NewRating {
    /// Check the submission against the catalog and the score ranges.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), RatingError> {
        if !catalog.contains(self.location_id) {
            return Err(RatingError::UnknownLocation(self.location_id));
        }
        if !SCORE_RANGE.contains(&self.stars) {
            return Err(RatingError::OutOfRange { field: "stars", value: self.stars });
        }
        if !SCORE_RANGE.contains(&self.sauce_level) {
            return Err(RatingError::OutOfRange { field: "sauce_level", value: self.sauce_level });
        }
        Ok(())
    }
}

/// A photo attached to a pending submission. Local only.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

/// The rating form the user is filling in.
///
/// Attachments stay here and never reach the store or the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub rating: NewRating,
    pub attachments: Vec<Attachment>,
}

impl PendingSubmission {
    /// A fresh form for a location: creamy, 4 stars, no mixin, sauce just right.
    pub fn new(location_id: u32) -> Self {
        Self {
            rating: NewRating {
                location_id,
                texture: Texture::Creamy,
                stars: 4,
                has_mixin: false,
                sauce_level: 3,
                comment: String::new(),
            },
            attachments: Vec::new(),
        }
    }

    /// Validate and insert. On success the comment and attachments are
    /// cleared and the other fields kept for the next rating; on failure
    /// the form is left exactly as it was so it can be resubmitted.
    pub fn submit(&mut self, catalog: &Catalog, store: &mut RatingStore) -> Result<Rating, RatingError> {
        self.rating.validate(catalog)?;
        let saved = store.insert(&self.rating)?;
        self.rating.comment.clear();
        self.attachments.clear();
        Ok(saved)
    }
}

//! Rating subsystem: the in-memory store, its persistence backends, and
//! the submission path that feeds it.

pub mod backend;
pub mod file;
pub mod store;
pub mod submission;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{RatingBackend, RestBackend};
pub use file::FileBackend;
pub use store::RatingStore;
pub use submission::{Attachment, PendingSubmission};
pub use types::{BackendError, NewRating, Rating, RatingError, RatingId, Texture};

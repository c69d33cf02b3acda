//! The static store catalog and the distance/text ranker over it.

pub mod builtin;
pub mod ranker;
pub mod types;

pub use builtin::Catalog;
pub use ranker::rank;
pub use types::{CatalogError, Location, RankedLocation, UserPosition};

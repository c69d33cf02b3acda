use crate::catalog::Catalog;
use crate::ratings::RatingStore;
use std::sync::Mutex;

pub struct AppState {
    pub catalog: Catalog,
    /// Held for the whole of an insert, so at most one write is in flight.
    pub store: Mutex<RatingStore>,
}

impl AppState {
    pub fn new(catalog: Catalog, store: RatingStore) -> Self {
        Self { catalog, store: Mutex::new(store) }
    }
}

//! API server state

use std::sync::Arc;

use crate::store::SongStore;

/// API server state
///
/// The store handle is constructed once at startup and shared by every
/// request for the process lifetime.
#[derive(Clone)]
pub struct AppState {
    /// Shared document store handle
    pub store: Arc<dyn SongStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn SongStore>) -> Self {
        Self { store }
    }
}

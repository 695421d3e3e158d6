//! Shared handler state.

use std::sync::Arc;
use std::time::Instant;

use storygate_settings::StorygateSettings;
use storygate_store::{Store, StoreError};

/// State handed to every Axum handler.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Persistence facade.
    pub store: Store,
    /// Loaded settings.
    pub settings: Arc<StorygateSettings>,
    /// When the server started.
    pub start_time: Instant,
}

impl AppState {
    /// Create state for a freshly opened store.
    pub fn new(store: Store, settings: StorygateSettings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
            start_time: Instant::now(),
        }
    }

    /// Run a store call on the blocking thread pool.
    pub async fn with_store<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Store) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| StoreError::Internal(format!("store task failed: {e}")))?
    }
}

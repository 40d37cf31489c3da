//! Shared application state.

use std::sync::Arc;

use shortpress_application::ResolverConfig;
use shortpress_application::use_cases::BootstrapAdmin;
use shortpress_infrastructure::{InMemoryStore, SystemClock, TokioFileSystem};
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ServerError;

/// The store used by the server.
pub type Store = InMemoryStore<TokioFileSystem>;

/// State handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Users, categories, and variables.
    pub store: Arc<Store>,
    /// Timestamps for variable writes.
    pub clock: SystemClock,
    /// Resolver limits.
    pub resolver: ResolverConfig,
}

impl AppState {
    /// Wraps an already opened store.
    #[must_use]
    pub fn new(store: Store, resolver: ResolverConfig) -> Self {
        Self {
            store: Arc::new(store),
            clock: SystemClock::new(),
            resolver,
        }
    }

    /// Opens the configured store and creates the bootstrap admin if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be loaded or the admin
    /// cannot be created.
    pub async fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let store = match &config.data_file {
            Some(path) => InMemoryStore::open(TokioFileSystem::new(), path).await?,
            None => {
                info!("no data file configured, data will not survive a restart");
                InMemoryStore::new(TokioFileSystem::new())
            }
        };
        let state = Self::new(store, config.resolver);

        if let Some(username) = &config.bootstrap_admin {
            BootstrapAdmin::new(state.store.as_ref())
                .execute(username)
                .await?;
        }

        info!(max_depth = state.resolver.max_depth, "application state ready");
        Ok(state)
    }
}

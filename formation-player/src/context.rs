//! Application context.
//!
//! Built once at startup and passed to the controllers that need it. Holds
//! no per-user state: logging out clears the profile store through the
//! session controller, the context itself stays valid.

use formation_core::player_prelude::{
    ApiClient, AppConfig, BackendApi, CatalogProvider, CoreResult, FileStore,
    KeyValueStore, ProfileStore,
};
use log::info;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppContext {
    config: Arc<AppConfig>,
    profile: ProfileStore,
    catalog: Arc<CatalogProvider>,
    backend: Option<Arc<dyn BackendApi>>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        backend: Option<Arc<dyn BackendApi>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            profile: ProfileStore::new(store),
            catalog: Arc::new(CatalogProvider::new(backend.clone())),
            backend,
        }
    }

    /// Context backed by the profile file in the configured data dir and,
    /// when an origin is configured, the HTTP backend.
    pub fn from_config(config: AppConfig) -> CoreResult<Self> {
        let store = FileStore::open_in(&config.data_dir)?;
        info!("Profile store at {}", store.path().display());

        let backend = ApiClient::from_config(&config)?
            .map(|client| Arc::new(client) as Arc<dyn BackendApi>);
        if backend.is_none() {
            info!("No API origin configured, running offline");
        }

        Ok(Self::new(config, Arc::new(store), backend))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn profile(&self) -> &ProfileStore {
        &self.profile
    }

    pub fn catalog(&self) -> &CatalogProvider {
        &self.catalog
    }

    pub fn backend(&self) -> Option<&Arc<dyn BackendApi>> {
        self.backend.as_ref()
    }
}

use std::sync::Arc;

use orator_core::{Catalog, CatalogError, Config, ProgressEngine, TicketStore};

/// Shared application state
pub struct AppState {
    config: Config,
    store: Arc<TicketStore>,
    engine: ProgressEngine,
}

impl AppState {
    pub fn new(config: Config, store: Arc<TicketStore>, engine: ProgressEngine) -> Self {
        Self {
            config,
            store,
            engine,
        }
    }

    /// Build the store and engine over the builtin analysis catalog.
    ///
    /// The engine is created stopped; callers decide whether to start it.
    pub fn from_config(config: Config) -> Result<Self, CatalogError> {
        let catalog = Arc::new(Catalog::builtin()?);
        let store = Arc::new(TicketStore::new(catalog));
        let engine = ProgressEngine::new(config.engine.clone(), Arc::clone(&store));
        Ok(Self::new(config, store, engine))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &TicketStore {
        &self.store
    }

    pub fn engine(&self) -> &ProgressEngine {
        &self.engine
    }
}

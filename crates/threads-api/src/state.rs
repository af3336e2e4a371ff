use std::sync::Arc;

use threads_persist::PersistClient;

use crate::config::Config;
use crate::revalidate::RevalidationBus;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub persist: PersistClient,
    pub revalidation: RevalidationBus,
}

impl AppState {
    pub fn new(config: Config, persist: PersistClient, revalidation: RevalidationBus) -> Self {
        Self {
            config: Arc::new(config),
            persist,
            revalidation,
        }
    }
}

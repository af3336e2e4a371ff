use std::sync::Arc;

use crate::PersistClient;
use crate::dbs::MemoryPersistenceClient;
use crate::error::{Result, PersistError};
use crate::revalidate::{NoopRevalidator, Revalidator};
use crate::trait_client::PersistenceClient;

pub struct PersistClientBuilder {
    store: Option<Arc<dyn PersistenceClient>>,
    revalidator: Arc<dyn Revalidator>,
}

impl PersistClientBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            revalidator: Arc::new(NoopRevalidator),
        }
    }

    pub fn store(mut self, store: Arc<dyn PersistenceClient>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn in_memory(self) -> Self {
        self.store(Arc::new(MemoryPersistenceClient::new()))
    }

    /// MongoDB backend reading `DATABASE_URL`; the connection opens on first use
    #[cfg(feature = "mongodb")]
    pub fn mongodb(self, database: &str) -> Self {
        self.store(Arc::new(crate::dbs::MongoPersistenceClient::from_env(database)))
    }

    pub fn revalidator(mut self, revalidator: Arc<dyn Revalidator>) -> Self {
        self.revalidator = revalidator;
        self
    }

    pub fn build(self) -> Result<PersistClient> {
        let store = self.store
            .ok_or_else(|| PersistError::Config("store backend is required".to_string()))?;

        Ok(PersistClient::new(store, self.revalidator))
    }
}

impl Default for PersistClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

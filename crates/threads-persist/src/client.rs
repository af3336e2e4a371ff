use std::sync::Arc;

use crate::activity::ActivityAggregator;
use crate::builder::PersistClientBuilder;
use crate::repositories::{ThreadRepository, UserRepository};
use crate::revalidate::Revalidator;
use crate::trait_client::PersistenceClient;

/// Repositories over one shared store backend
#[derive(Clone)]
pub struct PersistClient {
    store: Arc<dyn PersistenceClient>,
    user_repo: UserRepository,
    thread_repo: ThreadRepository,
    activity: ActivityAggregator,
}

impl PersistClient {
    pub fn new(store: Arc<dyn PersistenceClient>, revalidator: Arc<dyn Revalidator>) -> Self {
        Self {
            user_repo: UserRepository::new(Arc::clone(&store), Arc::clone(&revalidator)),
            thread_repo: ThreadRepository::new(Arc::clone(&store), revalidator),
            activity: ActivityAggregator::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn builder() -> PersistClientBuilder {
        PersistClientBuilder::new()
    }

    pub fn users(&self) -> &UserRepository {
        &self.user_repo
    }

    pub fn threads(&self) -> &ThreadRepository {
        &self.thread_repo
    }

    pub fn activity(&self) -> &ActivityAggregator {
        &self.activity
    }

    pub fn store(&self) -> &Arc<dyn PersistenceClient> {
        &self.store
    }
}

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::error::{PersistError, Result};

/// Environment variable holding the document-store connection string
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Opens a handle to the document store
#[async_trait]
pub trait Connector: Send + Sync {
    type Handle: Clone + Send + Sync;

    async fn open(&self, url: &str) -> Result<Self::Handle>;
}

/// Lazily opened, memoized store connection.
///
/// The first `connect()` opens the handle; every later call returns the same
/// one. Callers racing on the first connect share a single attempt. A failed
/// attempt is not memoized.
pub struct ConnectionManager<C: Connector> {
    url: Option<String>,
    connector: C,
    handle: OnceCell<C::Handle>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(url: impl Into<String>, connector: C) -> Self {
        Self::with_url(Some(url.into()), connector)
    }

    /// A missing or blank url is only reported once a connection is requested
    pub fn with_url(url: Option<String>, connector: C) -> Self {
        Self {
            url: url.filter(|u| !u.trim().is_empty()),
            connector,
            handle: OnceCell::new(),
        }
    }

    /// Read the connection string from `DATABASE_URL`
    pub fn from_env(connector: C) -> Self {
        Self::with_url(std::env::var(DATABASE_URL_ENV).ok(), connector)
    }

    pub async fn connect(&self) -> Result<C::Handle> {
        let handle = self
            .handle
            .get_or_try_init(|| async {
                let url = self.url.as_deref().ok_or_else(|| {
                    PersistError::Config(format!("{} is not set", DATABASE_URL_ENV))
                })?;
                tracing::info!("Opening document store connection");
                self.connector.open(url).await
            })
            .await?;
        Ok(handle.clone())
    }

    pub fn is_connected(&self) -> bool {
        self.handle.initialized()
    }
}

#[cfg(feature = "mongodb")]
pub use mongo::MongoConnector;

#[cfg(feature = "mongodb")]
mod mongo {
    use async_trait::async_trait;
    use mongodb::{
        bson::Document,
        options::IndexOptions,
        Client, Database, IndexModel,
    };

    use super::Connector;
    use crate::error::{PersistError, Result};

    fn unique_index(field: &str) -> IndexModel {
        let mut keys = Document::new();
        keys.insert(field, 1);
        IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build()
    }

    /// Opens a MongoDB client, selects one database and ensures the unique
    /// user indexes exist
    pub struct MongoConnector {
        database: String,
    }

    impl MongoConnector {
        pub fn new(database: impl Into<String>) -> Self {
            Self { database: database.into() }
        }
    }

    #[async_trait]
    impl Connector for MongoConnector {
        type Handle = Database;

        async fn open(&self, url: &str) -> Result<Database> {
            let client = Client::with_uri_str(url)
                .await
                .map_err(|e| PersistError::Connection(e.to_string()))?;
            let database = client.database(&self.database);

            // One document per identity, one identity per username
            database
                .collection::<Document>("users")
                .create_indexes([unique_index("identity_id"), unique_index("username")])
                .await
                .map_err(|e| PersistError::Connection(e.to_string()))?;

            Ok(database)
        }
    }
}

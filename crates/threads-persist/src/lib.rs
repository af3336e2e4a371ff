pub mod activity;
pub mod builder;
pub mod client;
pub mod connection;
pub mod dbs;
pub mod error;
pub mod models;
mod populate;
pub mod repositories;
pub mod revalidate;
pub mod trait_client;

pub use activity::ActivityAggregator;
pub use builder::PersistClientBuilder;
pub use client::PersistClient;
pub use connection::{ConnectionManager, Connector, DATABASE_URL_ENV};
#[cfg(feature = "mongodb")]
pub use connection::MongoConnector;
pub use dbs::MemoryPersistenceClient;
#[cfg(feature = "mongodb")]
pub use dbs::MongoPersistenceClient;
pub use error::{PersistError, Result};
pub use models::{
    AuthorSummary, NewThread, Page, PageRequest, PopulatedThread, SortOrder, Thread, ThreadLeaf,
    ThreadTree, ThreadWithReplies, User, UserFilter, UserProfile, DEFAULT_PAGE_SIZE,
};
pub use repositories::{
    AddReply, CreateThread, SearchUsers, ThreadRepository, UpsertUser, UserRepository,
    UserWithThreads, PROFILE_EDIT_PATH,
};
pub use revalidate::{NoopRevalidator, Revalidator};
pub use trait_client::PersistenceClient;

use async_trait::async_trait;
use mongodb::{Database, bson::doc};

use crate::connection::{ConnectionManager, MongoConnector};
use crate::dbs::mongo::models::{parse_id, parse_ids};
use crate::dbs::mongo::repositories::{MongoThreadRepository, MongoUserRepository};
use crate::error::Result;
use crate::models::{NewThread, SortOrder, Thread, User, UserFilter, UserProfile};
use crate::trait_client::PersistenceClient;

/// MongoDB backend. The connection is opened on first use and shared by
/// every operation afterwards.
pub struct MongoPersistenceClient {
    connection: ConnectionManager<MongoConnector>,
}

impl MongoPersistenceClient {
    pub fn new(connection: ConnectionManager<MongoConnector>) -> Self {
        Self { connection }
    }

    /// Connection string from `DATABASE_URL`
    pub fn from_env(database: &str) -> Self {
        Self::new(ConnectionManager::from_env(MongoConnector::new(database)))
    }

    async fn database(&self) -> Result<Database> {
        self.connection.connect().await
    }

    async fn users(&self) -> Result<MongoUserRepository> {
        Ok(MongoUserRepository::new(&self.database().await?))
    }

    async fn threads(&self) -> Result<MongoThreadRepository> {
        Ok(MongoThreadRepository::new(&self.database().await?))
    }
}

#[async_trait]
impl PersistenceClient for MongoPersistenceClient {
    async fn ping(&self) -> Result<()> {
        self.database().await?.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn upsert_user(&self, profile: UserProfile) -> Result<()> {
        self.users().await?.upsert(profile).await
    }

    async fn find_user_by_identity(&self, identity_id: &str) -> Result<Option<User>> {
        let user = self.users().await?.find_by_identity(identity_id).await?;
        Ok(user.map(|u| u.into()))
    }

    async fn find_users(&self, ids: &[String]) -> Result<Vec<User>> {
        let users = self.users().await?.find_many(parse_ids(ids)).await?;
        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    async fn push_user_thread(&self, user_id: &str, thread_id: &str) -> Result<bool> {
        let user_id = parse_id(user_id)?;
        let thread_id = parse_id(thread_id)?;
        self.users().await?.push_thread(user_id, thread_id).await
    }

    async fn search_users(
        &self,
        filter: &UserFilter,
        sort: SortOrder,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<User>> {
        let users = self.users().await?.search(filter, sort, skip, limit).await?;
        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<u64> {
        self.users().await?.count(filter).await
    }

    async fn insert_thread(&self, thread: NewThread) -> Result<Thread> {
        let author = parse_id(&thread.author)?;
        let parent_id = thread.parent_id.as_deref().map(parse_id).transpose()?;
        let created = self.threads().await?.create_thread(thread.text, author, parent_id).await?;
        Ok(created.into())
    }

    async fn find_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        let object_id = parse_id(thread_id)?;
        let thread = self.threads().await?.get_thread(object_id).await?;
        Ok(thread.map(|t| t.into()))
    }

    async fn find_threads(&self, ids: &[String]) -> Result<Vec<Thread>> {
        let threads = self.threads().await?.get_threads(parse_ids(ids)).await?;
        Ok(threads.into_iter().map(|t| t.into()).collect())
    }

    async fn push_thread_child(&self, parent_id: &str, child_id: &str) -> Result<bool> {
        let parent_id = parse_id(parent_id)?;
        let child_id = parse_id(child_id)?;
        self.threads().await?.push_child(parent_id, child_id).await
    }

    async fn list_top_level_threads(&self, skip: u64, limit: i64) -> Result<Vec<Thread>> {
        let threads = self.threads().await?.list_top_level(skip, limit).await?;
        Ok(threads.into_iter().map(|t| t.into()).collect())
    }

    async fn count_top_level_threads(&self) -> Result<u64> {
        self.threads().await?.count_top_level().await
    }

    async fn find_threads_by_author(&self, author_id: &str) -> Result<Vec<Thread>> {
        let author = parse_id(author_id)?;
        let threads = self.threads().await?.list_by_author(author).await?;
        Ok(threads.into_iter().map(|t| t.into()).collect())
    }

    async fn find_replies(
        &self,
        ids: &[String],
        exclude_author: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Thread>> {
        let exclude_author = parse_id(exclude_author)?;
        let threads = self.threads().await?
            .list_replies(parse_ids(ids), exclude_author, skip, limit)
            .await?;
        Ok(threads.into_iter().map(|t| t.into()).collect())
    }

    async fn count_replies(&self, ids: &[String], exclude_author: &str) -> Result<u64> {
        let exclude_author = parse_id(exclude_author)?;
        self.threads().await?.count_replies(parse_ids(ids), exclude_author).await
    }
}

use async_trait::async_trait;
use crate::models::{NewThread, SortOrder, Thread, User, UserFilter, UserProfile};
use crate::error::Result;

/// Trait for database persistence operations
///
/// Implementations provide the document-store primitives the repositories
/// compose. Ids are opaque strings; backends map them to their native key.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Round-trip to the store
    async fn ping(&self) -> Result<()>;

    /// Create or update the user keyed by `profile.identity_id` and mark it onboarded
    async fn upsert_user(&self, profile: UserProfile) -> Result<()>;

    async fn find_user_by_identity(&self, identity_id: &str) -> Result<Option<User>>;

    /// Fetch users by store id; missing ids are skipped
    async fn find_users(&self, ids: &[String]) -> Result<Vec<User>>;

    /// Append a thread id to a user's thread list. Returns false if no user matched.
    async fn push_user_thread(&self, user_id: &str, thread_id: &str) -> Result<bool>;

    /// Users matching `filter`, sorted by creation time
    async fn search_users(
        &self,
        filter: &UserFilter,
        sort: SortOrder,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<User>>;

    async fn count_users(&self, filter: &UserFilter) -> Result<u64>;

    /// Insert a thread; the store assigns id and creation time
    async fn insert_thread(&self, thread: NewThread) -> Result<Thread>;

    async fn find_thread(&self, thread_id: &str) -> Result<Option<Thread>>;

    /// Fetch threads by id; missing ids are skipped
    async fn find_threads(&self, ids: &[String]) -> Result<Vec<Thread>>;

    /// Append a child id to a thread's children. Returns false if no thread matched.
    async fn push_thread_child(&self, parent_id: &str, child_id: &str) -> Result<bool>;

    /// Threads without a parent, newest first
    async fn list_top_level_threads(&self, skip: u64, limit: i64) -> Result<Vec<Thread>>;

    async fn count_top_level_threads(&self) -> Result<u64>;

    async fn find_threads_by_author(&self, author_id: &str) -> Result<Vec<Thread>>;

    /// Threads among `ids` not authored by `exclude_author`, newest first
    async fn find_replies(
        &self,
        ids: &[String],
        exclude_author: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Thread>>;

    async fn count_replies(&self, ids: &[String], exclude_author: &str) -> Result<u64>;
}

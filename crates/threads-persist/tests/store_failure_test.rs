mod common;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use common::{onboard, profile, RecordingRevalidator};
use threads_persist::{
    AddReply, CreateThread, MemoryPersistenceClient, NewThread, PageRequest, PersistClient,
    PersistError, PersistenceClient, Result, SearchUsers, SortOrder, Thread, User, UserFilter,
    UserProfile,
};

/// In-memory store whose operations can be made to fail, or for the two
/// link writes, to report that nothing matched
#[derive(Default)]
struct FlakyStore {
    inner: MemoryPersistenceClient,
    failing: Mutex<HashSet<&'static str>>,
    unmatched: Mutex<HashSet<&'static str>>,
}

impl FlakyStore {
    fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    fn miss(&self, op: &'static str) {
        self.unmatched.lock().unwrap().insert(op);
    }

    fn check(&self, op: &'static str) -> Result<()> {
        if self.failing.lock().unwrap().contains(op) {
            return Err(PersistError::Storage(format!("{} unavailable", op)));
        }
        Ok(())
    }

    fn misses(&self, op: &'static str) -> bool {
        self.unmatched.lock().unwrap().contains(op)
    }
}

#[async_trait]
impl PersistenceClient for FlakyStore {
    async fn ping(&self) -> Result<()> {
        self.check("ping")?;
        self.inner.ping().await
    }

    async fn upsert_user(&self, profile: UserProfile) -> Result<()> {
        self.check("upsert_user")?;
        self.inner.upsert_user(profile).await
    }

    async fn find_user_by_identity(&self, identity_id: &str) -> Result<Option<User>> {
        self.check("find_user_by_identity")?;
        self.inner.find_user_by_identity(identity_id).await
    }

    async fn find_users(&self, ids: &[String]) -> Result<Vec<User>> {
        self.check("find_users")?;
        self.inner.find_users(ids).await
    }

    async fn push_user_thread(&self, user_id: &str, thread_id: &str) -> Result<bool> {
        self.check("push_user_thread")?;
        if self.misses("push_user_thread") {
            return Ok(false);
        }
        self.inner.push_user_thread(user_id, thread_id).await
    }

    async fn search_users(
        &self,
        filter: &UserFilter,
        sort: SortOrder,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<User>> {
        self.check("search_users")?;
        self.inner.search_users(filter, sort, skip, limit).await
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<u64> {
        self.check("count_users")?;
        self.inner.count_users(filter).await
    }

    async fn insert_thread(&self, thread: NewThread) -> Result<Thread> {
        self.check("insert_thread")?;
        self.inner.insert_thread(thread).await
    }

    async fn find_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        self.check("find_thread")?;
        self.inner.find_thread(thread_id).await
    }

    async fn find_threads(&self, ids: &[String]) -> Result<Vec<Thread>> {
        self.check("find_threads")?;
        self.inner.find_threads(ids).await
    }

    async fn push_thread_child(&self, parent_id: &str, child_id: &str) -> Result<bool> {
        self.check("push_thread_child")?;
        if self.misses("push_thread_child") {
            return Ok(false);
        }
        self.inner.push_thread_child(parent_id, child_id).await
    }

    async fn list_top_level_threads(&self, skip: u64, limit: i64) -> Result<Vec<Thread>> {
        self.check("list_top_level_threads")?;
        self.inner.list_top_level_threads(skip, limit).await
    }

    async fn count_top_level_threads(&self) -> Result<u64> {
        self.check("count_top_level_threads")?;
        self.inner.count_top_level_threads().await
    }

    async fn find_threads_by_author(&self, author_id: &str) -> Result<Vec<Thread>> {
        self.check("find_threads_by_author")?;
        self.inner.find_threads_by_author(author_id).await
    }

    async fn find_replies(
        &self,
        ids: &[String],
        exclude_author: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Thread>> {
        self.check("find_replies")?;
        self.inner.find_replies(ids, exclude_author, skip, limit).await
    }

    async fn count_replies(&self, ids: &[String], exclude_author: &str) -> Result<u64> {
        self.check("count_replies")?;
        self.inner.count_replies(ids, exclude_author).await
    }
}

fn setup() -> (PersistClient, Arc<FlakyStore>, Arc<RecordingRevalidator>) {
    let store = Arc::new(FlakyStore::default());
    let revalidator = Arc::new(RecordingRevalidator::default());
    let client = PersistClient::builder()
        .store(store.clone())
        .revalidator(revalidator.clone())
        .build()
        .unwrap();
    (client, store, revalidator)
}

fn create(author_id: &str, text: &str) -> CreateThread {
    CreateThread {
        text: text.to_string(),
        author_id: author_id.to_string(),
        community_id: None,
        path: "/create-thread".to_string(),
    }
}

fn answer(parent_id: &str, author_id: &str) -> AddReply {
    AddReply {
        parent_id: parent_id.to_string(),
        text: "hi".to_string(),
        author_id: author_id.to_string(),
        path: format!("/thread/{}", parent_id),
    }
}

fn assert_storage(err: PersistError, expected: &str) {
    match err {
        PersistError::Storage(msg) => assert_eq!(msg, expected),
        other => panic!("expected storage error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_upsert_failure_names_the_operation() {
    let (client, store, revalidator) = setup();
    store.fail("upsert_user");

    let mut input = profile("u1", "Alice");
    input.path = Some("/profile/edit".to_string());
    let err = client.users().upsert_user(input).await.unwrap_err();

    assert_storage(err, "Failed to create/update user: upsert_user unavailable");
    assert!(revalidator.paths().is_empty());
}

#[tokio::test]
async fn test_read_failures_name_the_operation() {
    let (client, store, _) = setup();
    let alice = onboard(&client, "u1", "Alice").await;
    let thread = client.threads().create_thread(create(&alice.id, "hello")).await.unwrap();

    store.fail("find_thread");
    let err = client.threads().get_thread_by_id(&thread.id).await.unwrap_err();
    assert_storage(err, "Failed to fetch thread: find_thread unavailable");

    store.fail("count_top_level_threads");
    let err = client.threads().list_top_level_threads(PageRequest::default()).await.unwrap_err();
    assert_storage(err, "Failed to fetch threads: count_top_level_threads unavailable");

    store.fail("find_threads");
    let err = client.users().get_user_threads_with_replies("u1").await.unwrap_err();
    assert_storage(err, "Failed to fetch user posts: find_threads unavailable");

    store.fail("count_users");
    let search = SearchUsers {
        exclude_identity_id: "nobody".to_string(),
        query: String::new(),
        page: PageRequest::default(),
        sort: SortOrder::Desc,
    };
    let err = client.users().search_users(search).await.unwrap_err();
    assert_storage(err, "Failed to fetch users: count_users unavailable");

    store.fail("find_threads_by_author");
    let err = client.activity().get_reply_activity("u1", PageRequest::default()).await.unwrap_err();
    assert_storage(err, "Failed to fetch activity: find_threads_by_author unavailable");
}

#[tokio::test]
async fn test_failed_insert_stores_nothing() {
    let (client, store, revalidator) = setup();
    let alice = onboard(&client, "u1", "Alice").await;
    store.fail("insert_thread");

    let err = client.threads().create_thread(create(&alice.id, "hello")).await.unwrap_err();

    assert_storage(err, "Failed to create thread: insert_thread unavailable");
    assert!(revalidator.paths().is_empty());
    assert_eq!(store.inner.count_top_level_threads().await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_author_link_leaves_thread_stored() {
    let (client, store, revalidator) = setup();
    let alice = onboard(&client, "u1", "Alice").await;
    store.fail("push_user_thread");

    let err = client.threads().create_thread(create(&alice.id, "hello")).await.unwrap_err();

    assert_storage(err, "Failed to create thread: push_user_thread unavailable");
    assert!(revalidator.paths().is_empty());

    let stored = store.inner.find_threads_by_author(&alice.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    let alice = store.inner.find_user_by_identity("u1").await.unwrap().unwrap();
    assert!(alice.threads.is_empty());
}

#[tokio::test]
async fn test_unmatched_author_link_still_returns_thread() {
    let (client, store, revalidator) = setup();
    let alice = onboard(&client, "u1", "Alice").await;
    store.miss("push_user_thread");

    let thread = client.threads().create_thread(create(&alice.id, "hello")).await.unwrap();

    assert_eq!(revalidator.paths(), vec!["/create-thread".to_string()]);
    let feed = client.threads().list_top_level_threads(PageRequest::default()).await.unwrap();
    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].id, thread.id);
    let alice = store.inner.find_user_by_identity("u1").await.unwrap().unwrap();
    assert!(!alice.threads.contains(&thread.id));
}

#[tokio::test]
async fn test_failed_reply_link_leaves_reply_stored() {
    let (client, store, revalidator) = setup();
    let alice = onboard(&client, "u1", "Alice").await;
    let bob = onboard(&client, "u2", "Bob").await;
    let parent = client.threads().create_thread(create(&alice.id, "hello")).await.unwrap();
    store.fail("push_thread_child");

    let err = client.threads().add_reply(answer(&parent.id, &bob.id)).await.unwrap_err();

    assert_storage(err, "Failed to add comment: push_thread_child unavailable");
    assert_eq!(revalidator.paths(), vec!["/create-thread".to_string()]);

    let orphans = store.inner.find_threads_by_author(&bob.id).await.unwrap();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].parent_id.as_deref(), Some(parent.id.as_str()));
    let parent = store.inner.find_thread(&parent.id).await.unwrap().unwrap();
    assert!(parent.children.is_empty());
}

#[tokio::test]
async fn test_vanished_parent_reports_not_found_after_reply_is_stored() {
    let (client, store, revalidator) = setup();
    let alice = onboard(&client, "u1", "Alice").await;
    let bob = onboard(&client, "u2", "Bob").await;
    let parent = client.threads().create_thread(create(&alice.id, "hello")).await.unwrap();
    store.miss("push_thread_child");

    let err = client.threads().add_reply(answer(&parent.id, &bob.id)).await.unwrap_err();

    assert!(matches!(err, PersistError::ThreadNotFound(ref id) if *id == parent.id));
    assert_eq!(revalidator.paths(), vec!["/create-thread".to_string()]);
    assert_eq!(store.inner.find_threads_by_author(&bob.id).await.unwrap().len(), 1);
    let tree = client.threads().get_thread_by_id(&parent.id).await.unwrap();
    assert!(tree.children.is_empty());
}

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{PersistError, Result};
use crate::models::{NewThread, SortOrder, Thread, User, UserFilter, UserProfile};
use crate::trait_client::PersistenceClient;

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    threads: Vec<Thread>,
}

/// Process-local store with the same query semantics as the MongoDB backend.
///
/// Records are kept in insertion order, so creation-time ties sort by
/// insertion.
#[derive(Default)]
pub struct MemoryPersistenceClient {
    data: RwLock<Collections>,
}

impl MemoryPersistenceClient {
    pub fn new() -> Self {
        Self::default()
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn paginate<T>(mut items: Vec<T>, skip: u64, limit: i64) -> Vec<T> {
    let skip = usize::try_from(skip).unwrap_or(usize::MAX).min(items.len());
    items.drain(..skip);
    if limit > 0 {
        items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }
    items
}

/// Stable sort by creation time; descending puts the latest insert first on ties.
fn sort_by_created<T>(items: &mut [T], order: SortOrder, created: impl Fn(&T) -> chrono::DateTime<Utc>) {
    items.sort_by_key(|item| created(item));
    if order == SortOrder::Desc {
        items.reverse();
    }
}

fn replies<'a>(threads: &'a [Thread], ids: &[String], exclude_author: &str) -> Vec<&'a Thread> {
    let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
    threads
        .iter()
        .filter(|t| wanted.contains(t.id.as_str()) && t.author != exclude_author)
        .collect()
}

#[async_trait]
impl PersistenceClient for MemoryPersistenceClient {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn upsert_user(&self, profile: UserProfile) -> Result<()> {
        let mut data = self.data.write().await;
        let taken = data
            .users
            .iter()
            .any(|u| u.username == profile.username && u.identity_id != profile.identity_id);
        if taken {
            return Err(PersistError::UsernameTaken(profile.username));
        }

        match data.users.iter_mut().find(|u| u.identity_id == profile.identity_id) {
            Some(user) => {
                user.username = profile.username;
                user.name = profile.name;
                user.bio = profile.bio;
                user.image = profile.image;
                user.onboarded = true;
            }
            None => data.users.push(User {
                id: new_id(),
                identity_id: profile.identity_id,
                username: profile.username,
                name: profile.name,
                bio: profile.bio,
                image: profile.image,
                onboarded: true,
                threads: Vec::new(),
                created_at: Utc::now(),
            }),
        }
        Ok(())
    }

    async fn find_user_by_identity(&self, identity_id: &str) -> Result<Option<User>> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|u| u.identity_id == identity_id).cloned())
    }

    async fn find_users(&self, ids: &[String]) -> Result<Vec<User>> {
        let data = self.data.read().await;
        Ok(data.users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn push_user_thread(&self, user_id: &str, thread_id: &str) -> Result<bool> {
        let mut data = self.data.write().await;
        match data.users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.threads.push(thread_id.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn search_users(
        &self,
        filter: &UserFilter,
        sort: SortOrder,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<User>> {
        let data = self.data.read().await;
        let mut users: Vec<User> = data.users.iter().filter(|u| filter.matches(u)).cloned().collect();
        sort_by_created(&mut users, sort, |u| u.created_at);
        Ok(paginate(users, skip, limit))
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<u64> {
        let data = self.data.read().await;
        Ok(data.users.iter().filter(|u| filter.matches(u)).count() as u64)
    }

    async fn insert_thread(&self, thread: NewThread) -> Result<Thread> {
        let thread = Thread {
            id: new_id(),
            text: thread.text,
            author: thread.author,
            parent_id: thread.parent_id,
            children: Vec::new(),
            community: None,
            created_at: Utc::now(),
        };
        self.data.write().await.threads.push(thread.clone());
        Ok(thread)
    }

    async fn find_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        let data = self.data.read().await;
        Ok(data.threads.iter().find(|t| t.id == thread_id).cloned())
    }

    async fn find_threads(&self, ids: &[String]) -> Result<Vec<Thread>> {
        let data = self.data.read().await;
        Ok(data.threads.iter().filter(|t| ids.contains(&t.id)).cloned().collect())
    }

    async fn push_thread_child(&self, parent_id: &str, child_id: &str) -> Result<bool> {
        let mut data = self.data.write().await;
        match data.threads.iter_mut().find(|t| t.id == parent_id) {
            Some(parent) => {
                parent.children.push(child_id.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_top_level_threads(&self, skip: u64, limit: i64) -> Result<Vec<Thread>> {
        let data = self.data.read().await;
        let mut threads: Vec<Thread> = data.threads.iter().filter(|t| t.is_top_level()).cloned().collect();
        sort_by_created(&mut threads, SortOrder::Desc, |t| t.created_at);
        Ok(paginate(threads, skip, limit))
    }

    async fn count_top_level_threads(&self) -> Result<u64> {
        let data = self.data.read().await;
        Ok(data.threads.iter().filter(|t| t.is_top_level()).count() as u64)
    }

    async fn find_threads_by_author(&self, author_id: &str) -> Result<Vec<Thread>> {
        let data = self.data.read().await;
        Ok(data.threads.iter().filter(|t| t.author == author_id).cloned().collect())
    }

    async fn find_replies(
        &self,
        ids: &[String],
        exclude_author: &str,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Thread>> {
        let data = self.data.read().await;
        let mut found: Vec<Thread> = replies(&data.threads, ids, exclude_author).into_iter().cloned().collect();
        sort_by_created(&mut found, SortOrder::Desc, |t| t.created_at);
        Ok(paginate(found, skip, limit))
    }

    async fn count_replies(&self, ids: &[String], exclude_author: &str) -> Result<u64> {
        let data = self.data.read().await;
        Ok(replies(&data.threads, ids, exclude_author).len() as u64)
    }
}

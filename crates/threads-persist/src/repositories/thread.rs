use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{OperationExt, PersistError, Result};
use crate::models::{NewThread, Page, PageRequest, Thread, ThreadTree, ThreadWithReplies};
use crate::populate;
use crate::revalidate::Revalidator;
use crate::trait_client::PersistenceClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateThread {
    pub text: String,
    /// Store id of the author
    pub author_id: String,
    /// Accepted but not stored; communities are not supported
    #[serde(default)]
    pub community_id: Option<String>,
    /// Route to revalidate once the thread exists
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddReply {
    pub parent_id: String,
    pub text: String,
    /// Store id of the author
    pub author_id: String,
    pub path: String,
}

#[derive(Clone)]
pub struct ThreadRepository {
    client: Arc<dyn PersistenceClient>,
    revalidator: Arc<dyn Revalidator>,
}

impl ThreadRepository {
    pub fn new(client: Arc<dyn PersistenceClient>, revalidator: Arc<dyn Revalidator>) -> Self {
        Self { client, revalidator }
    }

    /// Create a top-level thread and link it to its author.
    ///
    /// Insert and link are separate writes: if linking fails the thread
    /// remains stored without appearing in the author's list.
    pub async fn create_thread(&self, input: CreateThread) -> Result<Thread> {
        let thread = self.insert_and_link(input.text, input.author_id)
            .await
            .during("Failed to create thread")?;

        tracing::info!(thread_id = %thread.id, author = %thread.author, "Thread created");
        self.revalidator.revalidate(&input.path);
        Ok(thread)
    }

    async fn ensure_author(&self, author_id: &str) -> Result<()> {
        let found = self.client.find_users(&[author_id.to_string()]).await?;
        if found.is_empty() {
            return Err(PersistError::UserNotFound(author_id.to_string()));
        }
        Ok(())
    }

    async fn insert_and_link(&self, text: String, author_id: String) -> Result<Thread> {
        self.ensure_author(&author_id).await?;

        let thread = self.client
            .insert_thread(NewThread { text, author: author_id, parent_id: None })
            .await?;
        if !self.client.push_user_thread(&thread.author, &thread.id).await? {
            tracing::warn!(thread_id = %thread.id, author = %thread.author, "Author vanished before thread was linked");
        }
        Ok(thread)
    }

    /// Newest top-level threads, each with author and direct replies
    pub async fn list_top_level_threads(&self, page: PageRequest) -> Result<Page<ThreadWithReplies>> {
        self.load_top_level(page)
            .await
            .during("Failed to fetch threads")
    }

    async fn load_top_level(&self, page: PageRequest) -> Result<Page<ThreadWithReplies>> {
        let client = self.client.as_ref();
        let threads = client.list_top_level_threads(page.skip(), page.limit()).await?;
        let total = client.count_top_level_threads().await?;

        let replies = populate::children(client, &threads).await?;
        let authors = populate::authors(client, threads.iter().chain(replies.values())).await?;

        let items = threads
            .into_iter()
            .map(|t| populate::branch(t, &authors, &replies, |r| populate::leaf(r, &authors)))
            .collect();
        Ok(Page::new(items, total, &page))
    }

    /// One thread with replies and replies of replies, every author resolved
    pub async fn get_thread_by_id(&self, thread_id: &str) -> Result<ThreadTree> {
        self.load_tree(thread_id)
            .await
            .during("Failed to fetch thread")
    }

    async fn load_tree(&self, thread_id: &str) -> Result<ThreadTree> {
        let client = self.client.as_ref();
        let thread = client
            .find_thread(thread_id)
            .await?
            .ok_or_else(|| PersistError::ThreadNotFound(thread_id.to_string()))?;

        let replies = populate::children(client, std::iter::once(&thread)).await?;
        let nested = populate::children(client, replies.values()).await?;
        let authors = populate::authors(
            client,
            std::iter::once(&thread).chain(replies.values()).chain(nested.values()),
        )
        .await?;

        Ok(populate::branch(thread, &authors, &replies, |reply| {
            populate::branch(reply, &authors, &nested, |r| populate::leaf(r, &authors))
        }))
    }

    /// Reply to an existing thread as an existing user.
    ///
    /// The reply is stored first and then appended to the parent's children;
    /// the two writes are not atomic.
    pub async fn add_reply(&self, input: AddReply) -> Result<Thread> {
        let reply = self.insert_reply(input.parent_id, input.text, input.author_id)
            .await
            .during("Failed to add comment")?;

        tracing::info!(thread_id = %reply.id, parent_id = ?reply.parent_id, "Reply added");
        self.revalidator.revalidate(&input.path);
        Ok(reply)
    }

    async fn insert_reply(&self, parent_id: String, text: String, author_id: String) -> Result<Thread> {
        let parent = self.client
            .find_thread(&parent_id)
            .await?
            .ok_or(PersistError::ThreadNotFound(parent_id))?;
        self.ensure_author(&author_id).await?;

        let reply = self.client
            .insert_thread(NewThread {
                text,
                author: author_id,
                parent_id: Some(parent.id.clone()),
            })
            .await?;

        if !self.client.push_thread_child(&parent.id, &reply.id).await? {
            tracing::warn!(parent_id = %parent.id, reply_id = %reply.id, "Parent vanished before reply was linked");
            return Err(PersistError::ThreadNotFound(parent.id));
        }
        Ok(reply)
    }
}

use std::sync::Arc;

use crate::error::{OperationExt, Result};
use crate::models::{Page, PageRequest, ThreadLeaf};
use crate::populate;
use crate::trait_client::PersistenceClient;

/// Notification feed: replies other users left on someone's threads
#[derive(Clone)]
pub struct ActivityAggregator {
    client: Arc<dyn PersistenceClient>,
}

impl ActivityAggregator {
    pub fn new(client: Arc<dyn PersistenceClient>) -> Self {
        Self { client }
    }

    /// Replies to the user's threads written by anyone but the user, newest
    /// first. An unknown identity has no activity.
    pub async fn get_reply_activity(
        &self,
        identity_id: &str,
        page: PageRequest,
    ) -> Result<Page<ThreadLeaf>> {
        self.load(identity_id, page)
            .await
            .during("Failed to fetch activity")
    }

    async fn load(&self, identity_id: &str, page: PageRequest) -> Result<Page<ThreadLeaf>> {
        let client = self.client.as_ref();
        let Some(user) = client.find_user_by_identity(identity_id).await? else {
            return Ok(Page::empty());
        };

        let authored = client.find_threads_by_author(&user.id).await?;
        let child_ids: Vec<String> = authored
            .into_iter()
            .flat_map(|t| t.children)
            .collect();
        if child_ids.is_empty() {
            return Ok(Page::empty());
        }

        let replies = client
            .find_replies(&child_ids, &user.id, page.skip(), page.limit())
            .await?;
        let total = client.count_replies(&child_ids, &user.id).await?;
        let authors = populate::authors(client, &replies).await?;

        let items = replies.into_iter().map(|r| populate::leaf(r, &authors)).collect();
        Ok(Page::new(items, total, &page))
    }
}

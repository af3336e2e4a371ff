use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{OperationExt, Result};
use crate::models::{
    AuthorSummary, Page, PageRequest, SortOrder, Thread, ThreadWithReplies, User, UserFilter,
    UserProfile,
};
use crate::populate;
use crate::revalidate::Revalidator;
use crate::trait_client::PersistenceClient;

/// Route whose cached render is refreshed after a profile edit
pub const PROFILE_EDIT_PATH: &str = "/profile/edit";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertUser {
    pub identity_id: String,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub image: String,
    /// Route the submission came from
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchUsers {
    pub exclude_identity_id: String,
    #[serde(default)]
    pub query: String,
    pub page: PageRequest,
    #[serde(default)]
    pub sort: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithThreads {
    pub user: User,
    /// Owned threads, oldest first, each with its direct replies
    pub threads: Vec<ThreadWithReplies>,
}

#[derive(Clone)]
pub struct UserRepository {
    client: Arc<dyn PersistenceClient>,
    revalidator: Arc<dyn Revalidator>,
}

impl UserRepository {
    pub fn new(client: Arc<dyn PersistenceClient>, revalidator: Arc<dyn Revalidator>) -> Self {
        Self { client, revalidator }
    }

    /// Create or update the profile for an identity and mark it onboarded
    pub async fn upsert_user(&self, input: UpsertUser) -> Result<()> {
        let profile = UserProfile {
            identity_id: input.identity_id,
            username: input.username.to_lowercase(),
            name: input.name,
            bio: input.bio,
            image: input.image,
        };
        tracing::debug!(identity_id = %profile.identity_id, "Upserting user");

        self.client
            .upsert_user(profile)
            .await
            .during("Failed to create/update user")?;

        if input.path.as_deref() == Some(PROFILE_EDIT_PATH) {
            self.revalidator.revalidate(PROFILE_EDIT_PATH);
        }
        Ok(())
    }

    pub async fn get_user_by_identity_id(&self, identity_id: &str) -> Result<Option<User>> {
        self.client
            .find_user_by_identity(identity_id)
            .await
            .during("Failed to fetch user")
    }

    /// The user with every owned thread and that thread's direct replies
    pub async fn get_user_threads_with_replies(
        &self,
        identity_id: &str,
    ) -> Result<Option<UserWithThreads>> {
        self.load_user_threads(identity_id)
            .await
            .during("Failed to fetch user posts")
    }

    async fn load_user_threads(&self, identity_id: &str) -> Result<Option<UserWithThreads>> {
        let Some(user) = self.client.find_user_by_identity(identity_id).await? else {
            return Ok(None);
        };

        let found: HashMap<String, Thread> = self.client
            .find_threads(&user.threads)
            .await?
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();
        let owned = populate::in_order(&user.threads, &found);
        let replies = populate::children(self.client.as_ref(), &owned).await?;
        let mut authors = populate::authors(self.client.as_ref(), replies.values()).await?;
        authors.insert(user.id.clone(), AuthorSummary::from(&user));

        let threads = owned
            .into_iter()
            .map(|t| populate::branch(t, &authors, &replies, |r| populate::leaf(r, &authors)))
            .collect();

        Ok(Some(UserWithThreads { user, threads }))
    }

    /// A page of users other than the searcher, filtered by name or username
    pub async fn search_users(&self, search: SearchUsers) -> Result<Page<User>> {
        let filter = UserFilter::new(search.exclude_identity_id, &search.query);
        let page = search.page;

        let users = self.client
            .search_users(&filter, search.sort, page.skip(), page.limit())
            .await
            .during("Failed to fetch users")?;
        let total = self.client
            .count_users(&filter)
            .await
            .during("Failed to fetch users")?;

        Ok(Page::new(users, total, &page))
    }
}

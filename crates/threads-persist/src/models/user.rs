use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Database-agnostic user model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Id issued by the identity provider; the lookup key for every user query
    pub identity_id: String,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub image: String,
    pub onboarded: bool,
    /// Owned threads, oldest first
    pub threads: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile fields written by an upsert keyed on `identity_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub identity_id: String,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub image: String,
}

/// Projection of a user embedded into populated threads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: String,
    pub identity_id: String,
    pub name: String,
    pub image: String,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            identity_id: user.identity_id.clone(),
            name: user.name.clone(),
            image: user.image.clone(),
        }
    }
}

/// Filter for user search: everyone but `exclude_identity_id`, optionally
/// narrowed to names or usernames containing `query` (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub exclude_identity_id: String,
    pub query: Option<String>,
}

impl UserFilter {
    pub fn new(exclude_identity_id: impl Into<String>, query: &str) -> Self {
        let query = query.trim();
        Self {
            exclude_identity_id: exclude_identity_id.into(),
            query: (!query.is_empty()).then(|| query.to_string()),
        }
    }

    /// Query text as a literal, case-insensitive regex pattern
    pub fn pattern(&self) -> Option<String> {
        self.query.as_deref().map(regex::escape)
    }

    pub fn matches(&self, user: &User) -> bool {
        if user.identity_id == self.exclude_identity_id {
            return false;
        }
        let Some(pattern) = self.pattern() else {
            return true;
        };
        match regex::RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(re) => re.is_match(&user.name) || re.is_match(&user.username),
            Err(_) => false,
        }
    }
}

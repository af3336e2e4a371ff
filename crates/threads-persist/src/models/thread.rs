use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use super::AuthorSummary;

/// Database-agnostic thread model
///
/// A thread with `parent_id == None` is a top-level post; anything else is a
/// reply and is expected to be listed in its parent's `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub text: String,
    /// Store id of the authoring user
    pub author: String,
    pub parent_id: Option<String>,
    /// Replies, oldest first
    pub children: Vec<String>,
    pub community: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Thread {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Fields supplied by the caller on insert; the store assigns id and timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewThread {
    pub text: String,
    pub author: String,
    pub parent_id: Option<String>,
}

/// A thread with its author resolved and children of type `C`.
///
/// `C` is `String` at the deepest level (unresolved child ids) or another
/// `PopulatedThread` one level up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulatedThread<C> {
    pub id: String,
    pub text: String,
    /// `None` when the stored author reference no longer resolves
    pub author: Option<AuthorSummary>,
    pub parent_id: Option<String>,
    pub community: Option<String>,
    pub created_at: DateTime<Utc>,
    pub children: Vec<C>,
}

impl<C> PopulatedThread<C> {
    pub fn from_thread(thread: Thread, author: Option<AuthorSummary>, children: Vec<C>) -> Self {
        Self {
            id: thread.id,
            text: thread.text,
            author,
            parent_id: thread.parent_id,
            community: thread.community,
            created_at: thread.created_at,
            children,
        }
    }

    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.id.as_str())
    }
}

/// A reply with its author resolved and its own replies left as ids
pub type ThreadLeaf = PopulatedThread<String>;

/// Two levels: thread and author, direct replies and their authors
pub type ThreadWithReplies = PopulatedThread<ThreadLeaf>;

/// Three levels: as `ThreadWithReplies`, plus replies of replies
pub type ThreadTree = PopulatedThread<ThreadWithReplies>;

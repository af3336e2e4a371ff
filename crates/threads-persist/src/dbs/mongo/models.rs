use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::error::{PersistError, Result};
use crate::models::{Thread, User};

/// MongoDB-specific User model (uses ObjectId)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUser {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub identity_id: String,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub onboarded: bool,
    #[serde(default)]
    pub threads: Vec<ObjectId>,
    pub created_at: bson::DateTime,
}

/// MongoDB-specific Thread model (uses ObjectId)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoThread {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub text: String,
    pub author: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ObjectId>,
    #[serde(default)]
    pub children: Vec<ObjectId>,
    #[serde(default)]
    pub community: Option<ObjectId>,
    pub created_at: bson::DateTime,
}

pub fn parse_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|e| PersistError::InvalidObjectId(format!("{}: {}", id, e)))
}

/// Parse a batch of ids, dropping the ones that cannot match any document
pub fn parse_ids(ids: &[String]) -> Vec<ObjectId> {
    ids.iter().filter_map(|id| ObjectId::parse_str(id).ok()).collect()
}

// Conversions between database-agnostic and MongoDB-specific models

impl From<MongoUser> for User {
    fn from(user: MongoUser) -> Self {
        Self {
            id: user.id.to_hex(),
            identity_id: user.identity_id,
            username: user.username,
            name: user.name,
            bio: user.bio,
            image: user.image,
            onboarded: user.onboarded,
            threads: user.threads.iter().map(|id| id.to_hex()).collect(),
            created_at: user.created_at.to_chrono(),
        }
    }
}

impl From<MongoThread> for Thread {
    fn from(thread: MongoThread) -> Self {
        Self {
            id: thread.id.to_hex(),
            text: thread.text,
            author: thread.author.to_hex(),
            parent_id: thread.parent_id.map(|id| id.to_hex()),
            children: thread.children.iter().map(|id| id.to_hex()).collect(),
            community: thread.community.map(|id| id.to_hex()),
            created_at: thread.created_at.to_chrono(),
        }
    }
}

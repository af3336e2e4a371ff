use mongodb::{Collection, Database, bson::{self, doc, Document}, bson::oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use futures::TryStreamExt;

use crate::dbs::mongo::models::MongoUser;
use crate::error::{PersistError, Result};
use crate::models::{SortOrder, UserFilter, UserProfile};

const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY
    )
}

#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<MongoUser>,
}

fn filter_document(filter: &UserFilter) -> Document {
    let mut query = doc! { "identity_id": { "$ne": filter.exclude_identity_id.as_str() } };
    if let Some(pattern) = filter.pattern() {
        query.insert(
            "$or",
            vec![
                doc! { "name": { "$regex": pattern.as_str(), "$options": "i" } },
                doc! { "username": { "$regex": pattern.as_str(), "$options": "i" } },
            ],
        );
    }
    query
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection("users");
        Self { collection }
    }

    /// Upsert keyed on identity id; creation-only fields are set on insert.
    ///
    /// Relies on the unique `identity_id` and `username` indexes. A duplicate
    /// key on the first attempt may come from a racing upsert of the same
    /// identity, so it is retried once as a plain update before being reported
    /// as a username clash.
    pub async fn upsert(&self, profile: UserProfile) -> Result<()> {
        match self.try_upsert(&profile).await {
            Err(e) if is_duplicate_key(&e) => match self.try_upsert(&profile).await {
                Err(e) if is_duplicate_key(&e) => Err(PersistError::UsernameTaken(profile.username)),
                other => other.map_err(PersistError::from),
            },
            other => other.map_err(PersistError::from),
        }
    }

    async fn try_upsert(&self, profile: &UserProfile) -> mongodb::error::Result<()> {
        let filter = doc! { "identity_id": profile.identity_id.as_str() };
        let update = doc! {
            "$set": {
                "username": profile.username.as_str(),
                "name": profile.name.as_str(),
                "bio": profile.bio.as_str(),
                "image": profile.image.as_str(),
                "onboarded": true,
            },
            "$setOnInsert": {
                "threads": [],
                "created_at": bson::DateTime::now(),
            }
        };

        self.collection.update_one(filter, update).upsert(true).await?;
        Ok(())
    }

    pub async fn find_by_identity(&self, identity_id: &str) -> Result<Option<MongoUser>> {
        let filter = doc! { "identity_id": identity_id };
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn find_many(&self, ids: Vec<ObjectId>) -> Result<Vec<MongoUser>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let filter = doc! { "_id": { "$in": ids } };
        let users = self.collection
            .find(filter)
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }

    pub async fn push_thread(&self, user_id: ObjectId, thread_id: ObjectId) -> Result<bool> {
        let filter = doc! { "_id": user_id };
        let update = doc! { "$push": { "threads": thread_id } };
        let result = self.collection.update_one(filter, update).await?;
        Ok(result.matched_count > 0)
    }

    pub async fn search(
        &self,
        filter: &UserFilter,
        sort: SortOrder,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<MongoUser>> {
        let users = self.collection
            .find(filter_document(filter))
            .sort(doc! { "created_at": sort.direction() })
            .skip(skip)
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }

    pub async fn count(&self, filter: &UserFilter) -> Result<u64> {
        Ok(self.collection.count_documents(filter_document(filter)).await?)
    }
}

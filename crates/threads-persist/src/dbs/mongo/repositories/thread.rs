use mongodb::{Collection, Database, bson::{self, doc, Bson}, bson::oid::ObjectId};
use futures::TryStreamExt;

use crate::dbs::mongo::models::MongoThread;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoThreadRepository {
    collection: Collection<MongoThread>,
}

impl MongoThreadRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection("threads");
        Self { collection }
    }

    /// Create a new thread
    pub async fn create_thread(
        &self,
        text: String,
        author: ObjectId,
        parent_id: Option<ObjectId>,
    ) -> Result<MongoThread> {
        let thread = MongoThread {
            id: ObjectId::new(),
            text,
            author,
            parent_id,
            children: Vec::new(),
            community: None,
            created_at: bson::DateTime::now(),
        };

        self.collection.insert_one(&thread).await?;
        Ok(thread)
    }

    /// Get thread by ID
    pub async fn get_thread(&self, thread_id: ObjectId) -> Result<Option<MongoThread>> {
        let filter = doc! { "_id": thread_id };
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn get_threads(&self, ids: Vec<ObjectId>) -> Result<Vec<MongoThread>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let filter = doc! { "_id": { "$in": ids } };
        let threads = self.collection
            .find(filter)
            .await?
            .try_collect()
            .await?;
        Ok(threads)
    }

    /// Append a reply id to the parent's children
    pub async fn push_child(&self, parent_id: ObjectId, child_id: ObjectId) -> Result<bool> {
        let filter = doc! { "_id": parent_id };
        let update = doc! { "$push": { "children": child_id } };
        let result = self.collection.update_one(filter, update).await?;
        Ok(result.matched_count > 0)
    }

    /// Threads whose parent is null or missing, newest first
    pub async fn list_top_level(&self, skip: u64, limit: i64) -> Result<Vec<MongoThread>> {
        let threads = self.collection
            .find(doc! { "parent_id": Bson::Null })
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(threads)
    }

    pub async fn count_top_level(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! { "parent_id": Bson::Null }).await?)
    }

    pub async fn list_by_author(&self, author: ObjectId) -> Result<Vec<MongoThread>> {
        let threads = self.collection
            .find(doc! { "author": author })
            .await?
            .try_collect()
            .await?;
        Ok(threads)
    }

    /// Threads among `ids` written by someone other than `exclude_author`
    pub async fn list_replies(
        &self,
        ids: Vec<ObjectId>,
        exclude_author: ObjectId,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<MongoThread>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let filter = doc! {
            "_id": { "$in": ids },
            "author": { "$ne": exclude_author },
        };
        let threads = self.collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(threads)
    }

    pub async fn count_replies(&self, ids: Vec<ObjectId>, exclude_author: ObjectId) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let filter = doc! {
            "_id": { "$in": ids },
            "author": { "$ne": exclude_author },
        };
        Ok(self.collection.count_documents(filter).await?)
    }
}

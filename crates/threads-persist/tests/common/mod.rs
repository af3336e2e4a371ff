#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use threads_persist::{
    MemoryPersistenceClient, PersistClient, Revalidator, UpsertUser, User,
};

#[derive(Default)]
pub struct RecordingRevalidator {
    pub paths: Mutex<Vec<String>>,
}

impl RecordingRevalidator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Revalidator for RecordingRevalidator {
    fn revalidate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

pub fn setup() -> (PersistClient, Arc<RecordingRevalidator>) {
    let revalidator = Arc::new(RecordingRevalidator::default());
    let client = PersistClient::builder()
        .store(Arc::new(MemoryPersistenceClient::new()))
        .revalidator(revalidator.clone())
        .build()
        .unwrap();
    (client, revalidator)
}

pub fn profile(identity_id: &str, name: &str) -> UpsertUser {
    UpsertUser {
        identity_id: identity_id.to_string(),
        username: name.to_string(),
        name: name.to_string(),
        bio: format!("{}'s bio", name),
        image: format!("https://img.example/{}.png", identity_id),
        path: None,
    }
}

/// Upsert a user and return the stored document
pub async fn onboard(client: &PersistClient, identity_id: &str, name: &str) -> User {
    client.users().upsert_user(profile(identity_id, name)).await.unwrap();
    client
        .users()
        .get_user_by_identity_id(identity_id)
        .await
        .unwrap()
        .unwrap()
}

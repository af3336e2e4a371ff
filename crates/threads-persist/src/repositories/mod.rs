pub mod thread;
pub mod user;

pub use thread::{AddReply, CreateThread, ThreadRepository};
pub use user::{SearchUsers, UpsertUser, UserRepository, UserWithThreads, PROFILE_EDIT_PATH};

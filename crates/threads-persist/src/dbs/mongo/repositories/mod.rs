pub mod thread;
pub mod user;

pub use thread::MongoThreadRepository;
pub use user::MongoUserRepository;

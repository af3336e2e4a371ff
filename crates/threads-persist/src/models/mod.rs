mod page;
mod thread;
mod user;

// Export database-agnostic models
pub use page::{Page, PageRequest, SortOrder, DEFAULT_PAGE_SIZE};
pub use thread::{NewThread, PopulatedThread, Thread, ThreadLeaf, ThreadTree, ThreadWithReplies};
pub use user::{AuthorSummary, User, UserFilter, UserProfile};

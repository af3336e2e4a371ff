//! Resolution of stored references into populated views.
//!
//! Each level costs one `$in` query for threads and one for their authors,
//! independent of how many threads the level holds.

use std::collections::HashMap;

use crate::error::Result;
use crate::models::{AuthorSummary, PopulatedThread, Thread, ThreadLeaf};
use crate::trait_client::PersistenceClient;

pub(crate) type Authors = HashMap<String, AuthorSummary>;

fn dedup(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// Author summaries for every thread given, keyed by user id
pub(crate) async fn authors<'a>(
    client: &dyn PersistenceClient,
    threads: impl IntoIterator<Item = &'a Thread>,
) -> Result<Authors> {
    let ids = dedup(threads.into_iter().map(|t| t.author.clone()));
    if ids.is_empty() {
        return Ok(Authors::new());
    }
    let users = client.find_users(&ids).await?;
    Ok(users.iter().map(|u| (u.id.clone(), AuthorSummary::from(u))).collect())
}

/// All children of the given threads, keyed by id
pub(crate) async fn children<'a>(
    client: &dyn PersistenceClient,
    parents: impl IntoIterator<Item = &'a Thread>,
) -> Result<HashMap<String, Thread>> {
    let ids = dedup(parents.into_iter().flat_map(|t| t.children.iter().cloned()));
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let found = client.find_threads(&ids).await?;
    Ok(found.into_iter().map(|t| (t.id.clone(), t)).collect())
}

/// Look up `ids` in `found`, keeping stored order and skipping dangling ids
pub(crate) fn in_order(ids: &[String], found: &HashMap<String, Thread>) -> Vec<Thread> {
    ids.iter().filter_map(|id| found.get(id).cloned()).collect()
}

pub(crate) fn leaf(thread: Thread, authors: &Authors) -> ThreadLeaf {
    let author = authors.get(&thread.author).cloned();
    let children = thread.children.clone();
    PopulatedThread::from_thread(thread, author, children)
}

/// Attach an already-populated child level to `thread`
pub(crate) fn branch<C>(
    thread: Thread,
    authors: &Authors,
    found: &HashMap<String, Thread>,
    mut child: impl FnMut(Thread) -> C,
) -> PopulatedThread<C> {
    let author = authors.get(&thread.author).cloned();
    let children = in_order(&thread.children, found).into_iter().map(&mut child).collect();
    PopulatedThread::from_thread(thread, author, children)
}

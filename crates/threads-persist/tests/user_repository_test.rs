mod common;

use common::{onboard, profile, setup};
use threads_persist::{
    CreateThread, PageRequest, PersistError, SearchUsers, SortOrder, PROFILE_EDIT_PATH,
};

fn search(exclude: &str, query: &str, page: u64, page_size: u64) -> SearchUsers {
    SearchUsers {
        exclude_identity_id: exclude.to_string(),
        query: query.to_string(),
        page: PageRequest::new(page, page_size),
        sort: SortOrder::Desc,
    }
}

#[tokio::test]
async fn test_upsert_lowercases_username_and_onboards() {
    let (client, _) = setup();
    let mut input = profile("u1", "Alice");
    input.username = "AliceInWonderland".to_string();

    client.users().upsert_user(input).await.unwrap();
    let user = client.users().get_user_by_identity_id("u1").await.unwrap().unwrap();

    assert_eq!(user.username, "aliceinwonderland");
    assert_eq!(user.name, "Alice");
    assert!(user.onboarded);
    assert!(user.threads.is_empty());
}

#[tokio::test]
async fn test_upsert_is_idempotent_per_identity() {
    let (client, _) = setup();
    let mut first = profile("u1", "Alice");
    first.bio = "first bio".to_string();
    let mut second = profile("u1", "Alice");
    second.bio = "second bio".to_string();

    client.users().upsert_user(first).await.unwrap();
    let created = client.users().get_user_by_identity_id("u1").await.unwrap().unwrap();
    client.users().upsert_user(second).await.unwrap();
    let updated = client.users().get_user_by_identity_id("u1").await.unwrap().unwrap();

    assert_eq!(updated.bio, "second bio");
    assert_eq!(updated.id, created.id);
    let everyone = client.users().search_users(search("nobody", "", 1, 50)).await.unwrap();
    assert_eq!(everyone.items.len(), 1);
}

#[tokio::test]
async fn test_profile_edit_path_is_revalidated() {
    let (client, revalidator) = setup();
    let mut onboarding = profile("u1", "Alice");
    onboarding.path = Some("/onboarding".to_string());
    let mut edit = profile("u1", "Alice");
    edit.path = Some(PROFILE_EDIT_PATH.to_string());

    client.users().upsert_user(onboarding).await.unwrap();
    assert!(revalidator.paths().is_empty());

    client.users().upsert_user(edit).await.unwrap();
    assert_eq!(revalidator.paths(), vec![PROFILE_EDIT_PATH.to_string()]);
}

#[tokio::test]
async fn test_unknown_identity_is_absent() {
    let (client, _) = setup();

    assert!(client.users().get_user_by_identity_id("ghost").await.unwrap().is_none());
    assert!(client.users().get_user_threads_with_replies("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_query_returns_everyone_but_searcher() {
    let (client, _) = setup();
    for (id, name) in [("u1", "Alice"), ("u2", "Bob"), ("u3", "Carol"), ("u4", "Dave")] {
        onboard(&client, id, name).await;
    }

    let page = client.users().search_users(search("u1", "   ", 1, 25)).await.unwrap();

    assert_eq!(page.items.len(), 3);
    assert!(page.items.iter().all(|u| u.identity_id != "u1"));
    assert!(!page.has_next);
}

#[tokio::test]
async fn test_search_is_case_insensitive_on_name_and_username() {
    let (client, _) = setup();
    onboard(&client, "me", "Me").await;
    onboard(&client, "u1", "Alice").await;
    let mut bob = profile("u2", "Bob");
    bob.username = "MALICE_BOB".to_string();
    client.users().upsert_user(bob).await.unwrap();
    onboard(&client, "u3", "Carol").await;

    let page = client.users().search_users(search("me", "alice", 1, 25)).await.unwrap();
    let mut found: Vec<_> = page.items.iter().map(|u| u.identity_id.as_str()).collect();
    found.sort();

    assert_eq!(found, vec!["u1", "u2"]);
}

#[tokio::test]
async fn test_search_pagination_and_sort_order() {
    let (client, _) = setup();
    for i in 0..5 {
        onboard(&client, &format!("u{}", i), &format!("User{}", i)).await;
    }

    let first = client.users().search_users(search("nobody", "", 1, 2)).await.unwrap();
    let last = client.users().search_users(search("nobody", "", 3, 2)).await.unwrap();

    assert_eq!(first.items.len(), 2);
    assert!(first.has_next);
    assert_eq!(last.items.len(), 1);
    assert!(!last.has_next);

    let mut oldest_first = search("nobody", "", 1, 5);
    oldest_first.sort = SortOrder::Asc;
    let asc = client.users().search_users(oldest_first).await.unwrap();
    let desc = client.users().search_users(search("nobody", "", 1, 5)).await.unwrap();
    let asc_ids: Vec<_> = asc.items.iter().map(|u| u.identity_id.clone()).collect();
    let mut desc_ids: Vec<_> = desc.items.iter().map(|u| u.identity_id.clone()).collect();
    desc_ids.reverse();

    assert_eq!(asc_ids.first().map(String::as_str), Some("u0"));
    assert_eq!(asc_ids, desc_ids);
}

#[tokio::test]
async fn test_user_threads_include_replies_with_authors() {
    let (client, _) = setup();
    let alice = onboard(&client, "u1", "Alice").await;
    let bob = onboard(&client, "u2", "Bob").await;

    let first = client
        .threads()
        .create_thread(CreateThread {
            text: "first".to_string(),
            author_id: alice.id.clone(),
            community_id: None,
            path: "/".to_string(),
        })
        .await
        .unwrap();
    let second = client
        .threads()
        .create_thread(CreateThread {
            text: "second".to_string(),
            author_id: alice.id.clone(),
            community_id: None,
            path: "/".to_string(),
        })
        .await
        .unwrap();
    client
        .threads()
        .add_reply(threads_persist::AddReply {
            parent_id: first.id.clone(),
            text: "nice".to_string(),
            author_id: bob.id.clone(),
            path: format!("/thread/{}", first.id),
        })
        .await
        .unwrap();

    let posts = client.users().get_user_threads_with_replies("u1").await.unwrap().unwrap();

    assert_eq!(posts.user.id, alice.id);
    let ids: Vec<_> = posts.threads.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, vec![first.id.clone(), second.id.clone()]);
    assert_eq!(posts.threads[0].children.len(), 1);
    let reply = &posts.threads[0].children[0];
    assert_eq!(reply.text, "nice");
    assert_eq!(reply.author.as_ref().map(|a| a.name.as_str()), Some("Bob"));
    assert_eq!(reply.author.as_ref().map(|a| a.identity_id.as_str()), Some("u2"));
    assert!(posts.threads[1].children.is_empty());
}

#[tokio::test]
async fn test_username_is_unique_across_identities() {
    let (client, _) = setup();
    let mut first = profile("u1", "Alice");
    first.username = "alice".to_string();
    let mut second = profile("u2", "Alice Two");
    second.username = "ALICE".to_string();

    client.users().upsert_user(first).await.unwrap();
    let err = client.users().upsert_user(second).await.unwrap_err();

    assert!(matches!(err, PersistError::UsernameTaken(ref name) if name == "alice"));
    assert!(client.users().get_user_by_identity_id("u2").await.unwrap().is_none());
    let owner = client.users().get_user_by_identity_id("u1").await.unwrap().unwrap();
    assert_eq!(owner.username, "alice");
}

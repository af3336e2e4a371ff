use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use threads_persist::{AddReply, CreateThread, Page, Thread, ThreadTree, ThreadWithReplies};

use crate::{
    auth::OnboardedUser,
    error::ApiResult,
    routes::{validate_text, PageQuery},
    state::AppState,
};

/// Route the thread composer lives on
pub const CREATE_THREAD_PATH: &str = "/create-thread";

#[derive(Debug, Deserialize)]
pub struct CreateThreadRequest {
    pub text: String,
    #[serde(default)]
    pub community_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub text: String,
}

/// Path of the detail page of a thread
pub fn thread_path(thread_id: &str) -> String {
    format!("/thread/{}", thread_id)
}

/// Home feed: newest top-level threads with their direct replies
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<ThreadWithReplies>>> {
    let page = state
        .persist
        .threads()
        .list_top_level_threads((&query).into())
        .await?;

    Ok(Json(page))
}

/// Post a new top-level thread as the caller
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    OnboardedUser(author): OnboardedUser,
    Json(req): Json<CreateThreadRequest>,
) -> ApiResult<(StatusCode, Json<Thread>)> {
    let thread = state
        .persist
        .threads()
        .create_thread(CreateThread {
            text: validate_text(&req.text)?,
            author_id: author.id,
            community_id: req.community_id,
            path: CREATE_THREAD_PATH.to_string(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(thread)))
}

/// Thread detail with replies and replies of replies
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<ThreadTree>> {
    let thread = state.persist.threads().get_thread_by_id(&thread_id).await?;

    Ok(Json(thread))
}

/// Reply to a thread as the caller
pub async fn add_reply(
    State(state): State<Arc<AppState>>,
    OnboardedUser(author): OnboardedUser,
    Path(thread_id): Path<String>,
    Json(req): Json<ReplyRequest>,
) -> ApiResult<(StatusCode, Json<Thread>)> {
    let reply = state
        .persist
        .threads()
        .add_reply(AddReply {
            text: validate_text(&req.text)?,
            author_id: author.id,
            path: thread_path(&thread_id),
            parent_id: thread_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(reply)))
}

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use threads_persist::{Page, ThreadLeaf};

use crate::{auth::OnboardedUser, error::ApiResult, routes::PageQuery, state::AppState};

/// Replies other users left on the caller's threads, newest first
pub async fn list_activity(
    State(state): State<Arc<AppState>>,
    OnboardedUser(user): OnboardedUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<ThreadLeaf>>> {
    let page = state
        .persist
        .activity()
        .get_reply_activity(&user.identity_id, (&query).into())
        .await?;

    Ok(Json(page))
}

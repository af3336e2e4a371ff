use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use threads_persist::{Page, SearchUsers, SortOrder, UpsertUser, User, UserWithThreads};

use crate::{
    auth::{OnboardedUser, Principal},
    error::{ApiError, ApiResult},
    routes::{required, PageQuery},
    state::AppState,
};

/// Page size of the people search
pub const SEARCH_PAGE_SIZE: u64 = 25;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub identity_id: String,
    pub onboarded: bool,
    pub user: Option<User>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: String,
    /// Page the form was submitted from
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub sort: SortOrder,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// The caller's own profile, if one exists yet
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> ApiResult<Json<MeResponse>> {
    let user = state
        .persist
        .users()
        .get_user_by_identity_id(&principal.identity_id)
        .await?;

    Ok(Json(MeResponse {
        identity_id: principal.identity_id,
        onboarded: user.as_ref().is_some_and(|u| u.onboarded),
        user,
    }))
}

/// Onboarding and profile edit
pub async fn upsert_me(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(form): Json<ProfileForm>,
) -> ApiResult<Json<User>> {
    let input = UpsertUser {
        identity_id: principal.identity_id.clone(),
        username: required("username", &form.username)?,
        name: required("name", &form.name)?,
        bio: form.bio.trim().to_string(),
        image: form.image.trim().to_string(),
        path: form.path,
    };

    state.persist.users().upsert_user(input).await?;

    let user = state
        .persist
        .users()
        .get_user_by_identity_id(&principal.identity_id)
        .await?
        .ok_or(ApiError::Internal)?;

    Ok(Json(user))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _viewer: OnboardedUser,
    Path(identity_id): Path<String>,
) -> ApiResult<Json<User>> {
    let user = state
        .persist
        .users()
        .get_user_by_identity_id(&identity_id)
        .await?
        .ok_or(ApiError::UserNotFound(identity_id))?;

    Ok(Json(user))
}

/// Profile page data: the user's threads with their replies
pub async fn get_user_threads(
    State(state): State<Arc<AppState>>,
    _viewer: OnboardedUser,
    Path(identity_id): Path<String>,
) -> ApiResult<Json<UserWithThreads>> {
    let posts = state
        .persist
        .users()
        .get_user_threads_with_replies(&identity_id)
        .await?
        .ok_or(ApiError::UserNotFound(identity_id))?;

    Ok(Json(posts))
}

/// People search, never listing the caller
pub async fn search_users(
    State(state): State<Arc<AppState>>,
    OnboardedUser(viewer): OnboardedUser,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Page<User>>> {
    let page = state
        .persist
        .users()
        .search_users(SearchUsers {
            exclude_identity_id: viewer.identity_id,
            query: query.q,
            page: PageQuery { page: query.page, page_size: query.page_size }
                .to_request(SEARCH_PAGE_SIZE),
            sort: query.sort,
        })
        .await?;

    Ok(Json(page))
}

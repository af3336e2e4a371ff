use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use threads_persist::PersistError;

pub const SIGN_IN_PATH: &str = "/sign-in";
pub const ONBOARDING_PATH: &str = "/onboarding";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Profile setup is not complete")]
    NotOnboarded,

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthenticated => return Redirect::to(SIGN_IN_PATH).into_response(),
            ApiError::NotOnboarded => return Redirect::to(ONBOARDING_PATH).into_response(),
            ApiError::UserNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Persist(ref e) if e.is_not_found() => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            ApiError::Persist(PersistError::UsernameTaken(ref name)) => {
                (StatusCode::CONFLICT, format!("Username already taken: {}", name))
            }
            ApiError::Persist(PersistError::InvalidObjectId(ref id)) => {
                (StatusCode::BAD_REQUEST, format!("Invalid id: {}", id))
            }
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
            ApiError::Internal => {
                tracing::error!("Internal error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

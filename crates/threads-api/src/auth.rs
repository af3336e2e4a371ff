//! Request gates.
//!
//! The identity gateway in front of the server authenticates the caller and
//! forwards the identity-provider id in [`IDENTITY_HEADER`]. Handlers opt into
//! a gate by taking [`Principal`] or [`OnboardedUser`] as an argument.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use threads_persist::User;

use crate::{error::ApiError, state::AppState};

pub const IDENTITY_HEADER: &str = "x-identity-id";

/// An authenticated caller, who may not have a profile yet
#[derive(Debug, Clone)]
pub struct Principal {
    pub identity_id: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(IDENTITY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|identity_id| Principal {
                identity_id: identity_id.to_string(),
            })
            .ok_or(ApiError::Unauthenticated)
    }
}

/// An authenticated caller whose profile setup is complete
#[derive(Debug, Clone)]
pub struct OnboardedUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for OnboardedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;

        match state.persist.users().get_user_by_identity_id(&principal.identity_id).await? {
            Some(user) if user.onboarded => Ok(OnboardedUser(user)),
            _ => {
                tracing::debug!(identity_id = %principal.identity_id, "Caller is not onboarded");
                Err(ApiError::NotOnboarded)
            }
        }
    }
}

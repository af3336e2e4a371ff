pub mod activity;
pub mod health;
pub mod threads;
pub mod users;

use serde::Deserialize;
use threads_persist::{PageRequest, DEFAULT_PAGE_SIZE};

use crate::error::{ApiError, ApiResult};

/// Upper bound on any requested page size
pub const MAX_PAGE_SIZE: u64 = 100;

/// Minimum length of thread and reply text, after trimming
pub const MIN_TEXT_LEN: usize = 3;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl PageQuery {
    pub fn to_request(&self, default_size: u64) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(default_size).min(MAX_PAGE_SIZE),
        )
    }
}

impl From<&PageQuery> for PageRequest {
    fn from(query: &PageQuery) -> Self {
        query.to_request(DEFAULT_PAGE_SIZE)
    }
}

/// Trim post text and reject anything shorter than [`MIN_TEXT_LEN`] characters
pub(crate) fn validate_text(text: &str) -> ApiResult<String> {
    let text = text.trim();
    if text.chars().count() < MIN_TEXT_LEN {
        return Err(ApiError::BadRequest(format!(
            "text must be at least {} characters",
            MIN_TEXT_LEN
        )));
    }
    Ok(text.to_string())
}

/// Trim a required form field
pub(crate) fn required(field: &str, value: &str) -> ApiResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::BadRequest(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

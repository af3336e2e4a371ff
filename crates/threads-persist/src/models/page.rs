use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Largest offset a store accepts (the driver encodes it as an i64)
const MAX_SKIP: u64 = i64::MAX as u64;

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Zero values are clamped to 1.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Saturates at `MAX_SKIP` for absurd page numbers.
    pub fn skip(&self) -> u64 {
        (self.page.max(1) - 1)
            .saturating_mul(self.page_size.max(1))
            .min(MAX_SKIP)
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.page_size.max(1)).unwrap_or(i64::MAX)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[serde(alias = "ascending")]
    Asc,
    #[default]
    #[serde(alias = "descending")]
    Desc,
}

impl SortOrder {
    /// Mongo sort direction
    pub fn direction(&self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// There is a next page iff more matches exist beyond this page's window.
    pub fn new(items: Vec<T>, total: u64, request: &PageRequest) -> Self {
        let has_next = total > request.skip().saturating_add(items.len() as u64);
        Self { items, has_next }
    }

    pub fn empty() -> Self {
        Self { items: Vec::new(), has_next: false }
    }
}

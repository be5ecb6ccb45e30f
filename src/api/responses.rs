// src/api/responses.rs
//! Response envelopes shared by the paginated endpoints.

use serde::{Deserialize, Serialize};

pub use notion_client::objects::error::Error as NotionError;

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default)]
    pub object: String,
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// A page of results; `next_cursor` set means more pages follow.
    pub fn new(results: Vec<T>, next_cursor: Option<String>) -> Self {
        Self {
            object: "list".to_string(),
            has_more: next_cursor.is_some(),
            results,
            next_cursor,
        }
    }

    /// Maps every result, keeping the pagination envelope.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            object: self.object,
            results: self.results.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }
}

/// Everything gathered by walking a paginated listing.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
    /// Set when a page fetch failed and the listing was cut short.
    pub truncated: bool,
}

// src/api/pagination.rs
//! Cursor-driven pagination that keeps what it has on failure.

use super::responses::{PaginatedResponse, PaginationResult};
use crate::error::AppError;

/// How a listing reacts to a failed page fetch.
#[derive(Clone, Copy)]
pub enum FailurePolicy {
    /// Keep the pages fetched so far and stop.
    Truncate,
    /// Truncate, except for errors the predicate marks as fatal.
    TruncateUnless(fn(&AppError) -> bool),
}

/// Walks a cursor-paginated listing until the server reports no more pages.
///
/// `fetch_fn` receives the cursor of the page to fetch (`None` for the
/// first). A failed fetch ends the walk: the items gathered so far are
/// returned with `truncated` set, unless the policy marks the error fatal.
pub async fn fetch_all_pages<T, F, Fut>(
    mut fetch_fn: F,
    policy: FailurePolicy,
) -> Result<PaginationResult<T>, AppError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut items = Vec::new();
    let mut cursor = None;
    let mut pages_fetched = 0u32;
    let mut truncated = false;

    loop {
        let response = match fetch_fn(cursor.take()).await {
            Ok(response) => response,
            Err(e) => {
                if let FailurePolicy::TruncateUnless(is_fatal) = policy {
                    if is_fatal(&e) {
                        return Err(e);
                    }
                }
                log::warn!(
                    "Page {} of listing failed, keeping {} items: {}",
                    pages_fetched + 1,
                    items.len(),
                    e
                );
                truncated = true;
                break;
            }
        };

        pages_fetched += 1;
        items.extend(response.results);

        match response.next_cursor {
            Some(next) if response.has_more => cursor = Some(next),
            _ => break,
        }
    }

    Ok(PaginationResult {
        items,
        pages_fetched,
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotionErrorCode;
    use pretty_assertions::assert_eq;

    fn page(n: u32, more: bool) -> PaginatedResponse<u32> {
        PaginatedResponse::new(vec![n], more.then(|| format!("c{}", n)))
    }

    fn service_error(code: NotionErrorCode) -> AppError {
        AppError::NotionService {
            code,
            message: "boom".to_string(),
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[tokio::test]
    async fn follows_cursors_until_exhausted() {
        let mut seen = Vec::new();
        let result = fetch_all_pages(
            |cursor| {
                seen.push(cursor.clone());
                async move {
                    Ok(match cursor.as_deref() {
                        None => page(1, true),
                        Some("c1") => page(2, true),
                        _ => page(3, false),
                    })
                }
            },
            FailurePolicy::Truncate,
        )
        .await
        .unwrap();

        assert_eq!(result.items, vec![1, 2, 3]);
        assert_eq!(result.pages_fetched, 3);
        assert!(!result.truncated);
        assert_eq!(seen, vec![None, Some("c1".to_string()), Some("c2".to_string())]);
    }

    #[tokio::test]
    async fn a_failed_page_truncates() {
        let result = fetch_all_pages(
            |cursor| async move {
                match cursor {
                    None => Ok(page(1, true)),
                    Some(_) => Err(service_error(NotionErrorCode::HttpStatus(500))),
                }
            },
            FailurePolicy::Truncate,
        )
        .await
        .unwrap();

        assert_eq!(result.items, vec![1]);
        assert!(result.truncated);
    }

    #[tokio::test]
    async fn fatal_errors_propagate() {
        let result = fetch_all_pages(
            |_cursor| async { Err::<PaginatedResponse<u32>, _>(service_error(NotionErrorCode::Unauthorized)) },
            FailurePolicy::TruncateUnless(AppError::is_unauthorized),
        )
        .await;

        assert!(result.unwrap_err().is_unauthorized());
    }

    #[tokio::test]
    async fn has_more_without_cursor_stops() {
        let result = fetch_all_pages(
            |_cursor| async {
                Ok(PaginatedResponse {
                    object: "list".to_string(),
                    results: vec![7u32],
                    next_cursor: None,
                    has_more: true,
                })
            },
            FailurePolicy::Truncate,
        )
        .await
        .unwrap();

        assert_eq!(result.items, vec![7]);
    }
}

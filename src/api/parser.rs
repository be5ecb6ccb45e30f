// src/api/parser.rs
//! Response parsing and error classification.
//!
//! Non-2xx bodies are parsed with notion-client's error type when
//! possible; otherwise the HTTP status alone decides the classification.

use super::client::ApiResponse;
use super::notion_client_adapter::{convert_block_value, convert_page_value};
use super::responses::{NotionError, PaginatedResponse};
use crate::error::{AppError, NotionErrorCode};
use crate::model::{Block, Page};
use reqwest::StatusCode;
use serde_json::Value;

/// Parse any Notion API response, classifying failures.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_success(&result.data, &result.url)
    } else {
        Err(classify_error(&result.data, result.status, &result.url))
    }
}

fn parse_success<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        let preview: String = body.chars().take(500).collect();
        AppError::MalformedResponse(format!("{} (body: {})", e, preview))
    })
}

/// Builds the error for a non-2xx response.
pub fn classify_error(body: &str, status: StatusCode, url: &str) -> AppError {
    let by_status = NotionErrorCode::from_http_status(status.as_u16());

    match serde_json::from_str::<NotionError>(body) {
        Ok(notion_error) => {
            // The status is authoritative for the three codes the sync
            // branches on; the body refines everything else.
            let code = match by_status {
                NotionErrorCode::HttpStatus(_) => {
                    NotionErrorCode::from_api_response(&notion_error.code)
                }
                known => known,
            };
            AppError::NotionService {
                code,
                message: notion_error.message,
                status,
            }
        }
        Err(_) => AppError::NotionService {
            code: by_status,
            message: format!("HTTP {} from {}", status, url),
            status,
        },
    }
}

/// Parses one page of a database query.
///
/// Rows that cannot be converted are skipped with a warning rather than
/// failing the whole page.
pub fn parse_pages_page(result: ApiResponse<String>) -> Result<PaginatedResponse<Page>, AppError> {
    let raw: PaginatedResponse<Value> = parse_api_response(result)?;
    let mut pages = Vec::with_capacity(raw.results.len());
    for row in raw.results {
        match convert_page_value(row) {
            Ok(page) => pages.push(page),
            Err(e) => log::warn!("Skipping unreadable database row: {}", e),
        }
    }
    Ok(PaginatedResponse {
        object: raw.object,
        results: pages,
        next_cursor: raw.next_cursor,
        has_more: raw.has_more,
    })
}

/// Parses one page of block children. Individual blocks never fail.
pub fn parse_blocks_page(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Block>, AppError> {
    let raw: PaginatedResponse<Value> = parse_api_response(result)?;
    Ok(raw.map(convert_block_value))
}

/// Checks a PATCH response; the body of a success is not needed.
pub fn parse_update_response(result: ApiResponse<String>) -> Result<(), AppError> {
    if result.status.is_success() {
        Ok(())
    } else {
        Err(classify_error(&result.data, result.status, &result.url))
    }
}

// src/handler/request.rs
//! Inbound requests and the responses they produce.

use crate::error::RequestError;
use serde::Serialize;

/// Which operation a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Delete,
}

/// One call to the service: headers, raw body and the routed operation.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub operation: Operation,
    headers: Vec<(String, String)>,
    pub body: String,
}

impl InboundRequest {
    pub fn new(operation: Operation, body: impl Into<String>) -> Self {
        Self {
            operation,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseBody {
    pub message: String,
}

/// Status code plus a `{"message": ...}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: ResponseBody,
}

impl HandlerResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody {
                message: message.into(),
            },
        }
    }

    pub fn message(&self) -> &str {
        &self.body.message
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({ "message": self.body.message }).to_string()
    }
}

impl From<RequestError> for HandlerResponse {
    fn from(err: RequestError) -> Self {
        Self {
            status_code: err.status_code(),
            body: ResponseBody {
                message: err.to_string(),
            },
        }
    }
}

/// Numeric selector at `data.properties.ID.unique_id.number`, if any.
///
/// An empty body selects nothing. A body that is not JSON is rejected.
pub fn parse_selector(body: &str) -> Result<Option<i64>, RequestError> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|_| RequestError::BadRequest("Invalid JSON format in body".to_string()))?;

    match value.pointer("/data/properties/ID/unique_id/number") {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(number) => number
            .as_i64()
            .or_else(|| number.as_str().and_then(|s| s.trim().parse().ok()))
            .map(Some)
            .ok_or_else(|| RequestError::BadRequest(format!("Invalid ID in body: {}", number))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn headers_are_case_insensitive() {
        let request = InboundRequest::new(Operation::Upload, "{}")
            .with_header("authorization", "Bearer t");
        assert_eq!(request.header("Authorization"), Some("Bearer t"));
        assert_eq!(request.header("X-Other"), None);
    }

    #[test]
    fn selector_extraction() {
        let body = r#"{"data": {"properties": {"ID": {"unique_id": {"number": 42, "prefix": null}}}}}"#;
        assert_eq!(parse_selector(body), Ok(Some(42)));
        assert_eq!(parse_selector(r#"{"data": {}}"#), Ok(None));
        assert_eq!(parse_selector(""), Ok(None));
        assert_eq!(
            parse_selector("{not json"),
            Err(RequestError::BadRequest("Invalid JSON format in body".to_string()))
        );
        assert!(parse_selector(r#"{"data": {"properties": {"ID": {"unique_id": {"number": "x"}}}}}"#).is_err());
    }

    #[test]
    fn error_responses() {
        let response = HandlerResponse::from(RequestError::NotFound(
            "No post found with custom ID: 7".to_string(),
        ));
        assert_eq!(response.status_code, 404);
        assert_eq!(response.to_json(), r#"{"message":"No post found with custom ID: 7"}"#);
        assert_eq!(HandlerResponse::from(RequestError::Unauthorized).status_code, 403);
    }
}

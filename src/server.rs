// src/server.rs
//! HTTP front door: `POST /upload` and `POST /delete`.

use crate::handler::{HandlerResponse, InboundRequest, Operation, PostSync};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

/// Build the router serving both operations from one shared `PostSync`.
pub fn router(sync: Arc<PostSync>) -> Router {
    Router::new()
        .route("/upload", post(upload))
        .route("/delete", post(delete))
        .with_state(sync)
}

/// Binds `addr` and serves until the process exits.
pub async fn serve(sync: Arc<PostSync>, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(sync)).await
}

async fn upload(State(sync): State<Arc<PostSync>>, headers: HeaderMap, body: String) -> Response {
    run(&sync, Operation::Upload, &headers, body).await
}

async fn delete(State(sync): State<Arc<PostSync>>, headers: HeaderMap, body: String) -> Response {
    run(&sync, Operation::Delete, &headers, body).await
}

async fn run(sync: &PostSync, operation: Operation, headers: &HeaderMap, body: String) -> Response {
    let request = headers
        .iter()
        .filter_map(|(name, value)| value.to_str().ok().map(|value| (name.as_str(), value)))
        .fold(InboundRequest::new(operation, body), |request, (name, value)| {
            request.with_header(name, value)
        });

    into_response(sync.handle(request).await)
}

fn into_response(response: HandlerResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body)).into_response()
}

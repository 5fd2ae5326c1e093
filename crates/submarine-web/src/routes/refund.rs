//! Refund page

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RefundParams {
    id: Option<String>,
}

/// Refund page for a swap
#[utoipa::path(
    get,
    path = "/refund",
    params(
        ("id" = i64, Query, description = "Swap id, starting at 1")
    ),
    responses(
        (status = 200, description = "Refund page", body = String, content_type = "text/plain"),
        (status = 404, description = "Unknown swap id")
    ),
    tag = "refund"
)]
pub async fn refund(Query(params): Query<RefundParams>) -> Response {
    let id = params.id.as_deref().and_then(|id| id.parse::<i64>().ok());
    match id {
        Some(id) if id >= 1 => "Nothing to see on the refund page yet!".into_response(),
        _ => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

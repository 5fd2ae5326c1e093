//! HTML pages and the not-found fallback

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};

use crate::templates;

pub async fn home() -> Html<String> {
    Html(templates::home_page())
}

pub async fn swap_form() -> Html<String> {
    Html(templates::swap_page())
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

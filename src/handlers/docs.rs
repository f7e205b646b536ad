use axum::{http::header, response::IntoResponse};

const OPENAPI_JSON: &str = include_str!("../../static/openapi.json");

/// GET /api-docs - machine-readable API description, served statically
pub async fn api_docs() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], OPENAPI_JSON)
}

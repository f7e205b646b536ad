use axum::{
    async_trait,
    extract::{FromRequest, Request},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;

pub mod auth;
pub mod authors;
pub mod books;
pub mod docs;
pub mod home;

/// JSON body extractor that reports malformed bodies through the
/// normalized error envelope instead of axum's plain-text rejection.
pub struct JsonBody(pub Value);

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for JsonBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError::invalid_json(rejection.body_text())),
        }
    }
}

/// Decode a body that already passed schema validation. A failure here
/// means the schema and the payload type disagree, which is a server bug.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| {
        tracing::error!("validated payload failed to decode: {}", e);
        ApiError::internal("An error occurred while processing your request")
    })
}

/// GET /health - service liveness
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}

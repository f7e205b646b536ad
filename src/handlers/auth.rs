use axum::{
    extract::Query,
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{generate_session_token, Claims, OAuthClient};
use crate::config;
use crate::error::ApiError;
use crate::middleware::session::{cookie_value, SESSION_COOKIE};

/// Short-lived cookie mirroring the OAuth `state` parameter across the
/// login round trip.
const STATE_COOKIE: &str = "oauth_state";

/// GET /auth/login - redirect to the identity provider's authorize endpoint
pub async fn login() -> Result<Response, ApiError> {
    let state = Uuid::new_v4().to_string();
    let url = OAuthClient::new().authorize_url(&state)?;

    let state_cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=600",
        STATE_COOKIE, state
    );
    Ok((
        AppendHeaders([(header::SET_COOKIE, state_cookie)]),
        Redirect::temporary(&url),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    pub state: String,
}

/// GET /auth/callback - verify state, exchange the code, issue the session
pub async fn callback(
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    let expected = cookie_value(&headers, STATE_COOKIE);
    if expected.as_deref() != Some(query.state.as_str()) {
        return Err(ApiError::unauthorized("OAuth state mismatch"));
    }

    let client = OAuthClient::new();
    let token = client.exchange_code(&query.code).await?;
    let user = client.fetch_user(&token.access_token).await?;
    tracing::info!(subject = %user.sub, "session established");

    let session = generate_session_token(&Claims::new(user.sub.clone(), user.display_name()))?;
    let ttl_secs = config::config().security.session_ttl_hours * 3600;
    let session_cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, session, ttl_secs
    );
    let clear_state = format!("{}=; Path=/; HttpOnly; Max-Age=0", STATE_COOKIE);

    Ok((
        AppendHeaders([
            (header::SET_COOKIE, session_cookie),
            (header::SET_COOKIE, clear_state),
        ]),
        Redirect::temporary("/"),
    )
        .into_response())
}

/// GET /auth/logout - clear the session cookie
pub async fn logout() -> impl IntoResponse {
    let clear = format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE);
    (
        AppendHeaders([(header::SET_COOKIE, clear)]),
        Redirect::temporary("/"),
    )
}

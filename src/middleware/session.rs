use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth;

/// Name of the session cookie carrying the signed identity assertion.
pub const SESSION_COOKIE: &str = "biblio_session";

/// Verified user identity extracted from the session cookie
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub subject: String,
    pub name: String,
}

/// Request-scoped session state injected by [`session_middleware`].
/// Anonymous requests carry `user: None`; handlers decide the policy.
#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    pub user: Option<SessionUser>,
}

impl SessionContext {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Session middleware: verifies the session cookie and injects a
/// [`SessionContext`] into request extensions. An invalid or expired
/// cookie yields an anonymous context, not an error.
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let context = match cookie_value(request.headers(), SESSION_COOKIE) {
        Some(token) => match auth::verify_session_token(&token) {
            Ok(claims) => SessionContext {
                user: Some(SessionUser { subject: claims.sub, name: claims.name }),
            },
            Err(e) => {
                tracing::debug!("rejecting session cookie: {}", e);
                SessionContext::default()
            }
        },
        None => SessionContext::default(),
    };

    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Extract a cookie value from the Cookie header
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

//! Session tokens and the OAuth identity-provider client.
//!
//! The session is a signed JWT set as an HttpOnly cookie after the OAuth
//! code exchange. Resource handlers never see any of this; the session
//! only gates the home view.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Identity-provider subject
    pub sub: String,
    /// Display name for the home view
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(subject: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        let ttl_hours = config::config().security.session_ttl_hours;
        Self {
            sub: subject.into(),
            name: name.into(),
            exp: (now + Duration::hours(ttl_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("session secret not configured")]
    InvalidSecret,

    #[error("token generation failed: {0}")]
    TokenGeneration(String),

    #[error("invalid session: {0}")]
    InvalidSession(String),

    #[error("bad provider configuration: {0}")]
    Config(String),

    #[error("identity provider request failed: {0}")]
    Provider(#[from] reqwest::Error),

    #[error("identity provider returned {status}: {body}")]
    ProviderStatus { status: u16, body: String },
}

pub fn generate_session_token(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().security.session_secret;
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn verify_session_token(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().security.session_secret;
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AuthError::InvalidSession(e.to_string()))
}

/// Token endpoint response (standard OAuth 2.0 shape)
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Userinfo response. Providers differ on `sub` vs `id`, hence the alias.
#[derive(Debug, Deserialize)]
pub struct ProviderUser {
    #[serde(alias = "id")]
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ProviderUser {
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| self.sub.clone())
    }
}

/// Client for the configured OAuth identity provider
pub struct OAuthClient {
    http: reqwest::Client,
}

impl Default for OAuthClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OAuthClient {
    pub fn new() -> Self {
        Self { http: reqwest::Client::new() }
    }

    /// Build the provider authorize URL for the login redirect.
    pub fn authorize_url(&self, state: &str) -> Result<String, AuthError> {
        let oauth = &config::config().oauth;
        let mut url = Url::parse(&oauth.authorize_url)
            .map_err(|e| AuthError::Config(format!("authorize_url: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &oauth.client_id)
            .append_pair("redirect_uri", &oauth.redirect_url)
            .append_pair("scope", &oauth.scope)
            .append_pair("state", state);
        Ok(url.into())
    }

    /// Exchange the callback code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AuthError> {
        let oauth = &config::config().oauth;
        let response = self
            .http
            .post(&oauth.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", oauth.client_id.as_str()),
                ("client_secret", oauth.client_secret.as_str()),
                ("redirect_uri", oauth.redirect_url.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::ProviderStatus { status, body });
        }

        Ok(response.json::<TokenResponse>().await?)
    }

    /// Fetch the asserted identity from the userinfo endpoint.
    pub async fn fetch_user(&self, access_token: &str) -> Result<ProviderUser, AuthError> {
        let oauth = &config::config().oauth;
        let response = self
            .http
            .get(&oauth.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::ProviderStatus { status, body });
        }

        Ok(response.json::<ProviderUser>().await?)
    }
}

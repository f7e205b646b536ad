use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub oauth: OAuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub session_secret: String,
    pub session_ttl_hours: u64,
}

/// Identity-provider endpoints and client credentials. Defaults point at
/// a local mock provider; real deployments override via env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub redirect_url: String,
    pub scope: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        if let Ok(v) = env::var("SESSION_SECRET") {
            self.security.session_secret = v;
        }
        if let Ok(v) = env::var("SESSION_TTL_HOURS") {
            self.security.session_ttl_hours = v.parse().unwrap_or(self.security.session_ttl_hours);
        }

        if let Ok(v) = env::var("OAUTH_CLIENT_ID") {
            self.oauth.client_id = v;
        }
        if let Ok(v) = env::var("OAUTH_CLIENT_SECRET") {
            self.oauth.client_secret = v;
        }
        if let Ok(v) = env::var("OAUTH_AUTHORIZE_URL") {
            self.oauth.authorize_url = v;
        }
        if let Ok(v) = env::var("OAUTH_TOKEN_URL") {
            self.oauth.token_url = v;
        }
        if let Ok(v) = env::var("OAUTH_USERINFO_URL") {
            self.oauth.userinfo_url = v;
        }
        if let Ok(v) = env::var("OAUTH_REDIRECT_URL") {
            self.oauth.redirect_url = v;
        }
        if let Ok(v) = env::var("OAUTH_SCOPE") {
            self.oauth.scope = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                session_secret: "dev-session-secret".to_string(),
                session_ttl_hours: 24,
            },
            oauth: OAuthConfig {
                client_id: "biblio-dev".to_string(),
                client_secret: "dev-secret".to_string(),
                authorize_url: "http://localhost:9000/oauth/authorize".to_string(),
                token_url: "http://localhost:9000/oauth/token".to_string(),
                userinfo_url: "http://localhost:9000/oauth/userinfo".to_string(),
                redirect_url: "http://localhost:3000/auth/callback".to_string(),
                scope: "openid profile email".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                // must be supplied via env in production
                session_secret: String::new(),
                session_ttl_hours: 4,
            },
            oauth: OAuthConfig {
                client_id: String::new(),
                client_secret: String::new(),
                authorize_url: String::new(),
                token_url: String::new(),
                userinfo_url: String::new(),
                redirect_url: String::new(),
                scope: "openid profile email".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

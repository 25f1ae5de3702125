//! OAuth token acquisition with caching and refresh.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tabsync_core::{Result, TabError};
use tracing::{debug, info};

const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Cached access token with expiration.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        // Refresh five minutes early so a token never expires mid-request.
        Utc::now() >= self.expires_at - Duration::minutes(5)
    }
}

#[derive(Debug)]
struct OAuthClient {
    http: reqwest::blocking::Client,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    token_url: String,
    cache: Mutex<Option<CachedToken>>,
}

#[derive(Debug)]
enum Provider {
    Static(String),
    OAuth(OAuthClient),
}

/// Supplies a bearer token for the Sheets API.
///
/// Either a static token handed in from the environment, or an OAuth2
/// client that exchanges a refresh token for short-lived access tokens
/// and caches them until close to expiry.
#[derive(Debug)]
pub struct TokenProvider {
    provider: Provider,
}

impl TokenProvider {
    pub fn static_token(token: impl Into<String>) -> Self {
        Self {
            provider: Provider::Static(token.into()),
        }
    }

    pub fn oauth(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            provider: Provider::OAuth(OAuthClient {
                http: reqwest::blocking::Client::new(),
                client_id: client_id.into(),
                client_secret: client_secret.into(),
                refresh_token: refresh_token.into(),
                token_url: DEFAULT_TOKEN_URL.to_string(),
                cache: Mutex::new(None),
            }),
        }
    }

    /// Overrides the token endpoint (tests point this at a mock server).
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        if let Provider::OAuth(client) = &mut self.provider {
            client.token_url = url.into();
        }
        self
    }

    /// Returns a valid access token, refreshing if necessary.
    pub fn token(&self) -> Result<String> {
        match &self.provider {
            Provider::Static(token) => Ok(token.clone()),
            Provider::OAuth(client) => {
                if let Ok(guard) = client.cache.lock() {
                    if let Some(cached) = guard.as_ref() {
                        if !cached.is_expired() {
                            debug!("token cache hit");
                            return Ok(cached.access_token.clone());
                        }
                        debug!("token expired, refreshing");
                    }
                }
                client.refresh()
            }
        }
    }
}

impl OAuthClient {
    /// Refreshes the access token using the refresh_token grant.
    fn refresh(&self) -> Result<String> {
        let resp = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .map_err(|e| TabError::Auth(format!("token refresh request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(TabError::Auth(format!(
                "token refresh failed: {status} {body}"
            )));
        }

        #[derive(Deserialize)]
        struct RefreshResponse {
            access_token: String,
            expires_in: u64,
        }

        let token_resp: RefreshResponse = resp
            .json()
            .map_err(|e| TabError::Auth(format!("invalid token response: {e}")))?;

        let expires_at = Utc::now() + Duration::seconds(token_resp.expires_in as i64);
        if let Ok(mut guard) = self.cache.lock() {
            *guard = Some(CachedToken {
                access_token: token_resp.access_token.clone(),
                expires_at,
            });
        }
        info!("refreshed OAuth token, expires at {}", expires_at.to_rfc3339());

        Ok(token_resp.access_token)
    }
}

//! Bot Framework access tokens (client-credentials grant), cached until
//! shortly before they expire.

use reqwest::Client;
use serde::Deserialize;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, error};

use crate::errors::BotError;

pub const TOKEN_URL: &str = "https://login.microsoftonline.com/botframework.com/oauth2/v2.0/token";
pub const TOKEN_SCOPE: &str = "https://api.botframework.com/.default";

const EXPIRY_MARGIN: Duration = Duration::from_secs(300);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

pub struct TokenProvider {
    http: Client,
    app_id: String,
    app_password: String,
    token_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    #[must_use]
    pub fn new(http: Client, app_id: String, app_password: String) -> Self {
        Self::with_token_url(http, app_id, app_password, TOKEN_URL.to_string())
    }

    #[must_use]
    pub fn with_token_url(
        http: Client,
        app_id: String,
        app_password: String,
        token_url: String,
    ) -> Self {
        Self {
            http,
            app_id,
            app_password,
            token_url,
            cached: Mutex::new(None),
        }
    }

    /// Returns a valid bearer token, fetching a new one when the cached token
    /// is missing or close to expiry.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Connector` if the token endpoint rejects the
    /// credentials or answers with an unexpected body.
    pub async fn token(&self) -> Result<String, BotError> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        debug!("Fetching Bot Framework access token");
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.app_id.as_str()),
                ("client_secret", self.app_password.as_str()),
                ("scope", TOKEN_SCOPE),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Bot Framework token request failed");
            return Err(BotError::Connector(format!(
                "token request failed with {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| BotError::Connector(format!("invalid token response: {e}")))?;

        self.store(&token);
        Ok(token.access_token)
    }

    fn cached_token(&self) -> Option<String> {
        let cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        cached
            .as_ref()
            .filter(|t| Instant::now() < t.refresh_at)
            .map(|t| t.value.clone())
    }

    fn store(&self, token: &TokenResponse) {
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> TokenProvider {
        TokenProvider::with_token_url(
            Client::new(),
            "app".to_string(),
            "secret".to_string(),
            "http://127.0.0.1:9/token".to_string(),
        )
    }

    #[test]
    fn test_stored_token_is_reused() {
        let provider = provider();
        provider.store(&TokenResponse {
            access_token: "abc".to_string(),
            expires_in: 3600,
        });
        assert_eq!(provider.cached_token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_short_lived_token_is_not_reused() {
        let provider = provider();
        provider.store(&TokenResponse {
            access_token: "abc".to_string(),
            expires_in: 60,
        });
        assert!(provider.cached_token().is_none());
    }

    #[tokio::test]
    async fn test_cached_token_skips_network() {
        let provider = provider();
        provider.store(&TokenResponse {
            access_token: "cached".to_string(),
            expires_in: 3600,
        });
        assert_eq!(provider.token().await.unwrap(), "cached");
    }
}

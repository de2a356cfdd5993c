//! Dice service HTTP client
//!
//! One GET per roll. No retries and no timeout beyond the HTTP client's own.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{info, warn};
use url::Url;

use crate::core::config::RollApi;
use crate::core::models::{RemoteErrorBody, RollResult};
use crate::errors::BotError;

/// Anything that can turn dice notation into a roll result.
#[async_trait]
pub trait DiceService: Send + Sync {
    /// # Errors
    ///
    /// `BotError::RemoteService` when the service rejects the notation with a
    /// message, `BotError::Transport` or `BotError::UnexpectedResponse` otherwise.
    async fn roll(&self, notation: &str) -> Result<RollResult, BotError>;
}

pub struct HttpDiceClient {
    http: Client,
    endpoint: Url,
    api: RollApi,
}

impl HttpDiceClient {
    /// # Errors
    ///
    /// Returns `BotError::Config` if `base_url` is not a valid URL.
    pub fn new(http: Client, base_url: &str, api: RollApi) -> Result<Self, BotError> {
        let endpoint = roll_endpoint(base_url, api)?;
        Ok(Self { http, endpoint, api })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[must_use]
    pub fn api(&self) -> RollApi {
        self.api
    }
}

/// Resolves the roll endpoint for a variant against the configured base URL.
///
/// # Errors
///
/// Returns `BotError::Config` if `base_url` is not a valid URL.
pub fn roll_endpoint(base_url: &str, api: RollApi) -> Result<Url, BotError> {
    let mut base = Url::parse(base_url)
        .map_err(|e| BotError::Config(format!("DICE_API_URL: {e}")))?;

    match api {
        RollApi::TotalOnly | RollApi::Breakdown => Ok(base),
        RollApi::Structured => {
            if !base.path().ends_with('/') {
                let path = format!("{}/", base.path());
                base.set_path(&path);
            }
            base.join("roll/")
                .map_err(|e| BotError::Config(format!("DICE_API_URL: {e}")))
        }
    }
}

/// Query parameter carrying the notation for a variant.
#[must_use]
pub fn query_param(api: RollApi) -> &'static str {
    match api {
        RollApi::TotalOnly | RollApi::Breakdown => "dice",
        RollApi::Structured => "roll",
    }
}

/// Maps a non-success response body onto the error taxonomy.
#[must_use]
pub fn remote_error(status: StatusCode, body: &str) -> BotError {
    match serde_json::from_str::<RemoteErrorBody>(body) {
        Ok(RemoteErrorBody { message }) => BotError::RemoteService {
            status: status.as_u16(),
            message,
        },
        Err(_) => BotError::UnexpectedResponse(format!("status {status} without message: {body}")),
    }
}

#[async_trait]
impl DiceService for HttpDiceClient {
    async fn roll(&self, notation: &str) -> Result<RollResult, BotError> {
        info!(endpoint = %self.endpoint, notation, "Requesting roll from dice service");

        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[(query_param(self.api), notation)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(%status, "Dice service rejected roll");
            return Err(remote_error(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| BotError::UnexpectedResponse(format!("invalid roll result: {e}")))
    }
}

//! Chat sessions: one inbound message and the way to answer it.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};
use url::Url;

use super::activity::Activity;
use super::auth::TokenProvider;
use crate::errors::BotError;

/// Handle for one inbound/outbound message exchange.
#[async_trait]
pub trait ChatSession: Send {
    /// Text of the inbound message; empty when the message carried none.
    fn message_text(&self) -> &str;

    /// # Errors
    ///
    /// Returns an error if the reply could not be delivered.
    async fn send(&mut self, text: &str) -> Result<(), BotError>;
}

/// Posts replies through the Bot Connector REST API.
pub struct ConnectorClient {
    http: Client,
    tokens: TokenProvider,
}

impl ConnectorClient {
    #[must_use]
    pub fn new(http: Client, tokens: TokenProvider) -> Self {
        Self { http, tokens }
    }

    /// Posts `reply` as an answer to `inbound`.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Connector` if the activity has no reply address or
    /// the service rejects the post.
    pub async fn send_reply(&self, inbound: &Activity, reply: &Activity) -> Result<(), BotError> {
        let url = reply_url(inbound)?;
        let token = self.tokens.token().await?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(reply)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Bot Connector rejected reply");
            return Err(BotError::Connector(format!(
                "reply rejected with {status}: {body}"
            )));
        }

        info!(conversation_id = ?inbound.conversation_id(), "Reply delivered");
        Ok(())
    }
}

/// `{serviceUrl}/v3/conversations/{conversationId}/activities/{activityId}`,
/// or the conversation's activity collection when the inbound has no id.
///
/// # Errors
///
/// Returns `BotError::Connector` if the service URL or conversation is missing.
pub fn reply_url(inbound: &Activity) -> Result<Url, BotError> {
    let service_url = inbound
        .service_url
        .as_deref()
        .ok_or_else(|| BotError::Connector("activity has no serviceUrl".to_string()))?;
    let conversation_id = inbound
        .conversation_id()
        .ok_or_else(|| BotError::Connector("activity has no conversation".to_string()))?;

    let mut url = Url::parse(service_url)
        .map_err(|e| BotError::Connector(format!("invalid serviceUrl: {e}")))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| BotError::Connector("serviceUrl cannot be a base".to_string()))?;
        segments
            .pop_if_empty()
            .extend(["v3", "conversations", conversation_id, "activities"]);
        if let Some(id) = inbound.id.as_deref() {
            segments.push(id);
        }
    }
    Ok(url)
}

/// Session backed by a real inbound activity.
pub struct ConnectorSession<'a> {
    activity: Activity,
    client: &'a ConnectorClient,
}

impl<'a> ConnectorSession<'a> {
    /// # Errors
    ///
    /// Returns `BotError::Connector` if the activity cannot be answered.
    pub fn new(activity: Activity, client: &'a ConnectorClient) -> Result<Self, BotError> {
        reply_url(&activity)?;
        Ok(Self { activity, client })
    }

    #[must_use]
    pub fn activity(&self) -> &Activity {
        &self.activity
    }
}

#[async_trait]
impl ChatSession for ConnectorSession<'_> {
    fn message_text(&self) -> &str {
        self.activity.text.as_deref().unwrap_or("")
    }

    async fn send(&mut self, text: &str) -> Result<(), BotError> {
        let reply = self.activity.reply(text);
        self.client.send_reply(&self.activity, &reply).await
    }
}

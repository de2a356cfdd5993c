//! Listener that decodes Bot Connector activities and dispatches messages.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::activity::Activity;
use super::auth::TokenProvider;
use super::handler::MessageHandler;
use super::session::{ConnectorClient, ConnectorSession};
use super::storage::ConversationStore;
use crate::adapter::{Listener, ListenerRequest, ResponseShim};
use crate::core::config::AppConfig;
use crate::dice::{DiceService, HttpDiceClient};
use crate::errors::BotError;
use crate::reporting;

pub struct BotConnector {
    client: ConnectorClient,
    handler: MessageHandler,
    store: Arc<ConversationStore>,
}

impl BotConnector {
    #[must_use]
    pub fn new(client: ConnectorClient, handler: MessageHandler, store: Arc<ConversationStore>) -> Self {
        Self {
            client,
            handler,
            store,
        }
    }

    /// Wires the connector, dice client and store from configuration.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Config` if the dice service URL is invalid.
    pub fn from_config(config: &AppConfig, http: Client) -> Result<Self, BotError> {
        let dice: Arc<dyn DiceService> = Arc::new(HttpDiceClient::new(
            http.clone(),
            &config.dice_api_url,
            config.dice_api_variant,
        )?);
        let tokens = TokenProvider::new(
            http.clone(),
            config.microsoft_app_id.clone(),
            config.microsoft_app_password.clone(),
        );

        Ok(Self::new(
            ConnectorClient::new(http, tokens),
            MessageHandler::new(dice, config.dice_api_variant),
            Arc::new(ConversationStore::new()),
        ))
    }

    #[must_use]
    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }
}

#[async_trait]
impl Listener for BotConnector {
    async fn listen(&self, request: ListenerRequest, response: &mut ResponseShim) {
        let activity: Activity = match serde_json::from_value(request.body) {
            Ok(activity) => activity,
            Err(e) => {
                warn!("Request body is not an activity: {}", e);
                response.status(400).end();
                return;
            }
        };

        if !activity.is_message() {
            info!(activity_type = %activity.kind, "Ignoring non-message activity");
            response.status(200).end();
            return;
        }

        let mut session = match ConnectorSession::new(activity, &self.client) {
            Ok(session) => session,
            Err(e) => {
                warn!("Message activity cannot be answered: {}", e);
                response.status(400).end();
                return;
            }
        };

        if let Some(conversation_id) = session.activity().conversation_id() {
            let data = self
                .store
                .record(conversation_id, session.activity().id.as_deref());
            info!(
                conversation_id,
                message_count = data.message_count,
                "Message received"
            );
        }

        match self.handler.handle(&mut session).await {
            Ok(()) => {
                response.status(202);
            }
            Err(e) => {
                error!("Failed to deliver reply: {}", e);
                reporting::capture(&e);
                response.status(500);
            }
        }
        response.end();
    }
}

use std::sync::Arc;
use tracing::{error, info, warn};

use super::session::ChatSession;
use crate::core::config::RollApi;
use crate::dice::{DiceService, FALLBACK_REPLY, format_reply};
use crate::errors::BotError;
use crate::reporting;

/// Turns one inbound chat message into exactly one dice service call and
/// exactly one reply.
pub struct MessageHandler {
    dice: Arc<dyn DiceService>,
    api: RollApi,
}

impl MessageHandler {
    #[must_use]
    pub fn new(dice: Arc<dyn DiceService>, api: RollApi) -> Self {
        Self { dice, api }
    }

    /// Computes the reply for `text`.
    ///
    /// A rejection carrying a message is relayed verbatim; any other failure
    /// yields [`FALLBACK_REPLY`] and is reported.
    pub async fn reply_for(&self, text: &str) -> String {
        match self.dice.roll(text).await {
            Ok(result) => format_reply(&result, self.api),
            Err(BotError::RemoteService { status, message }) => {
                warn!(status, message = %message, "Dice service rejected notation");
                message
            }
            Err(e) => {
                error!("Dice service call failed: {}", e);
                reporting::capture(&e);
                FALLBACK_REPLY.to_string()
            }
        }
    }

    /// # Errors
    ///
    /// Returns an error only if sending the reply fails.
    pub async fn handle(&self, session: &mut dyn ChatSession) -> Result<(), BotError> {
        let text = session.message_text().to_string();
        info!(text = %text, "Handling chat message");

        let reply = self.reply_for(&text).await;
        session.send(&reply).await
    }
}

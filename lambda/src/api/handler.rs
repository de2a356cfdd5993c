//! API Lambda handler - adapts each invocation onto the bot connector.

use lambda_runtime::{Error, LambdaEvent};
use reqwest::Client;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::adapter::{InvocationEvent, InvocationResult, Listener, adapt};
use crate::bot::BotConnector;
use crate::core::config::AppConfig;
use crate::errors::BotError;
use crate::reporting;

/// Everything built once per execution environment and shared by all
/// invocations.
pub struct BotContext {
    config: AppConfig,
    listener: Box<dyn Listener>,
}

impl BotContext {
    /// # Errors
    ///
    /// Returns `BotError::Config` if the configuration cannot be wired.
    pub fn from_config(config: AppConfig) -> Result<Self, BotError> {
        let connector = BotConnector::from_config(&config, Client::new())?;
        Ok(Self::with_listener(config, Box::new(connector)))
    }

    /// Builds a context around any listener, e.g. a test double.
    #[must_use]
    pub fn with_listener(config: AppConfig, listener: Box<dyn Listener>) -> Self {
        Self { config, listener }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn listener(&self) -> &dyn Listener {
        self.listener.as_ref()
    }
}

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Returns an error if the event body is not valid JSON; the error is also
/// reported. Every other outcome is a status code in the result.
#[tracing::instrument(level = "info", skip(context, event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(
    context: &BotContext,
    event: LambdaEvent<Value>,
) -> Result<InvocationResult, Error> {
    // ========================================================================
    // Extract body and headers
    // ========================================================================

    let invocation = InvocationEvent::from_payload(&event.payload);
    info!(
        header_count = invocation.headers.len(),
        has_body = invocation.body.is_some(),
        "API Lambda received invocation"
    );

    // ========================================================================
    // Run the listener; the completion resolves exactly once
    // ========================================================================

    let (tx, rx) = oneshot::channel();
    adapt(
        context.listener(),
        invocation,
        Box::new(move |result| {
            let _ = tx.send(result);
        }),
    )
    .await;

    let result = rx
        .await
        .map_err(|_| Error::from("invocation completed without a result"))?;

    // ========================================================================
    // Hand the status back to the runtime
    // ========================================================================

    match result {
        Ok(result) => {
            info!(status_code = result.status_code, "Invocation complete");
            Ok(result)
        }
        Err(e) => {
            // Malformed invocations never reach the user; surface them to
            // the operator instead.
            error!("Invocation failed: {}", e);
            reporting::capture(&e);
            Err(Error::from(e))
        }
    }
}

pub use self::function_handler as handler;

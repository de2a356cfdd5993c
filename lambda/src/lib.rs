/// dicebot - a chat bot that rolls dice through an external dice service.
///
/// The bot runs as a single AWS Lambda function behind API Gateway:
/// 1. The invocation adapter turns each Lambda event into a request/response
///    pair for a long-lived listener and resolves the invocation exactly once
/// 2. The Bot Connector listener decodes the inbound activity and hands the
///    message to the message handler
/// 3. The message handler asks the dice service to roll the message text and
///    replies with the formatted result, or with the service's own error
///    message
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda for serverless execution
/// - the Bot Framework REST API for replies
/// - reqwest for the dice service and connector calls
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use dicebot::bot::MessageHandler;
/// use dicebot::core::config::RollApi;
/// use dicebot::dice::HttpDiceClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     dicebot::setup_logging();
///
///     let dice = HttpDiceClient::new(
///         reqwest::Client::new(),
///         "https://fzatry6j6k.execute-api.us-west-2.amazonaws.com/dev/",
///         RollApi::TotalOnly,
///     )?;
///     let handler = MessageHandler::new(Arc::new(dice), RollApi::TotalOnly);
///
///     println!("{}", handler.reply_for("3d6").await);
///     Ok(())
/// }
/// ```
// Module declarations
pub mod adapter;
pub mod api;
pub mod bot;
pub mod core;
pub mod dice;
pub mod errors;
pub mod reporting;

pub use errors::BotError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// The filter comes from `RUST_LOG` and defaults to `info` (`debug` with the
/// `debug-logs` feature). Calling it more than once keeps the first
/// subscriber.
///
/// # Example
///
/// ```
/// dicebot::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let default_level = if cfg!(feature = "debug-logs") {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

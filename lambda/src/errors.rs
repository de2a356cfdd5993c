use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Malformed invocation: {0}")]
    MalformedInvocation(String),

    #[error("Dice service returned {status}: {message}")]
    RemoteService { status: u16, message: String },

    #[error("Failed to reach dice service: {0}")]
    Transport(String),

    #[error("Unexpected response from dice service: {0}")]
    UnexpectedResponse(String),

    #[error("Failed to access Bot Connector API: {0}")]
    Connector(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl BotError {
    /// The text a remote failure carries for the user, if it carries one.
    #[must_use]
    pub fn embedded_message(&self) -> Option<&str> {
        match self {
            BotError::RemoteService { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self {
        BotError::Transport(error.to_string())
    }
}

impl From<anyhow::Error> for BotError {
    fn from(error: anyhow::Error) -> Self {
        BotError::Connector(error.to_string())
    }
}

//! Chat side of the bot: Bot Connector activities, sessions and the message
//! handler

pub mod activity;
pub mod auth;
pub mod connector;
pub mod handler;
pub mod session;
pub mod storage;

// Re-export main types for convenience
pub use activity::Activity;
pub use connector::BotConnector;
pub use handler::MessageHandler;
pub use session::{ChatSession, ConnectorClient, ConnectorSession};
pub use storage::ConversationStore;

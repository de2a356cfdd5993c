//! API Lambda handler and invocation wiring

pub mod handler;

// Re-export the main handler for convenience
pub use handler::{BotContext, handler};

//! Everything that talks to the external dice service

pub mod client;
pub mod format;

pub use client::{DiceService, HttpDiceClient};
pub use format::{FALLBACK_REPLY, format_reply};

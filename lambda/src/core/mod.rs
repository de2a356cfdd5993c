//! Configuration and the data shared by the bot and the dice client

pub mod config;
pub mod models;

pub mod chat_client;
pub mod cli;
pub mod config;
pub mod error;

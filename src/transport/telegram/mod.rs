//! Telegram Bot API transport: long polling for updates, replies via
//! `sendMessage`, and file URLs via `getFile`.

mod client;
mod config;
mod models;

pub use client::{LONG_POLL_TIMEOUT_SECS, TelegramClient};
pub use config::{DEFAULT_API_URL, TelegramConfig};

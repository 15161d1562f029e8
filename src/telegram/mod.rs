//! All Telegram-specific functionality

pub mod bot;
pub mod chunk;
pub mod client;
pub mod commands;
pub mod dispatcher;

// Re-export main types for convenience
pub use bot::{TelegramBot, handle_command};
pub use chunk::{MESSAGE_LIMIT, split_message};
pub use client::{ApiResponse, ChatTransport, OutgoingMessage, TelegramClient};
pub use commands::Command;
pub use dispatcher::Dispatcher;

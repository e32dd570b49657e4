//! taxmate-core: Headless chat core for the TaxMate tax assistant
//!
//! This crate provides everything below the terminal UI:
//! - The append-only conversation log
//! - The submission state machine (busy gate, fallback reply)
//! - The HTTP client for the assistant endpoint
//! - Configuration loading and saving

pub mod client;
pub mod config;
pub mod conversation;
pub mod session;

// Re-export commonly used types
pub use client::{ApiError, AssistantClient, DEFAULT_ENDPOINT};
pub use config::{Config, ConfigError};
pub use conversation::{Conversation, Message, Role};
pub use session::{ChatSession, FALLBACK_REPLY};

/// Returns the core version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

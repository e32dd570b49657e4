//! Submission flow for a chat session.
//!
//! [`ChatSession`] owns the conversation and the busy flag and enforces the
//! one-request-at-a-time submission contract. The network round trip itself
//! happens outside this module; callers run it between [`ChatSession::submit`]
//! and [`ChatSession::settle`].

use tracing::warn;

use crate::client::ApiError;
use crate::conversation::{Conversation, Message};

/// Reply recorded for every failed round trip, regardless of cause.
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble connecting right now. Please try again.";

/// Conversation state machine for one chat session.
///
/// A submission moves through two phases: [`ChatSession::submit`] validates
/// the input, marks the session busy, and records the user message;
/// [`ChatSession::settle`] records the assistant reply (or the fallback) and
/// releases the busy flag. At most one submission is in flight at a time:
/// while the session is busy, further submit calls are dropped.
#[derive(Debug, Default)]
pub struct ChatSession {
    conversation: Conversation,
    busy: bool,
}

impl ChatSession {
    /// Create a session with an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// The conversation log.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Whether a submission is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Start a submission, returning the text to put on the wire.
    ///
    /// The user message is recorded immediately, before the network round
    /// trip resolves, and stays in the log even if the round trip fails.
    /// The recorded and returned text is `raw` exactly as given, untrimmed;
    /// trimming is only used to decide whether the input counts as empty.
    ///
    /// Returns `None` with no other effect when `raw` is blank or when a
    /// previous submission has not settled yet. A rejected attempt is
    /// dropped, not queued.
    pub fn submit(&mut self, raw: &str) -> Option<String> {
        if self.busy || raw.trim().is_empty() {
            return None;
        }
        self.busy = true;
        self.conversation.append(Message::user(raw));
        Some(raw.to_string())
    }

    /// Finish the in-flight submission with the outcome of its round trip.
    ///
    /// On success the reply text is appended verbatim; on failure the fixed
    /// [`FALLBACK_REPLY`] is appended and the cause is logged. The busy flag
    /// is released on both paths, so the session is always ready for the
    /// next submission afterwards.
    pub fn settle(&mut self, outcome: Result<String, ApiError>) {
        let reply = match outcome {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "Assistant request failed, using fallback reply");
                FALLBACK_REPLY.to_string()
            }
        };
        self.conversation.append(Message::assistant(reply));
        self.busy = false;
    }
}

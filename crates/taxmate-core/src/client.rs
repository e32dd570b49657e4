//! HTTP client for the TaxMate assistant endpoint.
//!
//! The service exposes a single chat route: a POST carrying
//! `{"message": ...}` answered with a `{"success": ..., "response": ...}`
//! envelope. The reply text is surfaced only for a well-formed success
//! envelope; every other outcome maps to an [`ApiError`] so callers can
//! substitute the fallback reply.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Endpoint used when no configuration overrides it.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Chat route, relative to the endpoint base.
const CHAT_PATH: &str = "/api/chatbot/chat/";

/// Wire format of a chat request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Wire format of a chat reply envelope.
#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    response: Option<String>,
}

/// Client for the assistant chat endpoint.
#[derive(Debug, Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    base_url: String,
}

impl AssistantClient {
    /// Create a client for the given endpoint base URL.
    pub fn new(endpoint: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint base URL this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.base_url
    }

    /// Send one user message and return the assistant's reply text.
    ///
    /// The message goes on the wire exactly as given, untrimmed.
    pub async fn send(&self, message: &str) -> Result<String, ApiError> {
        let url = format!("{}{CHAT_PATH}", self.base_url);
        let request = ChatRequest { message };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let reply: ChatReply = response.json().await.map_err(ApiError::Malformed)?;
        match reply {
            ChatReply {
                success: true,
                response: Some(text),
            } => Ok(text),
            _ => Err(ApiError::Unsuccessful),
        }
    }
}

/// Errors from one chat round trip.
///
/// The variants matter for logging only; all of them surface to the user as
/// the same fallback reply.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request never completed (connection refused, DNS failure, timeout).
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Server answered with a non-success HTTP status.
    #[error("server returned {0}")]
    Status(StatusCode),

    /// Response body was not the expected JSON envelope.
    #[error("malformed response body: {0}")]
    Malformed(#[source] reqwest::Error),

    /// Envelope parsed but did not report success with a reply.
    #[error("server reported an unsuccessful reply")]
    Unsuccessful,

    /// The task running the request stopped before it could complete.
    #[error("request task stopped before completing")]
    Aborted,
}

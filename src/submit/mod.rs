//! Quote submission and result display
//!
//! [`QuoteTransport`] is the seam between the controller and the network.
//! [`HttpTransport`] posts to the real endpoint; [`CannedTransport`] answers
//! from memory for tests and dry runs.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::HttpTransport;

use crate::error::{QuoteError, Result};
use crate::form::QuotePayload;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Sends an assembled payload to the quote endpoint
#[async_trait]
pub trait QuoteTransport: Send + Sync {
    /// POST the payload and return the decoded JSON body
    ///
    /// Non-success status codes with a JSON body are not errors; only network
    /// failures and undecodable bodies are.
    async fn calculate(&self, payload: &QuotePayload) -> Result<Value>;
}

/// The result box under the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultBox {
    pub text: String,
    pub visible: bool,
}

impl ResultBox {
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Box showing the text for a decoded response
    pub fn from_response(body: &Value) -> Self {
        Self {
            text: display_text(body),
            visible: true,
        }
    }

    /// Box showing the fixed apology after a failed request
    pub fn apology(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: true,
        }
    }
}

/// Text for a response body: `breakdown`, else `error`, else the whole body
/// pretty printed
pub fn display_text(body: &Value) -> String {
    shown_field(body, "breakdown")
        .or_else(|| shown_field(body, "error"))
        .unwrap_or_else(|| pretty(body))
}

fn shown_field(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(pretty(other)),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Transport answering from a queue of prepared responses
///
/// Every payload it receives is recorded. Once the queue is empty each call
/// fails like an unreachable server.
#[derive(Debug, Default)]
pub struct CannedTransport {
    responses: Mutex<VecDeque<Result<Value>>>,
    received: Mutex<Vec<QuotePayload>>,
}

impl CannedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON body
    pub fn respond(self, body: Value) -> Self {
        self.push(Ok(body));
        self
    }

    /// Queue a failure
    pub fn fail(self, error: QuoteError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, response: Result<Value>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    /// Payloads received so far
    pub fn received(&self) -> Vec<QuotePayload> {
        self.received
            .lock()
            .map(|payloads| payloads.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QuoteTransport for CannedTransport {
    async fn calculate(&self, payload: &QuotePayload) -> Result<Value> {
        if let Ok(mut received) = self.received.lock() {
            received.push(payload.clone());
        }

        self.responses
            .lock()
            .map_err(|e| QuoteError::Transport(e.to_string()))?
            .pop_front()
            .unwrap_or_else(|| Err(QuoteError::Transport("no response queued".to_string())))
    }
}

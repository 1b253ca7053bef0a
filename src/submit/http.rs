use crate::error::{QuoteError, Result};
use crate::form::QuotePayload;
use crate::submit::QuoteTransport;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;

/// Posts payloads to the quote endpoint over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuoteTransport for HttpTransport {
    async fn calculate(&self, payload: &QuotePayload) -> Result<Value> {
        debug!("POST {} with {} service(s)", self.url, payload.services.len());

        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                warn!("Quote request to {} failed: {}", self.url, e);
                QuoteError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!("Quote endpoint answered {}", status);
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| QuoteError::InvalidResponse(e.to_string()))
    }
}

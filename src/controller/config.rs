use crate::form::MAX_SERVICE_BLOCKS;
use serde::{Deserialize, Serialize};

/// Relative endpoint the quote form posts to
pub const DEFAULT_ENDPOINT: &str = "/calculate";

pub const DEFAULT_TOW_SERVICE_KEY: &str = "tow";

/// Text shown in the result box when the request cannot be completed
pub const DEFAULT_APOLOGY: &str = "⚠️ Error contacting server.";

/// Options for building a quote controller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControllerOptions {
    /// Quote endpoint, either a path like `/calculate` or a full URL
    pub endpoint: String,

    /// Maximum number of service blocks
    pub max_services: usize,

    /// Service preselected in the first block when a tow is needed
    pub tow_service_key: String,

    pub apology: String,

    /// Message shown when an add is attempted at the block limit
    pub limit_message: String,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_services: MAX_SERVICE_BLOCKS,
            tow_service_key: DEFAULT_TOW_SERVICE_KEY.to_string(),
            apology: DEFAULT_APOLOGY.to_string(),
            limit_message: limit_message_for(MAX_SERVICE_BLOCKS),
        }
    }
}

impl ControllerOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the block limit; values outside `1..=MAX_SERVICE_BLOCKS` are clamped
    ///
    /// The limit message follows the new bound.
    pub fn max_services(mut self, max: usize) -> Self {
        self.max_services = max.clamp(1, MAX_SERVICE_BLOCKS);
        self.limit_message = limit_message_for(self.max_services);
        self
    }

    pub fn tow_service_key(mut self, key: impl Into<String>) -> Self {
        self.tow_service_key = key.into();
        self
    }

    pub fn apology(mut self, text: impl Into<String>) -> Self {
        self.apology = text.into();
        self
    }

    pub fn limit_message(mut self, text: impl Into<String>) -> Self {
        self.limit_message = text.into();
        self
    }

    /// Absolute URL of the endpoint, joining a relative path onto `base`
    pub fn endpoint_url(&self, base: Option<&str>) -> String {
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            return self.endpoint.clone();
        }
        match base {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                self.endpoint.trim_start_matches('/')
            ),
            None => self.endpoint.clone(),
        }
    }
}

fn limit_message_for(max: usize) -> String {
    format!("You can only select up to {} services.", max)
}

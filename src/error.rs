use thiserror::Error;

/// Errors raised by the quote form controller
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Embedded page data could not be located or parsed
    #[error("Failed to load page data: {0}")]
    CatalogParse(String),

    /// Tow type is not registered in the pricing table
    #[error("Unknown tow type: {0}")]
    UnknownTowType(String),

    /// Service is not offered under the current tow type
    #[error("Service '{service}' is not offered for tow type '{tow_type}'")]
    UnknownService { tow_type: String, service: String },

    /// No service block with the given id
    #[error("Service block {0} not found")]
    BlockNotFound(u32),

    /// The first service block can never be removed
    #[error("The first service block cannot be removed")]
    CannotRemoveFirstBlock,

    /// Extra field does not belong to the block's selected service
    #[error("Field '{field}' is not available on service block {block}")]
    UnknownExtraField { block: u32, field: String },

    /// Extra field value failed validation
    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidFieldValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Model input is disabled until a make resolves
    #[error("Model input is disabled until a known make is chosen")]
    ModelInputDisabled,

    /// Lane select is hidden because the vehicle was reported safe
    #[error("Lane selection is only available for vehicles in an unsafe location")]
    LaneNotRequired,

    /// Road type / lane pair is not in the modifiers table
    #[error("Unknown lane '{lane}' for road type '{road_type}'")]
    UnknownLane { road_type: String, lane: String },

    /// A required control has no value at submit time
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Handler lookup failed
    #[error("Unknown handler: {0}")]
    UnknownHandler(String),

    /// Handler parameters could not be decoded
    #[error("Invalid parameters for '{handler}': {reason}")]
    InvalidParams { handler: String, reason: String },

    /// No interactive element with the given index in the rendered view
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Request to the quote endpoint failed
    #[error("Quote request failed: {0}")]
    Transport(String),

    /// Response body was not valid JSON
    #[error("Invalid quote response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, QuoteError>;

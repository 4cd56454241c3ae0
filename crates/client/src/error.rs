//! Error taxonomy for the orchestration kernel.
//!
//! Three families matter to callers: transport failures (the request never
//! completed), service failures (a non-2xx with the server's message), and
//! business rejections (a 2xx whose payload says no). Reads degrade to view
//! state; writes propagate so the initiating surface can stay open.

use thiserror::Error;

/// Errors that can occur when talking to the remote service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("service error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or a stand-in when the body had none.
        message: String,
    },

    /// A 2xx response whose payload reported failure.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Checkout attempted against an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL construction failed.
    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// The human-readable failure reason to show a user.
    ///
    /// Service and rejection messages come back verbatim; everything else
    /// falls back to the error's display form.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Rejected(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

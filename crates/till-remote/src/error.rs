//! # Remote Error Types
//!
//! ## Error Flow
//! ```text
//! reqwest::Error / non-2xx status
//!       │
//!       ▼
//! RemoteError (this module)
//!       │
//!       ├── Display       → logged with full detail
//!       └── user_message  → shown to the cashier
//! ```

use thiserror::Error;

/// Errors talking to the store server.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The configured base URL cannot be used.
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The server could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The server did not answer in time.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("Server returned {status}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status { status: u16, message: Option<String> },

    /// The response body was not the expected JSON.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// Any other client-side failure.
    #[error("Request failed: {0}")]
    Request(String),
}

impl RemoteError {
    /// The message to show the user.
    ///
    /// ## Mapping
    /// ```text
    /// Connection / Timeout  → "Unable to connect to server. ..."
    /// 404                   → "The requested resource was not found."
    /// 5xx                   → "Internal server error. Please try again later."
    /// other status + body   → the server's message
    /// anything else         → "An unexpected error occurred."
    /// ```
    pub fn user_message(&self) -> String {
        match self {
            RemoteError::Connection(_) | RemoteError::Timeout => {
                "Unable to connect to server. Please check your internet connection.".to_string()
            }
            RemoteError::Status { status: 404, .. } => {
                "The requested resource was not found.".to_string()
            }
            RemoteError::Status { status, .. } if *status >= 500 => {
                "Internal server error. Please try again later.".to_string()
            }
            RemoteError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            RemoteError::InvalidUrl { .. } => self.to_string(),
            _ => "An unexpected error occurred.".to_string(),
        }
    }

    /// Whether the server said the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::Status { status: 404, .. })
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RemoteError::Timeout
        } else if err.is_connect() {
            RemoteError::Connection(err.to_string())
        } else if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else {
            RemoteError::Request(err.to_string())
        }
    }
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

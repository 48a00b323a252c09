//! # API Error Type
//!
//! Unified error type returned by every command.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Till POS                               │
//! │                                                                         │
//! │  till sale record ...                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<Reply<T>, ApiError>                                      │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ─── DbError / RemoteError ──────────┐           │  │
//! │  │         │                                            │           │  │
//! │  │         ▼                                            ▼           │  │
//! │  │  Rule Violation? ─── CoreError::InvalidLineItems ── ApiError ──►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ─── Reply { value, notice } ──────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  main prints the error as a notice and exits non-zero.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use till_core::{CoreError, ValidationError};
use till_db::DbError;
use till_remote::RemoteError;

use crate::state::config::ConfigError;
use crate::state::store::StoreError;

/// Error returned from commands.
///
/// ## Serialization
/// With `--json` this is what gets printed:
/// ```json
/// {
///   "code": "DUPLICATE_CODE",
///   "message": "Product code \"BEV-001\" already exists. Please use a different code."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record not found
    NotFound,

    /// Input or line items failed validation
    ValidationError,

    /// Product or salesperson code already taken
    DuplicateCode,

    /// Local blob store failed
    StorageError,

    /// REST server unreachable or rejected the request
    ServerError,

    /// Configuration could not be loaded
    ConfigError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// Heading shown above the message.
    pub fn title(self) -> &'static str {
        match self {
            ErrorCode::NotFound => "Not Found!",
            ErrorCode::ValidationError => "Validation Errors!",
            ErrorCode::DuplicateCode => "Code Already Exists!",
            ErrorCode::StorageError => "Storage Error!",
            ErrorCode::ServerError => "Server Error!",
            ErrorCode::ConfigError => "Configuration Error!",
            ErrorCode::Internal => "Error!",
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn title(&self) -> &'static str {
        self.code.title()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Duplicate { .. } => {
                ApiError::new(ErrorCode::DuplicateCode, err.to_string())
            }
            other => ApiError::validation(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(inner) => inner.into(),
            CoreError::SalespersonNotFound(_)
            | CoreError::ProductNotFound(_)
            | CoreError::SaleNotFound(_)
            | CoreError::LineNotFound(_) => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::MissingSalesperson
            | CoreError::EmptySale
            | CoreError::InvalidLineItems(_)
            | CoreError::NonPositiveTotal
            | CoreError::TotalTooLarge => ApiError::validation(err.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(e) => {
                tracing::error!("Blob store connection failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Local storage could not be opened")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Local storage migration failed")
            }
            DbError::Serialization { key, message } => {
                tracing::error!(key = %key, "Stored data is corrupt: {}", message);
                ApiError::new(
                    ErrorCode::StorageError,
                    format!("Stored {} data could not be read", key),
                )
            }
            DbError::QueryFailed(e) | DbError::Internal(e) => {
                tracing::error!("Blob store query failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Local storage operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::StorageError, "Local storage is busy")
            }
        }
    }
}

impl From<RemoteError> for ApiError {
    fn from(err: RemoteError) -> Self {
        tracing::warn!(error = %err, "Server request failed");
        let code = if err.is_not_found() {
            ErrorCode::NotFound
        } else {
            ErrorCode::ServerError
        };
        ApiError::new(code, err.user_message())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Db(e) => e.into(),
            StoreError::Remote(e) => e.into(),
            StoreError::NotFound { entity, id } => ApiError::not_found(entity, &id),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

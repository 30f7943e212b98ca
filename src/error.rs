//! Errors surfaced by the HTTP API.
//!
//! Every failure a handler can report maps to one status code and a JSON
//! body with a human-readable `message`. Internal failures are logged in
//! full and answered generically.

use serde::Serialize;
use thiserror::Error;

use crate::gauge::GaugeError;
use crate::telemetry::store::StoreError;

/// A failed API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested resource does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// The request body or query was rejected (400).
    #[error("{message}")]
    Validation {
        /// Short summary shown to the client.
        message: String,
        /// What exactly was wrong with the input.
        detail: String,
    },

    /// Anything the client cannot fix (500).
    #[error("{0}")]
    Internal(String),
}

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            detail: detail.into(),
        }
    }

    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation { .. } => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Client-facing body. Internal details are not exposed.
    pub fn body(&self) -> ErrorBody {
        match self {
            Self::NotFound(message) => ErrorBody {
                message: message.clone(),
                detail: None,
            },
            Self::Validation { message, detail } => ErrorBody {
                message: message.clone(),
                detail: Some(detail.clone()),
            },
            Self::Internal(_) => ErrorBody {
                message: "Internal server error".to_string(),
                detail: None,
            },
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<GaugeError> for ApiError {
    fn from(err: GaugeError) -> Self {
        Self::validation("Invalid gauge range", err.to_string())
    }
}

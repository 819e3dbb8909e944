use std::borrow::Cow;

use serde::Serialize;
use thiserror::Error;

/// Top-level error type returned by record operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Validation failed for one or more fields.
    #[error("validation failed")]
    Validation(#[from] ValidationError),

    /// Underlying HTTP transport failed (connect, timeout, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("backend error: {status_code} {message}")]
    Status { status_code: u16, message: String },

    /// Backend answered with a body that does not decode as a record.
    #[error("unable to decode response from {operation}: {message}")]
    Decode { operation: &'static str, message: String },

    /// Target record was not found.
    #[error("record not found")]
    NotFound { record_id: Option<String> },

    /// Invalid input supplied to a client or form operation.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl ClientError {
    /// True for failures raised by the backend or the network, as opposed to local input problems.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, ClientError::Http(_) | ClientError::Status { .. } | ClientError::Decode { .. })
    }
}

/// Collection of validation issues that blocked a submit.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Field keys that carry at least one issue, in report order.
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|issue| issue.field.as_str()).collect()
    }
}

/// Detailed validation failure for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

//! Faults raised inside executed operations
//!
//! Operations run by the executor return `Result<_, Fault>`, where [`Fault`] is
//! an [`anyhow::Error`]. The classification chain recovers the typed faults
//! below with `downcast_ref`:
//!
//! - [`DomainError`]: a recognized domain-rule violation carrying its own code,
//!   message and status
//! - [`UpstreamError`]: a failed call to an upstream HTTP dependency (raw
//!   `reqwest::Error`s are recognized too)
//! - [`crate::repository::RepositoryError`]: a persistence-layer fault
//! - [`Panicked`]: a panic caught while running the operation

use std::{any::Any, fmt};

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::failure::{Failure, FailureKind};

/// Any fault an executed operation may raise
pub type Fault = anyhow::Error;

/// Recognized domain-rule violation
///
/// # Example
///
/// ```rust
/// use listings_service::executor::DomainError;
/// use axum::http::StatusCode;
///
/// let error = DomainError::resource_not_found("Car", 42);
/// assert_eq!(error.message, "Car not found with id: 42");
/// assert_eq!(error.status, StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct DomainError {
    /// Machine-readable code
    pub code: String,
    /// Message shown to callers as-is
    pub message: String,
    /// Suggested transport status
    pub status: StatusCode,
    /// Optional structured payload
    pub details: Option<Value>,
}

impl DomainError {
    /// Domain error with an explicit code, message and status
    pub fn with_status(
        code: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status,
            details: None,
        }
    }

    /// Business-rule violation with the default `BUSINESS_ERROR` code
    pub fn business(message: impl Into<String>) -> Self {
        Self::with_code(FailureKind::Business.default_code(), message)
    }

    /// Business-rule violation with a custom code and status 400
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(code, message, StatusCode::BAD_REQUEST)
    }

    /// Validation violation with the `VALIDATION_ERROR` code and status 400
    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_status(
            FailureKind::Validation.default_code(),
            message,
            StatusCode::BAD_REQUEST,
        )
    }

    /// [`DomainError::validation`] carrying per-field details
    ///
    /// ```rust
    /// use listings_service::executor::DomainError;
    /// use listings_service::failure::FailureKind;
    /// use serde_json::json;
    ///
    /// let error = DomainError::validation_with_details("Invalid search", json!({ "size": 500 }));
    /// let failure = error.to_failure();
    /// assert_eq!(failure.kind, FailureKind::Validation);
    /// assert_eq!(failure.status.as_u16(), 400);
    /// assert_eq!(failure.details, Some(json!({ "size": 500 })));
    /// ```
    pub fn validation_with_details(message: impl Into<String>, details: Value) -> Self {
        Self::validation(message).details(details)
    }

    /// Missing resource with the `NOT_FOUND` code and status 404
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_status(
            FailureKind::NotFound.default_code(),
            message,
            StatusCode::NOT_FOUND,
        )
    }

    /// `"{resource} not found with id: {id}"`
    pub fn resource_not_found(resource: &str, id: impl fmt::Display) -> Self {
        Self::not_found(format!("{resource} not found with id: {id}"))
    }

    /// Domain-reported network problem with the `NETWORK_ERROR` code
    pub fn network(message: impl Into<String>) -> Self {
        Self::with_status(
            FailureKind::Network.default_code(),
            message,
            StatusCode::SERVICE_UNAVAILABLE,
        )
    }

    /// Attach structured details
    #[must_use]
    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Failure kind implied by the declared code and status
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self.code.as_str() {
            "NOT_FOUND" => FailureKind::NotFound,
            "VALIDATION_ERROR" => FailureKind::Validation,
            "NETWORK_ERROR" => FailureKind::Network,
            _ if self.status == StatusCode::NOT_FOUND => FailureKind::NotFound,
            _ => FailureKind::Business,
        }
    }

    /// Failure carrying this error's own code, message, status and details
    #[must_use]
    pub fn to_failure(&self) -> Failure {
        let mut failure = Failure::of(self.kind())
            .with_code(self.code.clone())
            .with_message(self.message.clone());
        failure.status = self.status;
        failure.details = self.details.clone();
        failure
    }
}

/// Failed call to an upstream HTTP dependency
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// The upstream could not be reached
    #[error("upstream connection failed: {message}")]
    Connect { message: String },

    /// The upstream did not answer in time
    #[error("upstream request timed out: {message}")]
    Timeout { message: String },

    /// The upstream answered with a non-success status
    #[error("upstream responded with {status}")]
    Status { status: StatusCode, body: String },
}

impl UpstreamError {
    /// Upstream unreachable
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    /// Upstream did not answer in time
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Upstream answered `status` with `body`
    pub fn status(status: StatusCode, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Classify a `reqwest` error
    ///
    /// Only status, timeout and I/O errors describe the upstream. Builder,
    /// redirect and decode errors return `None` and are left to the fallback
    /// rule. Status errors produced by `error_for_status` carry no body.
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error) -> Option<Self> {
        if let Some(status) = err.status() {
            Some(Self::status(status, String::new()))
        } else if err.is_timeout() {
            Some(Self::timeout(err.to_string()))
        } else if err.is_connect() || err.is_request() {
            Some(Self::connect(err.to_string()))
        } else {
            None
        }
    }

    /// The `message` field of a JSON error body, if the upstream sent one
    #[must_use]
    pub fn body_message(&self) -> Option<String> {
        match self {
            Self::Status { body, .. } => extract_message(body),
            Self::Connect { .. } | Self::Timeout { .. } => None,
        }
    }
}

impl TryFrom<reqwest::Error> for UpstreamError {
    type Error = reqwest::Error;

    /// Hands back errors that do not describe the upstream
    fn try_from(err: reqwest::Error) -> Result<Self, Self::Error> {
        Self::from_reqwest(&err).ok_or(err)
    }
}

fn extract_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Failed to extract upstream error message");
            return None;
        }
    };

    match parsed.get("message")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

/// A panic caught while running an operation
#[derive(Debug, Error)]
#[error("operation panicked: {message}")]
pub struct Panicked {
    /// Panic payload rendered as text
    pub message: String,
}

impl Panicked {
    pub(crate) fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_domain_error_kinds() {
        assert_eq!(DomainError::business("x").kind(), FailureKind::Business);
        assert_eq!(DomainError::validation("x").kind(), FailureKind::Validation);
        assert_eq!(DomainError::not_found("x").kind(), FailureKind::NotFound);
        assert_eq!(DomainError::network("x").kind(), FailureKind::Network);
        assert_eq!(
            DomainError::with_status("GONE_FOR_GOOD", "x", StatusCode::NOT_FOUND).kind(),
            FailureKind::NotFound
        );
        assert_eq!(
            DomainError::with_code("INVALID_PRICE_RANGE", "x").kind(),
            FailureKind::Business
        );
    }

    #[test]
    fn test_domain_error_to_failure_keeps_fields() {
        let error = DomainError::validation_with_details("bad", json!({ "field": "page" }));
        let failure = error.to_failure();

        assert_eq!(failure.code, "VALIDATION_ERROR");
        assert_eq!(failure.message, "bad");
        assert_eq!(failure.status, StatusCode::BAD_REQUEST);
        assert_eq!(failure.details, Some(json!({ "field": "page" })));
    }

    #[test]
    fn test_body_message_extraction() {
        let with_message = UpstreamError::status(
            StatusCode::BAD_GATEWAY,
            r#"{"message":"inventory service down"}"#,
        );
        assert_eq!(
            with_message.body_message().as_deref(),
            Some("inventory service down")
        );

        let numeric = UpstreamError::status(StatusCode::BAD_REQUEST, r#"{"message":42}"#);
        assert_eq!(numeric.body_message().as_deref(), Some("42"));

        let html = UpstreamError::status(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(html.body_message(), None);

        let no_field = UpstreamError::status(StatusCode::BAD_GATEWAY, r#"{"error":"x"}"#);
        assert_eq!(no_field.body_message(), None);

        assert_eq!(UpstreamError::connect("refused").body_message(), None);
    }

    #[test]
    fn test_panicked_payloads() {
        let from_str: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(Panicked::from_payload(from_str.as_ref()).message, "static message");

        let from_string: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(Panicked::from_payload(from_string.as_ref()).message, "owned message");

        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(
            Panicked::from_payload(other.as_ref()).message,
            "non-string panic payload"
        );
    }
}

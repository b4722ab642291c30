//! Failure taxonomy
//!
//! Every classified error in this crate ends up as a [`Failure`]: a closed
//! [`FailureKind`], a machine-readable code, a human-readable message, a
//! suggested HTTP status, optional structured details, and an optional root
//! cause kept for diagnostics only.
//!
//! The root cause is never part of what a client sees. `Failure` does not
//! implement `Serialize`; the transport layer copies the public fields out
//! explicitly (see [`crate::handlers::ApiResponse`]).
//!
//! # Example
//!
//! ```rust
//! use listings_service::failure::{Failure, FailureKind};
//! use axum::http::StatusCode;
//!
//! let failure = Failure::not_found("Car not found with id: 42");
//! assert_eq!(failure.kind, FailureKind::NotFound);
//! assert_eq!(failure.code, "NOT_FOUND");
//! assert_eq!(failure.status, StatusCode::NOT_FOUND);
//!
//! let custom = Failure::custom(
//!     "INVALID_PRICE_RANGE",
//!     "Max price must be greater than min price",
//!     StatusCode::BAD_REQUEST,
//! );
//! assert_eq!(custom.kind, FailureKind::Custom);
//! ```

use std::{fmt, sync::Arc};

use axum::http::StatusCode;
use serde_json::Value;

/// Closed set of failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Caller-supplied input violates a stated invariant
    Validation,
    /// Referenced entity does not exist
    NotFound,
    /// Missing or invalid credentials
    Unauthorized,
    /// Authenticated but not permitted
    Forbidden,
    /// Domain rule violation distinct from input validation
    Business,
    /// Failure reaching an upstream dependency
    Network,
    /// An operation exceeded its allotted time
    Timeout,
    /// Persistence or infrastructure failure not caused by the caller
    Server,
    /// Uncategorized fault
    Unknown,
    /// Explicit code, message and status supplied by the caller
    Custom,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::Business => write!(f, "business"),
            Self::Network => write!(f, "network"),
            Self::Timeout => write!(f, "timeout"),
            Self::Server => write!(f, "server"),
            Self::Unknown => write!(f, "unknown"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl FailureKind {
    /// Default machine-readable code for this kind
    #[must_use]
    pub const fn default_code(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Business => "BUSINESS_ERROR",
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Server => "SERVER_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
            Self::Custom => "CUSTOM_ERROR",
        }
    }

    /// Suggested HTTP status for this kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation | Self::Business | Self::Custom => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Network => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Server | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message used when the caller does not supply one
    #[must_use]
    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::Validation => "Validation error. Please check your input.",
            Self::NotFound => "Resource not found.",
            Self::Unauthorized => "Unauthorized access.",
            Self::Forbidden => "Access forbidden.",
            Self::Business | Self::Custom => "Business logic error.",
            Self::Network => "Network connection error. Please try again later.",
            Self::Timeout => "Request timeout. Please try again.",
            Self::Server => "Server error. Please try again later.",
            Self::Unknown => "An unexpected error occurred. Please try again later.",
        }
    }

    /// Whether the failure was caused by the caller rather than the system
    ///
    /// Used to pick the log severity: caller-caused failures log at `warn`,
    /// everything else at `error`.
    #[must_use]
    pub const fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            Self::Validation
                | Self::NotFound
                | Self::Unauthorized
                | Self::Forbidden
                | Self::Business
                | Self::Custom
        )
    }
}

/// A classified failure
///
/// Built through the kind-specific factories, which fix the code and status
/// and take the message. Details and cause are attached afterwards with
/// [`Failure::with_details`] and [`Failure::with_cause`].
#[derive(Debug, Clone)]
pub struct Failure {
    /// Category from the closed taxonomy
    pub kind: FailureKind,
    /// Machine-readable code (e.g. `VALIDATION_ERROR`, `HTTP_404`)
    pub code: String,
    /// Human-readable message, safe to show to callers
    pub message: String,
    /// Suggested transport status
    pub status: StatusCode,
    /// Optional structured payload for callers
    pub details: Option<Value>,
    /// Root cause, for server-side diagnostics only
    pub cause: Option<Arc<anyhow::Error>>,
}

impl Failure {
    /// Create a failure of `kind` with its default code, status and message
    #[must_use]
    pub fn of(kind: FailureKind) -> Self {
        Self {
            kind,
            code: kind.default_code().to_string(),
            message: kind.default_message().to_string(),
            status: kind.status_code(),
            details: None,
            cause: None,
        }
    }

    fn with_kind(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::of(kind).with_message(message)
    }

    /// Input rejected before any work was done (400)
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_kind(FailureKind::Validation, message)
    }

    /// Validation failure with a domain-specific code, e.g. `INVALID_PRICE_RANGE`
    #[must_use]
    pub fn validation_with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::validation(message).with_code(code)
    }

    /// Requested resource does not exist (404)
    ///
    /// ```rust
    /// use listings_service::failure::{Failure, FailureKind};
    ///
    /// let failure = Failure::not_found("Car not found with id: 42");
    /// assert_eq!(failure.kind, FailureKind::NotFound);
    /// assert_eq!(failure.code, "NOT_FOUND");
    /// assert_eq!(failure.status.as_u16(), 404);
    /// ```
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_kind(FailureKind::NotFound, message)
    }

    /// Caller is not authenticated (401)
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_kind(FailureKind::Unauthorized, message)
    }

    /// Caller may not perform the action (403)
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::with_kind(FailureKind::Forbidden, message)
    }

    /// Domain rule violation with its own code (400)
    #[must_use]
    pub fn business(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_kind(FailureKind::Business, message).with_code(code)
    }

    /// Upstream could not be reached (503)
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::with_kind(FailureKind::Network, message)
    }

    /// Upstream did not answer in time (408)
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::with_kind(FailureKind::Timeout, message)
    }

    /// Internal or upstream server fault (500)
    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self::with_kind(FailureKind::Server, message)
    }

    /// Fault no rule could describe (500)
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::with_kind(FailureKind::Unknown, message)
    }

    /// Failure with an explicit code, message and status
    #[must_use]
    pub fn custom(code: impl Into<String>, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            kind: FailureKind::Custom,
            code: code.into(),
            message: message.into(),
            status,
            details: None,
            cause: None,
        }
    }

    /// Replace the caller-facing message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Replace the machine-readable code
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Attach structured details rendered to the caller
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach the root cause
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<Arc<anyhow::Error>>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

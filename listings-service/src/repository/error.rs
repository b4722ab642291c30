//! Listing source errors
//!
//! Every failure a [`ListingSource`](super::ListingSource) reports is a
//! [`RepositoryError`]. The executor treats all of them as persistence
//! faults and never shows their text to callers; the operation and kind are
//! kept for logs.
//!
//! # Example
//!
//! ```rust
//! use listings_service::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
//!
//! let error = RepositoryError::timeout(RepositoryOperation::FindPage, "statement timeout");
//! assert_eq!(error.kind, RepositoryErrorKind::Timeout);
//! assert_eq!(error.operation, RepositoryOperation::FindPage);
//! ```

use std::fmt;

use uuid::Uuid;

/// Source operation that was running when the error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Fetching one page of matching listings
    FindPage,
    /// Fetching one listing by id
    FindById,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FindPage => write!(f, "find_page"),
            Self::FindById => write!(f, "find_by_id"),
        }
    }
}

/// Category of source error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// Could not reach the store
    ConnectionFailed,
    /// The store did not answer in time
    Timeout,
    /// The store rejected or failed the query
    DatabaseError,
    /// A row could not be decoded
    SerializationError,
    Other,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
            Self::SerializationError => write!(f, "serialization_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured source error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    pub operation: RepositoryOperation,
    pub kind: RepositoryErrorKind,
    /// Raw store message; logged, never returned to callers
    pub message: String,
    /// Listing involved, when the operation targets one
    pub listing_id: Option<Uuid>,
}

impl RepositoryError {
    /// Error of `kind` raised during `operation`
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            listing_id: None,
        }
    }

    /// Store unreachable while fetching a page
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::new(
            RepositoryOperation::FindPage,
            RepositoryErrorKind::ConnectionFailed,
            message,
        )
    }

    /// Store did not answer in time
    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    /// Store rejected or failed the statement
    pub fn database_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::DatabaseError, message)
    }

    /// A row that could not be decoded into a listing
    pub fn malformed_row(
        operation: RepositoryOperation,
        listing_id: Uuid,
        message: impl Into<String>,
    ) -> Self {
        Self::new(operation, RepositoryErrorKind::SerializationError, message)
            .with_listing(listing_id)
    }

    /// Record the listing the error concerns
    #[must_use]
    pub fn with_listing(mut self, listing_id: Uuid) -> Self {
        self.listing_id = Some(listing_id);
        self
    }

    /// Record a different operation than the constructor default
    #[must_use]
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Listing source {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(id) = self.listing_id {
            write!(f, " [listing: {id}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}

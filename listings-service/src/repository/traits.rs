//! The data-source capability
//!
//! A [`ListingSource`] takes a compiled predicate, an ordering and a
//! zero-based page window, and returns one page of homogeneous records plus
//! the authoritative total. How it runs the query is its own business; the
//! core only requires that the order is stable for a fixed
//! predicate + sort + page while the data does not change.
//!
//! Calls are synchronous and may block for the length of one query.

use uuid::Uuid;

use super::error::RepositoryError;
use super::pagination::SourcePage;
use crate::filter::{CompiledPredicate, Record, Schema, SortSpec};

/// Result type for listing source operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// One page of raw rows plus the total number of matches
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRows<R> {
    /// Rows of the requested window, in source order
    pub items: Vec<R>,
    /// Matches across all pages
    pub total: u64,
}

impl<R> SourceRows<R> {
    pub fn new(items: Vec<R>, total: u64) -> Self {
        Self { items, total }
    }
}

/// Read side of a listing store
pub trait ListingSource: Send + Sync {
    /// Row type this source yields
    type Record: Record + Send;

    /// Schema predicates must be compiled against
    fn schema(&self) -> &dyn Schema;

    /// Matching rows for one page window
    ///
    /// A window past the last page yields no items but still reports the
    /// total.
    fn find_page(
        &self,
        predicate: &CompiledPredicate,
        sort: SortSpec,
        page: SourcePage,
    ) -> RepositoryResult<SourceRows<Self::Record>>;

    /// One row by id, sold or not
    fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Self::Record>>;
}

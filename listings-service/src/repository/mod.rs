//! Listing data sources
//!
//! The core treats the store as an opaque [`ListingSource`]: it hands over a
//! compiled predicate, a sort and a zero-based page window, and gets back one
//! page of rows plus the total count.
//!
//! - [`ListingSource`]: the capability trait
//! - [`MemorySource`]: in-memory implementation over either schema
//! - [`PageQuery`]: the SQL a database-backed source would run
//! - [`SourcePage`]: the single place a 1-based page becomes 0-based
//! - [`RepositoryError`]: every source failure, classified as a persistence fault

mod error;
mod memory;
mod pagination;
mod sql;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::MemorySource;
pub use pagination::{OrderDirection, SourcePage};
pub use sql::PageQuery;
pub use traits::{ListingSource, RepositoryResult, SourceRows};

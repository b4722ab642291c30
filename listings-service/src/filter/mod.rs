//! Listing filters
//!
//! Turns caller [`FilterCriteria`] into a [`CompiledPredicate`] that a data
//! source can evaluate in memory or render to SQL. Sorting is a side table
//! ([`SortOption`] → [`SortSpec`]) and never part of the predicate.
//!
//! ```text
//! FilterCriteria ──validate──▶ ok
//!        │
//!        └──compile(schema)──▶ CompiledPredicate ──▶ ListingSource::find_page
//! ```

mod compiler;
mod criteria;
mod predicate;
mod schema;
mod sort;

pub use compiler::{compile, SEARCH_FIELDS};
pub use criteria::{
    FilterCriteria, ALL_TRANSMISSIONS, DEFAULT_PAGE_SIZE, INVALID_PAGE, INVALID_PAGE_SIZE,
    INVALID_PRICE_RANGE,
};
pub use predicate::{Clause, CompiledPredicate, FieldValue, Record, SqlFragment, SqlValue};
pub use schema::{Column, Field, FlatSchema, Join, JoinedSchema, RangeBound, Schema};
pub use sort::{SortOption, SortSpec};

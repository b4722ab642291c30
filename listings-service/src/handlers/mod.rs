//! Transport boundary
//!
//! Wire types on both sides of the search and detail use cases:
//!
//! - [`SearchQuery`]: query-string parameters, converted to
//!   [`FilterCriteria`](crate::filter::FilterCriteria)
//! - [`ApiResponse`]: JSON envelope for success and failure
//! - [`OutcomeResponse`]: turns an [`Outcome`](crate::outcome::Outcome) into an
//!   axum response, using the failure's suggested status
//!
//! The mapping is declarative. Failure kinds are never reinterpreted here.

mod query;
mod response;

pub use query::SearchQuery;
pub use response::{ApiResponse, OutcomeResponse};

//! # listings-service
//!
//! Searchable car-listings core: filter compilation, classified failures and
//! paginated results over interchangeable storage layouts.
//!
//! ## Features
//!
//! - **Outcome pipeline**: every use case returns [`Outcome<Failure, T>`](outcome::Outcome)
//!   instead of raising
//! - **Failure taxonomy**: kinds with default codes, messages and HTTP statuses
//! - **Executor**: runs an operation, catches panics and classifies faults
//!   through an ordered rule chain
//! - **Filter compiler**: one [`FilterCriteria`](filter::FilterCriteria) compiles
//!   to the same predicate over a flat view or a joined relational layout
//! - **Pagination**: 1-based [`Page`](pagination::Page) with derived metadata
//!
//! ## Example
//!
//! ```rust
//! use listings_service::prelude::*;
//!
//! let config = Config::default();
//! let source = MemorySource::new(Vec::<ListingRecord>::new(), FlatSchema);
//! let service = ListingService::new(source, config.listings.clone());
//!
//! let criteria = FilterCriteria::new()
//!     .with_make("Toyota")
//!     .with_sort(SortOption::PriceAsc);
//!
//! let response = OutcomeResponse::new(service.search(&criteria), "Search cars successfully");
//! # let _ = response;
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod failure;
pub mod filter;
pub mod handlers;
pub mod listing;
pub mod observability;
pub mod outcome;
pub mod pagination;
pub mod repository;
pub mod service;

pub mod prelude {
    pub use crate::config::{Config, ListingsConfig, ServiceConfig};
    pub use crate::error::{Error, Result};

    pub use crate::executor::{execute, ClassificationChain, DomainError, Execution, Fault};
    pub use crate::failure::{Failure, FailureKind};
    pub use crate::outcome::Outcome;

    pub use crate::filter::{
        compile, CompiledPredicate, FilterCriteria, FlatSchema, JoinedSchema, Schema, SortOption,
        SortSpec,
    };
    pub use crate::listing::{CarEntity, ListingDto, ListingRecord};
    pub use crate::pagination::{paginate, Page};
    pub use crate::repository::{ListingSource, MemorySource, RepositoryError, SourcePage};

    pub use crate::handlers::{ApiResponse, OutcomeResponse, SearchQuery};
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::service::ListingService;
}

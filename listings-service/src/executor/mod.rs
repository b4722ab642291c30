//! Operation executor
//!
//! Runs one fallible operation and guarantees the caller receives an
//! [`Outcome`](crate::outcome::Outcome), never an unhandled fault or panic.
//!
//! Faults are classified by an explicit, ordered [`ClassificationChain`]:
//!
//! 1. [`DomainError`] → Business / Validation / NotFound per its declared code and status
//! 2. [`UpstreamError`] connect or timeout → Network / Timeout
//! 3. [`UpstreamError`] 5xx → Server, preferring the upstream's JSON `message`
//! 4. [`UpstreamError`] 4xx → `HTTP_<status>`, preferring the upstream's JSON `message`
//! 5. [`RepositoryError`](crate::repository::RepositoryError) → Server with a generic message
//! 6. anything else → Unknown with the operation's default message
//!
//! Each classified fault is logged with the operation name and the rule that
//! matched.

mod chain;
mod execute;
mod fault;

pub use chain::{
    Classification, ClassificationChain, Classifier, Matcher, Rule, RuleKind, PERSISTENCE_MESSAGE,
    UPSTREAM_SERVER_MESSAGE,
};
pub use execute::{execute, DomainHook, Execution, FaultHook};
pub use fault::{DomainError, Fault, Panicked, UpstreamError};

//! Running fallible operations
//!
//! [`Execution`] runs one computation and always hands back an
//! [`Outcome`]. A computation that returns normally is passed through
//! untouched. A computation that returns `Err(fault)`, or panics, has its
//! fault classified by a [`ClassificationChain`] and logged.
//!
//! # Example
//!
//! ```rust
//! use listings_service::executor::{execute, DomainError, Execution};
//! use listings_service::failure::Failure;
//! use listings_service::outcome::Outcome;
//!
//! let found: Outcome<Failure, u32> = execute("lookup", "Failed to load", || {
//!     Ok(Outcome::success(7))
//! });
//! assert_eq!(found.get_or_else(0), 7);
//!
//! let missing: Outcome<Failure, u32> = Execution::new("lookup", "Failed to load")
//!     .run(|| Err(DomainError::not_found("Car not found").into()));
//! let failure = missing.into_failure().unwrap();
//! assert_eq!(failure.status.as_u16(), 404);
//! ```

use std::panic::{self, AssertUnwindSafe};

use tracing::{error, warn};

use super::chain::{Classification, ClassificationChain, RuleKind};
use super::fault::{DomainError, Fault, Panicked};
use crate::failure::Failure;
use crate::outcome::Outcome;

/// Hook consulted when the fault is a recognized domain error
///
/// Returning `Some` replaces the default classification. A hook that panics
/// yields the `UNKNOWN_ERROR` failure.
pub type DomainHook<'a, T> = Box<dyn FnOnce(&DomainError) -> Option<Outcome<Failure, T>> + 'a>;

/// Hook consulted when no specific rule recognized the fault
///
/// Returning `Some` replaces the `UNKNOWN_ERROR` failure.
pub type FaultHook<'a, T> = Box<dyn FnOnce(&Fault) -> Option<Outcome<Failure, T>> + 'a>;

/// One run of a fallible operation
pub struct Execution<'a, T> {
    operation: &'a str,
    default_message: String,
    chain: Option<&'a ClassificationChain>,
    on_domain_error: Option<DomainHook<'a, T>>,
    on_other_fault: Option<FaultHook<'a, T>>,
}

impl<'a, T> Execution<'a, T> {
    /// Prepare a run of `operation`
    ///
    /// `default_message` is used for faults no rule can describe more
    /// precisely.
    #[must_use]
    pub fn new(operation: &'a str, default_message: impl Into<String>) -> Self {
        Self {
            operation,
            default_message: default_message.into(),
            chain: None,
            on_domain_error: None,
            on_other_fault: None,
        }
    }

    /// Classify with `chain` instead of [`ClassificationChain::standard`]
    #[must_use]
    pub fn with_chain(mut self, chain: &'a ClassificationChain) -> Self {
        self.chain = Some(chain);
        self
    }

    #[must_use]
    pub fn on_domain_error(
        mut self,
        hook: impl FnOnce(&DomainError) -> Option<Outcome<Failure, T>> + 'a,
    ) -> Self {
        self.on_domain_error = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn on_other_fault(
        mut self,
        hook: impl FnOnce(&Fault) -> Option<Outcome<Failure, T>> + 'a,
    ) -> Self {
        self.on_other_fault = Some(Box::new(hook));
        self
    }

    /// Run `computation`, converting any fault or panic into a failure
    pub fn run<C>(self, computation: C) -> Outcome<Failure, T>
    where
        C: FnOnce() -> Result<Outcome<Failure, T>, Fault>,
    {
        let fault = match panic::catch_unwind(AssertUnwindSafe(computation)) {
            Ok(Ok(outcome)) => return outcome,
            Ok(Err(fault)) => fault,
            Err(payload) => Fault::new(Panicked::from_payload(payload.as_ref())),
        };
        self.recover(fault)
    }

    fn recover(self, fault: Fault) -> Outcome<Failure, T> {
        let standard;
        let chain = match self.chain {
            Some(chain) => chain,
            None => {
                standard = ClassificationChain::standard();
                &standard
            }
        };

        let Classification { rule, failure } = chain.classify(&fault, &self.default_message);
        log_classification(self.operation, rule, &failure, &fault);

        let hooked = match rule {
            RuleKind::Domain => self
                .on_domain_error
                .zip(fault.downcast_ref::<DomainError>())
                .map(|(hook, err)| guard(|| hook(err))),
            RuleKind::Fallback => self.on_other_fault.map(|hook| guard(|| hook(&fault))),
            _ => None,
        };

        match hooked {
            Some(Ok(Some(outcome))) => return outcome,
            Some(Err(panicked)) => {
                error!(
                    operation = %self.operation,
                    rule = %rule,
                    error = %panicked,
                    "Override hook panicked in {}",
                    self.operation
                );
                return Outcome::failure(
                    Failure::unknown(self.default_message).with_cause(Fault::new(panicked)),
                );
            }
            Some(Ok(None)) | None => {}
        }

        Outcome::failure(failure.with_cause(fault))
    }
}

/// Call an override hook, capturing a panic instead of unwinding
fn guard<R>(hook: impl FnOnce() -> R) -> Result<R, Panicked> {
    panic::catch_unwind(AssertUnwindSafe(hook))
        .map_err(|payload| Panicked::from_payload(payload.as_ref()))
}

/// Run `computation` with the standard chain and no hooks
pub fn execute<T>(
    operation: &str,
    default_message: &str,
    computation: impl FnOnce() -> Result<Outcome<Failure, T>, Fault>,
) -> Outcome<Failure, T> {
    Execution::new(operation, default_message).run(computation)
}

fn log_classification(operation: &str, rule: RuleKind, failure: &Failure, fault: &Fault) {
    if failure.kind.is_caller_fault() {
        warn!(
            operation = %operation,
            rule = %rule,
            code = %failure.code,
            status = failure.status.as_u16(),
            "{} in {}: {}",
            failure.kind,
            operation,
            fault
        );
    } else if rule == RuleKind::Fallback {
        error!(
            operation = %operation,
            rule = %rule,
            code = %failure.code,
            error = ?fault,
            "Unexpected error in {}: {}",
            operation,
            fault
        );
    } else {
        error!(
            operation = %operation,
            rule = %rule,
            code = %failure.code,
            status = failure.status.as_u16(),
            "{} error in {}: {}",
            failure.kind,
            operation,
            fault
        );
    }
}

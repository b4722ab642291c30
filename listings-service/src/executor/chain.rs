//! Ordered fault classification
//!
//! A [`ClassificationChain`] is an explicit list of `(matcher, classifier)`
//! rules evaluated top to bottom. The first rule whose matcher accepts the
//! fault produces the [`Failure`]. Some fault categories overlap (a domain
//! error may describe a network problem, a timeout is also a connectivity
//! problem), so the order is part of the contract and is exposed through
//! [`ClassificationChain::rule_kinds`].
//!
//! # Example
//!
//! ```rust
//! use listings_service::executor::{ClassificationChain, RuleKind, UpstreamError};
//! use axum::http::StatusCode;
//!
//! let chain = ClassificationChain::standard();
//! let fault = anyhow::Error::new(UpstreamError::status(StatusCode::NOT_FOUND, ""));
//!
//! let classification = chain.classify(&fault, "Failed to load listing");
//! assert_eq!(classification.rule, RuleKind::UpstreamClient);
//! assert_eq!(classification.failure.code, "HTTP_404");
//! assert_eq!(classification.failure.message, "Resource not found.");
//! ```

use std::{borrow::Cow, fmt};

use axum::http::StatusCode;

use super::fault::{DomainError, Fault, UpstreamError};
use crate::failure::Failure;
use crate::repository::RepositoryError;

/// Message for upstream 5xx responses without a usable body
pub const UPSTREAM_SERVER_MESSAGE: &str = "The system is experiencing issues. Please try again later.";

/// Message for persistence faults; the raw cause never reaches callers
pub const PERSISTENCE_MESSAGE: &str = "Database access error. Please try again later.";

/// Which rule classified a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Recognized domain-rule violation
    Domain,
    /// Upstream unreachable or timed out
    UpstreamConnectivity,
    /// Upstream answered 5xx
    UpstreamServer,
    /// Upstream answered 4xx
    UpstreamClient,
    /// Persistence-layer fault
    Persistence,
    /// Anything else
    Fallback,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain => write!(f, "domain"),
            Self::UpstreamConnectivity => write!(f, "upstream_connectivity"),
            Self::UpstreamServer => write!(f, "upstream_server"),
            Self::UpstreamClient => write!(f, "upstream_client"),
            Self::Persistence => write!(f, "persistence"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Decides whether a rule applies to a fault
pub type Matcher = fn(&Fault) -> bool;

/// Builds the failure for a fault, given the operation's default message
pub type Classifier = fn(&Fault, &str) -> Failure;

/// One entry of the chain
#[derive(Clone, Copy)]
pub struct Rule {
    /// Identity of the rule, used for logging and override hooks
    pub kind: RuleKind,
    matches: Matcher,
    classify: Classifier,
}

impl Rule {
    #[must_use]
    pub const fn new(kind: RuleKind, matches: Matcher, classify: Classifier) -> Self {
        Self {
            kind,
            matches,
            classify,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("kind", &self.kind).finish()
    }
}

/// Result of running a fault through the chain
#[derive(Debug, Clone)]
pub struct Classification {
    /// Rule that matched
    pub rule: RuleKind,
    /// Failure it produced (without the root cause attached)
    pub failure: Failure,
}

/// Ordered list of classification rules; first match wins
#[derive(Debug, Clone)]
pub struct ClassificationChain {
    rules: Vec<Rule>,
}

impl ClassificationChain {
    /// The standard order: domain, upstream connectivity, upstream 5xx,
    /// upstream 4xx, persistence, fallback
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rules: vec![
                Rule::new(RuleKind::Domain, is_domain, classify_domain),
                Rule::new(
                    RuleKind::UpstreamConnectivity,
                    is_upstream_connectivity,
                    classify_upstream_connectivity,
                ),
                Rule::new(
                    RuleKind::UpstreamServer,
                    is_upstream_server,
                    classify_upstream_server,
                ),
                Rule::new(
                    RuleKind::UpstreamClient,
                    is_upstream_client,
                    classify_upstream_client,
                ),
                Rule::new(RuleKind::Persistence, is_persistence, classify_persistence),
                Rule::new(RuleKind::Fallback, |_| true, classify_fallback),
            ],
        }
    }

    /// Chain built from explicit rules
    ///
    /// A fault no rule accepts is classified by the fallback rule.
    #[must_use]
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Rule identities in evaluation order
    pub fn rule_kinds(&self) -> impl Iterator<Item = RuleKind> + '_ {
        self.rules.iter().map(|rule| rule.kind)
    }

    /// Classify `fault`; never fails
    #[must_use]
    pub fn classify(&self, fault: &Fault, default_message: &str) -> Classification {
        self.rules
            .iter()
            .find(|rule| (rule.matches)(fault))
            .map(|rule| Classification {
                rule: rule.kind,
                failure: (rule.classify)(fault, default_message),
            })
            .unwrap_or_else(|| Classification {
                rule: RuleKind::Fallback,
                failure: classify_fallback(fault, default_message),
            })
    }
}

impl Default for ClassificationChain {
    fn default() -> Self {
        Self::standard()
    }
}

fn upstream(fault: &Fault) -> Option<Cow<'_, UpstreamError>> {
    if let Some(err) = fault.downcast_ref::<UpstreamError>() {
        return Some(Cow::Borrowed(err));
    }
    fault
        .downcast_ref::<reqwest::Error>()
        .and_then(UpstreamError::from_reqwest)
        .map(Cow::Owned)
}

fn upstream_status(fault: &Fault) -> Option<StatusCode> {
    match upstream(fault).as_deref() {
        Some(UpstreamError::Status { status, .. }) => Some(*status),
        _ => None,
    }
}

fn is_domain(fault: &Fault) -> bool {
    fault.downcast_ref::<DomainError>().is_some()
}

fn classify_domain(fault: &Fault, default_message: &str) -> Failure {
    fault
        .downcast_ref::<DomainError>()
        .map(DomainError::to_failure)
        .unwrap_or_else(|| classify_fallback(fault, default_message))
}

fn is_upstream_connectivity(fault: &Fault) -> bool {
    matches!(
        upstream(fault).as_deref(),
        Some(UpstreamError::Connect { .. } | UpstreamError::Timeout { .. })
    )
}

fn classify_upstream_connectivity(fault: &Fault, _default_message: &str) -> Failure {
    match upstream(fault).as_deref() {
        Some(UpstreamError::Timeout { .. }) => Failure::timeout("Request timeout. Please try again."),
        _ => Failure::network("Network connection error. Please try again later."),
    }
}

fn is_upstream_server(fault: &Fault) -> bool {
    upstream_status(fault).is_some_and(|status| status.is_server_error())
}

fn classify_upstream_server(fault: &Fault, _default_message: &str) -> Failure {
    let message = upstream(fault)
        .and_then(|err| err.body_message())
        .unwrap_or_else(|| UPSTREAM_SERVER_MESSAGE.to_string());
    Failure::server(message)
}

fn is_upstream_client(fault: &Fault) -> bool {
    upstream_status(fault).is_some_and(|status| status.is_client_error())
}

fn classify_upstream_client(fault: &Fault, default_message: &str) -> Failure {
    let Some(status) = upstream_status(fault) else {
        return classify_fallback(fault, default_message);
    };

    let message = upstream(fault)
        .and_then(|err| err.body_message())
        .unwrap_or_else(|| client_status_message(status, default_message).to_string());

    Failure::custom(format!("HTTP_{}", status.as_u16()), message, status)
}

fn client_status_message(status: StatusCode, default_message: &str) -> &str {
    match status {
        StatusCode::BAD_REQUEST => "Bad request. Please check your input and try again.",
        StatusCode::UNAUTHORIZED => "You are not authenticated or session has expired.",
        StatusCode::FORBIDDEN => "You are not authorized to perform this action.",
        StatusCode::NOT_FOUND => "Resource not found.",
        _ => default_message,
    }
}

fn is_persistence(fault: &Fault) -> bool {
    fault.downcast_ref::<RepositoryError>().is_some()
}

fn classify_persistence(_fault: &Fault, _default_message: &str) -> Failure {
    Failure::server(PERSISTENCE_MESSAGE)
}

fn classify_fallback(_fault: &Fault, default_message: &str) -> Failure {
    Failure::unknown(default_message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::Panicked;
    use crate::failure::FailureKind;
    use crate::repository::{RepositoryErrorKind, RepositoryOperation};

    const DEFAULT: &str = "Failed to search listings";

    fn classify(fault: Fault) -> Classification {
        ClassificationChain::standard().classify(&fault, DEFAULT)
    }

    #[test]
    fn test_standard_order() {
        let order: Vec<RuleKind> = ClassificationChain::standard().rule_kinds().collect();
        assert_eq!(
            order,
            vec![
                RuleKind::Domain,
                RuleKind::UpstreamConnectivity,
                RuleKind::UpstreamServer,
                RuleKind::UpstreamClient,
                RuleKind::Persistence,
                RuleKind::Fallback,
            ]
        );
    }

    #[test]
    fn test_domain_not_found_keeps_status_and_message() {
        let result = classify(DomainError::resource_not_found("Car", "abc").into());
        assert_eq!(result.rule, RuleKind::Domain);
        assert_eq!(result.failure.kind, FailureKind::NotFound);
        assert_eq!(result.failure.status, StatusCode::NOT_FOUND);
        assert_eq!(result.failure.message, "Car not found with id: abc");
    }

    #[test]
    fn test_domain_network_error_is_domain_first() {
        let result = classify(DomainError::network("Pricing service unreachable").into());
        assert_eq!(result.rule, RuleKind::Domain);
        assert_eq!(result.failure.kind, FailureKind::Network);
        assert_eq!(result.failure.message, "Pricing service unreachable");
    }

    #[test]
    fn test_upstream_connect_and_timeout() {
        let connect = classify(UpstreamError::connect("connection refused").into());
        assert_eq!(connect.rule, RuleKind::UpstreamConnectivity);
        assert_eq!(connect.failure.code, "NETWORK_ERROR");
        assert_eq!(connect.failure.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!connect.failure.message.contains("refused"));

        let timeout = classify(UpstreamError::timeout("deadline elapsed").into());
        assert_eq!(timeout.rule, RuleKind::UpstreamConnectivity);
        assert_eq!(timeout.failure.code, "TIMEOUT");
        assert_eq!(timeout.failure.status, StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_upstream_server_prefers_body_message() {
        let with_body = classify(
            UpstreamError::status(
                StatusCode::BAD_GATEWAY,
                r#"{"message":"Inventory is syncing"}"#,
            )
            .into(),
        );
        assert_eq!(with_body.rule, RuleKind::UpstreamServer);
        assert_eq!(with_body.failure.code, "SERVER_ERROR");
        assert_eq!(with_body.failure.message, "Inventory is syncing");

        let without_body =
            classify(UpstreamError::status(StatusCode::INTERNAL_SERVER_ERROR, "").into());
        assert_eq!(without_body.failure.message, UPSTREAM_SERVER_MESSAGE);
    }

    #[test]
    fn test_upstream_client_status_messages() {
        let cases = [
            (StatusCode::BAD_REQUEST, "Bad request. Please check your input and try again."),
            (StatusCode::UNAUTHORIZED, "You are not authenticated or session has expired."),
            (StatusCode::FORBIDDEN, "You are not authorized to perform this action."),
            (StatusCode::NOT_FOUND, "Resource not found."),
            (StatusCode::CONFLICT, DEFAULT),
        ];

        for (status, message) in cases {
            let result = classify(UpstreamError::status(status, "").into());
            assert_eq!(result.rule, RuleKind::UpstreamClient);
            assert_eq!(result.failure.code, format!("HTTP_{}", status.as_u16()));
            assert_eq!(result.failure.status, status);
            assert_eq!(result.failure.message, message);
        }
    }

    #[test]
    fn test_upstream_client_prefers_body_message() {
        let result = classify(
            UpstreamError::status(StatusCode::UNPROCESSABLE_ENTITY, r#"{"message":"VIN invalid"}"#)
                .into(),
        );
        assert_eq!(result.failure.code, "HTTP_422");
        assert_eq!(result.failure.message, "VIN invalid");
    }

    #[test]
    fn test_persistence_never_leaks_raw_message() {
        let raw = "relation \"car_listings\" does not exist";
        let fault = RepositoryError::new(
            RepositoryOperation::FindPage,
            RepositoryErrorKind::DatabaseError,
            raw,
        );
        let result = classify(fault.into());

        assert_eq!(result.rule, RuleKind::Persistence);
        assert_eq!(result.failure.kind, FailureKind::Server);
        assert_eq!(result.failure.message, PERSISTENCE_MESSAGE);
        assert!(!result.failure.message.contains("car_listings"));
    }

    #[test]
    fn test_unclassified_falls_back_to_unknown() {
        let result = classify(anyhow::anyhow!("index out of range"));
        assert_eq!(result.rule, RuleKind::Fallback);
        assert_eq!(result.failure.code, "UNKNOWN_ERROR");
        assert_eq!(result.failure.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(result.failure.message, DEFAULT);

        let panicked = classify(
            Panicked {
                message: "boom".into(),
            }
            .into(),
        );
        assert_eq!(panicked.rule, RuleKind::Fallback);
    }

    #[test]
    fn test_reqwest_builder_error_falls_back() {
        let err = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        assert!(err.is_builder());
        assert!(UpstreamError::from_reqwest(&err).is_none());

        let result = classify(anyhow::Error::new(err));
        assert_eq!(result.rule, RuleKind::Fallback);
        assert_eq!(result.failure.kind, FailureKind::Unknown);
        assert_eq!(result.failure.code, "UNKNOWN_ERROR");
        assert_eq!(result.failure.message, DEFAULT);
    }

    #[test]
    fn test_reqwest_builder_error_is_handed_back() {
        let err = reqwest::Client::new().get("::").build().unwrap_err();
        let back = UpstreamError::try_from(err).unwrap_err();
        assert!(back.is_builder());
    }

    #[test]
    fn test_context_wrapped_domain_error_still_matches() {
        let fault = anyhow::Error::new(DomainError::validation("bad page"))
            .context("while searching listings");
        let result = classify(fault);
        assert_eq!(result.rule, RuleKind::Domain);
        assert_eq!(result.failure.message, "bad page");
    }

    #[test]
    fn test_custom_chain_without_match_uses_fallback() {
        let chain = ClassificationChain::from_rules(vec![Rule::new(
            RuleKind::Persistence,
            is_persistence,
            classify_persistence,
        )]);
        let result = chain.classify(&DomainError::business("x").into(), DEFAULT);
        assert_eq!(result.rule, RuleKind::Fallback);
        assert_eq!(result.failure.kind, FailureKind::Unknown);
    }
}

//! Response envelope
//!
//! Every endpoint answers with an [`ApiResponse`]. Success carries `data`;
//! failure carries the [`Failure`]'s code, message and details, with the
//! failure's suggested status. The root cause is never rendered.
//!
//! # Example
//!
//! ```rust
//! use axum::http::StatusCode;
//! use axum::response::IntoResponse;
//! use listings_service::failure::Failure;
//! use listings_service::handlers::OutcomeResponse;
//! use listings_service::outcome::Outcome;
//!
//! let outcome: Outcome<Failure, u32> = Outcome::failure(Failure::not_found("Car not found"));
//! let response = OutcomeResponse::new(outcome, "Get car detail successfully").into_response();
//! assert_eq!(response.status(), StatusCode::NOT_FOUND);
//! ```

use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::failure::Failure;
use crate::outcome::Outcome;

/// JSON envelope for every response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    /// Failure code; absent on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// RFC 3339 creation time
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            code: None,
            data: Some(data),
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Render a failure's public fields
    pub fn failure(failure: &Failure) -> Self {
        Self {
            success: false,
            message: failure.message.clone(),
            code: Some(failure.code.clone()),
            data: None,
            details: failure.details.clone(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Status and envelope for an outcome
    ///
    /// Success is `200 OK`; failure uses the failure's own status.
    pub fn from_outcome(outcome: Outcome<Failure, T>, success_message: &str) -> (StatusCode, Self) {
        outcome.fold(
            |failure| (failure.status, Self::failure(&failure)),
            |data| (StatusCode::OK, Self::success(success_message, data)),
        )
    }
}

/// An outcome ready to be returned from an axum handler
#[derive(Debug)]
pub struct OutcomeResponse<T> {
    outcome: Outcome<Failure, T>,
    success_message: Cow<'static, str>,
}

impl<T> OutcomeResponse<T> {
    pub fn new(outcome: Outcome<Failure, T>, success_message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            outcome,
            success_message: success_message.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for OutcomeResponse<T> {
    fn into_response(self) -> Response {
        let (status, body) = ApiResponse::from_outcome(self.outcome, &self.success_message);
        (status, Json(body)).into_response()
    }
}

//! Filter criteria
//!
//! [`FilterCriteria`] is the sparse, mostly-optional set of filter, sort and
//! page parameters a caller submits. Absent fields impose no constraint.
//!
//! # Example
//!
//! ```rust
//! use listings_service::filter::{FilterCriteria, SortOption};
//! use listings_service::config::ListingsConfig;
//! use rust_decimal::Decimal;
//!
//! let criteria = FilterCriteria::new()
//!     .with_search("civic")
//!     .with_price_range(Some(Decimal::from(5_000)), Some(Decimal::from(20_000)))
//!     .with_body_types(["Sedan", "Hatchback"])
//!     .with_sort(SortOption::PriceAsc)
//!     .with_page(2, 10);
//!
//! assert!(criteria.validate(&ListingsConfig::default()).is_ok());
//! ```

use rust_decimal::Decimal;
use serde_json::json;

use crate::config::ListingsConfig;
use crate::failure::Failure;

use super::sort::SortOption;

/// Code for a minimum price above the maximum price
pub const INVALID_PRICE_RANGE: &str = "INVALID_PRICE_RANGE";

/// Code for a page number below 1
pub const INVALID_PAGE: &str = "INVALID_PAGE";

/// Code for a page size outside `1..=max_page_size`
pub const INVALID_PAGE_SIZE: &str = "INVALID_PAGE_SIZE";

/// Default page size when the caller does not pick one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Transmission value that means "no transmission filter"
pub const ALL_TRANSMISSIONS: &str = "All";

/// Caller-supplied search parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Free text matched against make, model and trim names
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub trim: Option<String>,
    /// Accepted body types, matched case-insensitively
    pub body_types: Vec<String>,
    /// `"All"` (any case) means no constraint
    pub transmission: Option<String>,
    pub sort: SortOption,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: None,
            min_price: None,
            max_price: None,
            make: None,
            model: None,
            trim: None,
            body_types: Vec::new(),
            transmission: None,
            sort: SortOption::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterCriteria {
    /// Criteria with no filters, first page, default size
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn with_price_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    #[must_use]
    pub fn with_make(mut self, make: impl Into<String>) -> Self {
        self.make = Some(make.into());
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn with_trim(mut self, trim: impl Into<String>) -> Self {
        self.trim = Some(trim.into());
        self
    }

    #[must_use]
    pub fn with_body_types<I, S>(mut self, body_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body_types = body_types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_transmission(mut self, transmission: impl Into<String>) -> Self {
        self.transmission = Some(transmission.into());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Check the invariants that must hold before compilation
    ///
    /// # Errors
    ///
    /// Returns a validation failure when the page number is 0, the page size
    /// is outside `1..=max_page_size`, or (when enabled in `limits`) the
    /// minimum price exceeds the maximum price. Bounds are never swapped.
    pub fn validate(&self, limits: &ListingsConfig) -> Result<(), Failure> {
        if self.page == 0 {
            return Err(Failure::validation_with_code(
                INVALID_PAGE,
                "Page number must be at least 1",
            )
            .with_details(json!({ "page": self.page })));
        }

        if self.page_size == 0 || self.page_size > limits.max_page_size {
            return Err(Failure::validation_with_code(
                INVALID_PAGE_SIZE,
                format!(
                    "Page size must be between 1 and {}",
                    limits.max_page_size
                ),
            )
            .with_details(json!({ "size": self.page_size, "max": limits.max_page_size })));
        }

        if limits.validate_price_range {
            if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
                if min > max {
                    return Err(Failure::validation_with_code(
                        INVALID_PRICE_RANGE,
                        "Max price must be greater than min price",
                    ));
                }
            }
        }

        Ok(())
    }
}

/// A present, non-blank string
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::FailureKind;

    fn limits() -> ListingsConfig {
        ListingsConfig::default()
    }

    #[test]
    fn test_defaults() {
        let criteria = FilterCriteria::new();
        assert_eq!(criteria.page, 1);
        assert_eq!(criteria.page_size, 20);
        assert_eq!(criteria.sort, SortOption::Relevance);
        assert!(criteria.validate(&limits()).is_ok());
    }

    #[test]
    fn test_inverted_price_range_rejected() {
        let criteria = FilterCriteria::new()
            .with_price_range(Some(Decimal::from(50_000)), Some(Decimal::from(10_000)));

        let failure = criteria.validate(&limits()).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Validation);
        assert_eq!(failure.code, INVALID_PRICE_RANGE);
        assert_eq!(failure.status.as_u16(), 400);
        assert_eq!(failure.message, "Max price must be greater than min price");
    }

    #[test]
    fn test_equal_bounds_and_single_bounds_accepted() {
        let equal = FilterCriteria::new()
            .with_price_range(Some(Decimal::from(10_000)), Some(Decimal::from(10_000)));
        assert!(equal.validate(&limits()).is_ok());

        let only_min = FilterCriteria::new().with_price_range(Some(Decimal::from(1)), None);
        assert!(only_min.validate(&limits()).is_ok());
    }

    #[test]
    fn test_price_check_can_be_disabled() {
        let criteria = FilterCriteria::new()
            .with_price_range(Some(Decimal::from(50_000)), Some(Decimal::from(10_000)));
        let relaxed = ListingsConfig {
            validate_price_range: false,
            ..ListingsConfig::default()
        };
        assert!(criteria.validate(&relaxed).is_ok());
    }

    #[test]
    fn test_page_bounds() {
        let zero_page = FilterCriteria::new().with_page(0, 20);
        assert_eq!(zero_page.validate(&limits()).unwrap_err().code, INVALID_PAGE);

        let zero_size = FilterCriteria::new().with_page(1, 0);
        assert_eq!(zero_size.validate(&limits()).unwrap_err().code, INVALID_PAGE_SIZE);

        let too_big = FilterCriteria::new().with_page(1, 101);
        let failure = too_big.validate(&limits()).unwrap_err();
        assert_eq!(failure.code, INVALID_PAGE_SIZE);
        assert_eq!(failure.message, "Page size must be between 1 and 100");

        let max = FilterCriteria::new().with_page(1, 100);
        assert!(max.validate(&limits()).is_ok());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("BMW")), Some("BMW"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}

//! Search query parameters
//!
//! [`SearchQuery`] is the wire shape of `GET /cars/search`. It is converted
//! into [`FilterCriteria`] with the configured defaults; validation happens
//! later, inside the executed search.
//!
//! # Example
//!
//! ```rust
//! use axum::extract::Query;
//! use listings_service::config::ListingsConfig;
//! use listings_service::handlers::SearchQuery;
//!
//! let uri = "/cars/search?value=civic&selectedBodyTypes=SUV,%20Sedan&page=2"
//!     .parse()
//!     .unwrap();
//! let Query(query) = Query::<SearchQuery>::try_from_uri(&uri).unwrap();
//! let criteria = query.into_criteria(&ListingsConfig::default());
//!
//! assert_eq!(criteria.search.as_deref(), Some("civic"));
//! assert_eq!(criteria.body_types, vec!["SUV", "Sedan"]);
//! assert_eq!((criteria.page, criteria.page_size), (2, 20));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ListingsConfig;
use crate::filter::{FilterCriteria, SortOption};

/// Query string of a listing search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Free text over make, model and trim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,

    #[serde(alias = "selectedMakes", skip_serializing_if = "Option::is_none")]
    pub selected_make: Option<String>,

    #[serde(alias = "selectedModels", skip_serializing_if = "Option::is_none")]
    pub selected_model: Option<String>,

    #[serde(alias = "selectedTrims", skip_serializing_if = "Option::is_none")]
    pub selected_trim: Option<String>,

    /// Comma-separated body type names, e.g. `SUV,Sedan`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_body_types: Option<String>,

    /// `All` means any transmission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_transmission: Option<String>,

    /// Sort key; unknown keys sort by relevance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,

    /// 1-based page number, default 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Page size, default from configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl SearchQuery {
    /// Build criteria, filling in page defaults from `limits`
    #[must_use]
    pub fn into_criteria(self, limits: &ListingsConfig) -> FilterCriteria {
        FilterCriteria {
            search: self.value,
            min_price: self.min_price,
            max_price: self.max_price,
            make: self.selected_make,
            model: self.selected_model,
            trim: self.selected_trim,
            body_types: split_list(self.selected_body_types.as_deref()),
            transmission: self.selected_transmission,
            sort: SortOption::from_key(self.sort.as_deref()),
            page: self.page.unwrap_or(1),
            page_size: self.size.unwrap_or(limits.default_page_size),
        }
    }
}

/// Split a comma-separated list, dropping blank entries
fn split_list(list: Option<&str>) -> Vec<String> {
    list.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

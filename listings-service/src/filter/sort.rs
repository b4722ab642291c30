//! Sort side table
//!
//! Maps the fixed set of sort keys accepted from clients to a
//! `(field, direction)` pair. There is no relevance scoring: `relevance`,
//! an absent key, and any unrecognized key all mean newest first.
//!
//! # Example
//!
//! ```rust
//! use listings_service::filter::{Field, SortOption};
//! use listings_service::repository::OrderDirection;
//!
//! let spec = SortOption::from_key(Some("price-asc")).sort_spec();
//! assert_eq!(spec.field, Field::Price);
//! assert_eq!(spec.direction, OrderDirection::Ascending);
//!
//! assert_eq!(SortOption::from_key(Some("cheapest")), SortOption::Relevance);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::schema::Field;
use crate::repository::OrderDirection;

/// Sort keys accepted from clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Newest listings first
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    YearAsc,
    YearDesc,
    MileageAsc,
    MileageDesc,
}

impl SortOption {
    /// Every option, in the order clients see them
    pub const ALL: [Self; 7] = [
        Self::Relevance,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::YearAsc,
        Self::YearDesc,
        Self::MileageAsc,
        Self::MileageDesc,
    ];

    /// Wire key, e.g. `price-asc`
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::YearAsc => "year-asc",
            Self::YearDesc => "year-desc",
            Self::MileageAsc => "mileage-asc",
            Self::MileageDesc => "mileage-desc",
        }
    }

    /// Parse a wire key; absent or unrecognized keys fall back to relevance
    #[must_use]
    pub fn from_key(key: Option<&str>) -> Self {
        key.and_then(|key| Self::ALL.into_iter().find(|option| option.key() == key))
            .unwrap_or_default()
    }

    /// Field and direction this option orders by
    #[must_use]
    pub const fn sort_spec(&self) -> SortSpec {
        let (field, direction) = match self {
            Self::Relevance => (Field::CreatedAt, OrderDirection::Descending),
            Self::PriceAsc => (Field::Price, OrderDirection::Ascending),
            Self::PriceDesc => (Field::Price, OrderDirection::Descending),
            Self::YearAsc => (Field::Year, OrderDirection::Ascending),
            Self::YearDesc => (Field::Year, OrderDirection::Descending),
            Self::MileageAsc => (Field::Mileage, OrderDirection::Ascending),
            Self::MileageDesc => (Field::Mileage, OrderDirection::Descending),
        };
        SortSpec { field, direction }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Ordering handed to the data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub field: Field,
    pub direction: OrderDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        SortOption::Relevance.sort_spec()
    }
}

//! Ordering and page windows handed to a listing source
//!
//! # Example
//!
//! ```rust
//! use listings_service::repository::{OrderDirection, SourcePage};
//!
//! let window = SourcePage::from_one_based(3, 20);
//! assert_eq!(window.offset(), 40);
//! assert_eq!(window.limit(), 20);
//!
//! assert_eq!(OrderDirection::Descending.to_string(), "desc");
//! ```

use std::fmt;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl OrderDirection {
    /// SQL keyword
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Zero-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePage {
    /// Zero-based page index
    pub index: u64,
    /// Rows per page
    pub size: u64,
}

impl SourcePage {
    #[must_use]
    pub const fn new(index: u64, size: u64) -> Self {
        Self { index, size }
    }

    /// Window for a 1-based page number
    ///
    /// Page 0 is treated as page 1.
    #[must_use]
    pub const fn from_one_based(page: u64, size: u64) -> Self {
        Self {
            index: page.saturating_sub(1),
            size,
        }
    }

    /// Rows to skip
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.index.saturating_mul(self.size)
    }

    /// Rows to take
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_has_no_offset() {
        let window = SourcePage::from_one_based(1, 20);
        assert_eq!(window.index, 0);
        assert_eq!(window.offset(), 0);
    }

    #[test]
    fn test_page_zero_saturates() {
        assert_eq!(SourcePage::from_one_based(0, 10), SourcePage::new(0, 10));
    }

    #[test]
    fn test_offset_saturates() {
        assert_eq!(SourcePage::new(u64::MAX, 2).offset(), u64::MAX);
    }

    #[test]
    fn test_direction() {
        assert_eq!(OrderDirection::default(), OrderDirection::Ascending);
        assert_eq!(OrderDirection::Ascending.keyword(), "ASC");
        assert_eq!(OrderDirection::Descending.to_string(), "desc");
    }
}

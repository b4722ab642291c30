//! Result pages
//!
//! [`paginate`] wraps one page of rows from a data source with derived
//! metadata. Page numbers are 1-based here; the translation to the source's
//! 0-based window happens once, in
//! [`SourcePage::from_one_based`](crate::repository::SourcePage::from_one_based).
//!
//! Metadata is computed once, at construction:
//!
//! - `page_count = ceil(total / page_size)`, `0` when `total` is `0`
//! - `has_next = page < page_count`
//! - `has_previous = page > 1`
//!
//! The page number is never checked against `page_count`; a page past the
//! end is a legal, empty page.
//!
//! # Example
//!
//! ```rust
//! use listings_service::pagination::paginate;
//!
//! let page = paginate(vec!["a", "b", "c", "d", "e"], 3, 10, 25);
//! assert_eq!(page.page_count(), 3);
//! assert!(!page.has_next());
//! assert!(page.has_previous());
//!
//! let lengths = page.map(str::len);
//! assert_eq!(lengths.items(), &[1, 1, 1, 1, 1]);
//! assert_eq!(lengths.total(), 25);
//! ```

use serde::Serialize;

/// One page of results plus metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    list: Vec<T>,
    page: u32,
    page_size: u32,
    page_count: u32,
    total: u64,
    has_next: bool,
    has_previous: bool,
}

impl<T> Page<T> {
    /// Wrap rows returned by a data source
    ///
    /// `list` is kept in source order.
    #[must_use]
    pub fn of(list: Vec<T>, page: u32, page_size: u32, total: u64) -> Self {
        let page_count = page_count(total, page_size);
        Self {
            list,
            page,
            page_size,
            page_count,
            total,
            has_next: page < page_count,
            has_previous: page > 1,
        }
    }

    /// A page with no rows and zeroed metadata
    #[must_use]
    pub fn empty() -> Self {
        Self::of(Vec::new(), 0, 0, 0)
    }

    /// Transform every item, keeping all metadata
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            list: self.list.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            page_count: self.page_count,
            total: self.total,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }

    /// Keep the items matching `predicate`
    ///
    /// Metadata is copied unchanged: `total` and `page_count` still describe
    /// the unfiltered result set, so they will overstate what a caller sees
    /// after filtering. Filter in the predicate instead when the counts must
    /// be exact.
    #[must_use]
    pub fn filter(self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        Self {
            list: self.list.into_iter().filter(|item| predicate(item)).collect(),
            ..self
        }
    }

    /// Rows of this page, in source order
    pub fn items(&self) -> &[T] {
        &self.list
    }

    /// Take the rows, dropping the metadata
    pub fn into_items(self) -> Vec<T> {
        self.list
    }

    /// 1-based page number
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size; the last page may hold fewer rows
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// `ceil(total / page_size)`, 0 when nothing matched
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Matches across all pages, as reported by the source
    pub fn total(&self) -> u64 {
        self.total
    }

    /// A later page exists
    pub fn has_next(&self) -> bool {
        self.has_next
    }

    /// This is not the first page
    pub fn has_previous(&self) -> bool {
        self.has_previous
    }

    /// No page follows this one
    pub fn is_last(&self) -> bool {
        !self.has_next
    }

    /// Rows on this page
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// No rows on this page
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// Build a page from raw rows, a 1-based page number, the page size and the
/// authoritative total
#[must_use]
pub fn paginate<T>(rows: Vec<T>, page: u32, page_size: u32, total: u64) -> Page<T> {
    Page::of(rows, page, page_size, total)
}

fn page_count(total: u64, page_size: u32) -> u32 {
    if total == 0 || page_size == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

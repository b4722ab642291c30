//! In-memory listing source
//!
//! Evaluates compiled predicates with [`CompiledPredicate::matches`] over a
//! fixed set of records. Useful for tests, demos and small catalogues.
//!
//! # Example
//!
//! ```rust
//! use listings_service::filter::{compile, FilterCriteria, FlatSchema, SortSpec};
//! use listings_service::listing::ListingRecord;
//! use listings_service::repository::{ListingSource, MemorySource, SourcePage};
//!
//! let source = MemorySource::new(Vec::<ListingRecord>::new(), FlatSchema);
//! let predicate = compile(&FilterCriteria::new(), source.schema());
//! let rows = source
//!     .find_page(&predicate, SortSpec::default(), SourcePage::from_one_based(1, 20))
//!     .unwrap();
//! assert_eq!(rows.total, 0);
//! ```

use std::cmp::Ordering;

use tracing::debug;
use uuid::Uuid;

use super::pagination::{OrderDirection, SourcePage};
use super::traits::{ListingSource, RepositoryResult, SourceRows};
use crate::filter::{CompiledPredicate, Record, Schema, SortSpec};

/// Records held in memory and queried through their own schema
///
/// The schema is the record type's [`Record::Schema`], so a record can only
/// be paired with the layout it answers for:
///
/// ```rust,compile_fail
/// use listings_service::filter::JoinedSchema;
/// use listings_service::listing::ListingRecord;
/// use listings_service::repository::MemorySource;
///
/// let source = MemorySource::new(Vec::<ListingRecord>::new(), JoinedSchema);
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource<R: Record> {
    records: Vec<R>,
    schema: R::Schema,
}

impl<R> MemorySource<R>
where
    R: Record + Clone + Send + Sync,
{
    /// Source over `records`, read through `schema`
    pub fn new(records: Vec<R>, schema: R::Schema) -> Self {
        Self { records, schema }
    }

    /// Source over `records` with the default instance of their schema
    pub fn from_records(records: Vec<R>) -> Self
    where
        R::Schema: Default,
    {
        Self::new(records, R::Schema::default())
    }

    /// All records held, sold ones included
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// No records held
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn compare(&self, a: &R, b: &R, sort: SortSpec) -> Ordering {
        let column = self.schema.column(sort.field);
        let by_field = match (a.value(&column), b.value(&column)) {
            (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
            // Missing values sort last in either direction
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        let by_field = match sort.direction {
            OrderDirection::Ascending => by_field,
            OrderDirection::Descending => by_field.reverse(),
        };
        by_field.then_with(|| a.id().cmp(&b.id()))
    }
}

impl<R> ListingSource for MemorySource<R>
where
    R: Record + Clone + Send + Sync,
{
    type Record = R;

    fn schema(&self) -> &dyn Schema {
        &self.schema
    }

    fn find_page(
        &self,
        predicate: &CompiledPredicate,
        sort: SortSpec,
        page: SourcePage,
    ) -> RepositoryResult<SourceRows<R>> {
        let mut matched: Vec<&R> = self
            .records
            .iter()
            .filter(|record| predicate.matches(*record))
            .collect();
        matched.sort_by(|a, b| self.compare(a, b, sort));

        let total = matched.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let items: Vec<R> = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        debug!(
            schema = self.schema.name(),
            clauses = predicate.clauses().len(),
            page_index = page.index,
            returned = items.len(),
            total,
            "memory source page"
        );

        Ok(SourceRows::new(items, total))
    }

    fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<R>> {
        Ok(self.records.iter().find(|record| record.id() == id).cloned())
    }
}

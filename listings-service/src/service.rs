//! Listing use cases
//!
//! [`ListingService`] wires the pieces together. Collaborators are passed in
//! at construction; there is no global registry.
//!
//! ```text
//! search: validate ─▶ compile ─▶ sort ─▶ SourcePage ─▶ find_page ─▶ paginate ─▶ map to DTO
//!         └──────────────────── all inside Execution::run ────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use listings_service::config::ListingsConfig;
//! use listings_service::filter::{FilterCriteria, FlatSchema};
//! use listings_service::listing::ListingRecord;
//! use listings_service::repository::MemorySource;
//! use listings_service::service::ListingService;
//!
//! let source = MemorySource::new(Vec::<ListingRecord>::new(), FlatSchema);
//! let service = ListingService::new(source, ListingsConfig::default());
//!
//! let page = service.search(&FilterCriteria::new()).into_success().unwrap();
//! assert_eq!(page.total(), 0);
//! assert_eq!(page.page_count(), 0);
//! ```

use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ListingsConfig;
use crate::executor::{DomainError, Execution};
use crate::failure::Failure;
use crate::filter::{compile, FilterCriteria};
use crate::listing::ListingDto;
use crate::outcome::Outcome;
use crate::pagination::{paginate, Page};
use crate::repository::{ListingSource, SourcePage};

const SEARCH_OPERATION: &str = "ListingService::search";
const SEARCH_DEFAULT_MESSAGE: &str = "Failed to search cars";
const DETAIL_OPERATION: &str = "ListingService::detail";
const DETAIL_DEFAULT_MESSAGE: &str = "Failed to load car details";

/// Search and detail over one listing source
#[derive(Debug)]
pub struct ListingService<S> {
    source: S,
    limits: ListingsConfig,
}

impl<S> ListingService<S>
where
    S: ListingSource,
    S::Record: Into<ListingDto>,
{
    pub fn new(source: S, limits: ListingsConfig) -> Self {
        Self { source, limits }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn limits(&self) -> &ListingsConfig {
        &self.limits
    }

    /// One page of active listings matching `criteria`
    ///
    /// Invalid criteria yield a validation failure before the source is
    /// queried. Source errors and panics are classified, never propagated.
    pub fn search(&self, criteria: &FilterCriteria) -> Outcome<Failure, Page<ListingDto>> {
        Execution::new(SEARCH_OPERATION, SEARCH_DEFAULT_MESSAGE).run(|| {
            info!(
                search = ?criteria.search,
                make = ?criteria.make,
                model = ?criteria.model,
                body_types = ?criteria.body_types,
                sort = %criteria.sort,
                page = criteria.page,
                size = criteria.page_size,
                "Searching listings"
            );

            if let Err(failure) = criteria.validate(&self.limits) {
                return Ok(Outcome::failure(failure));
            }

            let schema = self.source.schema();
            let predicate = compile(criteria, schema);
            let sort = criteria.sort.sort_spec();
            let window =
                SourcePage::from_one_based(u64::from(criteria.page), u64::from(criteria.page_size));
            debug!(
                schema = schema.name(),
                clauses = predicate.clauses().len(),
                offset = window.offset(),
                "Compiled search"
            );

            let rows = self.source.find_page(&predicate, sort, window)?;
            let page = paginate(rows.items, criteria.page, criteria.page_size, rows.total);

            Ok(Outcome::success(page.map(Into::into)))
        })
    }

    /// A single listing, sold or not
    pub fn detail(&self, id: Uuid) -> Outcome<Failure, ListingDto> {
        Execution::new(DETAIL_OPERATION, DETAIL_DEFAULT_MESSAGE).run(|| {
            let record = self
                .source
                .find_by_id(id)?
                .ok_or_else(|| DomainError::resource_not_found("Car", id))?;
            Ok(Outcome::success(record.into()))
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::executor::PERSISTENCE_MESSAGE;
    use crate::failure::FailureKind;
    use crate::filter::{
        CompiledPredicate, FlatSchema, JoinedSchema, Schema, SortOption, SortSpec,
        INVALID_PAGE_SIZE, INVALID_PRICE_RANGE,
    };
    use crate::listing::fixtures::{flat_inventory, inventory};
    use crate::listing::ListingRecord;
    use crate::repository::{
        MemorySource, RepositoryError, RepositoryOperation, RepositoryResult, SourceRows,
    };

    fn flat_service() -> ListingService<MemorySource<ListingRecord>> {
        ListingService::new(
            MemorySource::new(flat_inventory(), FlatSchema),
            ListingsConfig::default(),
        )
    }

    struct BrokenSource {
        panic: bool,
    }

    impl ListingSource for BrokenSource {
        type Record = ListingRecord;

        fn schema(&self) -> &dyn Schema {
            &FlatSchema
        }

        fn find_page(
            &self,
            _predicate: &CompiledPredicate,
            _sort: SortSpec,
            _page: SourcePage,
        ) -> RepositoryResult<SourceRows<ListingRecord>> {
            if self.panic {
                panic!("index out of bounds in row decoder");
            }
            Err(RepositoryError::timeout(
                RepositoryOperation::FindPage,
                "canceling statement due to statement timeout on car_listings",
            ))
        }

        fn find_by_id(&self, _id: Uuid) -> RepositoryResult<Option<ListingRecord>> {
            Err(RepositoryError::connection_failed("connection refused")
                .with_operation(RepositoryOperation::FindById))
        }
    }

    fn broken(panic: bool) -> ListingService<BrokenSource> {
        ListingService::new(BrokenSource { panic }, ListingsConfig::default())
    }

    #[test]
    fn test_search_defaults() {
        let page = flat_service()
            .search(&FilterCriteria::new())
            .into_success()
            .unwrap();
        assert_eq!(page.len(), 8);
        assert_eq!(page.total(), 8);
        assert_eq!(page.page(), 1);
        assert_eq!(page.page_size(), 20);
        assert_eq!(page.page_count(), 1);
        assert!(!page.has_next());
        assert!(page.items().iter().all(|dto| !dto.is_sold));
    }

    #[test]
    fn test_search_second_page() {
        let criteria = FilterCriteria::new()
            .with_sort(SortOption::PriceAsc)
            .with_page(2, 3);
        let page = flat_service().search(&criteria).into_success().unwrap();

        assert_eq!(page.len(), 3);
        assert_eq!(page.page_count(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());
        let prices: Vec<Decimal> = page.items().iter().map(|dto| dto.price).collect();
        assert_eq!(
            prices,
            vec![
                Decimal::from(28_000),
                Decimal::from(31_000),
                Decimal::from(41_000)
            ]
        );
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = flat_service()
            .search(&FilterCriteria::new().with_page(5, 20))
            .into_success()
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total(), 8);
        assert!(page.has_previous());
    }

    #[test]
    fn test_inverted_price_range_is_validation_failure() {
        let criteria = FilterCriteria::new()
            .with_price_range(Some(Decimal::from(50_000)), Some(Decimal::from(10_000)));
        let failure = flat_service().search(&criteria).into_failure().unwrap();

        assert_eq!(failure.kind, FailureKind::Validation);
        assert_eq!(failure.code, INVALID_PRICE_RANGE);
        assert_eq!(failure.status.as_u16(), 400);
    }

    #[test]
    fn test_oversized_page_is_validation_failure() {
        let failure = flat_service()
            .search(&FilterCriteria::new().with_page(1, 101))
            .into_failure()
            .unwrap();
        assert_eq!(failure.code, INVALID_PAGE_SIZE);
    }

    #[test]
    fn test_schemas_return_same_listings() {
        let cars = inventory();
        let flat: Vec<ListingRecord> = cars.iter().map(ListingRecord::from).collect();
        let flat = ListingService::new(MemorySource::new(flat, FlatSchema), ListingsConfig::default());
        let joined = ListingService::new(MemorySource::new(cars, JoinedSchema), ListingsConfig::default());

        let criteria = FilterCriteria::new()
            .with_search("o")
            .with_transmission("automatic")
            .with_sort(SortOption::MileageDesc);
        let flat_page = flat.search(&criteria).into_success().unwrap();
        let joined_page = joined.search(&criteria).into_success().unwrap();

        let ids = |page: &Page<ListingDto>| page.items().iter().map(|d| d.id).collect::<Vec<_>>();
        assert_eq!(ids(&flat_page), ids(&joined_page));
        assert_eq!(flat_page.total(), joined_page.total());
    }

    #[test]
    fn test_source_error_is_generic_server_failure() {
        let failure = broken(false)
            .search(&FilterCriteria::new())
            .into_failure()
            .unwrap();

        assert_eq!(failure.kind, FailureKind::Server);
        assert_eq!(failure.status.as_u16(), 500);
        assert_eq!(failure.message, PERSISTENCE_MESSAGE);
        assert!(!failure.message.contains("car_listings"));
        assert!(failure.cause.is_some());
    }

    #[test]
    fn test_source_panic_is_unknown_failure() {
        let failure = broken(true)
            .search(&FilterCriteria::new())
            .into_failure()
            .unwrap();

        assert_eq!(failure.kind, FailureKind::Unknown);
        assert_eq!(failure.status.as_u16(), 500);
        assert_eq!(failure.message, SEARCH_DEFAULT_MESSAGE);
    }

    #[test]
    fn test_validation_runs_before_source() {
        let failure = broken(true)
            .search(&FilterCriteria::new().with_page(0, 20))
            .into_failure()
            .unwrap();
        assert_eq!(failure.kind, FailureKind::Validation);
    }

    #[test]
    fn test_detail_found_includes_sold() {
        let records = flat_inventory();
        let sold_id = records.iter().find(|r| r.is_sold).map(|r| r.id).unwrap();
        let service = ListingService::new(
            MemorySource::new(records, FlatSchema),
            ListingsConfig::default(),
        );

        let dto = service.detail(sold_id).into_success().unwrap();
        assert_eq!(dto.id, sold_id);
        assert!(dto.is_sold);
        assert_eq!(dto.model_name.as_deref(), Some("CR-V"));
    }

    #[test]
    fn test_detail_missing_is_not_found() {
        let id = Uuid::new_v4();
        let failure = flat_service().detail(id).into_failure().unwrap();

        assert_eq!(failure.kind, FailureKind::NotFound);
        assert_eq!(failure.status.as_u16(), 404);
        assert_eq!(failure.message, format!("Car not found with id: {id}"));
    }

    #[test]
    fn test_detail_source_error() {
        let failure = broken(false).detail(Uuid::new_v4()).into_failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Server);
        assert!(!failure.message.contains("refused"));
    }
}

//! SQL rendering for database-backed sources
//!
//! [`PageQuery::build`] renders the two statements a PostgreSQL-backed
//! [`ListingSource`](super::ListingSource) needs for one page: the page
//! itself and the total count. Both share the same bind list; `LIMIT` and
//! `OFFSET` are inlined integers.
//!
//! # Example
//!
//! ```rust
//! use listings_service::filter::{compile, FilterCriteria, JoinedSchema, SortOption};
//! use listings_service::repository::{PageQuery, SourcePage};
//!
//! let criteria = FilterCriteria::new().with_make("Honda");
//! let predicate = compile(&criteria, &JoinedSchema);
//! let query = PageQuery::build(
//!     &JoinedSchema,
//!     &predicate,
//!     SortOption::PriceAsc.sort_spec(),
//!     SourcePage::from_one_based(2, 10),
//! );
//!
//! assert_eq!(
//!     query.count_sql,
//!     "SELECT COUNT(*) FROM cars c LEFT JOIN makes mk ON mk.id = c.make_id \
//!      WHERE c.is_sold = FALSE AND LOWER(mk.name) = $1"
//! );
//! assert!(query.page_sql.ends_with("ORDER BY c.price ASC, c.id ASC LIMIT 10 OFFSET 10"));
//! ```

use super::pagination::SourcePage;
use crate::filter::{CompiledPredicate, Schema, SortSpec, SqlValue};

/// Rendered page and count statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page_sql: String,
    pub count_sql: String,
    /// Binds for `$1..$n`, shared by both statements
    pub binds: Vec<SqlValue>,
}

impl PageQuery {
    pub fn build<S: Schema + ?Sized>(
        schema: &S,
        predicate: &CompiledPredicate,
        sort: SortSpec,
        page: SourcePage,
    ) -> Self {
        let fragment = predicate.to_sql();

        let joins = predicate.required_joins();
        let mut from = schema.source().to_string();
        for join in &joins {
            from.push(' ');
            from.push_str(&join.join_clause());
        }

        // The sort column may need a join the predicate did not
        let mut page_from = from.clone();
        if let Some(join) = schema.column(sort.field).join() {
            if !joins.contains(&join) {
                page_from.push(' ');
                page_from.push_str(&join.join_clause());
            }
        }

        let filter = if fragment.sql.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", fragment.sql)
        };

        Self {
            page_sql: format!(
                "SELECT {} FROM {page_from}{filter} {} LIMIT {} OFFSET {}",
                schema.projection(),
                schema.order_clause(sort),
                page.limit(),
                page.offset()
            ),
            count_sql: format!("SELECT COUNT(*) FROM {from}{filter}"),
            binds: fragment.binds,
        }
    }
}

//! Criteria → predicate compiler
//!
//! [`compile`] is a pure function. It emits one clause per present criterion,
//! in a fixed order, and never inserts vacuous clauses for absent ones:
//!
//! 1. listing is not sold (always)
//! 2. free text: case-insensitive substring of make, model or trim name
//! 3. price ≥ minimum
//! 4. price ≤ maximum
//! 5. make / model / trim name, case-insensitive equality
//! 6. body type name in the given set, case-insensitive
//! 7. transmission type, case-insensitive equality, unless `"All"`
//!
//! # Example
//!
//! ```rust
//! use listings_service::filter::{compile, FilterCriteria, FlatSchema, JoinedSchema};
//!
//! let criteria = FilterCriteria::new().with_search("civic").with_transmission("All");
//!
//! let flat = compile(&criteria, &FlatSchema);
//! assert_eq!(flat.clauses().len(), 2);
//! assert!(flat.required_joins().is_empty());
//!
//! let joined = compile(&criteria, &JoinedSchema);
//! assert_eq!(joined.required_joins().len(), 3);
//! ```

use super::criteria::{non_blank, FilterCriteria, ALL_TRANSMISSIONS};
use super::predicate::CompiledPredicate;
use super::schema::{Field, RangeBound, Schema};

/// Fields the free-text search looks in
pub const SEARCH_FIELDS: [Field; 3] = [Field::MakeName, Field::ModelName, Field::TrimName];

/// Compile `criteria` against `schema`
///
/// Criteria are not validated here; see [`FilterCriteria::validate`].
pub fn compile<S: Schema + ?Sized>(criteria: &FilterCriteria, schema: &S) -> CompiledPredicate {
    let mut clauses = vec![schema.active_only()];

    if let Some(search) = non_blank(criteria.search.as_deref()) {
        clauses.push(schema.disjunction_of(&SEARCH_FIELDS, search));
    }

    if let Some(min) = criteria.min_price {
        clauses.push(schema.range_on(Field::Price, RangeBound::AtLeast(min)));
    }

    if let Some(max) = criteria.max_price {
        clauses.push(schema.range_on(Field::Price, RangeBound::AtMost(max)));
    }

    let dimensions = [
        (criteria.make.as_deref(), Field::MakeName),
        (criteria.model.as_deref(), Field::ModelName),
        (criteria.trim.as_deref(), Field::TrimName),
    ];
    for (value, field) in dimensions {
        if let Some(value) = non_blank(value) {
            clauses.push(schema.equality_on(field, value));
        }
    }

    let body_types: Vec<String> = criteria
        .body_types
        .iter()
        .filter(|b| !b.trim().is_empty())
        .cloned()
        .collect();
    if !body_types.is_empty() {
        clauses.push(schema.membership_on(Field::BodyTypeName, &body_types));
    }

    if let Some(transmission) = non_blank(criteria.transmission.as_deref())
        .filter(|t| !t.eq_ignore_ascii_case(ALL_TRANSMISSIONS))
    {
        clauses.push(schema.equality_on(Field::TransmissionType, transmission));
    }

    CompiledPredicate::new(clauses)
}

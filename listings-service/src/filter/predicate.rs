//! Compiled predicates
//!
//! A [`CompiledPredicate`] is a conjunction of [`Clause`]s. It can be
//! evaluated against any [`Record`] in memory, or rendered to a SQL `WHERE`
//! body with PostgreSQL-style numbered placeholders.

use std::{cmp::Ordering, collections::BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::schema::{Column, Join, Schema};

/// A field value read from a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(Decimal),
    Flag(bool),
    Timestamp(DateTime<Utc>),
}

impl FieldValue<'_> {
    /// Ordering between values of the same variant
    ///
    /// Values of different variants are unordered.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Number(a), Self::Number(b)) => Some(a.cmp(b)),
            (Self::Flag(a), Self::Flag(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Something a predicate can be evaluated against
///
/// `value` returns `None` when the record has no value for the column, or
/// does not know the column at all. Any clause over a missing value is false.
pub trait Record {
    /// Layout whose columns this record answers for
    type Schema: Schema;

    /// Stable identity, used to break ordering ties
    fn id(&self) -> Uuid;

    fn value(&self, column: &Column) -> Option<FieldValue<'_>>;
}

/// One conjunct of a compiled predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Boolean column is false
    IsFalse(Column),
    /// Lowercased column equals `value` (already lowercase)
    EqualsIgnoreCase { column: Column, value: String },
    /// Column ≥ bound
    AtLeast { column: Column, bound: Decimal },
    /// Column ≤ bound
    AtMost { column: Column, bound: Decimal },
    /// Lowercased column is one of `values` (already lowercase)
    InIgnoreCase { column: Column, values: Vec<String> },
    /// Any of the lowercased columns contains `needle` (already lowercase)
    ///
    /// A column without a value fails its own branch only.
    ContainsAnyIgnoreCase { columns: Vec<Column>, needle: String },
}

impl Clause {
    /// Evaluate against one record
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Self::IsFalse(column) => matches!(record.value(column), Some(FieldValue::Flag(false))),
            Self::EqualsIgnoreCase { column, value } => {
                text(record, column).is_some_and(|t| t.to_lowercase() == *value)
            }
            Self::AtLeast { column, bound } => number(record, column).is_some_and(|n| n >= *bound),
            Self::AtMost { column, bound } => number(record, column).is_some_and(|n| n <= *bound),
            Self::InIgnoreCase { column, values } => text(record, column)
                .is_some_and(|t| values.iter().any(|v| t.to_lowercase() == *v)),
            Self::ContainsAnyIgnoreCase { columns, needle } => columns.iter().any(|column| {
                text(record, column).is_some_and(|t| t.to_lowercase().contains(needle.as_str()))
            }),
        }
    }

    fn columns(&self) -> Vec<&Column> {
        match self {
            Self::IsFalse(column)
            | Self::EqualsIgnoreCase { column, .. }
            | Self::AtLeast { column, .. }
            | Self::AtMost { column, .. }
            | Self::InIgnoreCase { column, .. } => vec![column],
            Self::ContainsAnyIgnoreCase { columns, .. } => columns.iter().collect(),
        }
    }

    fn render(&self, next_placeholder: &mut usize, binds: &mut Vec<SqlValue>) -> String {
        let mut bind = |value: SqlValue| {
            *next_placeholder += 1;
            binds.push(value);
            format!("${}", *next_placeholder)
        };

        match self {
            Self::IsFalse(column) => format!("{column} = FALSE"),
            Self::EqualsIgnoreCase { column, value } => {
                format!("LOWER({column}) = {}", bind(SqlValue::Text(value.clone())))
            }
            Self::AtLeast { column, bound } => {
                format!("{column} >= {}", bind(SqlValue::Decimal(*bound)))
            }
            Self::AtMost { column, bound } => {
                format!("{column} <= {}", bind(SqlValue::Decimal(*bound)))
            }
            Self::InIgnoreCase { column, values } => {
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|v| bind(SqlValue::Text(v.clone())))
                    .collect();
                format!("LOWER({column}) IN ({})", placeholders.join(", "))
            }
            Self::ContainsAnyIgnoreCase { columns, needle } => {
                let placeholder = bind(SqlValue::Text(format!("%{}%", escape_like(needle))));
                let branches: Vec<String> = columns
                    .iter()
                    .map(|column| format!("LOWER({column}) LIKE {placeholder} ESCAPE '\\'"))
                    .collect();
                format!("({})", branches.join(" OR "))
            }
        }
    }
}

fn text<'r, R: Record + ?Sized>(record: &'r R, column: &Column) -> Option<&'r str> {
    match record.value(column)? {
        FieldValue::Text(t) => Some(t),
        _ => None,
    }
}

fn number<R: Record + ?Sized>(record: &R, column: &Column) -> Option<Decimal> {
    match record.value(column)? {
        FieldValue::Number(n) => Some(n),
        _ => None,
    }
}

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Bind value for a rendered predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Decimal(Decimal),
}

/// Rendered `WHERE` body plus its bind values in placeholder order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFragment {
    /// Clauses joined with ` AND `
    pub sql: String,
    pub binds: Vec<SqlValue>,
}

/// Conjunction of clauses produced by [`crate::filter::compile`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledPredicate {
    clauses: Vec<Clause>,
}

impl CompiledPredicate {
    #[must_use]
    pub fn new(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }

    /// Clauses in compilation order
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// True when every clause holds for `record`
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }

    /// Joins the clauses reference, in a stable order
    #[must_use]
    pub fn required_joins(&self) -> Vec<Join> {
        self.clauses
            .iter()
            .flat_map(Clause::columns)
            .filter_map(Column::join)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Render with placeholders starting at `$1`
    #[must_use]
    pub fn to_sql(&self) -> SqlFragment {
        self.to_sql_with_offset(0)
    }

    /// Render with placeholders starting after `start_offset`
    #[must_use]
    pub fn to_sql_with_offset(&self, start_offset: usize) -> SqlFragment {
        let mut next_placeholder = start_offset;
        let mut binds = Vec::new();
        let parts: Vec<String> = self
            .clauses
            .iter()
            .map(|clause| clause.render(&mut next_placeholder, &mut binds))
            .collect();

        SqlFragment {
            sql: parts.join(" AND "),
            binds,
        }
    }
}

//! Schema capability and its two adapters
//!
//! The compiler never names a physical column. It asks a [`Schema`] for
//! clauses over logical [`Field`]s, and the schema decides how a field is
//! reached:
//!
//! - [`FlatSchema`]: the denormalized `car_listings` view, where every
//!   dimension is already a column on the row (`make_name`, `trim_name`, ...)
//! - [`JoinedSchema`]: the normalized `cars` table, where dimensions are
//!   foreign keys and matching by name goes through a join (`mk.name`, ...)
//!
//! Both adapters produce the same clause shapes, so a predicate compiled
//! against either selects the same listings.

use std::fmt;

use rust_decimal::Decimal;

use super::predicate::Clause;
use super::sort::SortSpec;

/// Logical listing fields the compiler filters and sorts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    IsSold,
    Price,
    MakeName,
    ModelName,
    TrimName,
    BodyTypeName,
    TransmissionType,
    CreatedAt,
    Year,
    Mileage,
}

/// Dimension tables of the normalized schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Join {
    Make,
    Model,
    Trim,
    BodyType,
    Transmission,
}

impl Join {
    /// Table name
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Make => "makes",
            Self::Model => "models",
            Self::Trim => "trims",
            Self::BodyType => "body_types",
            Self::Transmission => "transmissions",
        }
    }

    /// Alias used in rendered SQL
    #[must_use]
    pub const fn alias(&self) -> &'static str {
        match self {
            Self::Make => "mk",
            Self::Model => "md",
            Self::Trim => "tr",
            Self::BodyType => "bt",
            Self::Transmission => "tx",
        }
    }

    /// Foreign key column on `cars`
    #[must_use]
    pub const fn foreign_key(&self) -> &'static str {
        match self {
            Self::Make => "make_id",
            Self::Model => "model_id",
            Self::Trim => "trim_id",
            Self::BodyType => "body_type_id",
            Self::Transmission => "transmission_id",
        }
    }

    /// `LEFT JOIN` clause attaching this table to `cars c`
    ///
    /// Left joins keep cars whose optional dimension (e.g. trim) is absent.
    #[must_use]
    pub fn join_clause(&self) -> String {
        format!(
            "LEFT JOIN {table} {alias} ON {alias}.id = c.{fk}",
            table = self.table(),
            alias = self.alias(),
            fk = self.foreign_key()
        )
    }
}

/// A physical column as a schema exposes it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Column of the denormalized view row
    View(&'static str),
    /// Column of the `cars` base table
    Car(&'static str),
    /// Column of a joined dimension table
    Joined(Join, &'static str),
}

impl Column {
    /// Join needed to reach this column, if any
    #[must_use]
    pub const fn join(&self) -> Option<Join> {
        match self {
            Self::Joined(join, _) => Some(*join),
            Self::View(_) | Self::Car(_) => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View(name) => write!(f, "{name}"),
            Self::Car(name) => write!(f, "c.{name}"),
            Self::Joined(join, name) => write!(f, "{}.{name}", join.alias()),
        }
    }
}

/// One side of a price range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    /// Inclusive lower bound
    AtLeast(Decimal),
    /// Inclusive upper bound
    AtMost(Decimal),
}

/// How a record source exposes listing fields
///
/// Adapters only describe their layout (columns, source, projection); the
/// clause builders are shared, which keeps the compiled semantics identical
/// across adapters.
pub trait Schema: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// `FROM` target, without joins
    fn source(&self) -> &'static str;

    /// Physical column for a logical field
    fn column(&self, field: Field) -> Column;

    /// Primary key column, the ordering tie-break
    fn id_column(&self) -> Column;

    /// Select list for a page of rows
    fn projection(&self) -> &'static str;

    /// Listing is still for sale
    fn active_only(&self) -> Clause {
        Clause::IsFalse(self.column(Field::IsSold))
    }

    /// Case-insensitive equality
    fn equality_on(&self, field: Field, value: &str) -> Clause {
        Clause::EqualsIgnoreCase {
            column: self.column(field),
            value: value.to_lowercase(),
        }
    }

    /// Inclusive numeric bound
    fn range_on(&self, field: Field, bound: RangeBound) -> Clause {
        let column = self.column(field);
        match bound {
            RangeBound::AtLeast(bound) => Clause::AtLeast { column, bound },
            RangeBound::AtMost(bound) => Clause::AtMost { column, bound },
        }
    }

    /// Case-insensitive membership in a set of values
    fn membership_on(&self, field: Field, values: &[String]) -> Clause {
        let mut values: Vec<String> = values.iter().map(|v| v.to_lowercase()).collect();
        values.sort();
        values.dedup();
        Clause::InIgnoreCase {
            column: self.column(field),
            values,
        }
    }

    /// Case-insensitive substring match on any of `fields`
    fn disjunction_of(&self, fields: &[Field], pattern: &str) -> Clause {
        Clause::ContainsAnyIgnoreCase {
            columns: fields.iter().map(|f| self.column(*f)).collect(),
            needle: pattern.to_lowercase(),
        }
    }

    /// `ORDER BY` clause for `sort`, ties broken by id
    fn order_clause(&self, sort: SortSpec) -> String {
        format!(
            "ORDER BY {} {}, {} ASC",
            self.column(sort.field),
            sort.direction.keyword(),
            self.id_column()
        )
    }
}

/// The denormalized `car_listings` view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlatSchema;

impl Schema for FlatSchema {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn source(&self) -> &'static str {
        "car_listings"
    }

    fn id_column(&self) -> Column {
        Column::View("id")
    }

    fn projection(&self) -> &'static str {
        "*"
    }

    fn column(&self, field: Field) -> Column {
        Column::View(match field {
            Field::IsSold => "is_sold",
            Field::Price => "price",
            Field::MakeName => "make_name",
            Field::ModelName => "model_name",
            Field::TrimName => "trim_name",
            Field::BodyTypeName => "body_type_name",
            Field::TransmissionType => "transmission_type",
            Field::CreatedAt => "created_at",
            Field::Year => "year",
            Field::Mileage => "mileage",
        })
    }
}

/// The normalized `cars` table with dimension joins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinedSchema;

impl Schema for JoinedSchema {
    fn name(&self) -> &'static str {
        "joined"
    }

    fn source(&self) -> &'static str {
        "cars c"
    }

    fn id_column(&self) -> Column {
        Column::Car("id")
    }

    fn projection(&self) -> &'static str {
        "c.*"
    }

    fn column(&self, field: Field) -> Column {
        match field {
            Field::IsSold => Column::Car("is_sold"),
            Field::Price => Column::Car("price"),
            Field::CreatedAt => Column::Car("created_at"),
            Field::Year => Column::Car("year"),
            Field::Mileage => Column::Car("mileage"),
            Field::MakeName => Column::Joined(Join::Make, "name"),
            Field::ModelName => Column::Joined(Join::Model, "name"),
            Field::TrimName => Column::Joined(Join::Trim, "name"),
            Field::BodyTypeName => Column::Joined(Join::BodyType, "name"),
            Field::TransmissionType => Column::Joined(Join::Transmission, "type"),
        }
    }
}

//! Listing records
//!
//! - [`ListingRecord`]: one row of the denormalized `car_listings` view
//! - [`CarEntity`]: a car in the normalized schema, with its dimensions as
//!   optional related entities
//! - [`ListingDto`]: the record returned to clients, with badges parsed
//!
//! Both record shapes implement [`Record`] so the same compiled predicate can
//! be evaluated against either.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filter::{Column, FieldValue, FlatSchema, Join, JoinedSchema, Record};

/// A badge shown on a listing card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Row of the denormalized `car_listings` view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: Uuid,
    pub year: i32,
    pub mileage: i32,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub is_sold: bool,
    pub views_count: i32,
    pub created_at: DateTime<Utc>,
    pub make_name: Option<String>,
    pub model_name: Option<String>,
    pub trim_name: Option<String>,
    pub body_type_name: Option<String>,
    pub body_type_icon: Option<String>,
    pub transmission_type: Option<String>,
    pub condition_name: Option<String>,
    pub dealer_name: Option<String>,
    pub dealer_location: Option<String>,
    /// Badges as the view aggregates them: a JSON array
    pub badges_json: Option<String>,
}

impl Record for ListingRecord {
    type Schema = FlatSchema;

    fn id(&self) -> Uuid {
        self.id
    }

    fn value(&self, column: &Column) -> Option<FieldValue<'_>> {
        let Column::View(name) = column else {
            return None;
        };

        match *name {
            "is_sold" => Some(FieldValue::Flag(self.is_sold)),
            "price" => Some(FieldValue::Number(self.price)),
            "year" => Some(FieldValue::Number(Decimal::from(self.year))),
            "mileage" => Some(FieldValue::Number(Decimal::from(self.mileage))),
            "created_at" => Some(FieldValue::Timestamp(self.created_at)),
            "make_name" => self.make_name.as_deref().map(FieldValue::Text),
            "model_name" => self.model_name.as_deref().map(FieldValue::Text),
            "trim_name" => self.trim_name.as_deref().map(FieldValue::Text),
            "body_type_name" => self.body_type_name.as_deref().map(FieldValue::Text),
            "transmission_type" => self.transmission_type.as_deref().map(FieldValue::Text),
            _ => None,
        }
    }
}

/// A named dimension (make, model, trim, condition)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: Uuid,
    pub name: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyType {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transmission {
    pub id: Uuid,
    /// e.g. `Automatic`, `Manual`
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dealer {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
}

/// A car in the normalized schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarEntity {
    pub id: Uuid,
    pub year: i32,
    pub mileage: i32,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub is_sold: bool,
    pub views_count: i32,
    pub created_at: DateTime<Utc>,
    pub make: Option<Dimension>,
    pub model: Option<Dimension>,
    pub trim: Option<Dimension>,
    pub body_type: Option<BodyType>,
    pub transmission: Option<Transmission>,
    pub condition: Option<Dimension>,
    pub dealer: Option<Dealer>,
    pub badges: Vec<Badge>,
}

impl Record for CarEntity {
    type Schema = JoinedSchema;

    fn id(&self) -> Uuid {
        self.id
    }

    fn value(&self, column: &Column) -> Option<FieldValue<'_>> {
        match column {
            Column::Car("is_sold") => Some(FieldValue::Flag(self.is_sold)),
            Column::Car("price") => Some(FieldValue::Number(self.price)),
            Column::Car("year") => Some(FieldValue::Number(Decimal::from(self.year))),
            Column::Car("mileage") => Some(FieldValue::Number(Decimal::from(self.mileage))),
            Column::Car("created_at") => Some(FieldValue::Timestamp(self.created_at)),
            Column::Joined(Join::Make, "name") => dimension_name(self.make.as_ref()),
            Column::Joined(Join::Model, "name") => dimension_name(self.model.as_ref()),
            Column::Joined(Join::Trim, "name") => dimension_name(self.trim.as_ref()),
            Column::Joined(Join::BodyType, "name") => self
                .body_type
                .as_ref()
                .map(|b| FieldValue::Text(b.name.as_str())),
            Column::Joined(Join::Transmission, "type") => self
                .transmission
                .as_ref()
                .map(|t| FieldValue::Text(t.kind.as_str())),
            _ => None,
        }
    }
}

fn dimension_name(dimension: Option<&Dimension>) -> Option<FieldValue<'_>> {
    dimension.map(|d| FieldValue::Text(d.name.as_str()))
}

impl From<&CarEntity> for ListingRecord {
    fn from(car: &CarEntity) -> Self {
        let badges_json = if car.badges.is_empty() {
            None
        } else {
            serde_json::to_string(&car.badges).ok()
        };

        Self {
            id: car.id,
            year: car.year,
            mileage: car.mileage,
            price: car.price,
            image_url: car.image_url.clone(),
            is_featured: car.is_featured,
            is_sold: car.is_sold,
            views_count: car.views_count,
            created_at: car.created_at,
            make_name: car.make.as_ref().map(|d| d.name.clone()),
            model_name: car.model.as_ref().map(|d| d.name.clone()),
            trim_name: car.trim.as_ref().map(|d| d.name.clone()),
            body_type_name: car.body_type.as_ref().map(|b| b.name.clone()),
            body_type_icon: car.body_type.as_ref().and_then(|b| b.icon.clone()),
            transmission_type: car.transmission.as_ref().map(|t| t.kind.clone()),
            condition_name: car.condition.as_ref().map(|d| d.name.clone()),
            dealer_name: car.dealer.as_ref().map(|d| d.name.clone()),
            dealer_location: car.dealer.as_ref().and_then(|d| d.location.clone()),
            badges_json,
        }
    }
}

/// Listing as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDto {
    pub id: Uuid,
    pub year: i32,
    pub mileage: i32,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub make_name: Option<String>,
    pub model_name: Option<String>,
    pub trim_name: Option<String>,
    pub body_type_name: Option<String>,
    pub body_type_icon: Option<String>,
    pub transmission_type: Option<String>,
    pub condition_name: Option<String>,
    pub dealer_name: Option<String>,
    pub dealer_location: Option<String>,
    pub badges: Vec<Badge>,
    pub is_featured: bool,
    pub is_sold: bool,
    pub views_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<ListingRecord> for ListingDto {
    fn from(record: ListingRecord) -> Self {
        let badges = parse_badges(record.badges_json.as_deref());
        Self {
            id: record.id,
            year: record.year,
            mileage: record.mileage,
            price: record.price,
            image_url: record.image_url,
            make_name: record.make_name,
            model_name: record.model_name,
            trim_name: record.trim_name,
            body_type_name: record.body_type_name,
            body_type_icon: record.body_type_icon,
            transmission_type: record.transmission_type,
            condition_name: record.condition_name,
            dealer_name: record.dealer_name,
            dealer_location: record.dealer_location,
            badges,
            is_featured: record.is_featured,
            is_sold: record.is_sold,
            views_count: record.views_count,
            created_at: record.created_at,
        }
    }
}

impl From<CarEntity> for ListingDto {
    fn from(car: CarEntity) -> Self {
        let mut dto = Self::from(ListingRecord::from(&car));
        dto.badges = car.badges;
        dto
    }
}

/// Parse the view's badge aggregate
///
/// Malformed JSON is logged and yields no badges rather than failing the
/// whole listing.
#[must_use]
pub fn parse_badges(badges_json: Option<&str>) -> Vec<Badge> {
    let Some(json) = badges_json.map(str::trim).filter(|j| !j.is_empty() && *j != "[]") else {
        return Vec::new();
    };

    match serde_json::from_str(json) {
        Ok(badges) => badges,
        Err(e) => {
            tracing::error!(error = %e, badges = %json, "Failed to parse badges JSON");
            Vec::new()
        }
    }
}

/// Shared test inventory
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub(crate) struct CarSpec {
        pub make: &'static str,
        pub model: &'static str,
        pub trim: Option<&'static str>,
        pub body_type: Option<&'static str>,
        pub transmission: Option<&'static str>,
        pub price: i64,
        pub year: i32,
        pub mileage: i32,
        pub sold: bool,
        /// Days after 2024-01-01
        pub listed_day: u32,
    }

    pub(crate) fn car(spec: &CarSpec) -> CarEntity {
        CarEntity {
            id: Uuid::new_v4(),
            year: spec.year,
            mileage: spec.mileage,
            price: Decimal::from(spec.price),
            image_url: None,
            is_featured: false,
            is_sold: spec.sold,
            views_count: 0,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::days(i64::from(spec.listed_day)),
            make: Some(Dimension::new(spec.make)),
            model: Some(Dimension::new(spec.model)),
            trim: spec.trim.map(Dimension::new),
            body_type: spec.body_type.map(|name| BodyType {
                id: Uuid::new_v4(),
                name: name.to_string(),
                icon: None,
            }),
            transmission: spec.transmission.map(|kind| Transmission {
                id: Uuid::new_v4(),
                kind: kind.to_string(),
            }),
            condition: Some(Dimension::new("Used")),
            dealer: None,
            badges: Vec::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn spec(
        make: &'static str,
        model: &'static str,
        trim: Option<&'static str>,
        body_type: Option<&'static str>,
        transmission: Option<&'static str>,
        price: i64,
        year: i32,
        mileage: i32,
        sold: bool,
        listed_day: u32,
    ) -> CarSpec {
        CarSpec {
            make,
            model,
            trim,
            body_type,
            transmission,
            price,
            year,
            mileage,
            sold,
            listed_day,
        }
    }

    /// A small mixed inventory, including a sold car and cars without trim
    pub(crate) fn inventory() -> Vec<CarEntity> {
        [
            spec("Toyota", "Camry", Some("LE"), Some("Sedan"), Some("Automatic"), 24_000, 2021, 30_000, false, 1),
            spec("Toyota", "RAV4", None, Some("SUV"), Some("Automatic"), 31_000, 2022, 12_000, false, 2),
            spec("Honda", "Civic", Some("Sport"), Some("Sedan"), Some("Manual"), 21_500, 2020, 41_000, false, 3),
            spec("Honda", "CR-V", Some("EX"), Some("SUV"), Some("Automatic"), 29_900, 2019, 55_000, true, 4),
            spec("BMW", "X5", Some("xDrive40i"), Some("SUV"), Some("Automatic"), 58_000, 2023, 8_000, false, 5),
            spec("BMW", "330i", None, Some("Sedan"), Some("Manual"), 41_000, 2021, 22_000, false, 6),
            spec("Ford", "F-150", Some("Lariat"), Some("Truck"), None, 47_500, 2022, 18_000, false, 7),
            spec("Mazda", "MX-5", Some("Club"), Some("Convertible"), Some("Manual"), 28_000, 2018, 35_000, false, 8),
            spec("Kia", "Sportage", None, None, Some("Automatic"), 19_000, 2017, 70_000, false, 9),
        ]
        .iter()
        .map(car)
        .collect()
    }

    pub(crate) fn flat_inventory() -> Vec<ListingRecord> {
        inventory().iter().map(ListingRecord::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::filter::{Field, Schema};

    #[test]
    fn test_parse_badges() {
        let id = Uuid::new_v4();
        let json = format!(r#"[{{"id":"{id}","name":"Great Price","color":"green"}}]"#);
        let badges = parse_badges(Some(&json));
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].id, id);
        assert_eq!(badges[0].color.as_deref(), Some("green"));

        assert!(parse_badges(None).is_empty());
        assert!(parse_badges(Some("  ")).is_empty());
        assert!(parse_badges(Some("[]")).is_empty());
        assert!(parse_badges(Some("{not json")).is_empty());
    }

    #[test]
    fn test_flatten_keeps_dimensions() {
        let cars = inventory();
        let record = ListingRecord::from(&cars[0]);
        assert_eq!(record.make_name.as_deref(), Some("Toyota"));
        assert_eq!(record.trim_name.as_deref(), Some("LE"));
        assert_eq!(record.transmission_type.as_deref(), Some("Automatic"));
        assert_eq!(record.badges_json, None);
    }

    #[test]
    fn test_both_shapes_expose_same_values() {
        for car in inventory() {
            let record = ListingRecord::from(&car);
            for field in [
                Field::IsSold,
                Field::Price,
                Field::MakeName,
                Field::ModelName,
                Field::TrimName,
                Field::BodyTypeName,
                Field::TransmissionType,
                Field::CreatedAt,
                Field::Year,
                Field::Mileage,
            ] {
                assert_eq!(
                    record.value(&FlatSchema.column(field)),
                    car.value(&JoinedSchema.column(field)),
                    "{field:?}"
                );
            }
        }
    }

    #[test]
    fn test_dto_from_record_and_entity_agree() {
        let mut car = inventory().remove(0);
        car.badges = vec![Badge {
            id: Uuid::new_v4(),
            name: "Low Mileage".to_string(),
            color: None,
        }];

        let via_record = ListingDto::from(ListingRecord::from(&car));
        let via_entity = ListingDto::from(car);
        assert_eq!(via_record, via_entity);
        assert_eq!(via_entity.badges.len(), 1);
    }

    #[test]
    fn test_dto_serializes_camel_case() {
        let dto = ListingDto::from(flat_inventory().remove(0));
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("makeName").is_some());
        assert!(json.get("isSold").is_some());
        assert!(json.get("make_name").is_none());
    }
}

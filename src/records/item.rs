//! Inventory items.
//!
//! Items are stored with both dates as UTC timestamps at the start of the day
//! ([`ItemDocument`]) and presented to clients as plain dates ([`Item`]).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{set_if, validate_email};
use crate::errors::{ApiError, ApiResult};
use crate::filter::{self, start_of_day, timestamp_value, FilterError, FilterSet};
use crate::store::Record;

/// Collection holding items
pub const ITEMS_COLLECTION: &str = "items";

/// Item as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDocument {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub item_name: String,
    pub quantity: i64,
    pub expiry_date: DateTime<Utc>,
    pub insert_date: DateTime<Utc>,
}

impl Record for ItemDocument {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Item as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub item_name: String,
    pub quantity: i64,
    pub expiry_date: NaiveDate,
    pub insert_date: NaiveDate,
}

impl From<ItemDocument> for Item {
    fn from(doc: ItemDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            email: doc.email,
            item_name: doc.item_name,
            quantity: doc.quantity,
            expiry_date: doc.expiry_date.date_naive(),
            insert_date: doc.insert_date.date_naive(),
        }
    }
}

/// Payload of `POST /items/`
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub email: String,
    pub item_name: String,
    pub quantity: i64,
    pub expiry_date: NaiveDate,
    /// Defaults to the current UTC date
    #[serde(default)]
    pub insert_date: Option<NaiveDate>,
}

impl NewItem {
    pub fn validate(&self) -> ApiResult<()> {
        validate_email(&self.email)
    }

    /// Build the stored document for the allocated `id`
    pub fn into_document(self, id: i64, today: NaiveDate) -> ItemDocument {
        ItemDocument {
            id,
            name: self.name,
            email: self.email,
            item_name: self.item_name,
            quantity: self.quantity,
            expiry_date: start_of_day(self.expiry_date),
            insert_date: start_of_day(self.insert_date.unwrap_or(today)),
        }
    }
}

/// Payload of `PUT /items/{id}`; only supplied fields are applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

impl UpdateItem {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.item_name.is_none()
            && self.quantity.is_none()
            && self.expiry_date.is_none()
    }

    pub fn validate(&self) -> ApiResult<()> {
        if self.is_empty() {
            return Err(ApiError::validation("No fields to update"));
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    /// The `$set` document in stored form
    pub fn set_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        set_if(&mut fields, "name", self.name.clone());
        set_if(&mut fields, "email", self.email.clone());
        set_if(&mut fields, "item_name", self.item_name.clone());
        set_if(&mut fields, "quantity", self.quantity);
        set_if(
            &mut fields,
            "expiry_date",
            self.expiry_date.map(|d| timestamp_value(start_of_day(d))),
        );
        fields
    }
}

/// Query string of `GET /items/filter`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilter {
    pub email: Option<String>,
    /// Items expiring strictly after this day
    pub expiry_date: Option<String>,
    /// Items inserted on exactly this day
    pub insert_date: Option<String>,
    /// Minimum quantity
    pub quantity: Option<i64>,
}

impl ItemFilter {
    pub fn to_filter(&self) -> Result<FilterSet, FilterError> {
        Ok(FilterSet::new()
            .and_maybe(filter::string_eq("email", &self.email))
            .and_maybe(filter::after_day("expiry_date", &self.expiry_date)?)
            .and_maybe(filter::on_day("insert_date", &self.insert_date)?)
            .and_maybe(filter::at_least("quantity", self.quantity)))
    }
}

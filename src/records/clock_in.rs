//! Clock-in attendance records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{set_if, validate_email};
use crate::errors::{ApiError, ApiResult};
use crate::filter::{self, FilterError, FilterSet};
use crate::store::Record;

/// Collection holding clock-in records
pub const CLOCK_INS_COLLECTION: &str = "clock_ins";

/// Clock-in record, stored and returned as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockIn {
    pub id: i64,
    pub email: String,
    pub location: String,
    /// Server time of creation
    pub insert_date: DateTime<Utc>,
}

impl Record for ClockIn {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Payload of `POST /clock-in`. Any client-supplied id or timestamp is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct NewClockIn {
    pub email: String,
    pub location: String,
}

impl NewClockIn {
    pub fn into_record(self, id: i64, now: DateTime<Utc>) -> ClockIn {
        ClockIn {
            id,
            email: self.email,
            location: self.location,
            insert_date: now,
        }
    }
}

/// Payload of `PUT /clock-in/{id}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateClockIn {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl UpdateClockIn {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.location.is_none()
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

    pub fn set_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        set_if(&mut fields, "email", self.email.clone());
        set_if(&mut fields, "location", self.location.clone());
        fields
    }
}

/// Query string of `GET /clock-in/filter`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClockInFilter {
    pub email: Option<String>,
    pub location: Option<String>,
    /// Records created strictly after this day
    pub insert_date: Option<String>,
}

impl ClockInFilter {
    pub fn to_filter(&self) -> Result<FilterSet, FilterError> {
        Ok(FilterSet::new()
            .and_maybe(filter::string_eq("email", &self.email))
            .and_maybe(filter::string_eq("location", &self.location))
            .and_maybe(filter::after_day("insert_date", &self.insert_date)?))
    }
}

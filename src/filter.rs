//! # Filter Expressions
//!
//! Predicates over stored documents. A [`FilterSet`] is a conjunction of
//! [`FilterExpr`] terms; criteria that were not supplied are simply never added.
//!
//! Date criteria arrive as `YYYY-MM-DD` strings and are normalized to UTC
//! day boundaries before they become filter values.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde_json::Value;
use thiserror::Error;

/// Accepted input format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while building a filter from request criteria
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Invalid {field} format '{input}'. Use YYYY-MM-DD.")]
    InvalidDate { field: String, input: String },
}

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equals
    Eq,

    /// Greater than
    Gt,

    /// Greater than or equal
    Gte,
}

/// A single `field <op> value` term
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpr {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl FilterExpr {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Eq, value)
    }

    /// Create a greater than filter
    pub fn gt(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Gt, value)
    }

    /// Create a greater than or equal filter
    pub fn gte(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Gte, value)
    }

    /// Check if a document matches this filter.
    ///
    /// A document lacking the field never matches. Values of different kinds
    /// never compare as ordered, so `gt`/`gte` across kinds is false.
    pub fn matches(&self, doc: &Value) -> bool {
        let Some(field_value) = doc.get(&self.field) else {
            return false;
        };

        match self.operator {
            FilterOperator::Eq => match compare_values(field_value, &self.value) {
                Some(ordering) => ordering == Ordering::Equal,
                None => field_value == &self.value,
            },
            FilterOperator::Gt => {
                compare_values(field_value, &self.value) == Some(Ordering::Greater)
            }
            FilterOperator::Gte => matches!(
                compare_values(field_value, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }
}

/// Order two JSON values of the same kind.
///
/// Strings that both parse as RFC 3339 timestamps are ordered as instants,
/// so differing fractional precision does not skew the comparison.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
        },
        (Value::String(a), Value::String(b)) => {
            match (
                DateTime::parse_from_rfc3339(a),
                DateTime::parse_from_rfc3339(b),
            ) {
                (Ok(a), Ok(b)) => Some(a.cmp(&b)),
                _ => Some(a.cmp(b)),
            }
        }
        _ => None,
    }
}

/// A set of filters combined with AND logic
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub filters: Vec<FilterExpr>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, filter: FilterExpr) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add the filter only when a criterion was supplied
    pub fn and_maybe(self, filter: Option<FilterExpr>) -> Self {
        match filter {
            Some(filter) => self.and(filter),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if a document matches all filters
    pub fn matches(&self, doc: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(doc))
    }
}

// ==================
// Criterion helpers
// ==================

/// Treat an empty query value the same as an absent one
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Parse a `YYYY-MM-DD` date supplied for `field`
pub fn parse_date(field: &str, input: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| FilterError::InvalidDate {
        field: field.to_string(),
        input: input.to_string(),
    })
}

/// `00:00:00` UTC of the given day
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `23:59:59.999999` UTC of the given day
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let last_micro =
        NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
    date.and_time(last_micro).and_utc()
}

/// Render a timestamp the way stored documents carry it
pub fn timestamp_value(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// `field == value` on a string field
pub fn string_eq(field: &str, value: &Option<String>) -> Option<FilterExpr> {
    present(value).map(|v| FilterExpr::eq(field, Value::String(v.to_string())))
}

/// `field > end-of-day(input)` on a timestamp field
pub fn after_day(field: &str, input: &Option<String>) -> Result<Option<FilterExpr>, FilterError> {
    match present(input) {
        Some(raw) => {
            let date = parse_date(field, raw)?;
            Ok(Some(FilterExpr::gt(field, timestamp_value(end_of_day(date)))))
        }
        None => Ok(None),
    }
}

/// `field == start-of-day(input)` on a timestamp field
pub fn on_day(field: &str, input: &Option<String>) -> Result<Option<FilterExpr>, FilterError> {
    match present(input) {
        Some(raw) => {
            let date = parse_date(field, raw)?;
            Ok(Some(FilterExpr::eq(field, timestamp_value(start_of_day(date)))))
        }
        None => Ok(None),
    }
}

/// `field >= value` on an integer field
pub fn at_least(field: &str, value: Option<i64>) -> Option<FilterExpr> {
    value.map(|v| FilterExpr::gte(field, Value::from(v)))
}

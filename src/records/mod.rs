//! # Records
//!
//! Stored document types, the request payloads that create and patch them,
//! and the query criteria that filter them.

mod clock_in;
mod item;

pub use clock_in::{ClockIn, ClockInFilter, NewClockIn, UpdateClockIn, CLOCK_INS_COLLECTION};
pub use item::{Item, ItemDocument, ItemFilter, NewItem, UpdateItem, ITEMS_COLLECTION};

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::errors::{ApiError, ApiResult};

/// Local part, then dot-separated host labels ending in an alphabetic TLD
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$")
        .expect("valid email regex")
});

/// Reject values that do not look like an email address
pub fn validate_email(email: &str) -> ApiResult<()> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "'{}' is not a valid email address",
            email
        )))
    }
}

/// Insert `value` under `key` only when it was supplied
fn set_if<T: Into<Value>>(fields: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        fields.insert(key.to_string(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("first.last@sub.example.org").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn test_validate_email_domain_labels() {
        assert!(validate_email("ops@my-host.io").is_ok());
        assert!(validate_email("a@b..com").is_err());
        assert!(validate_email("a@-x.com").is_err());
        assert!(validate_email("a@x-.com").is_err());
        assert!(validate_email("a@.example.com").is_err());
        assert!(validate_email("a@example.c0m").is_err());
    }
}

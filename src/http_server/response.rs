//! # Response Formatting
//!
//! Response bodies shared by the route modules.

use serde::Serialize;

use crate::records::UpdateItem;

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a successful item update, echoing the applied fields
#[derive(Debug, Clone, Serialize)]
pub struct ItemUpdatedResponse {
    pub message: String,
    pub updated_fields: UpdateItem,
}

/// Body of a successful clock-in creation
#[derive(Debug, Clone, Serialize)]
pub struct ClockInCreatedResponse {
    pub clockin_id: i64,
}

/// One row of the items-per-email aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailCount {
    pub email: Option<String>,
    pub count: u64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_updated_skips_unset_fields() {
        let response = ItemUpdatedResponse {
            message: "Item updated".to_string(),
            updated_fields: UpdateItem {
                quantity: Some(4),
                ..Default::default()
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            json!({"message": "Item updated", "updated_fields": {"quantity": 4}})
        );
    }
}

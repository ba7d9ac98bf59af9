// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::registry::InventoryItem;

/// JSON body of `PUT /inventory/{id}`. Both fields are optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateItemRequest {
    pub inventory_name: Option<String>,
    pub description: Option<String>,
}

impl UpdateItemRequest {
    /// Decode a raw request body. An empty body means "change nothing".
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiError::Validation(format!("Malformed JSON body: {e}")))
    }
}

/// Query string of `GET /search`
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SearchQuery {
    pub id: Option<String>,

    #[serde(rename = "includePhoto")]
    pub include_photo: Option<String>,
}

impl SearchQuery {
    /// Only the literal checkbox value `on` asks for the photo path
    pub fn wants_photo(&self) -> bool {
        self.include_photo.as_deref() == Some("on")
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub item: InventoryItem,
}

#[derive(Debug, Serialize)]
pub struct InventoryListResponse {
    #[serde(rename = "inventoryList")]
    pub inventory_list: Vec<InventoryItem>,
}

/// Flat item view returned by `GET /search`; `photo` is an absolute path
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub id: u64,
    pub inventory_name: String,
    pub description: String,
    pub photo: Option<String>,
}

/// Parse an item ID from a path segment or query value.
/// Anything that is not a plain non-negative integer matches no item.
pub fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Registry-assigned identifier, never reused
    pub id: u64,

    /// Display name of the item
    #[serde(rename = "inventory_name")]
    pub name: String,

    /// Free-form description, empty when none was given
    pub description: String,

    /// Stored photo name in the cache directory
    #[serde(rename = "photo")]
    pub photo_ref: Option<String>,
}

impl InventoryItem {
    pub fn new(id: u64, name: String) -> Self {
        Self {
            id,
            name,
            description: String::new(),
            photo_ref: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_item_new() {
        let item = InventoryItem::new(1, "Hammer".to_string());

        assert_eq!(item.id, 1);
        assert_eq!(item.name, "Hammer");
        assert_eq!(item.description, "");
        assert_eq!(item.photo_ref, None);
    }

    #[test]
    fn test_inventory_item_serialize_json() {
        let item = InventoryItem {
            id: 7,
            name: "Drill".to_string(),
            description: "Cordless, 18V".to_string(),
            photo_ref: Some("1700000000000-drill.png".to_string()),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["inventory_name"], "Drill");
        assert_eq!(json["description"], "Cordless, 18V");
        assert_eq!(json["photo"], "1700000000000-drill.png");
        assert!(json.get("name").is_none());
        assert!(json.get("photo_ref").is_none());
    }

    #[test]
    fn test_inventory_item_without_photo_serializes_null() {
        let item = InventoryItem::new(2, "Saw".to_string());

        let json = serde_json::to_value(&item).unwrap();
        assert!(json["photo"].is_null());
    }

    #[test]
    fn test_inventory_item_deserialize_json() {
        let json = r#"{
            "id": 3,
            "inventory_name": "Tape",
            "description": "",
            "photo": null
        }"#;

        let item: InventoryItem = serde_json::from_str(json).unwrap();
        assert_eq!(item, InventoryItem::new(3, "Tape".to_string()));
    }
}

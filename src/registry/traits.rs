// SPDX-License-Identifier: GPL-3.0-only
use crate::registry::models::InventoryItem;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{0}")]
    Validation(String),

    #[error("Inventory item {0} not found")]
    NotFound(u64),
}

pub trait Registry: Send + Sync {
    /// Register a new item and return it with its assigned ID.
    /// Fails when `name` is absent or empty.
    fn create(
        &self,
        name: Option<String>,
        description: Option<String>,
        photo_ref: Option<String>,
    ) -> Result<InventoryItem, RegistryError>;

    /// List all items in creation order
    fn list(&self) -> Vec<InventoryItem>;

    /// Get an item by ID
    fn get(&self, id: u64) -> Result<InventoryItem, RegistryError>;

    /// Overwrite `name` and `description` when given and non-empty.
    /// Empty values leave the stored field untouched.
    fn update(
        &self,
        id: u64,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<InventoryItem, RegistryError>;

    /// Point an item at a newly stored photo
    fn replace_photo(&self, id: u64, photo_ref: String) -> Result<InventoryItem, RegistryError>;

    /// Remove an item. Its ID is never handed out again.
    fn delete(&self, id: u64) -> Result<(), RegistryError>;
}

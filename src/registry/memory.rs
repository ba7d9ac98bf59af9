// SPDX-License-Identifier: GPL-3.0-only
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};
use crate::registry::{models::InventoryItem, traits::{Registry, RegistryError}};

struct State {
    items: Vec<InventoryItem>,
    next_id: u64,
}

/// Process-lifetime item store. One lock covers both the items and the ID
/// counter so concurrent requests cannot hand out the same ID twice.
pub struct InMemoryRegistry {
    state: Mutex<State>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                items: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking handler cannot leave State half-written: every mutation
        // below is a single push, assignment or remove.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Registry for InMemoryRegistry {
    fn create(
        &self,
        name: Option<String>,
        description: Option<String>,
        photo_ref: Option<String>,
    ) -> Result<InventoryItem, RegistryError> {
        let name = non_empty(name)
            .ok_or_else(|| RegistryError::Validation("inventory_name is required".to_string()))?;

        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;

        let mut item = InventoryItem::new(id, name);
        item.description = description.unwrap_or_default();
        item.photo_ref = photo_ref;
        state.items.push(item.clone());

        info!(item_id = id, name = %item.name, "Registered inventory item");
        Ok(item)
    }

    fn list(&self) -> Vec<InventoryItem> {
        self.lock().items.clone()
    }

    fn get(&self, id: u64) -> Result<InventoryItem, RegistryError> {
        self.lock()
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    fn update(
        &self,
        id: u64,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<InventoryItem, RegistryError> {
        let mut state = self.lock();
        let item = state
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        if let Some(name) = non_empty(name) {
            item.name = name;
        }
        if let Some(description) = non_empty(description) {
            item.description = description;
        }

        debug!(item_id = id, "Updated inventory item");
        Ok(item.clone())
    }

    fn replace_photo(&self, id: u64, photo_ref: String) -> Result<InventoryItem, RegistryError> {
        let mut state = self.lock();
        let item = state
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        item.photo_ref = Some(photo_ref);
        Ok(item.clone())
    }

    fn delete(&self, id: u64) -> Result<(), RegistryError> {
        let mut state = self.lock();
        let position = state
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        state.items.remove(position);
        info!(item_id = id, "Deleted inventory item");
        Ok(())
    }
}

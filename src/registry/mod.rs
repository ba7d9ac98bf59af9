// SPDX-License-Identifier: GPL-3.0-only
pub mod memory;
pub mod models;
pub mod traits;

pub use memory::InMemoryRegistry;
pub use models::InventoryItem;
pub use traits::{Registry, RegistryError};

// SPDX-License-Identifier: GPL-3.0-only
pub mod cache_dir;
pub mod traits;

pub use cache_dir::CacheDirStore;
pub use traits::{PhotoStore, StorageError};

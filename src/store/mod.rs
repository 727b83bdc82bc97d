//! Durable store capability
//!
//! The cart persists as one serialized blob under a single namespaced key.
//! `CartStore` abstracts the device storage so the manager can run against
//! on-device files, an in-memory map in tests, or whatever the host platform
//! provides.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::CartResult;
use async_trait::async_trait;

/// The fixed key the whole cart is stored under
pub const STORAGE_KEY: &str = "cart:products";

/// Abstract async key-value store for serialized snapshots
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Read the blob stored under `key`, or `None` if absent
    async fn get(&self, key: &str) -> CartResult<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous blob
    async fn set(&self, key: &str, value: Vec<u8>) -> CartResult<()>;
}

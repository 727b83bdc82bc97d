//! Trolley - Offline-first shopping cart state
//!
//! Single source of truth for a storefront cart: synchronous in-memory
//! mutations, subscriber notifications, and best-effort persistence to an
//! async durable store.

pub mod cart;
pub mod error;
pub mod store;
pub mod totals;

pub use cart::{Cart, CartManager, Durability, LineItem, NewItem, Subscription};
pub use error::{CartError, CartResult};
pub use store::{CartStore, FileStore, MemoryStore, STORAGE_KEY};
pub use totals::{Totals, ValueFormatter};

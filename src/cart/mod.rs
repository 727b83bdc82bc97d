//! Cart state module

pub mod manager;
pub mod state;

pub use manager::{CartManager, Durability, Subscription};
pub use state::{Cart, LineItem, NewItem};

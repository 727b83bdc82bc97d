//! Cart state and line-item operations
//!
//! `Cart` holds the authoritative ordered list of line items. All operations
//! here are pure and synchronous; persistence and notification live in the
//! manager.

use serde::{Deserialize, Serialize};

/// One product entry in the cart with its quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Opaque stable identifier, unique within the cart
    pub id: String,

    /// Product title shown in the UI
    pub title: String,

    /// Product image URL
    pub image_url: String,

    /// Non-negative unit price
    pub price: f64,

    /// Units of this product in the cart, always >= 1
    pub quantity: u32,
}

/// The shape `add` accepts: a line item before it has a quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
}

impl NewItem {
    fn into_line_item(self, quantity: u32) -> LineItem {
        LineItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}

/// Ordered, id-unique collection of line items
///
/// Serializes as a bare JSON array so the persisted form is exactly the
/// storage contract: `[{"id": ..., "title": ..., ...}, ...]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Current line items in insertion order
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct line items (not total units)
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the cart holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a product to the cart, merging on an existing id
    ///
    /// If the id is already present the line is replaced with the incoming
    /// title/image/price and `quantity = existing + 1`. Otherwise the item is
    /// appended with `quantity = 1`. This is the only place id uniqueness is
    /// enforced.
    pub fn add(&mut self, item: NewItem) {
        match self.items.iter_mut().find(|p| p.id == item.id) {
            Some(existing) => {
                let quantity = existing.quantity + 1;
                *existing = item.into_line_item(quantity);
            }
            None => self.items.push(item.into_line_item(1)),
        }
    }

    /// Increase the quantity of the matching line item by one
    ///
    /// Absent ids are a no-op.
    pub fn increment(&mut self, id: &str) {
        if let Some(item) = self.items.iter_mut().find(|p| p.id == id) {
            item.quantity += 1;
        }
    }

    /// Decrease the quantity of the matching line item by one
    ///
    /// A line item at quantity 1 is removed from the cart, so quantity never
    /// reaches zero. Absent ids are a no-op.
    pub fn decrement(&mut self, id: &str) {
        if let Some(pos) = self.items.iter().position(|p| p.id == id) {
            if self.items[pos].quantity > 1 {
                self.items[pos].quantity -= 1;
            } else {
                self.items.remove(pos);
            }
        }
    }
}

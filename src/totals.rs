//! Derived cart totals
//!
//! Pure computation over a cart snapshot for the floating summary control.
//! Totals are recomputed on every state change and never persisted.

use crate::cart::LineItem;

/// Localized currency formatting, provided by the host UI
pub trait ValueFormatter {
    /// Format a monetary amount for display
    fn format(&self, amount: f64) -> String;
}

/// Aggregates displayed by the cart summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    /// Sum of quantities across all line items
    pub item_count: u64,
    /// Sum of price x quantity across all line items
    pub total_price: f64,
}

impl Totals {
    /// Compute totals from a cart snapshot
    pub fn of(items: &[LineItem]) -> Self {
        Self {
            item_count: items.iter().map(|p| u64::from(p.quantity)).sum(),
            total_price: items
                .iter()
                .map(|p| p.price * f64::from(p.quantity))
                .sum(),
        }
    }

    /// Total price rendered through the host's currency formatter
    pub fn formatted_price(&self, formatter: &dyn ValueFormatter) -> String {
        formatter.format(self.total_price)
    }
}

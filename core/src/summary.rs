//! Order summary panel for the cart view.

use storefront_types::Money;

use crate::cart::CartState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shipping {
    #[default]
    Free,
}

impl Shipping {
    #[must_use]
    pub fn cost(self) -> Money {
        match self {
            Shipping::Free => Money::ZERO,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Shipping::Free => "Free",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub subtotal: Money,
    pub shipping: Shipping,
    pub total: Money,
    pub item_count: u64,
}

impl OrderSummary {
    #[must_use]
    pub fn from_state(state: &CartState) -> Self {
        let shipping = Shipping::Free;
        Self {
            subtotal: state.total(),
            shipping,
            total: state.total().saturating_add(shipping.cost()),
            item_count: state.item_count(),
        }
    }

    /// `(label, value)` rows in display order.
    #[must_use]
    pub fn lines(&self, symbol: &str) -> Vec<(&'static str, String)> {
        vec![
            ("Subtotal", self.subtotal.display_with(symbol)),
            ("Shipping", self.shipping.label().to_string()),
            ("Total", self.total.display_with(symbol)),
        ]
    }
}

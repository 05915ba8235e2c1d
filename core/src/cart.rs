//! Shopping cart state machine.
//!
//! # Architecture
//!
//! [`CartState`] is the data: an ordered list of [`CartItem`]s, unique by
//! product id, plus a derived total. It changes only through
//! [`CartState::reduce`], which handles every [`CartCommand`] in one exhaustive
//! match and recomputes the total before returning.
//!
//! [`Cart`] owns a state and a [`NotificationSink`]. It is the handle the UI
//! layer holds: each command is reduced synchronously and the user-visible
//! notification (if any) is emitted afterwards.
//!
//! | Command | Existing id | Absent id | Notification |
//! |---------|-------------|-----------|--------------|
//! | `Add` | quantity + 1, stored price kept | appended with quantity 1 | `Added` |
//! | `Remove` | entry deleted | no-op | `Removed` |
//! | `UpdateQuantity` (q > 0) | quantity = q | no-op | none |
//! | `UpdateQuantity` (q <= 0) | entry deleted | no-op | none |
//!
//! # Invariants
//!
//! - Every stored item has `quantity >= 1`.
//! - `total == Σ price × quantity` after every transition.

use storefront_types::{Money, ProductId, ProductRef};

use crate::notifications::{CartNotification, NotificationSink};

/// One product line in the cart.
///
/// The unit price is captured when the product is first added and never
/// refreshed from the catalog afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    id: ProductId,
    name: String,
    image: String,
    price: Money,
    quantity: u32,
}

impl CartItem {
    fn from_ref(item: ProductRef) -> Self {
        Self {
            id: item.id,
            name: item.name,
            image: item.image,
            price: item.price,
            quantity: 1,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    #[must_use]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Always at least 1.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// A cart transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    Add(ProductRef),
    Remove(ProductId),
    /// Set an absolute quantity. Non-positive values remove the line.
    UpdateQuantity { id: ProductId, quantity: i64 },
}

/// Items plus their derived total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    items: Vec<CartItem>,
    total: Money,
}

impl CartState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn total(&self) -> Money {
        self.total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities, for the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// Apply one command. Pure: no notifications, no IO.
    pub fn reduce(&mut self, command: CartCommand) {
        match command {
            CartCommand::Add(item) => match self.position(&item.id) {
                Some(index) => {
                    let existing = &mut self.items[index];
                    existing.quantity = existing.quantity.saturating_add(1);
                }
                None => self.items.push(CartItem::from_ref(item)),
            },
            CartCommand::Remove(id) => {
                self.items.retain(|item| item.id != id);
            }
            CartCommand::UpdateQuantity { id, quantity } => {
                if let Some(index) = self.position(&id) {
                    if quantity <= 0 {
                        self.items.remove(index);
                    } else {
                        self.items[index].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                    }
                }
            }
        }
        self.recompute_total();
    }

    fn recompute_total(&mut self) {
        self.total = self.items.iter().map(CartItem::line_total).sum();
    }
}

/// The cart handle held by the UI layer.
#[derive(Debug, Default)]
pub struct Cart<S> {
    state: CartState,
    sink: S,
}

impl<S: NotificationSink> Cart<S> {
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            state: CartState::new(),
            sink,
        }
    }

    /// Current items and total, for rendering.
    #[must_use]
    pub fn state(&self) -> &CartState {
        &self.state
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn apply(&mut self, command: CartCommand) {
        let notification = match &command {
            CartCommand::Add(item) => Some(CartNotification::Added {
                id: item.id.clone(),
            }),
            CartCommand::Remove(id) => Some(CartNotification::Removed { id: id.clone() }),
            CartCommand::UpdateQuantity { .. } => None,
        };

        tracing::debug!(?command, "Applying cart command");
        self.state.reduce(command);
        tracing::debug!(
            lines = self.state.items.len(),
            items = self.state.item_count(),
            total_cents = self.state.total.cents(),
            "Cart updated"
        );

        if let Some(notification) = notification {
            self.sink.notify(notification);
        }
    }

    pub fn add(&mut self, item: ProductRef) {
        self.apply(CartCommand::Add(item));
    }

    pub fn remove(&mut self, id: &ProductId) {
        self.apply(CartCommand::Remove(id.clone()));
    }

    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) {
        self.apply(CartCommand::UpdateQuantity {
            id: id.clone(),
            quantity,
        });
    }

    /// The `+` button: one more of an existing line.
    pub fn increment(&mut self, id: &ProductId) {
        if let Some(item) = self.state.get(id) {
            let quantity = i64::from(item.quantity) + 1;
            self.update_quantity(id, quantity);
        }
    }

    /// The `-` button: floors at zero, which drops the line.
    pub fn decrement(&mut self, id: &ProductId) {
        if let Some(item) = self.state.get(id) {
            let quantity = (i64::from(item.quantity) - 1).max(0);
            self.update_quantity(id, quantity);
        }
    }
}

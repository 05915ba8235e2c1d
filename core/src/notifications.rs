//! User-visible notifications emitted by cart mutations.
//!
//! Delivery is fire-and-forget: the cart hands a [`CartNotification`] to its
//! [`NotificationSink`] after the state transition has completed and never
//! waits for, or observes, the outcome.

use storefront_types::{NonEmptyStaticStr, ProductId};

const ADDED_MESSAGE: NonEmptyStaticStr = NonEmptyStaticStr::new("Added to cart!");
const REMOVED_MESSAGE: NonEmptyStaticStr = NonEmptyStaticStr::new("Removed from cart");

/// A closed set of cart events worth telling the shopper about.
///
/// Quantity adjustments have no notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartNotification {
    Added { id: ProductId },
    Removed { id: ProductId },
}

impl CartNotification {
    /// Short success message for a toast or status line.
    #[must_use]
    pub fn message(&self) -> NonEmptyStaticStr {
        match self {
            Self::Added { .. } => ADDED_MESSAGE,
            Self::Removed { .. } => REMOVED_MESSAGE,
        }
    }

    #[must_use]
    pub fn product_id(&self) -> &ProductId {
        match self {
            Self::Added { id } | Self::Removed { id } => id,
        }
    }
}

/// Receiver of cart notifications.
pub trait NotificationSink {
    fn notify(&mut self, notification: CartNotification);
}

/// Drops every notification.
impl NotificationSink for () {
    fn notify(&mut self, _notification: CartNotification) {}
}

impl<S: NotificationSink + ?Sized> NotificationSink for &mut S {
    fn notify(&mut self, notification: CartNotification) {
        (**self).notify(notification);
    }
}

/// Queue for pending notifications.
///
/// The UI drains it once per event-loop turn and renders the messages.
/// Unlike a dedup queue, repeated adds of the same product each produce a
/// notification.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Vec<CartNotification>,
}

impl NotificationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all pending notifications, clearing the queue.
    ///
    /// Returns the notifications in the order they were emitted.
    pub fn take(&mut self) -> Vec<CartNotification> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

impl NotificationSink for NotificationQueue {
    fn notify(&mut self, notification: CartNotification) {
        self.pending.push(notification);
    }
}

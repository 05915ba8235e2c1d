//! Core domain logic for the storefront.
//!
//! The cart state machine lives here, together with the small pieces of view
//! state that sit next to it: notifications emitted by cart mutations, the
//! load state of catalog-backed views, error formatting, and the order summary.

pub mod cart;
pub mod errors;
mod load_state;
pub mod notifications;
mod summary;

pub use cart::{Cart, CartCommand, CartItem, CartState};
pub use load_state::{LoadFailure, LoadState};
pub use notifications::{CartNotification, NotificationQueue, NotificationSink};
pub use summary::{OrderSummary, Shipping};

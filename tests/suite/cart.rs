//! Cart state machine tests through the public API.

use storefront_core::{
    Cart, CartCommand, CartNotification, CartState, NotificationQueue, OrderSummary,
};
use storefront_types::{Money, ProductId};

use crate::common::item;

fn expected_total(state: &CartState) -> Money {
    state
        .items()
        .iter()
        .map(|line| line.price().times(line.quantity()))
        .sum()
}

#[test]
fn reference_scenario() {
    let mut cart = Cart::new(NotificationQueue::new());

    cart.add(item("1", 10));
    assert_eq!(cart.state().total(), Money::from_major(10));

    cart.add(item("1", 10));
    assert_eq!(cart.state().items().len(), 1);
    assert_eq!(cart.state().items()[0].quantity(), 2);
    assert_eq!(cart.state().total(), Money::from_major(20));

    cart.add(item("2", 5));
    assert_eq!(cart.state().total(), Money::from_major(25));

    cart.remove(&ProductId::from("1"));
    assert_eq!(cart.state().items().len(), 1);
    assert_eq!(cart.state().items()[0].id(), &ProductId::from("2"));
    assert_eq!(cart.state().total(), Money::from_major(5));

    cart.update_quantity(&ProductId::from("2"), 3);
    assert_eq!(cart.state().items()[0].quantity(), 3);
    assert_eq!(cart.state().total(), Money::from_major(15));
}

#[test]
fn total_tracks_every_add_sequence() {
    let catalog = [item("a", 3), item("b", 7), item("c", 11), item("d", 0)];

    // Every sequence of length 4 over the catalog.
    for seq in 0..catalog.len().pow(4) {
        let mut cart = Cart::new(());
        let mut cursor = seq;
        for _ in 0..4 {
            cart.add(catalog[cursor % catalog.len()].clone());
            cursor /= catalog.len();
            assert_eq!(cart.state().total(), expected_total(cart.state()));
        }
        let quantities: u64 = cart
            .state()
            .items()
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum();
        assert_eq!(quantities, 4);
    }
}

#[test]
fn readding_keeps_captured_price() {
    let mut cart = Cart::new(());
    cart.add(item("1", 10));

    let mut repriced = item("1", 99);
    repriced.name = "Renamed".to_string();
    cart.add(repriced);

    let line = cart.state().get(&ProductId::from("1")).unwrap();
    assert_eq!(line.quantity(), 2);
    assert_eq!(line.price(), Money::from_major(10));
    assert_eq!(line.name(), "Product 1");
    assert_eq!(cart.state().total(), Money::from_major(20));
}

#[test]
fn absent_ids_leave_state_unchanged() {
    let mut cart = Cart::new(NotificationQueue::new());
    cart.add(item("1", 10));
    cart.sink_mut().take();
    let before = cart.state().clone();

    cart.update_quantity(&ProductId::from("missing"), 4);
    assert_eq!(cart.state(), &before);
    assert!(cart.sink().is_empty());

    cart.remove(&ProductId::from("missing"));
    assert_eq!(cart.state(), &before);
    // Removal notifies even when nothing was removed.
    assert_eq!(
        cart.sink_mut().take(),
        vec![CartNotification::Removed {
            id: ProductId::from("missing")
        }]
    );
}

#[test]
fn non_positive_quantity_removes_line() {
    for quantity in [0, -1, -100] {
        let mut cart = Cart::new(());
        cart.add(item("1", 10));
        cart.add(item("2", 5));

        cart.update_quantity(&ProductId::from("1"), quantity);
        assert!(cart.state().get(&ProductId::from("1")).is_none());
        assert_eq!(cart.state().total(), Money::from_major(5));
    }
}

#[test]
fn decrement_to_zero_removes_line() {
    let mut cart = Cart::new(NotificationQueue::new());
    cart.add(item("1", 10));
    cart.increment(&ProductId::from("1"));
    assert_eq!(cart.state().total(), Money::from_major(20));

    cart.decrement(&ProductId::from("1"));
    cart.decrement(&ProductId::from("1"));
    assert!(cart.state().is_empty());
    assert_eq!(cart.state().total(), Money::ZERO);

    // Quantity changes never notify.
    assert_eq!(cart.sink().len(), 1);
}

#[test]
fn insertion_order_is_preserved() {
    let mut cart = Cart::new(());
    for id in ["c", "a", "b"] {
        cart.add(item(id, 1));
    }
    cart.add(item("a", 1));

    let ids: Vec<&str> = cart
        .state()
        .items()
        .iter()
        .map(|line| line.id().as_str())
        .collect();
    assert_eq!(ids, ["c", "a", "b"]);
}

#[test]
fn apply_matches_named_operations() {
    let mut via_apply = Cart::new(());
    let mut via_methods = Cart::new(());

    via_apply.apply(CartCommand::Add(item("1", 4)));
    via_apply.apply(CartCommand::UpdateQuantity {
        id: ProductId::from("1"),
        quantity: 5,
    });
    via_apply.apply(CartCommand::Add(item("2", 2)));
    via_apply.apply(CartCommand::Remove(ProductId::from("1")));

    via_methods.add(item("1", 4));
    via_methods.update_quantity(&ProductId::from("1"), 5);
    via_methods.add(item("2", 2));
    via_methods.remove(&ProductId::from("1"));

    assert_eq!(via_apply.state(), via_methods.state());
}

#[test]
fn summary_reflects_cart() {
    let mut cart = Cart::new(());
    cart.add(item("1", 10));
    cart.add(item("1", 10));
    cart.add(item("2", 5));

    let summary = OrderSummary::from_state(cart.state());
    assert_eq!(summary.subtotal, Money::from_major(25));
    assert_eq!(summary.total, Money::from_major(25));
    assert_eq!(summary.item_count, 3);
    assert_eq!(
        summary.lines("$"),
        vec![
            ("Subtotal", "$25.00".to_string()),
            ("Shipping", "Free".to_string()),
            ("Total", "$25.00".to_string()),
        ]
    );
}

//! Property-based invariant tests for the cart.
//!
//! These check the invariants that must hold after ANY sequence of cart
//! operations:
//! - No two lines ever share a product id
//! - Every quantity sits in `[1, stock]` for its line's snapshot
//! - Removal is idempotent
//! - `count` and `subtotal` are exact aggregates of the lines
//! - Pricing is deterministic for identical input

use proptest::prelude::*;

use bazaar_core::{Price, ProductId, ProductSnapshot, VendorId};
use bazaar_storefront::cart::{CartOwner, CartStore, InMemoryCartRepository};
use bazaar_storefront::pricing;

/// Number of distinct products the generated operations draw from.
const PRODUCT_POOL: usize = 6;

#[derive(Debug, Clone)]
enum CartOp {
    Add { product: usize, quantity: u32 },
    Remove { product: usize },
    Update { product: usize, quantity: u32 },
    Clear,
}

fn snapshot(index: usize) -> ProductSnapshot {
    // Deterministic pool: stock 0 for the first product exercises the
    // out-of-stock no-op path
    let stock = [0u32, 1, 3, 5, 8, 12][index % PRODUCT_POOL];
    let price_cents = [499i64, 1250, 2000, 75, 9999, 1500][index % PRODUCT_POOL];
    ProductSnapshot {
        id: ProductId::new(format!("p-{index}")),
        name: format!("Product {index}"),
        price: Price::from_cents(price_cents),
        stock,
        image: None,
        vendor: VendorId::new("v-1"),
    }
}

fn cart_op() -> impl Strategy<Value = CartOp> {
    prop_oneof![
        4 => (0..PRODUCT_POOL, 0u32..20).prop_map(|(product, quantity)| CartOp::Add {
            product,
            quantity
        }),
        2 => (0..PRODUCT_POOL).prop_map(|product| CartOp::Remove { product }),
        2 => (0..PRODUCT_POOL, 0u32..20).prop_map(|(product, quantity)| CartOp::Update {
            product,
            quantity
        }),
        1 => Just(CartOp::Clear),
    ]
}

fn run_ops(ops: &[CartOp]) -> CartStore {
    let mut cart = CartStore::open(
        CartOwner::Anonymous,
        Box::new(InMemoryCartRepository::default()),
    )
    .expect("open in-memory cart");

    for op in ops {
        match op {
            CartOp::Add { product, quantity } => {
                cart.add_item(snapshot(*product), *quantity).expect("add");
            }
            CartOp::Remove { product } => {
                cart.remove_item(&ProductId::new(format!("p-{product}")))
                    .expect("remove");
            }
            CartOp::Update { product, quantity } => {
                cart.update_quantity(&ProductId::new(format!("p-{product}")), *quantity)
                    .expect("update");
            }
            CartOp::Clear => cart.clear().expect("clear"),
        }
    }

    cart
}

proptest! {
    #[test]
    fn no_two_lines_share_a_product_id(ops in prop::collection::vec(cart_op(), 0..40)) {
        let cart = run_ops(&ops);

        let mut ids: Vec<&str> = cart.lines().iter().map(|l| l.product.id.as_str()).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        prop_assert_eq!(before, ids.len());
    }

    #[test]
    fn quantities_always_clamped_to_stock(ops in prop::collection::vec(cart_op(), 0..40)) {
        let cart = run_ops(&ops);

        for line in cart.lines() {
            prop_assert!(line.quantity >= 1);
            prop_assert!(line.quantity <= line.product.stock);
        }
    }

    #[test]
    fn removal_is_idempotent(ops in prop::collection::vec(cart_op(), 0..30), product in 0..PRODUCT_POOL) {
        let mut cart = run_ops(&ops);
        let id = ProductId::new(format!("p-{product}"));

        cart.remove_item(&id).expect("first removal");
        let after_first: Vec<_> = cart.lines().to_vec();

        cart.remove_item(&id).expect("second removal");
        prop_assert_eq!(cart.lines(), after_first.as_slice());
    }

    #[test]
    fn count_and_subtotal_are_exact_aggregates(ops in prop::collection::vec(cart_op(), 0..40)) {
        let cart = run_ops(&ops);

        let expected_count: u32 = cart.lines().iter().map(|l| l.quantity).sum();
        prop_assert_eq!(cart.count(), expected_count);

        let expected_subtotal: Price = cart
            .lines()
            .iter()
            .map(|l| l.product.price * l.quantity)
            .sum();
        prop_assert_eq!(cart.subtotal(), expected_subtotal);
    }

    #[test]
    fn pricing_is_deterministic(ops in prop::collection::vec(cart_op(), 0..40)) {
        let cart = run_ops(&ops);

        let first = pricing::quote(cart.lines(), None);
        let second = pricing::quote(cart.lines(), None);
        prop_assert_eq!(first, second);

        prop_assert_eq!(first.subtotal, cart.subtotal());
    }
}

//! The persisted shopping cart.
//!
//! [`CartStore`] is the authoritative local record of what a shopper intends
//! to buy, independent of any single screen's lifetime. Lines hold an
//! immutable [`ProductSnapshot`] captured at add time; quantities always sit
//! in `[1, stock]` for their snapshot; no two lines reference the same
//! product. Every mutating operation re-persists the full cart through its
//! [`CartRepository`] before returning, so a crash or reload never loses
//! state already accrued.
//!
//! Quantity requests beyond available stock are clamped rather than
//! rejected; the server performs the final stock check at order submission.

mod persistence;

pub use persistence::{
    CartRepository, InMemoryCartRepository, JsonFileCartRepository, StorageError,
};

use serde::{Deserialize, Serialize};

use bazaar_core::{Price, ProductId, ProductSnapshot, UserId};

/// One (product snapshot, quantity) pair in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product data frozen at add time.
    pub product: ProductSnapshot,
    /// Units requested, always in `[1, product.stock]`.
    pub quantity: u32,
}

impl CartLine {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// Whose cart a store holds.
///
/// Carts are keyed per authenticated user, with a shared anonymous cart for
/// signed-out browsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CartOwner {
    /// Cart for a signed-out shopper.
    Anonymous,
    /// Cart for the given user.
    User(UserId),
}

impl CartOwner {
    /// Stable storage key for this owner.
    #[must_use]
    pub fn storage_key(&self) -> String {
        match self {
            Self::Anonymous => "cart-anonymous".to_string(),
            Self::User(id) => format!("cart-user-{id}"),
        }
    }
}

/// The persisted local cart.
///
/// Created by [`CartStore::open`], which loads whatever the repository holds
/// for the owner (an empty cart on first use). Mutations apply in call
/// order; there is one logical writer per process, and concurrent processes
/// sharing a repository get last-write-wins with no merging.
pub struct CartStore {
    owner: CartOwner,
    lines: Vec<CartLine>,
    repository: Box<dyn CartRepository + Send + Sync>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("owner", &self.owner)
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Open the cart for `owner`, loading persisted lines if any exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be read or holds corrupt
    /// data.
    pub fn open(
        owner: CartOwner,
        repository: Box<dyn CartRepository + Send + Sync>,
    ) -> Result<Self, StorageError> {
        let lines = repository.load(&owner)?;
        Ok(Self {
            owner,
            lines,
            repository,
        })
    }

    /// Add `quantity` units of a product to the cart.
    ///
    /// If a line for this product already exists its quantity grows by
    /// `quantity`, clamped to the line's snapshot stock; otherwise a new
    /// line is appended with the quantity clamped to `[1, stock]`. Adding a
    /// product with zero stock is a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns an error only if persisting the updated cart fails; the cart
    /// itself cannot reject the addition.
    pub fn add_item(
        &mut self,
        product: ProductSnapshot,
        quantity: u32,
    ) -> Result<(), StorageError> {
        if product.stock == 0 {
            tracing::debug!(product = %product.id, "ignoring add of out-of-stock product");
            return Ok(());
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = clamp_quantity(line.quantity.saturating_add(quantity), line.product.stock);
        } else {
            let stock = product.stock;
            self.lines.push(CartLine {
                product,
                quantity: clamp_quantity(quantity, stock),
            });
        }

        self.persist()
    }

    /// Remove the line for `product_id`, if present.
    ///
    /// Removing an absent product is a no-op, so removal is idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the updated cart fails.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<(), StorageError> {
        let before = self.lines.len();
        self.lines.retain(|l| &l.product.id != product_id);

        if self.lines.len() == before {
            return Ok(());
        }
        self.persist()
    }

    /// Set the quantity for `product_id`.
    ///
    /// A quantity of zero removes the line entirely; any other value is
    /// clamped to `[1, stock]` for that line's snapshot. Updating an absent
    /// product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the updated cart fails.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), StorageError> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| &l.product.id == product_id)
        else {
            return Ok(());
        };

        line.quantity = clamp_quantity(quantity, line.product.stock);
        self.persist()
    }

    /// Empty the cart.
    ///
    /// Used after a successful checkout and on logout.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the empty cart fails.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.lines.clear();
        self.repository.delete(&self.owner)
    }

    /// Total number of units across all lines (the badge count), not the
    /// number of distinct lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of line totals - the subtotal, before shipping, tax, or discount.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// The cart lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Who owns this cart.
    #[must_use]
    pub const fn owner(&self) -> &CartOwner {
        &self.owner
    }

    /// Replace every line's snapshot with freshly fetched product data.
    ///
    /// This is the explicit reconciliation step run before checkout
    /// submission - snapshots are never refreshed implicitly. Quantities are
    /// re-clamped against the new stock; lines whose product disappeared or
    /// sold out are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the refreshed cart fails.
    pub fn apply_refreshed_snapshots(
        &mut self,
        snapshots: &[ProductSnapshot],
    ) -> Result<(), StorageError> {
        self.lines = self
            .lines
            .iter()
            .filter_map(|line| {
                let fresh = snapshots.iter().find(|s| s.id == line.product.id)?;
                if fresh.stock == 0 {
                    tracing::info!(product = %fresh.id, "dropping sold-out line during refresh");
                    return None;
                }
                Some(CartLine {
                    product: fresh.clone(),
                    quantity: clamp_quantity(line.quantity, fresh.stock),
                })
            })
            .collect();

        self.persist()
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.repository.save(&self.owner, &self.lines)
    }
}

/// Clamp a requested quantity into `[1, stock]`.
const fn clamp_quantity(requested: u32, stock: u32) -> u32 {
    if requested == 0 {
        1
    } else if requested > stock {
        stock
    } else {
        requested
    }
}

//! # Cart State
//!
//! The shopper's cart. The cart is owned by the caller (a session handler,
//! the quote binary); pricing only ever sees a snapshot of its lines.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Storefront Action        Cart Method            Cart State Change      │
//! │  ─────────────────        ───────────            ─────────────────      │
//! │                                                                         │
//! │  Add to Cart ────────────► add_item() ─────────► push or merge qty     │
//! │                                                                         │
//! │  Change Quantity ────────► update_quantity() ──► items[i].qty = n      │
//! │                                                                         │
//! │  Click Remove ───────────► remove_item() ──────► items.remove(i)       │
//! │                                                                         │
//! │  Order Placed ───────────► clear() ────────────► items.clear()         │
//! │                                                                         │
//! │  Price Cart ─────────────► lines() ────────────► (read only snapshot)  │
//! │                                                                         │
//! │  NOTE: CartState serializes all access through one Mutex.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use optibio_core::validation::{validate_cart_size, validate_price_cents, validate_quantity_limit};
use optibio_core::{CartLine, ValidationError, MAX_CART_ITEMS, MAX_ITEM_QUANTITY};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    #[error("Cart cannot have more than {max} items")]
    CartFull { max: usize },

    #[error("Item {item_id} not in cart")]
    NotInCart { item_id: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Cart Item
// =============================================================================

/// An item in the cart.
///
/// ## Design Notes
/// - `id`: identifies this entry for update/remove
/// - `unit_price_cents`: frozen when added. A catalog price change after
///   the add does not reach this cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,

    pub product_id: String,

    #[serde(default)]
    pub variant_id: Option<String>,

    /// Display name at time of adding (frozen)
    pub name: String,

    /// Price in cents at time of adding (frozen)
    pub unit_price_cents: i64,

    pub quantity: i64,

    #[serde(default)]
    pub is_subscription: bool,

    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a one-time purchase item.
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        unit_price_cents: i64,
        quantity: i64,
    ) -> Self {
        CartItem {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.into(),
            variant_id: None,
            name: name.into(),
            unit_price_cents,
            quantity,
            is_subscription: false,
            added_at: Utc::now(),
        }
    }

    pub fn with_variant(mut self, variant_id: impl Into<String>) -> Self {
        self.variant_id = Some(variant_id.into());
        self
    }

    /// Switches the item to Subscribe & Save billing.
    pub fn subscription(mut self) -> Self {
        self.is_subscription = true;
        self
    }

    /// Same product, same variant, same billing mode.
    fn same_line_as(&self, other: &CartItem) -> bool {
        self.product_id == other.product_id
            && self.variant_id == other.variant_id
            && self.is_subscription == other.is_subscription
    }

    /// The calculator's view of this item.
    pub fn to_line(&self) -> CartLine {
        CartLine {
            product_id: self.product_id.clone(),
            variant_id: self.variant_id.clone(),
            unit_price_cents: self.unit_price_cents,
            quantity: self.quantity,
            is_subscription: self.is_subscription,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by product + variant + billing mode (adding the same
///   line again increases its quantity)
/// - Quantity is between 1 and `MAX_ITEM_QUANTITY` (setting it to 0 removes
///   the item)
/// - At most `MAX_CART_ITEMS` items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,

    /// When the cart was created/last cleared
    pub created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds an item, or merges its quantity into a matching line.
    ///
    /// A merged line keeps the price frozen at its first add.
    pub fn add_item(&mut self, item: CartItem) -> Result<(), CartError> {
        validate_quantity_limit(item.quantity)?;
        validate_price_cents(item.unit_price_cents)?;

        if let Some(existing) = self.items.iter_mut().find(|i| i.same_line_as(&item)) {
            let new_qty = existing.quantity + item.quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CartError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            existing.quantity = new_qty;
            return Ok(());
        }

        validate_cart_size(self.items.len()).map_err(|_| CartError::CartFull {
            max: MAX_CART_ITEMS,
        })?;

        self.items.push(item);
        Ok(())
    }

    /// Updates the quantity of an item. A quantity of 0 removes it.
    pub fn update_quantity(&mut self, item_id: &str, quantity: i64) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove_item(item_id);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CartError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        validate_quantity_limit(quantity)?;

        match self.items.iter_mut().find(|i| i.id == item_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(())
            }
            None => Err(CartError::NotInCart {
                item_id: item_id.to_string(),
            }),
        }
    }

    pub fn remove_item(&mut self, item_id: &str) -> Result<(), CartError> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.id != item_id);

        if self.items.len() == initial_len {
            Err(CartError::NotInCart {
                item_id: item_id.to_string(),
            })
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Snapshot of the cart for the calculator.
    pub fn lines(&self) -> Vec<CartLine> {
        self.items.iter().map(CartItem::to_line).collect()
    }

    pub fn has_subscription(&self) -> bool {
        self.items.iter().any(|i| i.is_subscription)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Shared Cart State
// =============================================================================

/// Cart shared between concurrent request handlers.
///
/// A poisoned lock is recovered rather than propagated: every cart
/// mutation leaves the cart valid before it can panic.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    pub fn new() -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let lines = cart_state.with_cart(|cart| cart.lines());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(item))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    /// A detached copy for pricing.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bottle(price_cents: i64, qty: i64) -> CartItem {
        CartItem::new("ashwagandha-ksm66", "Ashwagandha KSM-66", price_cents, qty)
            .with_variant("60-caps")
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        cart.add_item(bottle(4999, 2)).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.lines()[0].unit_price_cents, 4999);
    }

    #[test]
    fn test_cart_add_same_line_increases_quantity() {
        let mut cart = Cart::new();
        cart.add_item(bottle(4999, 2)).unwrap();
        cart.add_item(bottle(5999, 3)).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
        // price frozen at first add
        assert_eq!(cart.items[0].unit_price_cents, 4999);
    }

    #[test]
    fn test_subscription_is_a_separate_line() {
        let mut cart = Cart::new();
        cart.add_item(bottle(4999, 1)).unwrap();
        cart.add_item(bottle(4999, 1).subscription()).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert!(cart.has_subscription());
    }

    #[test]
    fn test_quantity_limit_on_merge() {
        let mut cart = Cart::new();
        cart.add_item(bottle(4999, 998)).unwrap();
        assert_eq!(
            cart.add_item(bottle(4999, 2)),
            Err(CartError::QuantityTooLarge {
                requested: 1000,
                max: MAX_ITEM_QUANTITY,
            })
        );
    }

    #[test]
    fn test_add_rejects_bad_quantity() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_item(bottle(4999, 0)),
            Err(CartError::Validation(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_full() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_ITEMS {
            cart.add_item(CartItem::new(format!("p{i}"), "Item", 100, 1))
                .unwrap();
        }
        assert_eq!(
            cart.add_item(CartItem::new("one-more", "Item", 100, 1)),
            Err(CartError::CartFull {
                max: MAX_CART_ITEMS
            })
        );
    }

    #[test]
    fn test_update_quantity_and_remove() {
        let mut cart = Cart::new();
        cart.add_item(bottle(4999, 1)).unwrap();
        let id = cart.items[0].id.clone();

        cart.update_quantity(&id, 4).unwrap();
        assert_eq!(cart.total_quantity(), 4);

        cart.update_quantity(&id, 0).unwrap();
        assert!(cart.is_empty());

        assert!(matches!(
            cart.remove_item(&id),
            Err(CartError::NotInCart { .. })
        ));
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        cart.add_item(bottle(4999, 2)).unwrap();
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_state_snapshot_is_detached() {
        let state = CartState::new();
        state
            .with_cart_mut(|cart| cart.add_item(bottle(4999, 1)))
            .unwrap();

        let snapshot = state.snapshot();
        state.with_cart_mut(|cart| cart.clear());

        assert_eq!(snapshot.item_count(), 1);
        assert!(state.with_cart(|cart| cart.is_empty()));
    }
}

//! # Domain Types
//!
//! Core cart types used throughout GoMarketplace.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   add_to_cart   ┌─────────────────┐               │
//! │  │  CatalogItem    │ ──────────────► │    LineItem     │               │
//! │  │  ─────────────  │                 │  ─────────────  │               │
//! │  │  id             │                 │  id             │               │
//! │  │  title          │                 │  title          │               │
//! │  │  image_url      │                 │  image_url      │               │
//! │  │  price          │                 │  price          │               │
//! │  └─────────────────┘                 │  quantity >= 1  │               │
//! │                                      └────────┬────────┘               │
//! │                                               │ ordered, unique by id  │
//! │                                      ┌────────▼────────┐               │
//! │                                      │      Cart       │               │
//! │                                      │  Vec<LineItem>  │               │
//! │                                      └─────────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Immutable Transitions
//! A `Cart` is never edited in place. Every operation (`with_added`,
//! `with_incremented`, `with_decremented`) returns a new `Cart`, so the
//! store can persist the next value before it replaces the current one.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Catalog Item
// =============================================================================

/// A product record as handed over by the catalog (no quantity yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogItem {
    /// Product identifier, unique within a cart.
    pub id: String,

    /// Display name.
    pub title: String,

    /// Product image shown next to the line.
    pub image_url: String,

    /// Unit price as received from the catalog.
    pub price: f64,
}

impl CatalogItem {
    /// Creates a catalog item.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        CatalogItem {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product in the cart plus how many units are held.
///
/// Serialized field names are the persisted wire format and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    /// Units held. Always >= 1 inside a `Cart`.
    pub quantity: u32,
}

impl LineItem {
    /// Builds the first line for a catalog item (quantity 1).
    pub fn from_catalog(item: CatalogItem) -> Self {
        LineItem {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
            quantity: 1,
        }
    }

    fn with_quantity(&self, quantity: u32) -> Self {
        LineItem {
            quantity,
            ..self.clone()
        }
    }
}

// =============================================================================
// Cart Operation
// =============================================================================

/// A single cart mutation.
///
/// The store queues these and applies them one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum CartOp {
    /// Add one unit of a product, appending it if it is new.
    Add(CatalogItem),
    /// Add one unit to an existing line.
    Increment(String),
    /// Remove one unit from an existing line, dropping it at zero.
    Decrement(String),
}

impl CartOp {
    /// Short operation name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            CartOp::Add(_) => "add_to_cart",
            CartOp::Increment(_) => "increment",
            CartOp::Decrement(_) => "decrement",
        }
    }

    /// Product id the operation targets.
    pub fn target_id(&self) -> &str {
        match self {
            CartOp::Add(item) => &item.id,
            CartOp::Increment(id) | CartOp::Decrement(id) => id,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `id` (adding the same product increases quantity)
/// - Every quantity is >= 1 (decrementing to 0 removes the item)
/// - Order is insertion order; nothing re-sorts it
///
/// `Cart` serializes as a bare JSON array. Decoding goes through
/// [`crate::snapshot::decode`], which validates before constructing.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Wraps items that already passed snapshot validation.
    pub(crate) fn from_validated(items: Vec<LineItem>) -> Self {
        Cart { items }
    }

    /// Applies one operation and returns the resulting cart.
    pub fn apply(&self, op: &CartOp) -> Cart {
        match op {
            CartOp::Add(item) => self.with_added(item.clone()),
            CartOp::Increment(id) => self.with_incremented(id),
            CartOp::Decrement(id) => self.with_decremented(id),
        }
    }

    /// Adds a product or bumps its quantity if already present.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity + 1, stored fields win (the
    ///   incoming title/price/image are ignored)
    /// - Product not in cart: appended with quantity 1
    pub fn with_added(&self, item: CatalogItem) -> Cart {
        if self.contains(&item.id) {
            return self.with_incremented(&item.id);
        }

        let mut items = self.items.clone();
        items.push(LineItem::from_catalog(item));
        Cart { items }
    }

    /// Adds one unit to the matching line. Unknown ids leave the cart as is.
    pub fn with_incremented(&self, id: &str) -> Cart {
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id == id {
                    item.with_quantity(item.quantity.saturating_add(1))
                } else {
                    item.clone()
                }
            })
            .collect();

        Cart { items }
    }

    /// Removes one unit from the matching line and drops lines at zero.
    ///
    /// Unknown ids leave the cart as is.
    pub fn with_decremented(&self, id: &str) -> Cart {
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id == id {
                    item.with_quantity(item.quantity.saturating_sub(1))
                } else {
                    item.clone()
                }
            })
            .filter(|item| item.quantity >= 1)
            .collect();

        Cart { items }
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consumes the cart, returning its items.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Looks up a line by product id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Checks whether a product is in the cart.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of unique items in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart counts for display badges.
///
/// Sent to the UI as `{ "itemCount": .., "totalQuantity": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: u64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: f64) -> CatalogItem {
        CatalogItem::new(
            id,
            format!("Product {}", id),
            format!("https://cdn.example/{}.png", id),
            price,
        )
    }

    fn ids(cart: &Cart) -> Vec<&str> {
        cart.items().iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn test_cart_add_item() {
        let cart = Cart::new().with_added(product("p1", 10.0));

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 1);
        assert_eq!(cart.get("p1").map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_cart_add_same_product_merges() {
        let cart = Cart::new()
            .with_added(CatalogItem::new("p1", "A", "a.png", 10.0))
            .with_added(CatalogItem::new("p1", "Renamed", "b.png", 99.0));

        assert_eq!(cart.item_count(), 1); // Still one unique item
        let line = &cart.items()[0];
        assert_eq!(line.quantity, 2);
        assert_eq!(line.title, "A");
        assert_eq!(line.image_url, "a.png");
        assert_eq!(line.price, 10.0);
    }

    #[test]
    fn test_transitions_do_not_touch_the_original() {
        let before = Cart::new().with_added(product("p1", 1.0));
        let after = before.with_incremented("p1");

        assert_eq!(before.get("p1").map(|i| i.quantity), Some(1));
        assert_eq!(after.get("p1").map(|i| i.quantity), Some(2));
    }

    #[test]
    fn test_increment_unknown_id_is_noop() {
        let cart = Cart::new().with_added(product("p1", 1.0));
        assert_eq!(cart.with_incremented("nonexistent"), cart);
    }

    #[test]
    fn test_decrement_to_zero_removes() {
        let cart = Cart::new().with_added(product("p1", 1.0));
        let cart = cart.with_decremented("p1");

        assert!(cart.is_empty());
        assert_eq!(serde_json::to_string(&cart).unwrap(), "[]");
    }

    #[test]
    fn test_decrement_keeps_other_items() {
        let cart = Cart::new()
            .with_added(product("p1", 1.0))
            .with_added(product("p2", 2.0))
            .with_incremented("p2")
            .with_decremented("p2");

        assert_eq!(ids(&cart), vec!["p1", "p2"]);
        assert_eq!(cart.get("p2").map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_decrement_unknown_id_is_noop() {
        let cart = Cart::new().with_added(product("p1", 1.0));
        assert_eq!(cart.with_decremented("ghost"), cart);
    }

    #[test]
    fn test_append_order_preserved() {
        let cart = Cart::new()
            .with_added(product("p1", 1.0))
            .with_added(product("p2", 2.0))
            .with_incremented("p1");

        assert_eq!(ids(&cart), vec!["p1", "p2"]);
    }

    #[test]
    fn test_apply_dispatches_ops() {
        let ops = [
            CartOp::Add(product("p1", 1.0)),
            CartOp::Add(product("p2", 2.0)),
            CartOp::Increment("p2".into()),
            CartOp::Decrement("p1".into()),
        ];
        let cart = ops.iter().fold(Cart::new(), |cart, op| cart.apply(op));

        assert_eq!(ids(&cart), vec!["p2"]);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_invariants_hold_over_mixed_sequences() {
        let ids_pool = ["a", "b", "c"];
        let mut cart = Cart::new();

        for step in 0..90usize {
            let id = ids_pool[(step * 7) % ids_pool.len()];
            let op = match step % 4 {
                0 | 1 => CartOp::Add(product(id, 1.0)),
                2 => CartOp::Increment(id.to_string()),
                _ => CartOp::Decrement(id.to_string()),
            };
            cart = cart.apply(&op);

            let mut seen = std::collections::HashSet::new();
            for item in cart.items() {
                assert!(item.quantity >= 1);
                assert!(seen.insert(item.id.clone()), "duplicate id {}", item.id);
            }
        }
    }

    #[test]
    fn test_cart_totals() {
        let cart = Cart::new()
            .with_added(product("p1", 1.0))
            .with_added(product("p1", 1.0))
            .with_added(product("p2", 1.0));

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);

        let json = serde_json::to_value(totals).unwrap();
        assert_eq!(json, serde_json::json!({ "itemCount": 2, "totalQuantity": 3 }));
    }

    #[test]
    fn test_op_metadata() {
        let op = CartOp::Decrement("p9".into());
        assert_eq!(op.name(), "decrement");
        assert_eq!(op.target_id(), "p9");
    }
}

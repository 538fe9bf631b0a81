//! # Cart Module
//!
//! The food-order shopping cart and the engine that ties it to a restaurant.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Engine Operations                               │
//! │                                                                         │
//! │  User Action              Engine Call             Cart State Change     │
//! │  ───────────              ───────────             ─────────────────     │
//! │                                                                         │
//! │  Pick Restaurant ───────► select_restaurant() ──► restaurant = r,       │
//! │                                                   lines.clear()         │
//! │                                                                         │
//! │  Click "Add" ───────────► add_item() ───────────► qty += 1 or push      │
//! │                                                                         │
//! │  Click +/- ─────────────► update_quantity() ────► qty += delta,         │
//! │                                                   qty <= 0 removes      │
//! │                                                                         │
//! │  Click Remove ──────────► remove_item() ────────► lines.retain(..)      │
//! │                                                                         │
//! │  Place Order ───────────► prepare_order() ──────► (read only)           │
//! │       └─ backend ok ────► complete_order() ─────► restaurant = None,    │
//! │                                                   lines.clear()         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! ```text
//!   empty ──add──► populated ──complete_order──► empty
//!     ▲                │
//!     └── select_restaurant / clear / last line removed
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{MenuItem, NewOrder, Restaurant};
use crate::validation::{require, ValidationResult};

/// Largest quantity a single cart line can hold.
pub const MAX_LINE_QUANTITY: i64 = 999;

// =============================================================================
// Cart Line
// =============================================================================

/// A menu item in the cart.
///
/// ## Design Notes
/// The name and price are frozen when the item is first added, so the cart
/// keeps displaying the same numbers if the menu is reloaded meanwhile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub item_id: i64,
    pub name: String,
    /// Never negative. Items without a usable price are added at zero.
    pub unit_price: Money,
    /// Between 1 and [`MAX_LINE_QUANTITY`] while the line exists.
    pub quantity: i64,
}

impl CartLine {
    /// Freezes a menu item into a cart line with quantity 1.
    pub fn from_menu_item(item: &MenuItem) -> Self {
        let price = item.price.unwrap_or_default();
        CartLine {
            item_id: item.item_id,
            name: item.name.clone(),
            unit_price: if price.is_negative() { Money::zero() } else { price },
            quantity: 1,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Ordered cart lines.
///
/// ## Invariants
/// - Lines are unique by `item_id` (adding the same item bumps quantity)
/// - Every line has quantity in `1..=MAX_LINE_QUANTITY`
/// - Insertion order is preserved
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,

    /// When the cart was created or last cleared.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Adds one unit of a menu item. A line already at the cap stays there.
    pub fn add_item(&mut self, item: &MenuItem) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item.item_id) {
            line.quantity = (line.quantity + 1).min(MAX_LINE_QUANTITY);
            return;
        }
        self.lines.push(CartLine::from_menu_item(item));
    }

    /// Changes a line's quantity by `delta`.
    ///
    /// ## Behavior
    /// - Resulting quantity <= 0: the line is removed
    /// - Resulting quantity above [`MAX_LINE_QUANTITY`]: clamped to it
    /// - Item not in cart: no-op
    pub fn update_quantity(&mut self, item_id: i64, delta: i64) {
        let Some(index) = self.lines.iter().position(|l| l.item_id == item_id) else {
            return;
        };

        let quantity = self.lines[index].quantity.saturating_add(delta);
        if quantity <= 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = quantity.min(MAX_LINE_QUANTITY);
        }
    }

    /// Removes a line. Absent ids are a no-op.
    pub fn remove_item(&mut self, item_id: i64) {
        self.lines.retain(|l| l.item_id != item_id);
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Number of distinct items.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Exact sum of line totals.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Cart totals summary for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub total: Money,
    /// Two-decimal display form, e.g. `₹640.00`.
    pub total_display: String,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        let total = cart.total();
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total,
            total_display: total.to_string(),
        }
    }
}

// =============================================================================
// Cart Engine
// =============================================================================

/// A cart bound to at most one restaurant.
#[derive(Debug, Clone, Default)]
pub struct CartEngine {
    restaurant: Option<Restaurant>,
    cart: Cart,
}

impl CartEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restaurant(&self) -> Option<&Restaurant> {
        self.restaurant.as_ref()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Makes `restaurant` active and empties the cart.
    ///
    /// The cart is emptied even when the same restaurant is picked again.
    pub fn select_restaurant(&mut self, restaurant: Restaurant) {
        self.restaurant = Some(restaurant);
        self.cart.clear();
    }

    pub fn add_item(&mut self, item: &MenuItem) {
        self.cart.add_item(item);
    }

    pub fn update_quantity(&mut self, item_id: i64, delta: i64) {
        self.cart.update_quantity(item_id, delta);
    }

    pub fn remove_item(&mut self, item_id: i64) {
        self.cart.remove_item(item_id);
    }

    pub fn total(&self) -> Money {
        self.cart.total()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&self.cart)
    }

    /// Builds the order payload without touching any state.
    ///
    /// ## Errors
    /// - `Required { field: "user" }` when no user is selected
    /// - `Required { field: "restaurant" }` when no restaurant is active, or
    ///   the active one has no id
    /// - `EmptyCart` when there is nothing to order
    pub fn prepare_order(&self, user_id: Option<i64>) -> ValidationResult<NewOrder> {
        let user_id = require(user_id, "user")?;
        let restaurant_id = require(
            self.restaurant.as_ref().and_then(|r| r.restaurant_id),
            "restaurant",
        )?;
        if self.cart.is_empty() {
            return Err(ValidationError::EmptyCart);
        }

        Ok(NewOrder {
            user_id,
            restaurant_id,
            total_amount: self.cart.total(),
        })
    }

    /// Resets after the backend accepted the order.
    pub fn complete_order(&mut self) {
        self.restaurant = None;
        self.cart.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    fn menu_item(id: i64, price: Option<i64>) -> MenuItem {
        MenuItem {
            item_id: id,
            restaurant_id: Some(1),
            name: format!("Item {}", id),
            price: price.map(|p| Money::from_major_minor(p, 0)),
            availability: true,
        }
    }

    fn restaurant(id: i64) -> Restaurant {
        Restaurant {
            restaurant_id: Some(id),
            name: "Meghana Foods".to_string(),
            location: Some("Koramangala".to_string()),
            cuisine: Some("Biryani".to_string()),
            rating: Some(4.5),
        }
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::new();
        let item = menu_item(7, Some(100));

        cart.add_item(&item);
        cart.add_item(&item);

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.total(), Money::from_major_minor(200, 0));
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let mut cart = Cart::new();
        let item = menu_item(7, Some(100));
        cart.add_item(&item);
        cart.add_item(&item);

        cart.update_quantity(7, -2);

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item(1, Some(50)));

        cart.update_quantity(99, 3);
        cart.remove_item(99);

        assert_eq!(cart.lines(), &[CartLine::from_menu_item(&menu_item(1, Some(50)))]);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item(3, Some(10)));
        cart.add_item(&menu_item(1, Some(20)));
        cart.add_item(&menu_item(3, Some(10)));

        let ids: Vec<i64> = cart.lines().iter().map(|l| l.item_id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_missing_price_counts_as_zero() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item(1, None));
        cart.add_item(&menu_item(2, Some(-40)));
        cart.add_item(&menu_item(3, Some(60)));

        assert_eq!(cart.total(), Money::from_major_minor(60, 0));
    }

    #[test]
    fn test_huge_delta_is_clamped() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item(1, Some(320)));

        cart.update_quantity(1, i64::MAX);
        assert_eq!(cart.lines()[0].quantity, MAX_LINE_QUANTITY);
        assert_eq!(
            cart.total(),
            Money::from_major_minor(320, 0).multiply_quantity(MAX_LINE_QUANTITY)
        );

        cart.add_item(&menu_item(1, Some(320)));
        assert_eq!(cart.lines()[0].quantity, MAX_LINE_QUANTITY);

        cart.update_quantity(1, i64::MIN);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_random_operation_sequences_keep_invariants() {
        let items: Vec<MenuItem> = vec![
            menu_item(1, Some(320)),
            menu_item(2, Some(45)),
            menu_item(3, None),
            menu_item(4, Some(-10)),
            menu_item(5, Some(1200)),
        ];

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut cart = Cart::new();

            for _ in 0..200 {
                // Id 6 is never in the menu, so some calls hit absent lines.
                let id = rng.gen_range(1..=6);
                match rng.gen_range(0..4) {
                    0 | 1 => {
                        if let Some(item) = items.iter().find(|i| i.item_id == id) {
                            cart.add_item(item);
                        }
                    }
                    2 => {
                        let delta = if rng.gen_bool(0.05) {
                            rng.gen_range(-5000..=5000)
                        } else {
                            rng.gen_range(-3..=3)
                        };
                        cart.update_quantity(id, delta);
                    }
                    _ => cart.remove_item(id),
                }

                let ids: HashSet<i64> = cart.lines().iter().map(|l| l.item_id).collect();
                assert_eq!(ids.len(), cart.item_count(), "seed {}", seed);
                assert!(
                    cart.lines()
                        .iter()
                        .all(|l| (1..=MAX_LINE_QUANTITY).contains(&l.quantity)),
                    "seed {}",
                    seed
                );
                let expected: i64 = cart
                    .lines()
                    .iter()
                    .map(|l| l.unit_price.paise() * l.quantity)
                    .sum();
                assert_eq!(cart.total(), Money::from_paise(expected), "seed {}", seed);
            }
        }
    }

    #[test]
    fn test_totals_display() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item(1, Some(320)));
        cart.add_item(&menu_item(1, Some(320)));

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.item_count, 1);
        assert_eq!(totals.total_quantity, 2);
        assert_eq!(totals.total_display, "₹640.00");
    }

    #[test]
    fn test_select_restaurant_resets_cart() {
        let mut engine = CartEngine::new();
        engine.select_restaurant(restaurant(1));
        engine.add_item(&menu_item(1, Some(100)));

        engine.select_restaurant(restaurant(2));

        assert!(engine.cart().is_empty());
        assert_eq!(engine.restaurant().and_then(|r| r.restaurant_id), Some(2));
    }

    #[test]
    fn test_prepare_order_validation() {
        let mut engine = CartEngine::new();
        assert_eq!(engine.prepare_order(Some(1)), Err(ValidationError::required("restaurant")));

        engine.select_restaurant(restaurant(4));
        assert_eq!(engine.prepare_order(None), Err(ValidationError::required("user")));
        assert_eq!(engine.prepare_order(Some(1)), Err(ValidationError::EmptyCart));

        // Nothing changed.
        assert!(engine.restaurant().is_some());
    }

    #[test]
    fn test_order_scenario() {
        let mut engine = CartEngine::new();
        engine.select_restaurant(restaurant(4));

        let item = menu_item(7, Some(100));
        engine.add_item(&item);
        engine.add_item(&item);
        assert_eq!(engine.cart().lines()[0].quantity, 2);
        assert_eq!(engine.total(), Money::from_major_minor(200, 0));

        let order = engine.prepare_order(Some(1)).unwrap();
        assert_eq!(
            order,
            NewOrder {
                user_id: 1,
                restaurant_id: 4,
                total_amount: Money::from_major_minor(200, 0),
            }
        );

        engine.complete_order();
        assert!(engine.cart().is_empty());
        assert!(engine.restaurant().is_none());
    }
}

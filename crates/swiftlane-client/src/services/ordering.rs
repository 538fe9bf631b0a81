//! # Ordering Session
//!
//! One user's food-order flow: pick a user and a restaurant, fill the cart,
//! place the order.
//!
//! ## Submission
//! ```text
//! submit(&mut self)
//!   │
//!   ├── prepare_order ──► ValidationError ──► Err, nothing changes
//!   │
//!   ├── POST orders ────► ClientError ──────► Err, cart kept for retry
//!   │
//!   └── success ────────► cart cleared, restaurant cleared, user cleared
//! ```
//!
//! `submit` borrows the session mutably for the whole request, so the same
//! cart cannot be submitted twice concurrently.

use serde_json::Value;
use swiftlane_core::{CartEngine, CartTotals, MenuItem, Resource, Restaurant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::{Backend, BackendExt};
use crate::error::ClientResult;

/// Food-order state for a single dashboard session.
#[derive(Debug, Clone)]
pub struct OrderSession {
    id: Uuid,
    engine: CartEngine,
    user_id: Option<i64>,
}

impl Default for OrderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderSession {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        debug!(session = %id, "Order session started");
        Self {
            id,
            engine: CartEngine::new(),
            user_id: None,
        }
    }

    /// Log correlation id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn select_user(&mut self, user_id: i64) {
        self.user_id = Some(user_id);
    }

    pub fn clear_user(&mut self) {
        self.user_id = None;
    }

    /// Switches restaurant. The cart is emptied.
    pub fn select_restaurant(&mut self, restaurant: Restaurant) {
        debug!(
            session = %self.id,
            restaurant_id = ?restaurant.restaurant_id,
            "Restaurant selected, cart reset"
        );
        self.engine.select_restaurant(restaurant);
    }

    pub fn add_item(&mut self, item: &MenuItem) {
        self.engine.add_item(item);
    }

    pub fn update_quantity(&mut self, item_id: i64, delta: i64) {
        self.engine.update_quantity(item_id, delta);
    }

    pub fn remove_item(&mut self, item_id: i64) {
        self.engine.remove_item(item_id);
    }

    pub fn engine(&self) -> &CartEngine {
        &self.engine
    }

    pub fn totals(&self) -> CartTotals {
        self.engine.totals()
    }

    /// Places the order and resets the session on success.
    ///
    /// Returns the record the backend created.
    pub async fn submit(&mut self, backend: &dyn Backend) -> ClientResult<Value> {
        let order = self.engine.prepare_order(self.user_id).map_err(|e| {
            debug!(session = %self.id, error = %e, "Order rejected before submission");
            e
        })?;

        let created = match backend.create(Resource::Orders, &order).await {
            Ok(created) => created,
            Err(e) => {
                warn!(session = %self.id, error = %e, "Order submission failed");
                return Err(e);
            }
        };

        info!(
            session = %self.id,
            user_id = order.user_id,
            restaurant_id = order.restaurant_id,
            total = %order.total_amount,
            "Order placed"
        );

        self.engine.complete_order();
        self.user_id = None;
        Ok(created)
    }
}

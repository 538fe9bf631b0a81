//! # Backend Access
//!
//! The single seam between SwiftLane and its REST backend.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Services ──► BackendExt::list::<Ride>(Resource::Rides)                 │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │               Backend::fetch_list ──► Vec<serde_json::Value>            │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │               decode each row ──► object: keep, bad fields absent       │
//! │                                  other: warn!, skip                     │
//! │                                                                         │
//! │  Services ──► BackendExt::create(Resource::Orders, &NewOrder)           │
//! │                    │                                                    │
//! │                    ├──► ensure_creatable (rides, orders only)           │
//! │                    ▼                                                    │
//! │               Backend::create_record ──► serde_json::Value              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Implementations: [`crate::http::HttpBackend`] for the real service and
//! [`crate::memory::MemoryBackend`] for tests and offline runs.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use swiftlane_core::validation::ensure_creatable;
use swiftlane_core::{Dataset, Driver, MenuItem, Order, Resource, Restaurant, Ride, User};
use tracing::{debug, warn};

use crate::error::ClientResult;

// =============================================================================
// Backend Trait
// =============================================================================

/// Raw access to the backend collections.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Every record of a resource, undecoded.
    async fn fetch_list(&self, resource: Resource) -> ClientResult<Vec<Value>>;

    /// Creates a record and returns whatever the backend echoes back.
    ///
    /// Callers go through [`BackendExt::create`], which rejects resources
    /// that are not creatable before this is reached.
    async fn create_record(&self, resource: Resource, payload: Value) -> ClientResult<Value>;
}

// =============================================================================
// Typed Helpers
// =============================================================================

/// Typed helpers over any [`Backend`].
#[async_trait]
pub trait BackendExt: Backend {
    /// Fetches and decodes a list, skipping rows that cannot be decoded.
    async fn list<T>(&self, resource: Resource) -> ClientResult<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let rows = self.fetch_list(resource).await?;
        Ok(decode_rows(resource, rows))
    }

    /// Validates the resource, serializes the payload, and creates the record.
    async fn create<P>(&self, resource: Resource, payload: &P) -> ClientResult<Value>
    where
        P: Serialize + Sync,
    {
        ensure_creatable(resource)?;
        let body = serde_json::to_value(payload)?;
        debug!(%resource, "Creating record");
        self.create_record(resource, body).await
    }

    /// Loads every collection the dashboard uses.
    ///
    /// Fails as a whole if any single list fails, so callers never render a
    /// mix of fresh and missing data.
    async fn load_dataset(&self) -> ClientResult<Dataset> {
        let (users, drivers, restaurants, rides, orders, menu_items) = tokio::try_join!(
            self.list::<User>(Resource::Users),
            self.list::<Driver>(Resource::Drivers),
            self.list::<Restaurant>(Resource::Restaurants),
            self.list::<Ride>(Resource::Rides),
            self.list::<Order>(Resource::Orders),
            self.list::<MenuItem>(Resource::MenuItems),
        )?;

        Ok(Dataset {
            users,
            drivers,
            restaurants,
            rides,
            orders,
            menu_items,
        })
    }
}

impl<B: Backend + ?Sized> BackendExt for B {}

/// Decodes rows one by one.
///
/// Rows that are not JSON objects are logged and dropped. Object rows with
/// malformed fields are kept with those fields absent, except where the
/// record type itself requires a field (menu item ids).
pub fn decode_rows<T: DeserializeOwned>(resource: Resource, rows: Vec<Value>) -> Vec<T> {
    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| {
            if !row.is_object() {
                warn!(%resource, index, "Skipping non-object record");
                return None;
            }
            match serde_json::from_value::<T>(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(%resource, index, error = %e, "Skipping malformed record");
                    None
                }
            }
        })
        .collect();

    debug!(%resource, total, kept = decoded.len(), "Decoded records");
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_rows_skips_only_non_objects() {
        let rows = vec![
            json!({ "ride_id": 1, "fare": 100 }),
            json!({ "fare": 50 }),
            json!("not an object"),
            json!([2, 3]),
            json!({ "ride_id": "3", "fare": "oops" }),
        ];

        let rides: Vec<Ride> = decode_rows(Resource::Rides, rows);
        let ids: Vec<Option<i64>> = rides.iter().map(|r| r.ride_id).collect();
        assert_eq!(ids, vec![Some(1), None, Some(3)]);
        assert_eq!(rides[1].fare, Some(swiftlane_core::Money::from_major_minor(50, 0)));
        assert_eq!(rides[2].fare, None);
    }

    #[test]
    fn test_decode_rows_drops_menu_items_without_id() {
        let rows = vec![
            json!({ "item_id": 1, "name": "Dosa" }),
            json!({ "name": "Idli" }),
        ];

        let items: Vec<MenuItem> = decode_rows(Resource::MenuItems, rows);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_decode_rows_empty() {
        let users: Vec<User> = decode_rows(Resource::Users, Vec::new());
        assert!(users.is_empty());
    }
}

//! # In-Memory Backend
//!
//! A [`Backend`] that keeps every collection in process memory.
//!
//! Used by the service tests and by the console app's `--offline` mode. It
//! mimics the REST service closely enough for the dashboard: creations get
//! the next id, a default status and a timestamp, and lists come back as raw
//! JSON rows so the same lenient decoding path runs.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  MemoryBackend                                              │
//! │  ├── tables: Mutex<HashMap<Resource, Vec<Value>>>           │
//! │  └── failing: AtomicBool ──► every call returns Transport   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use swiftlane_core::Resource;
use tokio::sync::Mutex;
use tracing::debug;

use crate::backend::Backend;
use crate::error::{ClientError, ClientResult};

/// Seed data: Bangalore users, drivers, restaurants, menus, rides, orders.
const SEED: &str = include_str!("../fixtures/seed.json");

#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<Resource, Vec<Value>>>,
    failing: AtomicBool,
}

impl MemoryBackend {
    /// Empty backend: every list is `[]`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend preloaded with the seed fixture.
    pub fn seeded() -> ClientResult<Self> {
        let mut fixture: HashMap<String, Vec<Value>> = serde_json::from_str(SEED)?;

        let tables = Resource::ALL
            .iter()
            .map(|resource| (*resource, fixture.remove(resource.name()).unwrap_or_default()))
            .collect();

        Ok(Self {
            tables: Mutex::new(tables),
            failing: AtomicBool::new(false),
        })
    }

    /// Replaces a collection's rows.
    pub fn with_rows(mut self, resource: Resource, rows: Vec<Value>) -> Self {
        self.tables.get_mut().insert(resource, rows);
        self
    }

    /// When set, every call fails with a transport error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of rows currently stored for a resource.
    pub async fn count(&self, resource: Resource) -> usize {
        self.tables
            .lock()
            .await
            .get(&resource)
            .map_or(0, Vec::len)
    }

    fn check_available(&self) -> ClientResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("backend unavailable".to_string()));
        }
        Ok(())
    }
}

/// Primary key column and initial status of creatable resources.
fn creation_defaults(resource: Resource) -> Option<(&'static str, &'static str)> {
    match resource {
        Resource::Rides => Some(("ride_id", "requested")),
        Resource::Orders => Some(("order_id", "placed")),
        _ => None,
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn fetch_list(&self, resource: Resource) -> ClientResult<Vec<Value>> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        Ok(tables.get(&resource).cloned().unwrap_or_default())
    }

    async fn create_record(&self, resource: Resource, payload: Value) -> ClientResult<Value> {
        self.check_available()?;

        let Some((id_key, status)) = creation_defaults(resource) else {
            return Err(ClientError::Status {
                status: 404,
                body: format!("no create endpoint for {}", resource),
            });
        };
        let Value::Object(fields) = payload else {
            return Err(ClientError::Status {
                status: 400,
                body: "payload must be a JSON object".to_string(),
            });
        };

        let mut tables = self.tables.lock().await;
        let rows = tables.entry(resource).or_default();

        let next_id = rows
            .iter()
            .filter_map(|row| row.get(id_key).and_then(Value::as_i64))
            .max()
            .unwrap_or(0)
            + 1;

        let mut record = Map::new();
        record.insert(id_key.to_string(), Value::from(next_id));
        record.extend(fields);
        record
            .entry("status")
            .or_insert_with(|| Value::from(status));
        record.insert("timestamp".to_string(), Value::from(Utc::now().to_rfc2822()));

        let record = Value::Object(record);
        rows.push(record.clone());
        debug!(%resource, id = next_id, "Stored record in memory");

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendExt;
    use serde_json::json;
    use swiftlane_core::{MenuItem, Ride, RideStatus};

    #[tokio::test]
    async fn test_seeded_lists() {
        let backend = MemoryBackend::seeded().unwrap();

        assert_eq!(backend.count(Resource::Users).await, 5);
        assert_eq!(backend.count(Resource::Rides).await, 4);

        let menu: Vec<MenuItem> = backend.list(Resource::MenuItems).await.unwrap();
        assert_eq!(menu.len(), 19);
        assert_eq!(menu[0].name, "Special Chicken Biryani");
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_status() {
        let backend = MemoryBackend::seeded().unwrap();

        let created = backend
            .create_record(
                Resource::Rides,
                json!({ "user_id": 1, "driver_id": 2, "source": "A", "destination": "B", "fare": 110.0 }),
            )
            .await
            .unwrap();
        assert_eq!(created["ride_id"], 5);

        let rides: Vec<Ride> = backend.list(Resource::Rides).await.unwrap();
        let last = rides.last().unwrap();
        assert_eq!(last.status, Some(RideStatus::Requested));
        assert!(last.timestamp.is_some());
    }

    #[tokio::test]
    async fn test_failing_backend() {
        let backend = MemoryBackend::new();
        backend.set_failing(true);

        let err = backend.fetch_list(Resource::Users).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));

        backend.set_failing(false);
        assert!(backend.fetch_list(Resource::Users).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_with_rows() {
        let backend = MemoryBackend::new().with_rows(Resource::Orders, vec![json!({ "order_id": 7 })]);
        assert_eq!(backend.count(Resource::Orders).await, 1);
    }
}

//! # HTTP Backend
//!
//! [`Backend`] over the REST service.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch_list(r)        GET  {base}/api/{r}/list    ──► JSON array        │
//! │  create_record(r, p)  POST {base}/api/{r}/create  ──► JSON object       │
//! │                                                                         │
//! │  r ∈ users | drivers | restaurants | rides | orders | menu-items        │
//! │                                                                         │
//! │  Every request carries the configured timeout. A request that does not  │
//! │  finish in time is a Transport error, never an endless wait.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use swiftlane_core::Resource;
use tracing::{debug, warn};
use url::Url;

use crate::backend::Backend;
use crate::config::{ClientConfig, ConfigError};
use crate::error::{ClientError, ClientResult};

/// Thin HTTP client for the SwiftLane REST backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Creates a client for the backend at `base_url` (e.g. `http://localhost:5001`).
    pub fn new(base_url: Url, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(config.api_url()?, config.timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, resource: Resource, action: &str) -> ClientResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/api/{}/{}", base, resource, action))?)
    }

    /// Turns non-2xx responses into `Status` errors, keeping the body text.
    async fn check_status(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "Backend rejected request");
        Err(ClientError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_list(&self, resource: Resource) -> ClientResult<Vec<Value>> {
        let url = self.endpoint(resource, "list")?;
        debug!(%url, "Fetching list");

        let response = self.client.get(url).send().await?;
        let body: Value = Self::check_status(response).await?.json().await?;

        match body {
            Value::Array(rows) => Ok(rows),
            other => Err(ClientError::Decode(format!(
                "expected a JSON list for {}, got {}",
                resource,
                type_label(&other)
            ))),
        }
    }

    async fn create_record(&self, resource: Resource, payload: Value) -> ClientResult<Value> {
        let url = self.endpoint(resource, "create")?;
        debug!(%url, "Posting record");

        let response = self.client.post(url).json(&payload).send().await?;
        let body: Value = Self::check_status(response).await?.json().await?;
        Ok(body)
    }
}

fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendExt;
    use mockito::Server;
    use serde_json::json;
    use swiftlane_core::{Money, NewOrder, Ride};

    fn backend_for(server: &Server) -> HttpBackend {
        let url = Url::parse(&server.url()).unwrap();
        HttpBackend::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_list_decodes_rows() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/rides/list")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"ride_id": 1, "fare": "100"}, {"ride_id": 2, "fare": null}]"#)
            .create_async()
            .await;

        let backend = backend_for(&server);
        let rides: Vec<Ride> = backend.list(Resource::Rides).await.unwrap();

        mock.assert_async().await;
        assert_eq!(rides.len(), 2);
        assert_eq!(rides[0].fare, Some(Money::from_major_minor(100, 0)));
    }

    #[tokio::test]
    async fn test_menu_items_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/menu-items/list")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let rows = backend_for(&server).fetch_list(Resource::MenuItems).await.unwrap();

        mock.assert_async().await;
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_non_list_body_is_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/users/list")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "oops"}"#)
            .create_async()
            .await;

        let err = backend_for(&server).fetch_list(Resource::Users).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_status_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/drivers/list")
            .with_status(500)
            .with_body("database locked")
            .create_async()
            .await;

        let err = backend_for(&server).fetch_list(Resource::Drivers).await.unwrap_err();
        match err {
            ClientError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "database locked");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_posts_decimal_payload() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/orders/create")
            .match_body(mockito::Matcher::Json(json!({
                "user_id": 1,
                "restaurant_id": 4,
                "total_amount": 200.0
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"order_id": 10, "status": "placed"}"#)
            .create_async()
            .await;

        let order = NewOrder {
            user_id: 1,
            restaurant_id: 4,
            total_amount: Money::from_major_minor(200, 0),
        };
        let created = backend_for(&server)
            .create(Resource::Orders, &order)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(created["order_id"], 10);
    }

    #[tokio::test]
    async fn test_create_rejects_read_only_resource() {
        let server = Server::new_async().await;
        let err = backend_for(&server)
            .create(Resource::Drivers, &json!({ "name": "x" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let url = Url::parse("http://127.0.0.1:1").unwrap();
        let backend = HttpBackend::new(url, Duration::from_secs(2)).unwrap();

        let err = backend.fetch_list(Resource::Users).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}

//! # SwiftLane Client
//!
//! Backend access, configuration and session state for the SwiftLane
//! dashboard.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  config    ClientConfig: TOML file + SWIFTLANE_* env + defaults        │
//! │  error     ClientError, ErrorCode, ErrorReport                         │
//! │  backend   Backend trait, BackendExt typed helpers                     │
//! │  http      HttpBackend (reqwest)                                       │
//! │  memory    MemoryBackend (seed fixture, tests, offline mode)           │
//! │  services  OrderSession, RideBooking, Reports                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use swiftlane_client::{BackendExt, ClientConfig, HttpBackend, Reports};
//!
//! # async fn run() -> swiftlane_client::ClientResult<()> {
//! let config = ClientConfig::load(None)?;
//! let backend = HttpBackend::from_config(&config)?;
//! let view = Reports::new(config.reports.clone()).load_dashboard(&backend).await?;
//! println!("revenue: {}", view.snapshot.total_revenue);
//! # let _ = backend.load_dataset().await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod services;

pub use backend::{Backend, BackendExt};
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, ClientResult, ErrorCode, ErrorReport};
pub use http::HttpBackend;
pub use memory::MemoryBackend;
pub use services::{DashboardView, OrderSession, Reports, RideBooking, RideRequest};

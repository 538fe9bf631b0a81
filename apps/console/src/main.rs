//! # SwiftLane Console
//!
//! Prints the dashboard snapshot and a route plan as JSON.
//!
//! ## Usage
//! ```text
//! swiftlane [--offline] [--config PATH] [SOURCE DESTINATION]
//!
//!   --offline        use the built-in seed data instead of the REST backend
//!   --config PATH    read this TOML file instead of the platform default
//!                    (also $SWIFTLANE_CONFIG)
//!   SOURCE DEST      plan a route and quote a fare between two places
//! ```
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing      RUST_LOG or "info,swiftlane=debug"               │
//! │  2. ClientConfig::load                                                 │
//! │  3. backend           HttpBackend, or MemoryBackend with --offline     │
//! │  4. Reports::load_dashboard ──► stdout                                 │
//! │  5. RideBooking::route_plan + prepare (when a route is given)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use swiftlane_client::{
    Backend, BackendExt, ClientConfig, ClientError, ErrorReport, HttpBackend, MemoryBackend,
    Reports, RideBooking,
};
use swiftlane_core::fare::{FareEstimator, RandomDistance};
use swiftlane_core::{Driver, FareQuote, Resource, RoutePlan};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// SwiftLane dashboard snapshot and route preview.
#[derive(Debug, Parser)]
#[command(
    name = "swiftlane",
    about = "Print the SwiftLane dashboard snapshot and an optional route preview as JSON"
)]
struct Args {
    /// Use the built-in seed data instead of the REST backend
    #[arg(long)]
    offline: bool,

    /// Client config file (TOML)
    #[arg(long, value_name = "PATH", env = "SWIFTLANE_CONFIG")]
    config: Option<PathBuf>,

    /// Pickup location: a place name or "lat,lng"
    #[arg(value_name = "SOURCE", requires = "destination")]
    source: Option<String>,

    /// Drop location: a place name or "lat,lng"
    #[arg(value_name = "DESTINATION")]
    destination: Option<String>,
}

impl Args {
    /// Pickup and drop, when both were given.
    fn route(&self) -> Option<(&str, &str)> {
        Some((self.source.as_deref()?, self.destination.as_deref()?))
    }
}

/// Route preview printed after the dashboard.
#[derive(Debug, Serialize)]
struct RoutePreview {
    plan: RoutePlan,
    quote: FareQuote,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = ClientConfig::load(args.config.clone()).context("failed to load config")?;
    info!(
        api = %config.api.base_url,
        offline = args.offline,
        "Configuration loaded"
    );

    let backend: Box<dyn Backend> = if args.offline {
        Box::new(MemoryBackend::seeded()?)
    } else {
        Box::new(HttpBackend::from_config(&config)?)
    };

    if let Err(e) = run(&args, &config, backend.as_ref()).await {
        let report = ErrorReport::new(&e, "loading dashboard");
        error!(code = ?report.code, error = %e, "Dashboard failed");
        println!("{}", serde_json::to_string_pretty(&report)?);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(args: &Args, config: &ClientConfig, backend: &dyn Backend) -> Result<(), ClientError> {
    let reports = Reports::new(config.reports.clone());
    let view = reports.load_dashboard(backend).await?;
    println!("{}", serde_json::to_string_pretty(&view)?);

    if let Some((source, destination)) = args.route() {
        let drivers: Vec<Driver> = backend.list(Resource::Drivers).await?;
        let preview = preview_route(config, source, destination, &drivers)?;
        println!("{}", serde_json::to_string_pretty(&preview)?);
    }

    Ok(())
}

fn preview_route(
    config: &ClientConfig,
    source: &str,
    destination: &str,
    drivers: &[Driver],
) -> Result<RoutePreview, ClientError> {
    let estimator = FareEstimator::with_schedule(config.fare.clone(), RandomDistance)?;
    let mut booking = RideBooking::new(estimator);
    {
        let request = booking.request_mut();
        request.source = source.to_string();
        request.destination = destination.to_string();
    }

    let plan = booking.route_plan(drivers);
    let quote = booking.quote()?;
    Ok(RoutePreview { plan, quote })
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so stdout stays valid JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,swiftlane=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

//! # swiftlane-core: Pure Business Logic for SwiftLane
//!
//! This crate is the **heart** of the SwiftLane dashboard. It shapes rides and
//! food orders before they are sent to the backend, and turns the lists the
//! backend returns into dashboard statistics. Nothing in here performs I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SwiftLane Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard pages                              │   │
//! │  │  Book Ride ──► Order Food ──► Dashboard ──► Analytics ──► Profile│  │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            swiftlane-client (sessions, Backend trait)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ swiftlane-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌────────┐ │   │
//! │  │  │ location │ │   fare   │ │   cart   │ │analytics │ │ types  │ │   │
//! │  │  │ resolve  │ │ estimate │ │  engine  │ │ summarize│ │records │ │   │
//! │  │  └──────────┘ └──────────┘ └──────────┘ └──────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO GLOBAL STATE                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Backend records (User, Driver, Ride, ...) and creation payloads
//! - [`money`] - Money type with integer arithmetic in paise
//! - [`location`] - Free text to coordinates, route plans for the map
//! - [`fare`] - Ride fare estimation with an injectable distance source
//! - [`cart`] - Single-restaurant shopping cart state machine
//! - [`analytics`] - Snapshot counts, revenue and leaderboards
//! - [`validation`] - Submission rules
//! - [`decode`] - Lenient field decoding for backend records
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use swiftlane_core::fare::{FareEstimator, FixedDistance};
//! use swiftlane_core::money::Money;
//!
//! let estimator = FareEstimator::new(FixedDistance::new(5.0));
//! let fare = estimator.estimate("Koramangala", "Indiranagar");
//!
//! // 50 + 5 km × 12 = 110
//! assert_eq!(fare, Money::from_major_minor(110, 0));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod cart;
pub mod decode;
pub mod error;
pub mod fare;
pub mod location;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use analytics::{AggregateSnapshot, Dataset, DriverRanking, RestaurantRanking, UserActivity};
pub use cart::{Cart, CartEngine, CartLine, CartTotals};
pub use error::{CoreError, CoreResult, DataShapeError, ValidationError};
pub use fare::{DistanceSource, FareEstimator, FareOrigin, FareQuote, FareSchedule};
pub use location::{Coordinate, RoutePlan};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of entries in the analytics leaderboards.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 5;

/// Number of rides/orders listed on the dashboard.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Number of rides/orders listed on a user profile.
pub const DEFAULT_PROFILE_HISTORY: usize = 10;

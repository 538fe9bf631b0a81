//! # Location Module
//!
//! Turns free-text pickup/drop locations into map coordinates.
//!
//! ## Resolution Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "  12.97, 77.59 "   ──► contains ',' and both halves parse             │
//! │                          └─► (12.97, 77.59) as given, no range check    │
//! │                                                                         │
//! │  "Koramangala"       ──► lower-case + trim, exact table lookup          │
//! │                          └─► (12.9352, 77.6245)                         │
//! │                                                                         │
//! │  "Somewhere else"    ──► no match                                       │
//! │                          └─► DEFAULT_CENTER (12.9716, 77.5946)          │
//! │                                                                         │
//! │  "   "               ──► no match, DEFAULT_CENTER                       │
//! │                                                                         │
//! │  ""                  ──► None                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no geocoding. Unknown places land silently on the city centre.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Driver;

// =============================================================================
// Coordinate
// =============================================================================

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }

    /// Point halfway between two coordinates (plain average, no great circle).
    pub fn midpoint(&self, other: &Coordinate) -> Coordinate {
        Coordinate {
            lat: (self.lat + other.lat) / 2.0,
            lng: (self.lng + other.lng) / 2.0,
        }
    }
}

/// Bangalore city centre, used when a location is not recognised.
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(12.9716, 77.5946);

/// Known neighbourhoods. Keys are lower-case.
const KNOWN_PLACES: [(&str, Coordinate); 7] = [
    ("koramangala", Coordinate::new(12.9352, 77.6245)),
    ("indiranagar", Coordinate::new(12.9716, 77.6412)),
    ("whitefield", Coordinate::new(12.9698, 77.7500)),
    ("jayanagar", Coordinate::new(12.9250, 77.5838)),
    ("mg road", Coordinate::new(12.9750, 77.6060)),
    ("banashankari", Coordinate::new(12.9250, 77.5480)),
    ("airport", Coordinate::new(13.1986, 77.7066)),
];

// =============================================================================
// Resolution
// =============================================================================

/// Resolves free text to a coordinate.
///
/// ## Example
/// ```rust
/// use swiftlane_core::location::{resolve, Coordinate, DEFAULT_CENTER};
///
/// assert_eq!(resolve("12.5, 77.1"), Some(Coordinate::new(12.5, 77.1)));
/// assert_eq!(resolve(" Airport "), Some(Coordinate::new(13.1986, 77.7066)));
/// assert_eq!(resolve("Mysore"), Some(DEFAULT_CENTER));
/// assert_eq!(resolve(""), None);
/// ```
pub fn resolve(text: &str) -> Option<Coordinate> {
    if text.is_empty() {
        return None;
    }
    let trimmed = text.trim();

    if trimmed.contains(',') {
        if let Some(coordinate) = parse_pair(trimmed) {
            return Some(coordinate);
        }
    }

    let key = trimmed.to_lowercase();
    let known = KNOWN_PLACES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, coordinate)| *coordinate);

    Some(known.unwrap_or(DEFAULT_CENTER))
}

/// `"lat, lng"` with exactly two finite numbers.
fn parse_pair(text: &str) -> Option<Coordinate> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 2 {
        return None;
    }

    let lat = parts[0].trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    let lng = parts[1].trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(Coordinate::new(lat, lng))
}

// =============================================================================
// Route Plan
// =============================================================================

/// A driver pin on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DriverMarker {
    pub driver_id: Option<i64>,
    pub name: String,
    pub position: Coordinate,
}

/// Everything the booking map needs to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoutePlan {
    /// Where the map is centred.
    pub center: Coordinate,
    pub source: Option<Coordinate>,
    pub destination: Option<Coordinate>,
    /// Straight segment from source to destination, only when both resolve.
    pub route: Option<(Coordinate, Coordinate)>,
    pub driver_markers: Vec<DriverMarker>,
}

/// Builds the map state for a pickup/drop pair and the known drivers.
///
/// ## Centre Selection
/// 1. Both ends resolve: their midpoint
/// 2. Only the source resolves: the source
/// 3. Otherwise: [`DEFAULT_CENTER`]
pub fn plan_route(source: &str, destination: &str, drivers: &[Driver]) -> RoutePlan {
    let from = resolve(source);
    let to = resolve(destination);

    let center = match (from, to) {
        (Some(a), Some(b)) => a.midpoint(&b),
        (Some(a), None) => a,
        _ => DEFAULT_CENTER,
    };

    let driver_markers = drivers
        .iter()
        .filter_map(|driver| {
            let position = resolve(driver.location.as_deref()?)?;
            Some(DriverMarker {
                driver_id: driver.driver_id,
                name: driver.name.clone(),
                position,
            })
        })
        .collect();

    RoutePlan {
        center,
        source: from,
        destination: to,
        route: from.zip(to),
        driver_markers,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Domain Types
//!
//! Backend records and the payloads SwiftLane sends back.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │     Driver      │   │   Restaurant    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  user_id        │   │  driver_id      │   │  restaurant_id  │       │
//! │  │  name           │   │  name, rating   │   │  name, cuisine  │       │
//! │  │  wallet_balance │   │  status         │   │  rating         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │      Ride       │   │      Order      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  item_id        │   │  ride_id        │   │  order_id       │       │
//! │  │  restaurant_id  │   │  driver_id (FK) │   │  restaurant_id  │       │
//! │  │  price          │   │  fare           │   │  total_amount   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Payloads:  NewRide ──► POST rides     NewOrder ──► POST orders         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Nullable Schemas
//! Every field is optional and decoded leniently (see [`crate::decode`]),
//! ids included, so a record with a broken id still counts in the dashboard
//! totals. Consumers never see a malformed amount: it is `None`, and `None`
//! sums as zero.
//!
//! [`MenuItem`] is the exception: its id keys cart lines, so an item without
//! one is rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::decode;
use crate::money::{self, Money};

// =============================================================================
// Resources
// =============================================================================

/// A collection exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Users,
    Drivers,
    Restaurants,
    Rides,
    Orders,
    MenuItems,
}

impl Resource {
    /// Every listable resource.
    pub const ALL: [Resource; 6] = [
        Resource::Users,
        Resource::Drivers,
        Resource::Restaurants,
        Resource::Rides,
        Resource::Orders,
        Resource::MenuItems,
    ];

    /// Path segment used by the backend (`/api/{name}/list`).
    pub const fn name(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Drivers => "drivers",
            Resource::Restaurants => "restaurants",
            Resource::Rides => "rides",
            Resource::Orders => "orders",
            Resource::MenuItems => "menu-items",
        }
    }

    /// Only rides and orders are created from the dashboard.
    pub const fn is_creatable(&self) -> bool {
        matches!(self, Resource::Rides | Resource::Orders)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Statuses
// =============================================================================

/// Defines a backend status enum with an open `Other` variant.
///
/// Statuses are free text on the backend; unknown values are kept verbatim.
macro_rules! open_status {
    (
        $(#[$meta:meta])*
        $name:ident { $( $variant:ident => $text:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $variant, )+
            /// Any status the dashboard does not know about.
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $text, )+
                    $name::Other(s) => s,
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                let key = s.trim().to_ascii_lowercase();
                match key.as_str() {
                    $( $text => $name::$variant, )+
                    _ => $name::Other(s),
                }
            }
        }

        impl From<$name> for String {
            fn from(status: $name) -> String {
                status.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_status! {
    /// Driver availability.
    DriverStatus {
        Available => "available",
        Busy => "busy",
    }
}

open_status! {
    /// Lifecycle of a ride. New rides start as `requested`.
    RideStatus {
        Requested => "requested",
        Ongoing => "ongoing",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

open_status! {
    /// Lifecycle of a food order. New orders start as `placed`.
    OrderStatus {
        Placed => "placed",
        Delivering => "delivering",
        Delivered => "delivered",
        Cancelled => "cancelled",
    }
}

// =============================================================================
// User
// =============================================================================

/// A customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "decode::opt_id")]
    pub user_id: Option<i64>,

    #[serde(default, deserialize_with = "decode::text")]
    pub name: String,

    #[serde(default, deserialize_with = "decode::opt_text")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "decode::opt_text")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "decode::opt_text")]
    pub address: Option<String>,

    #[serde(default, deserialize_with = "money::deserialize_lenient")]
    pub wallet_balance: Option<Money>,
}

// =============================================================================
// Driver
// =============================================================================

/// A ride-hailing driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    #[serde(default, deserialize_with = "decode::opt_id")]
    pub driver_id: Option<i64>,

    #[serde(default, deserialize_with = "decode::text")]
    pub name: String,

    #[serde(default, deserialize_with = "decode::opt_text")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "decode::opt_text")]
    pub license_no: Option<String>,

    #[serde(default, deserialize_with = "decode::opt_text")]
    pub vehicle_no: Option<String>,

    #[serde(default, deserialize_with = "decode::opt_number")]
    pub rating: Option<f64>,

    #[serde(default, deserialize_with = "decode::opt_status")]
    pub status: Option<DriverStatus>,

    /// Free-text location, resolved for map markers.
    #[serde(default, deserialize_with = "decode::opt_text")]
    pub location: Option<String>,
}

impl Driver {
    pub fn is_available(&self) -> bool {
        self.status == Some(DriverStatus::Available)
    }
}

// =============================================================================
// Restaurant
// =============================================================================

/// A restaurant taking food orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default, deserialize_with = "decode::opt_id")]
    pub restaurant_id: Option<i64>,

    #[serde(default, deserialize_with = "decode::text")]
    pub name: String,

    #[serde(default, deserialize_with = "decode::opt_text")]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "decode::opt_text")]
    pub cuisine: Option<String>,

    #[serde(default, deserialize_with = "decode::opt_number")]
    pub rating: Option<f64>,
}

// =============================================================================
// Menu Item
// =============================================================================

/// A dish on a restaurant's menu.
///
/// Unlike the other records the id is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(deserialize_with = "decode::id")]
    pub item_id: i64,

    #[serde(default, deserialize_with = "decode::opt_id")]
    pub restaurant_id: Option<i64>,

    #[serde(default, deserialize_with = "decode::text")]
    pub name: String,

    #[serde(default, deserialize_with = "money::deserialize_lenient")]
    pub price: Option<Money>,

    #[serde(
        default = "decode::available",
        deserialize_with = "decode::availability"
    )]
    pub availability: bool,
}

// =============================================================================
// Ride
// =============================================================================

/// A booked ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ride {
    #[serde(default, deserialize_with = "decode::opt_id")]
    pub ride_id: Option<i64>,

    #[serde(default, deserialize_with = "decode::opt_id")]
    pub user_id: Option<i64>,

    #[serde(default, deserialize_with = "decode::opt_id")]
    pub driver_id: Option<i64>,

    #[serde(default, deserialize_with = "decode::opt_text")]
    pub source: Option<String>,

    #[serde(default, deserialize_with = "decode::opt_text")]
    pub destination: Option<String>,

    #[serde(default, deserialize_with = "money::deserialize_lenient")]
    pub fare: Option<Money>,

    #[serde(default, deserialize_with = "decode::opt_status")]
    pub status: Option<RideStatus>,

    #[serde(default, deserialize_with = "decode::opt_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Ride {
    /// Fare for summation: absent or malformed counts as zero.
    #[inline]
    pub fn fare_or_zero(&self) -> Money {
        self.fare.unwrap_or_default()
    }
}

// =============================================================================
// Order
// =============================================================================

/// A placed food order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, deserialize_with = "decode::opt_id")]
    pub order_id: Option<i64>,

    #[serde(default, deserialize_with = "decode::opt_id")]
    pub user_id: Option<i64>,

    #[serde(default, deserialize_with = "decode::opt_id")]
    pub restaurant_id: Option<i64>,

    /// Delivery partner, assigned by the backend.
    #[serde(default, deserialize_with = "decode::opt_id")]
    pub partner_id: Option<i64>,

    #[serde(default, deserialize_with = "money::deserialize_lenient")]
    pub total_amount: Option<Money>,

    #[serde(default, deserialize_with = "decode::opt_status")]
    pub status: Option<OrderStatus>,

    #[serde(default, deserialize_with = "decode::opt_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Order {
    /// Total for summation: absent or malformed counts as zero.
    #[inline]
    pub fn total_or_zero(&self) -> Money {
        self.total_amount.unwrap_or_default()
    }
}

// =============================================================================
// Creation Payloads
// =============================================================================

/// Body of `POST rides`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewRide {
    pub user_id: i64,
    pub driver_id: i64,
    pub source: String,
    pub destination: String,
    /// Sent as decimal rupees.
    #[serde(with = "money::serde_major")]
    #[ts(as = "f64")]
    pub fare: Money,
}

/// Body of `POST orders`.
///
/// Carries the total only; cart lines are not transmitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewOrder {
    pub user_id: i64,
    pub restaurant_id: i64,
    /// Sent as decimal rupees.
    #[serde(with = "money::serde_major")]
    #[ts(as = "f64")]
    pub total_amount: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_names() {
        assert_eq!(Resource::MenuItems.name(), "menu-items");
        assert_eq!(Resource::Rides.to_string(), "rides");
        assert!(Resource::Orders.is_creatable());
        assert!(!Resource::Users.is_creatable());
    }

    #[test]
    fn test_status_known_and_other() {
        assert_eq!(RideStatus::from("Requested".to_string()), RideStatus::Requested);
        assert_eq!(
            OrderStatus::from("lost".to_string()),
            OrderStatus::Other("lost".to_string())
        );
        assert_eq!(serde_json::to_value(DriverStatus::Busy).unwrap(), json!("busy"));
    }

    #[test]
    fn test_ride_decodes_loose_shapes() {
        let ride: Ride = serde_json::from_value(json!({
            "ride_id": "4",
            "user_id": 1,
            "driver_id": "2",
            "source": "Koramangala",
            "destination": "Airport",
            "fare": "100",
            "status": "requested",
            "timestamp": "Tue, 02 Jan 2024 10:30:00 GMT"
        }))
        .unwrap();

        assert_eq!(ride.ride_id, Some(4));
        assert_eq!(ride.driver_id, Some(2));
        assert_eq!(ride.fare, Some(Money::from_major_minor(100, 0)));
        assert_eq!(ride.status, Some(RideStatus::Requested));
        assert!(ride.timestamp.is_some());
    }

    #[test]
    fn test_malformed_fields_become_absent() {
        let order: Order = serde_json::from_value(json!({
            "order_id": 9,
            "restaurant_id": null,
            "total_amount": "abc",
            "timestamp": 12
        }))
        .unwrap();

        assert_eq!(order.restaurant_id, None);
        assert_eq!(order.total_amount, None);
        assert_eq!(order.total_or_zero(), Money::zero());
        assert_eq!(order.timestamp, None);
    }

    #[test]
    fn test_record_without_id_is_kept() {
        let user: User = serde_json::from_value(json!({ "name": "Asha" })).unwrap();
        assert_eq!(user.user_id, None);
        assert_eq!(user.name, "Asha");

        let ride: Ride = serde_json::from_value(json!({ "ride_id": "x", "fare": 90 })).unwrap();
        assert_eq!(ride.ride_id, None);
        assert_eq!(ride.fare, Some(Money::from_major_minor(90, 0)));
    }

    #[test]
    fn test_menu_item_without_id_is_rejected() {
        let result: Result<MenuItem, _> =
            serde_json::from_value(json!({ "name": "Dosa", "price": 60 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_menu_item_availability_defaults_true() {
        let item: MenuItem = serde_json::from_value(json!({
            "item_id": 1, "restaurant_id": 3, "name": "Masala Dosa", "price": 60
        }))
        .unwrap();
        assert!(item.availability);

        let off: MenuItem = serde_json::from_value(json!({
            "item_id": 2, "name": "Idli", "availability": false
        }))
        .unwrap();
        assert!(!off.availability);
        assert_eq!(off.price, None);
    }

    #[test]
    fn test_payload_sends_decimal_rupees() {
        let payload = NewOrder {
            user_id: 1,
            restaurant_id: 2,
            total_amount: Money::from_paise(20000),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "user_id": 1, "restaurant_id": 2, "total_amount": 200.0 })
        );
    }
}

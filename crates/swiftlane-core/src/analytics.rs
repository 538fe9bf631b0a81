//! # Analytics Module
//!
//! Derives dashboard statistics from raw backend lists. Nothing here is
//! cached: every call recomputes from scratch in time linear in its input
//! (plus the sort of the distinct ids for leaderboards).
//!
//! ## Snapshot Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  users ─────────┐                                                       │
//! │  drivers ───────┤                                                       │
//! │  restaurants ───┼──► counts ──────────────┐                             │
//! │  rides ─────────┤                         │                             │
//! │  orders ────────┘                         ▼                             │
//! │                                    AggregateSnapshot                    │
//! │  rides.fare + orders.total ──► revenue ───┤                             │
//! │                                           │                             │
//! │  rides  grouped by driver_id ─────────────┤ top N drivers               │
//! │  orders grouped by restaurant_id ─────────┘ top N restaurants           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Leaderboard Ordering
//! Count descending, ties broken by ascending id. Ids with no matching record
//! still rank, under a placeholder name and a zero rating.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Driver, MenuItem, Order, Restaurant, Ride, User};

// =============================================================================
// Snapshot Types
// =============================================================================

/// A driver's position on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DriverRanking {
    pub driver_id: i64,
    pub name: String,
    pub rides: usize,
    pub rating: f64,
}

/// A restaurant's position on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RestaurantRanking {
    pub restaurant_id: i64,
    pub name: String,
    pub orders: usize,
    pub rating: f64,
}

/// Dashboard headline numbers. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AggregateSnapshot {
    pub user_count: usize,
    pub driver_count: usize,
    pub restaurant_count: usize,
    pub ride_count: usize,
    pub order_count: usize,
    pub total_revenue: Money,
    pub top_drivers: Vec<DriverRanking>,
    pub top_restaurants: Vec<RestaurantRanking>,
}

/// Every list the dashboard loads, decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub users: Vec<User>,
    pub drivers: Vec<Driver>,
    pub restaurants: Vec<Restaurant>,
    pub rides: Vec<Ride>,
    pub orders: Vec<Order>,
    pub menu_items: Vec<MenuItem>,
}

impl Dataset {
    pub fn summarize(&self, leaderboard_size: usize) -> AggregateSnapshot {
        summarize(
            &self.users,
            &self.drivers,
            &self.restaurants,
            &self.rides,
            &self.orders,
            leaderboard_size,
        )
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Builds the dashboard snapshot.
///
/// ## Example
/// ```rust
/// use swiftlane_core::analytics::summarize;
///
/// let snapshot = summarize(&[], &[], &[], &[], &[], 5);
/// assert_eq!(snapshot.ride_count, 0);
/// assert!(snapshot.total_revenue.is_zero());
/// assert!(snapshot.top_drivers.is_empty());
/// ```
pub fn summarize(
    users: &[User],
    drivers: &[Driver],
    restaurants: &[Restaurant],
    rides: &[Ride],
    orders: &[Order],
    leaderboard_size: usize,
) -> AggregateSnapshot {
    AggregateSnapshot {
        user_count: users.len(),
        driver_count: drivers.len(),
        restaurant_count: restaurants.len(),
        ride_count: rides.len(),
        order_count: orders.len(),
        total_revenue: total_revenue(rides, orders),
        top_drivers: top_drivers(rides, drivers, leaderboard_size),
        top_restaurants: top_restaurants(orders, restaurants, leaderboard_size),
    }
}

/// Ride fares plus order totals. Absent amounts count as zero.
pub fn total_revenue(rides: &[Ride], orders: &[Order]) -> Money {
    let fares: Money = rides.iter().map(Ride::fare_or_zero).sum();
    let totals: Money = orders.iter().map(Order::total_or_zero).sum();
    fares + totals
}

/// Counts occurrences per id and returns the `n` most frequent.
///
/// Counting into a `BTreeMap` yields ids in ascending order; the stable sort
/// by count then keeps that order among equal counts.
fn rank_ids<I>(ids: I, n: usize) -> Vec<(i64, usize)>
where
    I: IntoIterator<Item = i64>,
{
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for id in ids {
        *counts.entry(id).or_insert(0) += 1;
    }

    let mut ranked: Vec<(i64, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Drivers with the most rides.
///
/// Rides without a driver are not counted.
pub fn top_drivers(rides: &[Ride], drivers: &[Driver], n: usize) -> Vec<DriverRanking> {
    let by_id: HashMap<i64, &Driver> = drivers
        .iter()
        .filter_map(|d| Some((d.driver_id?, d)))
        .collect();

    rank_ids(rides.iter().filter_map(|r| r.driver_id), n)
        .into_iter()
        .map(|(driver_id, rides)| match by_id.get(&driver_id) {
            Some(driver) => DriverRanking {
                driver_id,
                name: driver.name.clone(),
                rides,
                rating: driver.rating.unwrap_or(0.0),
            },
            None => DriverRanking {
                driver_id,
                name: format!("Driver {}", driver_id),
                rides,
                rating: 0.0,
            },
        })
        .collect()
}

/// Restaurants with the most orders.
///
/// Orders without a restaurant are not counted.
pub fn top_restaurants(
    orders: &[Order],
    restaurants: &[Restaurant],
    n: usize,
) -> Vec<RestaurantRanking> {
    let by_id: HashMap<i64, &Restaurant> = restaurants
        .iter()
        .filter_map(|r| Some((r.restaurant_id?, r)))
        .collect();

    rank_ids(orders.iter().filter_map(|o| o.restaurant_id), n)
        .into_iter()
        .map(|(restaurant_id, orders)| match by_id.get(&restaurant_id) {
            Some(restaurant) => RestaurantRanking {
                restaurant_id,
                name: restaurant.name.clone(),
                orders,
                rating: restaurant.rating.unwrap_or(0.0),
            },
            None => RestaurantRanking {
                restaurant_id,
                name: format!("Restaurant {}", restaurant_id),
                orders,
                rating: 0.0,
            },
        })
        .collect()
}

// =============================================================================
// Supplementary Reports
// =============================================================================

/// The last `n` records, newest (last in the list) first.
pub fn recent<T: Clone>(list: &[T], n: usize) -> Vec<T> {
    list.iter().rev().take(n).cloned().collect()
}

/// A user's profile page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivity {
    /// `None` when the id matches no user; the history is still computed.
    pub user: Option<User>,
    pub ride_count: usize,
    pub order_count: usize,
    pub total_spent: Money,
    pub recent_rides: Vec<Ride>,
    pub recent_orders: Vec<Order>,
}

/// Collects one user's rides and orders.
pub fn user_activity(
    user_id: i64,
    users: &[User],
    rides: &[Ride],
    orders: &[Order],
    history: usize,
) -> UserActivity {
    let user_rides: Vec<Ride> = rides
        .iter()
        .filter(|r| r.user_id == Some(user_id))
        .cloned()
        .collect();
    let user_orders: Vec<Order> = orders
        .iter()
        .filter(|o| o.user_id == Some(user_id))
        .cloned()
        .collect();

    UserActivity {
        user: users.iter().find(|u| u.user_id == Some(user_id)).cloned(),
        ride_count: user_rides.len(),
        order_count: user_orders.len(),
        total_spent: total_revenue(&user_rides, &user_orders),
        recent_rides: recent(&user_rides, history),
        recent_orders: recent(&user_orders, history),
    }
}

/// Drivers that can take a booking.
pub fn available_drivers(drivers: &[Driver]) -> Vec<&Driver> {
    drivers.iter().filter(|d| d.is_available()).collect()
}

/// Case-insensitive substring match on name or cuisine. A blank query
/// matches everything.
pub fn search_restaurants<'a>(restaurants: &'a [Restaurant], query: &str) -> Vec<&'a Restaurant> {
    let needle = query.trim().to_lowercase();
    restaurants
        .iter()
        .filter(|r| {
            needle.is_empty()
                || r.name.to_lowercase().contains(&needle)
                || r
                    .cuisine
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Available items on a restaurant's menu.
pub fn menu_for(items: &[MenuItem], restaurant_id: i64) -> Vec<&MenuItem> {
    items
        .iter()
        .filter(|i| i.restaurant_id == Some(restaurant_id) && i.availability)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DriverStatus;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use serde_json::json;
    use std::collections::HashSet;

    fn ride(id: i64, driver_id: Option<i64>, fare: Option<i64>) -> Ride {
        Ride {
            ride_id: Some(id),
            user_id: Some(1),
            driver_id,
            source: None,
            destination: None,
            fare: fare.map(|f| Money::from_major_minor(f, 0)),
            status: None,
            timestamp: None,
        }
    }

    fn order(id: i64, user_id: i64, restaurant_id: Option<i64>, total: Option<i64>) -> Order {
        Order {
            order_id: Some(id),
            user_id: Some(user_id),
            restaurant_id,
            partner_id: None,
            total_amount: total.map(|t| Money::from_major_minor(t, 0)),
            status: None,
            timestamp: None,
        }
    }

    fn restaurant(id: i64, name: &str, cuisine: &str, rating: f64) -> Restaurant {
        Restaurant {
            restaurant_id: Some(id),
            name: name.to_string(),
            location: None,
            cuisine: Some(cuisine.to_string()),
            rating: Some(rating),
        }
    }

    fn driver(id: i64, status: DriverStatus) -> Driver {
        Driver {
            driver_id: Some(id),
            name: format!("D{}", id),
            phone: None,
            license_no: None,
            vehicle_no: None,
            rating: Some(4.0),
            status: Some(status),
            location: None,
        }
    }

    #[test]
    fn test_revenue_treats_missing_as_zero() {
        let rides: Vec<Ride> = serde_json::from_value(json!([
            { "fare": "100" },
            { "fare": null }
        ]))
        .unwrap();
        let orders: Vec<Order> = serde_json::from_value(json!([{ "total_amount": 50 }])).unwrap();

        assert_eq!(total_revenue(&rides, &orders), Money::from_major_minor(150, 0));
    }

    #[test]
    fn test_revenue_with_huge_fares_saturates() {
        let rides: Vec<Ride> = serde_json::from_value(json!([
            { "fare": 5e16 },
            { "fare": 5e16 }
        ]))
        .unwrap();

        assert_eq!(total_revenue(&rides, &[]), Money::from_paise(i64::MAX));
    }

    #[test]
    fn test_empty_summary() {
        let snapshot = summarize(&[], &[], &[], &[], &[], 5);
        assert_eq!(snapshot.user_count, 0);
        assert_eq!(snapshot.total_revenue, Money::zero());
        assert!(snapshot.top_restaurants.is_empty());
    }

    #[test]
    fn test_restaurant_leaderboard_scenario() {
        let restaurants = vec![
            restaurant(1, "A", "Biryani", 4.5),
            restaurant(2, "B", "Cafe", 4.2),
        ];
        let orders = vec![
            order(1, 1, Some(1), Some(10)),
            order(2, 1, Some(1), Some(10)),
            order(3, 1, Some(2), Some(10)),
        ];

        let top = top_restaurants(&orders, &restaurants, 5);
        assert_eq!(
            top,
            vec![
                RestaurantRanking {
                    restaurant_id: 1,
                    name: "A".to_string(),
                    orders: 2,
                    rating: 4.5
                },
                RestaurantRanking {
                    restaurant_id: 2,
                    name: "B".to_string(),
                    orders: 1,
                    rating: 4.2
                },
            ]
        );
    }

    #[test]
    fn test_driver_leaderboard_ties_and_placeholders() {
        let rides = vec![
            ride(1, Some(9), None),
            ride(2, Some(3), None),
            ride(3, None, None),
            ride(4, Some(9), None),
            ride(5, Some(3), None),
            ride(6, Some(5), None),
        ];

        let top = top_drivers(&rides, &[], 2);
        let ids: Vec<(i64, usize)> = top.iter().map(|d| (d.driver_id, d.rides)).collect();
        assert_eq!(ids, vec![(3, 2), (9, 2)]);
        assert_eq!(top[0].name, "Driver 3");
        assert_eq!(top[0].rating, 0.0);
    }

    #[test]
    fn test_leaderboard_counts_sum_to_input() {
        let rides: Vec<Ride> = (1..=12).map(|i| ride(i, Some(i % 4), None)).collect();
        let top = top_drivers(&rides, &[], 10);
        assert_eq!(top.iter().map(|d| d.rides).sum::<usize>(), 12);
        assert!(top.windows(2).all(|w| w[0].rides >= w[1].rides));
    }

    #[test]
    fn test_random_ride_lists_leaderboard_shape() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let len = rng.gen_range(0..40);
            let distinct_ids = rng.gen_range(1..=8);
            let rides: Vec<Ride> = (0..len)
                .map(|i| {
                    let driver = if rng.gen_bool(0.1) {
                        None
                    } else {
                        Some(rng.gen_range(1..=distinct_ids))
                    };
                    ride(i, driver, None)
                })
                .collect();
            let n = rng.gen_range(0..10);

            let top = top_drivers(&rides, &[], n);
            let distinct: HashSet<i64> = rides.iter().filter_map(|r| r.driver_id).collect();

            assert_eq!(top.len(), n.min(distinct.len()));
            assert!(top.iter().map(|d| d.rides).sum::<usize>() <= rides.len());
            assert!(top.windows(2).all(|w| w[0].rides >= w[1].rides));
        }
    }

    #[test]
    fn test_recent_is_newest_first() {
        let list = vec![1, 2, 3, 4, 5, 6, 7];
        assert_eq!(recent(&list, 5), vec![7, 6, 5, 4, 3]);
        assert_eq!(recent(&list[..2], 5), vec![2, 1]);
    }

    #[test]
    fn test_user_activity() {
        let rides = vec![ride(1, Some(1), Some(120)), ride(2, Some(1), None)];
        let orders = vec![order(1, 1, Some(1), Some(300)), order(2, 2, Some(1), Some(99))];

        let activity = user_activity(1, &[], &rides, &orders, 10);
        assert!(activity.user.is_none());
        assert_eq!(activity.ride_count, 2);
        assert_eq!(activity.order_count, 1);
        assert_eq!(activity.total_spent, Money::from_major_minor(420, 0));
        assert_eq!(activity.recent_rides[0].ride_id, Some(2));
    }

    #[test]
    fn test_available_drivers() {
        let drivers = vec![
            driver(1, DriverStatus::Available),
            driver(2, DriverStatus::Busy),
            driver(3, DriverStatus::Other("offline".to_string())),
        ];
        let available = available_drivers(&drivers);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].driver_id, Some(1));
    }

    #[test]
    fn test_search_restaurants() {
        let restaurants = vec![
            restaurant(1, "Meghana Foods", "Biryani", 4.5),
            restaurant(2, "Vidyarthi Bhavan", "South Indian", 4.7),
        ];

        assert_eq!(search_restaurants(&restaurants, "BIRY").len(), 1);
        assert_eq!(search_restaurants(&restaurants, "bhavan")[0].restaurant_id, Some(2));
        assert_eq!(search_restaurants(&restaurants, " ").len(), 2);
        assert!(search_restaurants(&restaurants, "pizza").is_empty());
    }

    #[test]
    fn test_menu_for_filters_unavailable() {
        let items: Vec<MenuItem> = serde_json::from_value(json!([
            { "item_id": 1, "restaurant_id": 1, "name": "Biryani", "price": 320 },
            { "item_id": 2, "restaurant_id": 1, "name": "Kebab", "availability": false },
            { "item_id": 3, "restaurant_id": 2, "name": "Dosa", "price": 60 }
        ]))
        .unwrap();

        let menu = menu_for(&items, 1);
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].name, "Biryani");
    }
}

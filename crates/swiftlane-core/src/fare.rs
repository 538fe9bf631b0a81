//! # Fare Module
//!
//! Ride fare estimation from a mocked trip distance.
//!
//! ## Fare Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   fare = base_rate + distance_km × per_km_rate                          │
//! │                                                                         │
//! │   distance_km ~ Uniform[min_distance_km, max_distance_km)               │
//! │                                                                         │
//! │   Reference schedule: 50 + [2, 17) × 12  ──►  fare ∈ [74, 254]          │
//! │                                                                         │
//! │   The distance does NOT depend on the source or destination text.       │
//! │   It comes from a DistanceSource, so tests can pin it.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quote Precedence
//! ```text
//! user typed a fare? ──yes──► Manual(fare)      estimator not invoked
//!         │
//!         no
//!         ▼
//! estimator.estimate(source, destination) ──► Estimated(fare)
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Distance Sources
// =============================================================================

/// Supplies the trip distance used by the estimator.
pub trait DistanceSource: Send + Sync + fmt::Debug {
    /// Sample a distance in kilometres from `[min_km, max_km)`.
    fn sample_km(&self, min_km: f64, max_km: f64) -> f64;
}

/// Uniformly random distance. Used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDistance;

impl DistanceSource for RandomDistance {
    fn sample_km(&self, min_km: f64, max_km: f64) -> f64 {
        if max_km <= min_km {
            return min_km;
        }
        rand::thread_rng().gen_range(min_km..max_km)
    }
}

/// Always returns the same distance, whatever the range.
#[derive(Debug, Clone, Copy)]
pub struct FixedDistance {
    km: f64,
}

impl FixedDistance {
    pub fn new(km: f64) -> Self {
        Self { km }
    }
}

impl DistanceSource for FixedDistance {
    fn sample_km(&self, _min_km: f64, _max_km: f64) -> f64 {
        self.km
    }
}

// =============================================================================
// Fare Schedule
// =============================================================================

/// Pricing constants, in rupees and kilometres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct FareSchedule {
    pub base_rate: f64,
    pub per_km_rate: f64,
    pub min_distance_km: f64,
    pub max_distance_km: f64,
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self {
            base_rate: 50.0,
            per_km_rate: 12.0,
            min_distance_km: 2.0,
            max_distance_km: 17.0,
        }
    }
}

impl FareSchedule {
    /// Checks rates are non-negative and the distance range is ordered.
    pub fn validate(&self) -> CoreResult<()> {
        let fields = [
            ("base_rate", self.base_rate),
            ("per_km_rate", self.per_km_rate),
            ("min_distance_km", self.min_distance_km),
            ("max_distance_km", self.max_distance_km),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidFareSchedule {
                    reason: format!("{} must be a non-negative number, got {}", name, value),
                });
            }
        }

        if self.min_distance_km > self.max_distance_km {
            return Err(CoreError::InvalidFareSchedule {
                reason: format!(
                    "min_distance_km ({}) exceeds max_distance_km ({})",
                    self.min_distance_km, self.max_distance_km
                ),
            });
        }

        Ok(())
    }

    /// Fare for a given distance, rounded to the nearest paisa.
    pub fn fare_for(&self, distance_km: f64) -> Money {
        Money::from_decimal(self.base_rate + distance_km * self.per_km_rate).unwrap_or_default()
    }
}

// =============================================================================
// Fare Quote
// =============================================================================

/// Where a quoted fare came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FareOrigin {
    /// Typed by the user.
    Manual,
    /// Produced by the estimator.
    Estimated,
}

/// A fare ready to be sent with a ride. Never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FareQuote {
    pub fare: Money,
    pub origin: FareOrigin,
}

// =============================================================================
// Fare Estimator
// =============================================================================

/// Estimates ride fares from a schedule and a distance source.
#[derive(Debug, Clone)]
pub struct FareEstimator<D: DistanceSource = RandomDistance> {
    schedule: FareSchedule,
    distance: D,
}

impl Default for FareEstimator<RandomDistance> {
    fn default() -> Self {
        FareEstimator::new(RandomDistance)
    }
}

impl<D: DistanceSource> FareEstimator<D> {
    /// Estimator with the reference schedule.
    pub fn new(distance: D) -> Self {
        Self {
            schedule: FareSchedule::default(),
            distance,
        }
    }

    /// Estimator with a custom schedule. The schedule is validated.
    pub fn with_schedule(schedule: FareSchedule, distance: D) -> CoreResult<Self> {
        schedule.validate()?;
        Ok(Self { schedule, distance })
    }

    pub fn schedule(&self) -> &FareSchedule {
        &self.schedule
    }

    /// Estimates the fare for a trip.
    ///
    /// The location text is accepted for the call shape only; the distance
    /// comes from the distance source.
    pub fn estimate(&self, _source: &str, _destination: &str) -> Money {
        let distance_km = self
            .distance
            .sample_km(self.schedule.min_distance_km, self.schedule.max_distance_km);
        self.schedule.fare_for(distance_km)
    }

    /// Quotes a fare, preferring an explicit override.
    ///
    /// ## Example
    /// ```rust
    /// use swiftlane_core::fare::{FareEstimator, FareOrigin, FixedDistance};
    /// use swiftlane_core::money::Money;
    ///
    /// let estimator = FareEstimator::new(FixedDistance::new(2.0));
    ///
    /// let manual = estimator.quote("A", "B", Some(Money::from_major_minor(300, 0)));
    /// assert_eq!(manual.origin, FareOrigin::Manual);
    ///
    /// let estimated = estimator.quote("A", "B", None);
    /// assert_eq!(estimated.fare, Money::from_major_minor(74, 0));
    /// ```
    pub fn quote(&self, source: &str, destination: &str, manual: Option<Money>) -> FareQuote {
        match manual {
            Some(fare) => FareQuote {
                fare,
                origin: FareOrigin::Manual,
            },
            None => FareQuote {
                fare: self.estimate(source, destination),
                origin: FareOrigin::Estimated,
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts how often the estimator asks for a distance.
    #[derive(Debug, Default)]
    struct CountingDistance {
        calls: AtomicUsize,
    }

    impl DistanceSource for CountingDistance {
        fn sample_km(&self, min_km: f64, _max_km: f64) -> f64 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            min_km
        }
    }

    #[test]
    fn test_fixed_distance_fare() {
        let estimator = FareEstimator::new(FixedDistance::new(5.0));
        assert_eq!(estimator.estimate("x", "y"), Money::from_major_minor(110, 0));
    }

    #[test]
    fn test_fare_rounds_to_paise() {
        let estimator = FareEstimator::new(FixedDistance::new(3.33333));
        // 50 + 39.99996 = 89.99996
        assert_eq!(estimator.estimate("x", "y"), Money::from_major_minor(90, 0));
    }

    #[test]
    fn test_random_fare_stays_in_range() {
        let estimator = FareEstimator::default();
        let low = Money::from_major_minor(74, 0);
        let high = Money::from_major_minor(254, 0);

        for _ in 0..1_000 {
            let fare = estimator.estimate("Koramangala", "Airport");
            assert!(fare >= low && fare <= high, "fare {} out of range", fare);
        }
    }

    #[test]
    fn test_random_distance_degenerate_range() {
        assert_eq!(RandomDistance.sample_km(4.0, 4.0), 4.0);
    }

    #[test]
    fn test_override_skips_estimator() {
        let estimator = FareEstimator::new(CountingDistance::default());

        let quote = estimator.quote("a", "b", Some(Money::from_paise(25000)));
        assert_eq!(quote.fare, Money::from_paise(25000));
        assert_eq!(quote.origin, FareOrigin::Manual);
        assert_eq!(estimator.distance.calls.load(Ordering::SeqCst), 0);

        let quote = estimator.quote("a", "b", None);
        assert_eq!(quote.origin, FareOrigin::Estimated);
        assert_eq!(estimator.distance.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_schedule_validation() {
        assert!(FareSchedule::default().validate().is_ok());

        let negative = FareSchedule {
            per_km_rate: -1.0,
            ..FareSchedule::default()
        };
        assert!(FareEstimator::with_schedule(negative, RandomDistance).is_err());

        let inverted = FareSchedule {
            min_distance_km: 20.0,
            ..FareSchedule::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(CoreError::InvalidFareSchedule { .. })
        ));
    }

    #[test]
    fn test_custom_schedule() {
        let schedule = FareSchedule {
            base_rate: 30.0,
            per_km_rate: 10.0,
            min_distance_km: 1.0,
            max_distance_km: 1.0,
        };
        let estimator = FareEstimator::with_schedule(schedule, RandomDistance).unwrap();
        assert_eq!(estimator.estimate("a", "b"), Money::from_major_minor(40, 0));
    }
}

//! # Ride Booking
//!
//! The book-a-ride form: rider, driver, pickup, drop, optional manual fare.
//!
//! ## Booking Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RideRequest (form state)                                              │
//! │      │                                                                 │
//! │      ▼                                                                 │
//! │  prepare()                                                             │
//! │   ├── user, driver selected?          ──► else Required                │
//! │   ├── source, destination non-blank?  ──► else Required                │
//! │   ├── manual fare parses?             ──► else InvalidFormat           │
//! │   └── FareEstimator::quote            ──► NewRide                      │
//! │      │                                                                 │
//! │      ▼                                                                 │
//! │  book() ──► POST rides ──► ok: form reset                              │
//! │                        └─► err: form kept                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::Value;
use swiftlane_core::fare::{DistanceSource, FareEstimator, RandomDistance};
use swiftlane_core::location::{plan_route, RoutePlan};
use swiftlane_core::validation::{parse_fare_override, require, require_text};
use swiftlane_core::{Driver, FareQuote, NewRide, Resource};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::{Backend, BackendExt};
use crate::error::ClientResult;

/// Raw booking form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RideRequest {
    pub user_id: Option<i64>,
    pub driver_id: Option<i64>,
    pub source: String,
    pub destination: String,
    /// Manual fare as typed. Blank means "estimate it".
    pub fare: Option<String>,
}

/// Booking form bound to a fare estimator.
#[derive(Debug)]
pub struct RideBooking<D: DistanceSource = RandomDistance> {
    id: Uuid,
    estimator: FareEstimator<D>,
    request: RideRequest,
}

impl<D: DistanceSource> RideBooking<D> {
    pub fn new(estimator: FareEstimator<D>) -> Self {
        Self {
            id: Uuid::new_v4(),
            estimator,
            request: RideRequest::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn request(&self) -> &RideRequest {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut RideRequest {
        &mut self.request
    }

    /// Map state for the current pickup/drop text.
    pub fn route_plan(&self, drivers: &[Driver]) -> RoutePlan {
        plan_route(&self.request.source, &self.request.destination, drivers)
    }

    /// Live fare for the current form, before rider and driver are chosen.
    ///
    /// Only the manual fare is checked; blank places still get an estimate.
    pub fn quote(&self) -> ClientResult<FareQuote> {
        let manual = parse_fare_override(self.request.fare.as_deref())?;
        Ok(self
            .estimator
            .quote(&self.request.source, &self.request.destination, manual))
    }

    /// Validates the form and quotes the fare. No state changes.
    pub fn prepare(&self) -> ClientResult<(NewRide, FareQuote)> {
        let req = &self.request;

        let user_id = require(req.user_id, "user")?;
        let driver_id = require(req.driver_id, "driver")?;
        let source = require_text(Some(req.source.as_str()), "source")?;
        let destination = require_text(Some(req.destination.as_str()), "destination")?;
        let manual = parse_fare_override(req.fare.as_deref())?;

        let quote = self.estimator.quote(source, destination, manual);
        debug!(session = %self.id, fare = %quote.fare, origin = ?quote.origin, "Fare quoted");

        let ride = NewRide {
            user_id,
            driver_id,
            source: source.to_string(),
            destination: destination.to_string(),
            fare: quote.fare,
        };
        Ok((ride, quote))
    }

    /// Books the ride and clears the form on success.
    ///
    /// Returns the record the backend created.
    pub async fn book(&mut self, backend: &dyn Backend) -> ClientResult<Value> {
        let (ride, _quote) = self.prepare()?;

        let created = match backend.create(Resource::Rides, &ride).await {
            Ok(created) => created,
            Err(e) => {
                warn!(session = %self.id, error = %e, "Ride booking failed");
                return Err(e);
            }
        };

        info!(
            session = %self.id,
            user_id = ride.user_id,
            driver_id = ride.driver_id,
            fare = %ride.fare,
            "Ride booked"
        );

        self.request = RideRequest::default();
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::memory::MemoryBackend;
    use swiftlane_core::fare::{FareOrigin, FixedDistance};
    use swiftlane_core::{Money, Ride, ValidationError};

    fn filled(booking: &mut RideBooking<FixedDistance>) {
        let req = booking.request_mut();
        req.user_id = Some(1);
        req.driver_id = Some(2);
        req.source = "Koramangala".to_string();
        req.destination = "Airport".to_string();
    }

    fn booking() -> RideBooking<FixedDistance> {
        RideBooking::new(FareEstimator::new(FixedDistance::new(10.0)))
    }

    #[test]
    fn test_prepare_estimates_fare() {
        let mut booking = booking();
        filled(&mut booking);

        let (ride, quote) = booking.prepare().unwrap();
        assert_eq!(ride.fare, Money::from_major_minor(170, 0));
        assert_eq!(quote.origin, FareOrigin::Estimated);
    }

    #[test]
    fn test_manual_fare_wins() {
        let mut booking = booking();
        filled(&mut booking);
        booking.request_mut().fare = Some("250".to_string());

        let (ride, quote) = booking.prepare().unwrap();
        assert_eq!(ride.fare, Money::from_major_minor(250, 0));
        assert_eq!(quote.origin, FareOrigin::Manual);
    }

    #[test]
    fn test_missing_fields() {
        let mut booking = booking();
        filled(&mut booking);
        booking.request_mut().destination = "  ".to_string();

        let err = booking.prepare().unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::Required { ref field }) if field == "destination"
        ));

        booking.request_mut().destination = "Airport".to_string();
        booking.request_mut().driver_id = None;
        assert!(booking.prepare().is_err());
    }

    #[test]
    fn test_bad_manual_fare() {
        let mut booking = booking();
        filled(&mut booking);
        booking.request_mut().fare = Some("a lot".to_string());

        assert!(matches!(
            booking.prepare(),
            Err(ClientError::Validation(ValidationError::InvalidFormat { .. }))
        ));
    }

    #[test]
    fn test_quote_without_rider() {
        let mut booking = booking();
        booking.request_mut().source = "Koramangala".to_string();

        let quote = booking.quote().unwrap();
        assert_eq!(quote.fare, Money::from_major_minor(170, 0));

        booking.request_mut().fare = Some("-20".to_string());
        assert!(booking.quote().is_err());
    }

    #[test]
    fn test_route_plan_follows_form() {
        let mut booking = booking();
        filled(&mut booking);

        let plan = booking.route_plan(&[]);
        assert!(plan.route.is_some());
    }

    #[tokio::test]
    async fn test_book_creates_ride_and_resets() {
        let backend = MemoryBackend::seeded().unwrap();
        let mut booking = booking();
        filled(&mut booking);

        let created = booking.book(&backend).await.unwrap();
        assert_eq!(created["ride_id"], 5);
        assert_eq!(booking.request(), &RideRequest::default());

        let rides: Vec<Ride> = backend.list(Resource::Rides).await.unwrap();
        let last = rides.last().unwrap();
        assert_eq!(last.fare, Some(Money::from_major_minor(170, 0)));
        assert_eq!(last.destination.as_deref(), Some("Airport"));
    }

    #[tokio::test]
    async fn test_failed_booking_keeps_form() {
        let backend = MemoryBackend::new();
        backend.set_failing(true);
        let mut booking = booking();
        filled(&mut booking);

        let err = booking.book(&backend).await.unwrap_err();
        assert!(err.user_message("booking ride").starts_with("Error booking ride:"));
        assert_eq!(booking.request().source, "Koramangala");
    }
}

//! # Reports
//!
//! Dashboard, analytics and profile views, loaded fresh on every call.

use serde::Serialize;
use swiftlane_core::analytics::{recent, user_activity};
use swiftlane_core::{AggregateSnapshot, Dataset, Order, Resource, Ride, User, UserActivity};
use tracing::debug;

use crate::backend::{Backend, BackendExt};
use crate::config::ReportSettings;
use crate::error::ClientResult;

/// Dashboard page: headline numbers plus the latest activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub snapshot: AggregateSnapshot,
    pub recent_rides: Vec<Ride>,
    pub recent_orders: Vec<Order>,
}

/// Builds report views from backend data.
#[derive(Debug, Clone, Default)]
pub struct Reports {
    settings: ReportSettings,
}

impl Reports {
    pub fn new(settings: ReportSettings) -> Self {
        Self { settings }
    }

    /// Dashboard view from already-loaded data.
    pub fn dashboard(&self, data: &Dataset) -> DashboardView {
        DashboardView {
            snapshot: data.summarize(self.settings.leaderboard_size),
            recent_rides: recent(&data.rides, self.settings.recent_limit),
            recent_orders: recent(&data.orders, self.settings.recent_limit),
        }
    }

    /// Loads everything and builds the dashboard view.
    pub async fn load_dashboard(&self, backend: &dyn Backend) -> ClientResult<DashboardView> {
        let data = backend.load_dataset().await?;
        let view = self.dashboard(&data);
        debug!(
            rides = view.snapshot.ride_count,
            orders = view.snapshot.order_count,
            revenue = %view.snapshot.total_revenue,
            "Dashboard refreshed"
        );
        Ok(view)
    }

    /// Loads everything and builds the analytics snapshot.
    pub async fn load_analytics(&self, backend: &dyn Backend) -> ClientResult<AggregateSnapshot> {
        let data = backend.load_dataset().await?;
        Ok(data.summarize(self.settings.leaderboard_size))
    }

    /// Loads one user's profile. Only users, rides and orders are fetched.
    pub async fn load_profile(
        &self,
        backend: &dyn Backend,
        user_id: i64,
    ) -> ClientResult<UserActivity> {
        let (users, rides, orders) = tokio::try_join!(
            backend.list::<User>(Resource::Users),
            backend.list::<Ride>(Resource::Rides),
            backend.list::<Order>(Resource::Orders),
        )?;

        Ok(user_activity(
            user_id,
            &users,
            &rides,
            &orders,
            self.settings.profile_history,
        ))
    }
}

//! Session state and report builders used by the dashboard pages.

pub mod booking;
pub mod ordering;
pub mod reports;

pub use booking::{RideBooking, RideRequest};
pub use ordering::OrderSession;
pub use reports::{DashboardView, Reports};

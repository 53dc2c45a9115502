pub mod controller;
pub mod state;
pub mod stats;

pub use controller::{DashboardController, DashboardSink};
pub use state::{ApplyOutcome, DashboardSnapshot, DashboardState, ListStatus};
pub use stats::DashboardStats;

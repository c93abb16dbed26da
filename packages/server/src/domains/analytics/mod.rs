//! Analytics domain - agency-wide onboarding metrics over a time range.

pub mod activities;
pub mod data;
pub mod edges;
pub mod models;

pub use data::{AgencyAnalytics, TimeRange};
pub use edges::router;

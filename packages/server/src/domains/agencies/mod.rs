//! Agencies domain - the tenant record and its settings.

pub mod activities;
pub mod data;
pub mod edges;
pub mod models;

pub use data::AgencyData;
pub use edges::router;
pub use models::{Agency, CreateAgency, UpdateAgencyParams};

pub mod metrics;

pub use metrics::{agency_analytics, compute_analytics};

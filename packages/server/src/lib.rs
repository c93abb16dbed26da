// PlankPort - API Core
//
// Backend for a multi-tenant client-onboarding service: agencies, their
// clients, template-driven task checklists, messaging and billing.
//
// Each domain under domains/ follows models / data / activities / edges.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;

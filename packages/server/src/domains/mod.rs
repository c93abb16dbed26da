// Business domains
pub mod agencies;
pub mod analytics;
pub mod auth;
pub mod billing;
pub mod clients;
pub mod communications;
pub mod notifications;
pub mod submissions;
pub mod tasks;
pub mod templates;
pub mod users;

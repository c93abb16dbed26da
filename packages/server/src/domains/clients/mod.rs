//! Clients domain - the customers an agency onboards, with optional portal access.

pub mod activities;
pub mod data;
pub mod edges;
pub mod models;

pub use data::ClientData;
pub use edges::router;
pub use models::{Client, ClientStatus, CreateClient, UpdateClientParams};

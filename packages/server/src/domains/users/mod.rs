//! Users domain - agency staff (owners, admins) and client portal users.

pub mod activities;
pub mod data;
pub mod edges;
pub mod models;

pub use data::UserData;
pub use edges::router;
pub use models::{CreateUser, UpdateProfileParams, User};

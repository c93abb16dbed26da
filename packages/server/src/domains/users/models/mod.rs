pub mod user;

pub use user::{CreateUser, UpdateProfileParams, User};

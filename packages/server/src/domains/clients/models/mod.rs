pub mod client;

pub use client::{Client, ClientStatus, CreateClient, UpdateClientParams};

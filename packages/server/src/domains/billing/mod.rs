//! Billing domain - plan catalog, hosted checkout and the local mirror of
//! payment-processor customers, subscriptions and orders.

pub mod activities;
pub mod catalog;
pub mod data;
pub mod edges;
pub mod models;

pub use catalog::{format_price, product_by_price_id, Product, PRODUCTS};
pub use edges::router;
pub use models::{StripeCustomer, StripeOrder, StripeSubscription};

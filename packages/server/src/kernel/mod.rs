//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod object_store;
pub mod scheduled_tasks;
pub mod stripe;
pub mod test_dependencies;
pub mod traits;

pub use deps::{LoggingMagicLinkSender, ServerDeps};
pub use object_store::LocalObjectStore;
pub use stripe::StripeGateway;
pub use test_dependencies::{
    MockMagicLinkSender, MockObjectStore, MockPaymentGateway, TestDependencies,
};
pub use traits::*;

pub mod customer;
pub mod order;
pub mod subscription;

pub use customer::StripeCustomer;
pub use order::{StripeOrder, UpsertOrder};
pub use subscription::{StripeSubscription, UpsertSubscription};

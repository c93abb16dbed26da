pub mod checkout;

pub use checkout::{
    confirm_checkout, create_checkout, list_orders, list_products, subscription_status,
};

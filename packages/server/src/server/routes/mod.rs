// HTTP routes shared across domains
pub mod health;

pub use health::*;

pub mod settings;

pub use settings::{get_agency, update_agency};

pub mod facts;

pub use facts::{ClientFact, TaskFact};

//! Templates domain - reusable, ordered task blueprints.

pub mod activities;
pub mod data;
pub mod edges;
pub mod models;

pub use data::TemplateData;
pub use edges::router;
pub use models::{CreateTemplate, Template, TemplateTask, UpdateTemplateParams};

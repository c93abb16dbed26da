pub mod template;

pub use template::{CreateTemplate, Template, TemplateTask, UpdateTemplateParams};

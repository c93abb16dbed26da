pub mod manage;
pub mod normalize;

pub use manage::{
    create_template, delete_template, find_template, list_templates, reorder_template_tasks,
    update_template,
};
pub use normalize::normalize_tasks;

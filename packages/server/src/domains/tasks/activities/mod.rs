pub mod access;
pub mod instantiate;
pub mod manage;
pub mod reorder;

pub use access::visible_task;
pub use instantiate::instantiate_template;
pub use manage::{
    create_task, delete_task, list_agency_tasks, list_client_tasks, task_summary, update_task,
};
pub use reorder::{move_task, reorder_tasks};

pub mod task;

pub use task::{
    BadgeVariant, CreateTask, OverdueTask, StatusCount, Task, TaskStatus, TaskType,
    TaskWithClient, UpdateTaskParams,
};

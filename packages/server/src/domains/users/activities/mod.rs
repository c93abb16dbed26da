pub mod employees;

pub use employees::{change_role, invite_employee, list_employees, remove_employee, InviteEmployee};

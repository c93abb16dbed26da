pub mod access;
pub mod manage;

pub use access::visible_client;
pub use manage::{
    apply_template, create_client, delete_client, get_client, list_clients, update_client,
};

pub mod magic_link;
pub mod password;
pub mod session;
pub mod sign_in;
pub mod sign_up;

pub use magic_link::{issue_magic_link, request_magic_link, verify_magic_link};
pub use password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
pub use session::{issue_session, load_session, update_profile};
pub use sign_in::sign_in;
pub use sign_up::sign_up;

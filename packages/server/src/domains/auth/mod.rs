//! Auth domain - password and magic-link sign-in, sign-up, session bootstrap
//!
//! Responsibilities:
//! - Sign-up creates the agency and its owner together
//! - bcrypt password verification and single-use magic links
//! - Session/JWT token management

pub mod activities;
pub mod data;
pub mod edges;
pub mod jwt;
pub mod models;

pub use data::{AuthSession, SessionData};
pub use edges::{router, session_router};
pub use jwt::{Claims, JwtService};

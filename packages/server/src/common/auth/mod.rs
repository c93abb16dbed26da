/// Authorization for agency staff and client portal users.
///
/// Handlers check capabilities with a fluent call:
///
/// ```rust,ignore
/// Actor::new(user.user_id, user.role)
///     .can(Capability::ManageClients)
///     .check()?;
/// ```
///
/// Tenant scoping (which agency a row belongs to) is enforced separately by
/// the queries themselves; capabilities only answer "may this role do this".
mod builder;
mod capability;
mod errors;

pub use builder::{Actor, CapabilityBuilder};
pub use capability::{Capability, Role};
pub use errors::AuthError;

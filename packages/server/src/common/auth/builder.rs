use super::{AuthError, Capability, Role};
use crate::common::entity_ids::UserId;

/// Entry point for authorization checks
///
/// Usage:
/// ```ignore
/// Actor::new(user_id, role)
///     .can(Capability::ManageTemplates)
///     .check()?;
/// ```
pub struct Actor {
    actor_id: UserId,
    role: Role,
}

impl Actor {
    /// The role comes from the verified JWT.
    pub fn new(actor_id: UserId, role: Role) -> Self {
        Self { actor_id, role }
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: Capability) -> CapabilityBuilder {
        CapabilityBuilder {
            actor_id: self.actor_id,
            role: self.role,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder {
    actor_id: UserId,
    role: Role,
    capability: Capability,
}

impl CapabilityBuilder {
    /// Perform the authorization check
    pub fn check(self) -> Result<(), AuthError> {
        if self.capability.allowed_for(self.role) {
            return Ok(());
        }

        tracing::debug!(
            actor_id = %self.actor_id,
            role = self.role.as_str(),
            capability = ?self.capability,
            "Capability denied"
        );
        Err(AuthError::PermissionDenied(format!(
            "{} cannot {:?}",
            self.role.as_str(),
            self.capability
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_can_manage_billing() {
        let result = Actor::new(UserId::new(), Role::AgencyOwner)
            .can(Capability::ManageBilling)
            .check();
        assert!(result.is_ok());
    }

    #[test]
    fn test_admin_rejected_for_billing() {
        let result = Actor::new(UserId::new(), Role::AgencyAdmin)
            .can(Capability::ManageBilling)
            .check();
        assert!(matches!(result, Err(AuthError::PermissionDenied(_))));
    }

    #[test]
    fn test_client_rejected_for_templates() {
        let result = Actor::new(UserId::new(), Role::Client)
            .can(Capability::ManageTemplates)
            .check();
        assert!(matches!(result, Err(AuthError::PermissionDenied(_))));
    }
}

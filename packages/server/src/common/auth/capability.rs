use serde::{Deserialize, Serialize};

/// Role of a user within its agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    AgencyOwner,
    AgencyAdmin,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::AgencyOwner => "agency_owner",
            Role::AgencyAdmin => "agency_admin",
            Role::Client => "client",
        }
    }

    /// Owners and admins work inside the agency dashboard.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::AgencyOwner | Role::AgencyAdmin)
    }

    pub fn is_client(&self) -> bool {
        matches!(self, Role::Client)
    }
}

/// Things a user may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create, edit and delete client records
    ManageClients,
    /// Edit onboarding templates
    ManageTemplates,
    /// Create, edit, reorder and delete tasks of any client
    ManageTasks,
    /// Invite and remove agency staff
    ManageEmployees,
    /// Edit agency settings (branding, billing address)
    ManageAgency,
    /// Start checkouts and change the subscription
    ManageBilling,
    /// See agency-wide analytics
    ViewAnalytics,
    /// Read, submit and discuss the tasks assigned to one's own client record
    WorkAssignedTasks,
}

impl Capability {
    pub fn allowed_for(&self, role: Role) -> bool {
        match self {
            Capability::ManageEmployees | Capability::ManageAgency | Capability::ManageBilling => {
                role == Role::AgencyOwner
            }
            Capability::ManageClients
            | Capability::ManageTemplates
            | Capability::ManageTasks
            | Capability::ViewAnalytics => role.is_staff(),
            Capability::WorkAssignedTasks => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_only_capabilities() {
        for capability in [
            Capability::ManageEmployees,
            Capability::ManageAgency,
            Capability::ManageBilling,
        ] {
            assert!(capability.allowed_for(Role::AgencyOwner));
            assert!(!capability.allowed_for(Role::AgencyAdmin));
            assert!(!capability.allowed_for(Role::Client));
        }
    }

    #[test]
    fn test_staff_capabilities_exclude_clients() {
        assert!(Capability::ManageTasks.allowed_for(Role::AgencyAdmin));
        assert!(!Capability::ManageTasks.allowed_for(Role::Client));
        assert!(Capability::WorkAssignedTasks.allowed_for(Role::Client));
    }

    #[test]
    fn test_role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(Role::AgencyOwner).unwrap(),
            serde_json::json!("agency_owner")
        );
        assert_eq!(Role::AgencyAdmin.as_str(), "agency_admin");
    }
}

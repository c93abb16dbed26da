use serde::{Deserialize, Serialize};

use crate::common::{TemplateId, UserId};
use crate::domains::clients::models::{Client, ClientStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClientInput {
    pub email: String,
    pub full_name: String,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub status: Option<ClientStatus>,
    pub onboarding_template_id: Option<TemplateId>,
    pub assigned_user_id: Option<UserId>,
    /// When present, a portal login is created for the client
    pub portal_password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteClientQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplyTemplateInput {
    pub template_id: TemplateId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientData {
    pub id: String,
    pub agency_id: String,
    pub email: String,
    pub full_name: String,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub status: ClientStatus,
    pub onboarding_template_id: Option<String>,
    pub assigned_user_id: Option<String>,
    pub user_id: Option<String>,
    pub has_portal_access: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Client> for ClientData {
    fn from(client: Client) -> Self {
        Self {
            id: client.id.to_string(),
            agency_id: client.agency_id.to_string(),
            email: client.email,
            full_name: client.full_name,
            company_name: client.company_name,
            phone: client.phone,
            status: client.status,
            onboarding_template_id: client.onboarding_template_id.map(|id| id.to_string()),
            assigned_user_id: client.assigned_user_id.map(|id| id.to_string()),
            has_portal_access: client.user_id.is_some(),
            user_id: client.user_id.map(|id| id.to_string()),
            created_at: client.created_at.to_rfc3339(),
            updated_at: client.updated_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_query_defaults_to_unconfirmed() {
        let query: DeleteClientQuery = serde_json::from_str("{}").unwrap();
        assert!(!query.confirm);
    }

    #[test]
    fn test_create_input_minimal() {
        let input: CreateClientInput =
            serde_json::from_str(r#"{"email":"a@b.co","full_name":"Ada"}"#).unwrap();
        assert!(input.portal_password.is_none());
        assert!(input.status.is_none());
    }
}

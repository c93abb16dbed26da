use crate::common::text::non_blank;
use crate::common::{AppError, AppResult, TaskId, UserId};
use crate::domains::clients::Client;
use crate::domains::communications::data::SendMessageInput;
use crate::domains::communications::models::{
    Communication, CommunicationWithSender, Conversation, CreateCommunication,
};
use crate::domains::notifications::activities::notify_message_received;
use crate::domains::tasks::activities::visible_task;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

pub async fn list_communications(
    user: &AuthUser,
    task_id: TaskId,
    deps: &ServerDeps,
) -> AppResult<Vec<CommunicationWithSender>> {
    let (task, _) = visible_task(user, task_id, deps).await?;
    Ok(Communication::list_for_task(task.id, &deps.db_pool).await?)
}

/// Who hears about a message: the assigned agency user when the client
/// writes, the client's portal user when the agency writes
pub fn message_recipient(sender: &AuthUser, client: &Client) -> Option<UserId> {
    let recipient = if sender.is_staff() {
        client.user_id
    } else {
        client.assigned_user_id
    };
    recipient.filter(|id| *id != sender.user_id)
}

pub async fn send_message(
    user: &AuthUser,
    task_id: TaskId,
    input: SendMessageInput,
    deps: &ServerDeps,
) -> AppResult<CommunicationWithSender> {
    let (task, client) = visible_task(user, task_id, deps).await?;
    let message = non_blank(Some(&input.message))
        .ok_or_else(|| AppError::bad_request("Message cannot be empty"))?;

    let created = Communication::create(
        CreateCommunication::builder()
            .task_id(task.id)
            .sender_id(user.user_id)
            .message(message)
            .file_url(non_blank(input.file_url.as_deref()))
            .file_name(non_blank(input.file_name.as_deref()))
            .build(),
        &deps.db_pool,
    )
    .await?;
    let row = Communication::find_with_sender(created.id, &deps.db_pool).await?;

    tracing::info!(task_id = %task.id, communication_id = %created.id, "Message sent");

    if let Some(recipient) = message_recipient(user, &client) {
        notify_message_received(recipient, task.id, &task.title, &row.sender_name, &deps.db_pool)
            .await;
    }

    Ok(row)
}

pub async fn list_conversations(
    user: &AuthUser,
    deps: &ServerDeps,
) -> AppResult<Vec<Conversation>> {
    let portal_user = (!user.is_staff()).then_some(user.user_id);
    Ok(Conversation::list(user.agency_id, portal_user, &deps.db_pool).await?)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::common::{AgencyId, ClientId, Role};
    use crate::domains::clients::ClientStatus;

    fn client(assigned: Option<UserId>, portal: Option<UserId>) -> Client {
        Client {
            id: ClientId::new(),
            agency_id: AgencyId::new(),
            email: "client@example.com".to_string(),
            full_name: "Client".to_string(),
            company_name: None,
            phone: None,
            status: ClientStatus::Active,
            onboarding_template_id: None,
            assigned_user_id: assigned,
            user_id: portal,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sender(user_id: UserId, role: Role) -> AuthUser {
        AuthUser {
            user_id,
            agency_id: AgencyId::new(),
            role,
            email: "someone@example.com".to_string(),
        }
    }

    #[test]
    fn test_client_message_goes_to_assignee() {
        let (staff, portal) = (UserId::new(), UserId::new());
        let c = client(Some(staff), Some(portal));
        assert_eq!(message_recipient(&sender(portal, Role::Client), &c), Some(staff));
    }

    #[test]
    fn test_staff_message_goes_to_portal_user() {
        let (staff, portal) = (UserId::new(), UserId::new());
        let c = client(Some(staff), Some(portal));
        assert_eq!(message_recipient(&sender(staff, Role::AgencyAdmin), &c), Some(portal));
    }

    #[test]
    fn test_no_self_or_missing_recipient() {
        let staff = UserId::new();
        assert_eq!(message_recipient(&sender(staff, Role::AgencyOwner), &client(Some(staff), None)), None);
        let portal = UserId::new();
        assert_eq!(message_recipient(&sender(portal, Role::Client), &client(None, Some(portal))), None);
    }
}

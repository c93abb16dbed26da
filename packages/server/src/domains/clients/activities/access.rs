use crate::common::{AppError, AppResult, ClientId};
use crate::domains::clients::models::Client;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// Load a client the caller may see: staff within their agency, a portal
/// user only their own record. Anything else is not found.
pub async fn visible_client(
    user: &AuthUser,
    client_id: ClientId,
    deps: &ServerDeps,
) -> AppResult<Client> {
    let client = Client::find_in_agency(client_id, user.agency_id, &deps.db_pool)
        .await?
        .filter(|client| user.is_staff() || client.user_id == Some(user.user_id));

    client.ok_or_else(|| AppError::not_found("Client not found"))
}

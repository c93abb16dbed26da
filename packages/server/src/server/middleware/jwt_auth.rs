use crate::common::{AgencyId, AppError, Role, UserId};
use crate::domains::auth::{Claims, JwtService};
use crate::domains::users::User;
use crate::kernel::ServerDeps;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

/// Authenticated user information from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: UserId,
    pub agency_id: AgencyId,
    pub role: Role,
    pub email: String,
}

impl AuthUser {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            agency_id: user.agency_id,
            role: user.role,
            email: user.email,
        }
    }
}

/// JWT authentication middleware
///
/// Verifies the bearer token, then loads the user it names. Role and agency
/// come from the live `users` row, so removing an account or changing its
/// role takes effect on the next request.
/// If no token, an invalid token, or a deleted user, the request continues
/// without AuthUser; protected handlers reject it through the `AuthUser` extractor.
pub async fn jwt_auth_middleware(
    deps: Arc<ServerDeps>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(claims) = extract_claims(&request, &deps.jwt_service) {
        match User::find_optional(claims.user_id, &deps.db_pool).await {
            Ok(Some(row)) => {
                let user = AuthUser::from(row);
                debug!(
                    user_id = %user.user_id,
                    role = user.role.as_str(),
                    "Authenticated user"
                );
                request.extensions_mut().insert(user);
            }
            Ok(None) => debug!(user_id = %claims.user_id, "Token names a removed account"),
            Err(e) => return AppError::Internal(e).into_response(),
        }
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Extract and verify JWT token from request
fn extract_claims(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<Claims> {
    // Get Authorization header
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Extract token (handle both "Bearer <token>" and raw token)
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    jwt_service.verify_token(token).ok()
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_for(jwt_service: &JwtService, user_id: UserId) -> String {
        jwt_service
            .create_token(
                user_id,
                AgencyId::new(),
                Role::AgencyAdmin,
                "admin@agency.ca".to_string(),
            )
            .unwrap()
    }

    #[test]
    fn test_extract_token_with_bearer() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let user_id = UserId::new();
        let token = token_for(&jwt_service, user_id);

        let request = axum::http::Request::builder()
            .header("authorization", format!("Bearer {}", token))
            .body(axum::body::Body::empty())
            .unwrap();

        let claims = extract_claims(&request, &jwt_service).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.role, Role::AgencyAdmin);
    }

    #[test]
    fn test_extract_token_without_bearer() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let user_id = UserId::new();
        let token = token_for(&jwt_service, user_id);

        let request = axum::http::Request::builder()
            .header("authorization", token)
            .body(axum::body::Body::empty())
            .unwrap();

        let claims = extract_claims(&request, &jwt_service);
        assert_eq!(claims.map(|c| c.user_id), Some(user_id));
    }

    #[test]
    fn test_no_auth_header() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let request = axum::http::Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_claims(&request, &jwt_service).is_none());
    }

    #[test]
    fn test_invalid_token() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let request = axum::http::Request::builder()
            .header("authorization", "Bearer invalid_token")
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_claims(&request, &jwt_service).is_none());
    }
}

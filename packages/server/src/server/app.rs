//! Application setup and server configuration.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware, Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::domains::{
    agencies, analytics, auth, billing, clients, communications, notifications, submissions,
    tasks, templates, users,
};
use crate::kernel::ServerDeps;
use crate::server::middleware::{jwt_auth_middleware, with_rate_limit};
use crate::server::routes::health_router;

/// Router-level options that don't belong in `ServerDeps`
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub allowed_origins: Vec<String>,
    pub rate_limit_enabled: bool,
    /// Directory served under `/storage` (local object store root)
    pub storage_root: Option<PathBuf>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            rate_limit_enabled: false,
            storage_root: None,
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = if allowed_origins.iter().any(|o| o == "*") || origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };

    cors.allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

/// Build the Axum application router
///
/// The task webhook is merged after the CORS layer: it answers preflight
/// requests with its own headers.
pub fn build_app(deps: Arc<ServerDeps>, options: AppOptions) -> Router {
    let public_auth = auth::router(deps.clone());
    let public_auth = if options.rate_limit_enabled {
        with_rate_limit(public_auth)
    } else {
        public_auth
    };

    let mut api = Router::new()
        .merge(public_auth)
        .merge(auth::session_router(deps.clone()))
        .merge(agencies::router(deps.clone()))
        .merge(users::router(deps.clone()))
        .merge(clients::router(deps.clone()))
        .merge(templates::router(deps.clone()))
        .merge(tasks::router(deps.clone()))
        .merge(submissions::router(deps.clone()))
        .merge(communications::router(deps.clone()))
        .merge(notifications::router(deps.clone()))
        .merge(billing::router(deps.clone()))
        .merge(analytics::router(deps.clone()))
        .merge(health_router(deps.clone()));

    if let Some(root) = options.storage_root {
        api = api.nest_service("/storage", ServeDir::new(root));
    }

    let auth_deps = deps.clone();
    let api = api
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(auth_deps.clone(), req, next)
        }))
        .layer(cors_layer(&options.allowed_origins));

    api.merge(tasks::webhook::router(deps))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_allow_any_origin() {
        let options = AppOptions::default();
        assert_eq!(options.allowed_origins, vec!["*"]);
        assert!(!options.rate_limit_enabled);
    }
}

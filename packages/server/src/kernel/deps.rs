//! Server dependencies for handlers and background jobs (using traits for testability)
//!
//! This module provides the central dependency container shared by all domains.
//! All external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::domains::auth::JwtService;
use crate::kernel::{BaseMagicLinkSender, BaseObjectStore, BasePaymentGateway};

// =============================================================================
// Magic link delivery (log only)
// =============================================================================

/// Writes magic links to the log instead of sending email.
pub struct LoggingMagicLinkSender;

#[async_trait]
impl BaseMagicLinkSender for LoggingMagicLinkSender {
    async fn send_magic_link(&self, email: &str, link: &str) -> Result<()> {
        tracing::info!(email = %email, link = %link, "Magic link issued");
        Ok(())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to handlers (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// JWT service for token creation
    pub jwt_service: Arc<JwtService>,
    pub object_store: Arc<dyn BaseObjectStore>,
    /// None when no payment processor is configured
    pub payment_gateway: Option<Arc<dyn BasePaymentGateway>>,
    pub magic_link_sender: Arc<dyn BaseMagicLinkSender>,
    /// Frontend origin used for checkout and magic-link URLs
    pub app_base_url: String,
    /// Upper bound on the profile lookup during session bootstrap
    pub profile_timeout: Duration,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        db_pool: PgPool,
        jwt_service: Arc<JwtService>,
        object_store: Arc<dyn BaseObjectStore>,
        payment_gateway: Option<Arc<dyn BasePaymentGateway>>,
        magic_link_sender: Arc<dyn BaseMagicLinkSender>,
        app_base_url: String,
        profile_timeout: Duration,
    ) -> Self {
        Self {
            db_pool,
            jwt_service,
            object_store,
            payment_gateway,
            magic_link_sender,
            app_base_url: app_base_url.trim_end_matches('/').to_string(),
            profile_timeout,
        }
    }
}

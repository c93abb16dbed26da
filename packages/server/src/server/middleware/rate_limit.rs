// Rate limiting for the unauthenticated auth endpoints using tower-governor
//
// Configuration:
// - 10 requests per second per IP with bursts of 20
// - Client IP comes from X-Forwarded-For / X-Real-IP, falling back to the peer address
//
// Applied in app.rs on the /auth routes when RATE_LIMIT_ENABLED is set
use std::sync::Arc;

use axum::Router;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

/// Wrap a router with per-IP rate limiting
pub fn with_rate_limit(router: Router) -> Router {
    let config = GovernorConfigBuilder::default()
        .per_second(10) // Base rate: 10 requests per second
        .burst_size(20) // Allow bursts up to 20
        .use_headers() // Extract IP from X-Forwarded-For header
        .finish();

    match config {
        Some(config) => router.layer(GovernorLayer {
            config: Arc::new(config),
        }),
        None => {
            tracing::warn!("Rate limiter configuration rejected, continuing without it");
            router
        }
    }
}

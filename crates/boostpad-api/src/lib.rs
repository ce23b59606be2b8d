//! Boostpad REST API
//!
//! HTTP surface over the task engine.
//!
//! # API Structure
//!
//! ```text
//! /api/v1/
//! ├── /tasks          - Create, inspect, complete, delete, report
//! ├── /tasks/feed     - Ordered feed of workable tasks
//! ├── /profile        - Own profile and settings
//! ├── /completions    - Own completion history
//! ├── /payments       - Purchase history + provider settlement callback
//! └── /withdrawals    - Withdrawal request/cancel + payout confirmation
//! ```
//!
//! Authentication is external: requests arrive with a bearer token already
//! verified by the gateway, and an [`identity::IdentityProvider`] maps it to
//! a user id.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::http::HeaderName;
use axum::Router;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub use error::{ApiError, ApiResult};
pub use identity::{GatewayIdentity, IdentityProvider, SharedIdentityProvider};
pub use state::AppState;

/// API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Enable CORS for browser clients
    pub enable_cors: bool,
    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
    /// Enable request tracing
    pub enable_tracing: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            enable_tracing: true,
        }
    }
}

/// Create the main API router with all middleware
pub fn create_router(state: Arc<AppState>, config: ApiConfig) -> Router {
    let mut router = Router::new()
        .nest("/api/v1", routes::api_v1_routes(state.clone()))
        .route("/health", axum::routing::get(handlers::health::health_check))
        .route("/ready", axum::routing::get(handlers::health::readiness_check))
        .with_state(state);

    let x_request_id = HeaderName::from_static("x-request-id");
    router = router
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
        .layer(PropagateRequestIdLayer::new(x_request_id));

    if config.enable_tracing {
        router = router.layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            },
        ));
    }

    if config.enable_cors {
        let cors = if config.cors_origins.contains(&"*".to_string()) {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_origin(
                    config
                        .cors_origins
                        .iter()
                        .filter_map(|o| o.parse().ok())
                        .collect::<Vec<_>>(),
                )
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PATCH,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers(Any)
        };
        router = router.layer(cors);
    }

    router
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ApiConfig::default();
        assert!(config.enable_cors);
        assert!(config.enable_tracing);
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
    }
}

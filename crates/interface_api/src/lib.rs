//! HTTP API Layer
//!
//! This crate provides the REST API for opening and querying accounts using
//! Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for accounts and health checks
//! - **Middleware**: Request ids, tracing and audit logging
//! - **DTOs**: camelCase request/response bodies validated with `validator`
//! - **Error Handling**: Domain errors mapped to status codes with stable codes
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(service, vec![store_health, client_health]);
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
    middleware as axum_middleware,
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_account::AccountService;

use crate::middleware::audit_middleware;
use crate::handlers::{account, health};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: AccountService,
    /// Adapters probed by the readiness check
    pub health: Arc<[Arc<dyn HealthCheckable>]>,
}

impl AppState {
    pub fn new(service: AccountService, health: Vec<Arc<dyn HealthCheckable>>) -> Self {
        Self {
            service,
            health: health.into(),
        }
    }
}

/// Creates the main API router
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let account_routes = Router::new()
        .route("/", get(account::list_accounts).post(account::create_account))
        .route("/:id", get(account::get_account))
        .route(
            "/getByAccountNumber/:account_number",
            get(account::get_by_account_number),
        )
        .route("/updateByAccountNumber", put(account::update_by_account_number))
        .route(
            "/countAccountByClient/:document_type/:document_number",
            get(account::count_by_client),
        )
        .route(
            "/countAccountByClientAndProduct/:document_type/:document_number/:product_code",
            get(account::count_by_client_and_product),
        )
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/v1/account", account_routes)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

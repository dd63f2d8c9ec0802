//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for wallet and credit operations
//! - Response types with money serialized as fixed two-decimal strings
//! - Error translation from the repository layer

pub mod routes;

use axum::Router;
use kudi_core::credit::CreditPolicy;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Credit policy applied to purchases and repayments.
    pub policy: CreditPolicy,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

//! HTTP request handlers and the API router.

pub mod admin;
pub mod agents;
pub mod auth;
pub mod brokers;
pub mod claims;
pub mod customers;
pub mod policies;
pub mod quotes;

use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::json;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::errors::AppError;

/// `Query` wrapper that rejects with the API's error envelope.
///
/// Axum's default query rejection is a plain-text body; a malformed filter
/// parameter must produce the same `{success:false, message}` 400 as every
/// other validation failure.
pub struct ApiQuery<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(ApiQuery(value))
    }
}

/// Shared application state injected into handlers.
///
/// The pool is the single shared handle to the storage engine; the reset
/// lock serializes the wipe-and-reseed maintenance operation so it cannot
/// interleave with itself.
pub struct AppState {
    /// Database connection pool.
    pub db: SqlitePool,
    /// Application configuration.
    pub config: Config,
    /// Maintenance lock for database reset.
    pub reset_lock: Mutex<()>,
}

/// Builds the full `/api` router. Middleware layers are applied in `main`.
pub fn api_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        // Customers
        .route("/customers", get(customers::list_customers).post(customers::create_customer))
        .route("/customers/search", get(customers::search_customers))
        .route("/customers/:id", get(customers::get_customer))
        .route("/auth/login", post(auth::customer_login))
        // Policies
        .route("/policies", get(policies::list_policies).post(policies::create_policy))
        .route("/policies/search", get(policies::search_policies))
        .route(
            "/policies/:id",
            get(policies::get_policy)
                .put(policies::update_policy)
                .delete(policies::delete_policy),
        )
        .route("/policies/:id/status", put(policies::update_policy_status))
        .route("/policies/:id/underwriting", put(policies::update_underwriting))
        // Claims
        .route("/claims", get(claims::list_claims).post(claims::create_claim))
        .route("/claims/:id", get(claims::get_claim))
        .route("/claims/:id/status", put(claims::update_claim_status))
        // Agents & quotes
        .route("/agents", get(agents::list_agents))
        .route("/quotes", get(quotes::get_quote))
        // Brokers
        .route("/brokers", get(brokers::list_brokers).post(brokers::create_broker))
        .route("/brokers/search", get(brokers::search_brokers))
        .route(
            "/brokers/:id",
            get(brokers::get_broker)
                .put(brokers::update_broker)
                .delete(brokers::delete_broker),
        )
        // Admin
        .route("/admin/login", post(auth::admin_login))
        .route("/admin/reset-database", post(admin::reset_database))
        .route(
            "/admin/customers",
            get(admin::list_customers).post(admin::create_customer),
        )
        .route(
            "/admin/customers/:id",
            put(admin::update_customer).delete(admin::delete_customer),
        )
        .fallback(not_found);

    Router::new().nest("/api", api).with_state(state)
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "OK",
            "message": "Insurance Admin API is running",
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })),
    )
}

/// Self-documenting 404 for unmatched `/api` paths.
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Endpoint not found",
            "availableEndpoints": [
                "GET /api/health",
                "GET /api/customers",
                "GET /api/customers/search",
                "POST /api/customers",
                "GET /api/customers/:id",
                "POST /api/auth/login",
                "GET /api/policies",
                "GET /api/policies/search",
                "GET /api/policies/:id",
                "POST /api/policies",
                "PUT /api/policies/:id",
                "PUT /api/policies/:id/status",
                "DELETE /api/policies/:id",
                "PUT /api/policies/:id/underwriting",
                "GET /api/claims",
                "GET /api/claims/:id",
                "POST /api/claims",
                "PUT /api/claims/:id/status",
                "GET /api/agents",
                "GET /api/quotes",
                "GET /api/brokers",
                "GET /api/brokers/search",
                "GET /api/brokers/:id",
                "POST /api/brokers",
                "PUT /api/brokers/:id",
                "DELETE /api/brokers/:id",
                "POST /api/admin/login",
                "POST /api/admin/reset-database",
                "GET /api/admin/customers",
                "POST /api/admin/customers",
                "PUT /api/admin/customers/:id",
                "DELETE /api/admin/customers/:id"
            ]
        })),
    )
}

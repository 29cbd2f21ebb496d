//! Shared helpers for the HTTP integration tests.
//!
//! Each test builds the full `/api` router over a fresh in-memory SQLite
//! database with the demo fixtures loaded, then drives it with
//! `tower::ServiceExt::oneshot` so no socket is ever opened.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

use insurance_admin_api::config::Config;
use insurance_admin_api::db;
use insurance_admin_api::handlers::{api_router, AppState};
use insurance_admin_api::seed;

/// Builds the router over a seeded in-memory database.
///
/// A single connection keeps every query on the same `:memory:` database;
/// with more, each pooled connection would see its own empty one.
pub async fn test_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    db::create_tables(&pool)
        .await
        .expect("failed to create tables");
    seed::seed_database(&pool)
        .await
        .expect("failed to seed database");

    let state = Arc::new(AppState {
        db: pool,
        config: Config::for_tests(),
        reset_lock: Mutex::new(()),
    });

    api_router(state)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body)).await
}

pub async fn put_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "PUT", uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "DELETE", uri, None).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is not JSON")
    };
    (status, value)
}

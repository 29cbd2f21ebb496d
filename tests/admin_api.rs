//! Admin login, administrative customer management, quotes and the
//! reset-database maintenance operation.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{delete, get, post_json, put_json, test_app};

#[tokio::test]
async fn admin_login() {
    let app = test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/admin/login",
        json!({ "username": "admin", "password": "admin" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Admin login successful");
    let admin = &body["data"]["admin"];
    assert_eq!(admin["username"], "admin");
    assert_eq!(admin["is_super_admin"], true);
    assert!(admin.get("password").is_none());
    assert!(body["data"]["token"]
        .as_str()
        .unwrap()
        .starts_with("admin-jwt-token-"));

    let (status, body) = post_json(
        &app,
        "/api/admin/login",
        json!({ "username": "admin", "password": "nope" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, body) = post_json(&app, "/api/admin/login", json!({ "username": "admin" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username and password are required");
}

#[tokio::test]
async fn admin_listing_carries_policy_and_claim_counts() {
    let app = test_app().await;
    let (status, body) = get(&app, "/api/admin/customers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 6);

    let cust001 = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["customer_number"] == "CUST001")
        .unwrap();
    assert_eq!(cust001["policy_count"], 2);
    assert_eq!(cust001["claim_count"], 2);
    assert!(cust001.get("password").is_none());

    let cust006 = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["customer_number"] == "CUST006")
        .unwrap();
    assert_eq!(cust006["policy_count"], 0);
    assert_eq!(cust006["claim_count"], 0);
}

#[tokio::test]
async fn admin_creates_customer_with_extended_fields() {
    let app = test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/admin/customers",
        json!({ "email": "half@record.com", "password": "pw" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Email, password, first name, and last name are required"
    );

    let (status, body) = post_json(
        &app,
        "/api/admin/customers",
        json!({
            "email": "duke.ironfist@email.com",
            "password": "fists-of-iron",
            "first_name": "Duke",
            "last_name": "Ironfist",
            "credit_score": 810,
            "kyc_status": "approved",
            "agent_id": 2,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Customer created successfully");
    let data = &body["data"];
    assert_eq!(data["credit_score"], 810);
    assert_eq!(data["kyc_status"], "approved");
    assert_eq!(data["agent_id"], 2);
    assert!(data.get("password").is_none());

    let (status, body) = post_json(
        &app,
        "/api/admin/customers",
        json!({
            "email": "duke.ironfist@email.com",
            "password": "other",
            "first_name": "Duke",
            "last_name": "Again",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Customer with this email already exists");
}

#[tokio::test]
async fn admin_partial_update_touches_only_supplied_fields() {
    let app = test_app().await;

    let (status, body) = put_json(
        &app,
        "/api/admin/customers/1",
        json!({ "credit_score": 735, "kyc_status": "approved" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Customer updated successfully");
    let data = &body["data"];
    assert_eq!(data["credit_score"], 735);
    // untouched fields survive
    assert_eq!(data["first_name"], "Wizard");
    assert_eq!(data["email"], "wizard.mcspellcaster@email.com");

    let (status, body) = put_json(&app, "/api/admin/customers/9999", json!({ "city": "Nowhere" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Customer not found");
}

#[tokio::test]
async fn admin_password_update_is_rehashed() {
    let app = test_app().await;

    let (status, _) = put_json(
        &app,
        "/api/admin/customers/1",
        json!({ "password": "new-secret-phrase" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // old password no longer works, new one does
    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        json!({ "email": "wizard.mcspellcaster@email.com", "password": "password123" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        json!({ "email": "wizard.mcspellcaster@email.com", "password": "new-secret-phrase" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["customer"]["first_name"], "Wizard");
}

#[tokio::test]
async fn admin_hard_delete() {
    let app = test_app().await;

    let (status, body) = delete(&app, "/api/admin/customers/6").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Customer deleted successfully");

    let (status, _) = get(&app, "/api/customers/6").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = delete(&app, "/api/admin/customers/6").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Customer not found");
}

#[tokio::test]
async fn reset_restores_seeded_state() {
    let app = test_app().await;

    // disturb the data
    let (status, _) = delete(&app, "/api/admin/customers/5").await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(&app, "/api/customers").await;
    assert_eq!(body["count"], 5);

    let (status, body) = post_json(&app, "/api/admin/reset-database", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Database has been reset and reseeded with fresh test data"
    );
    assert!(body["timestamp"].is_string());

    let (_, body) = get(&app, "/api/customers").await;
    assert_eq!(body["count"], 6);
    let (_, body) = get(&app, "/api/policies").await;
    assert_eq!(body["count"], 5);
    let (_, body) = get(&app, "/api/claims").await;
    assert_eq!(body["count"], 3);

    // idempotent: a second reset yields the same counts
    let (status, _) = post_json(&app, "/api/admin/reset-database", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(&app, "/api/customers").await;
    assert_eq!(body["count"], 6);
    let (_, body) = get(&app, "/api/policies").await;
    assert_eq!(body["count"], 5);

    // seeded credentials work again after reset
    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        json!({ "email": "wizard.mcspellcaster@email.com", "password": "password123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn quote_for_auto_at_reference_values() {
    let app = test_app().await;
    let (status, body) = get(
        &app,
        "/api/quotes?policy_type=auto&coverage_amount=100000&customer_age=30",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["estimated_premium"], 150.0);
    assert_eq!(data["coverage_amount"], 100000.0);
    assert!(data["quote_id"].as_str().unwrap().starts_with("QTE"));
    assert!(data["valid_until"].is_string());
}

#[tokio::test]
async fn quote_scales_with_coverage_and_age() {
    let app = test_app().await;

    // 120 * sqrt(2) = 169.7056 -> 169.71
    let (_, body) = get(&app, "/api/quotes?policy_type=home&coverage_amount=200000").await;
    assert_eq!(body["data"]["estimated_premium"], 169.71);

    // unknown type falls back to the default base rate
    let (_, body) = get(&app, "/api/quotes?policy_type=travel&coverage_amount=100000").await;
    assert_eq!(body["data"]["estimated_premium"], 100.0);

    // 80 * 1.0 * (1 + (50-30)*0.01) = 96
    let (_, body) = get(
        &app,
        "/api/quotes?policy_type=life&coverage_amount=100000&customer_age=50",
    )
    .await;
    assert_eq!(body["data"]["estimated_premium"], 96.0);
}

#[tokio::test]
async fn quote_requires_coverage_amount() {
    let app = test_app().await;
    let (status, body) = get(&app, "/api/quotes?policy_type=auto").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Coverage amount is required");

    // malformed numerics reject with the error envelope too
    let (status, body) = get(&app, "/api/quotes?coverage_amount=lots").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

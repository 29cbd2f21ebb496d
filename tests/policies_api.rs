//! Policy lifecycle over the HTTP surface: listing, search, creation,
//! updates, transitions and guarded deletion.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{delete, get, post_json, put_json, test_app};

#[tokio::test]
async fn list_joins_customer_and_broker_columns() {
    let app = test_app().await;
    let (status, body) = get(&app, "/api/policies").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);

    let pol001 = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["policy_number"] == "POL001")
        .unwrap();
    assert_eq!(pol001["first_name"], "Wizard");
    assert_eq!(pol001["customer_number"], "CUST001");
    assert_eq!(pol001["broker_company"], "Silverstone Insurance Brokers");
}

#[tokio::test]
async fn list_filters() {
    let app = test_app().await;

    let (_, body) = get(&app, "/api/policies?status=active").await;
    assert_eq!(body["count"], 4);

    let (_, body) = get(&app, "/api/policies?policy_type=auto").await;
    assert_eq!(body["count"], 2);

    let (_, body) = get(&app, "/api/policies?customer_id=1").await;
    assert_eq!(body["count"], 2);

    let (_, body) = get(&app, "/api/policies?customer_name=wizard").await;
    assert_eq!(body["count"], 2);

    let (_, body) = get(&app, "/api/policies?coverage_min=100000").await;
    assert_eq!(body["count"], 2); // 300k home + 500k life

    let (_, body) = get(&app, "/api/policies?date_from=2024-03-01&date_to=2024-12-31").await;
    assert_eq!(body["count"], 2); // POL003 and POL005

    let (status, body) = get(&app, "/api/policies?coverage_min=12x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn search_policies() {
    let app = test_app().await;

    let (status, body) = get(&app, "/api/policies/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Search query is required");

    let (status, body) = get(&app, "/api/policies/search?q=POL00").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
    assert_eq!(body["query"], "POL00");
    // ordered by policy_number
    assert_eq!(body["data"][0]["policy_number"], "POL001");

    let (_, body) = get(&app, "/api/policies/search?q=Homeowners").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["policy_number"], "POL002");
}

#[tokio::test]
async fn get_policy_includes_coverage_lines() {
    let app = test_app().await;
    let (status, body) = get(&app, "/api/policies/1").await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["policy_number"], "POL001");
    assert_eq!(data["email"], "wizard.mcspellcaster@email.com");
    assert_eq!(data["coverage_details"].as_array().unwrap().len(), 3);

    let (status, body) = get(&app, "/api/policies/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Policy not found");
}

#[tokio::test]
async fn create_policy_validates_required_fields() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app,
        "/api/policies",
        json!({ "customer_id": 1, "policy_type": "auto" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Customer ID, Broker ID, policy type, product name, coverage amount, \
         premium amount, start date, and end date are required"
    );
}

#[tokio::test]
async fn create_policy_with_coverage_lines() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app,
        "/api/policies",
        json!({
            "customer_id": 5,
            "broker_id": 3,
            "policy_type": "auto",
            "product_name": "Budget Auto Cover",
            "coverage_amount": 20000.0,
            "premium_amount": 480.0,
            "deductible": 400.0,
            "policy_term": 12,
            "start_date": "2024-08-01",
            "end_date": "2025-07-31",
            "coverage_details": [
                { "coverage_type": "Liability", "coverage_limit": 15000.0, "deductible": 0.0, "premium_portion": 300.0 },
                { "coverage_type": "Collision", "coverage_limit": 5000.0, "deductible": 400.0, "premium_portion": 180.0 }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Policy created successfully");
    let data = &body["data"];
    assert!(data["policy_number"].as_str().unwrap().starts_with("POL"));
    assert_eq!(data["status"], "pending");
    assert_eq!(data["underwriting_status"], "pending");

    let id = data["id"].as_i64().unwrap();
    let (_, body) = get(&app, &format!("/api/policies/{}", id)).await;
    assert_eq!(body["data"]["coverage_details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn update_policy_replaces_fields() {
    let app = test_app().await;

    let (status, body) = put_json(&app, "/api/policies/1", json!({ "policy_type": "auto" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Policy type, product name, coverage amount, premium amount, \
         start date, and end date are required"
    );

    let update = json!({
        "policy_type": "auto",
        "product_name": "Comprehensive Auto Insurance v2",
        "coverage_amount": 55000.0,
        "premium_amount": 1300.0,
        "deductible": 500.0,
        "policy_term": 12,
        "start_date": "2024-01-01",
        "end_date": "2024-12-31",
        "notes": "renegotiated"
    });

    let (status, body) = put_json(&app, "/api/policies/1", update.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Policy updated successfully");
    assert_eq!(body["data"]["product_name"], "Comprehensive Auto Insurance v2");
    assert_eq!(body["data"]["coverage_amount"], 55000.0);
    assert_eq!(body["data"]["customer_number"], "CUST001");

    let (status, body) = put_json(&app, "/api/policies/9999", update).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Policy not found");
}

#[tokio::test]
async fn status_transition_is_validated() {
    let app = test_app().await;

    let (status, body) =
        put_json(&app, "/api/policies/1/status", json!({ "status": "galloping" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Status must be one of: submission, quoted, booked, declined, cancelled, expired"
    );

    let (status, body) = put_json(
        &app,
        "/api/policies/1/status",
        json!({ "status": "booked", "notes": "bound by carrier" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Policy status updated successfully");
    assert_eq!(body["data"]["status"], "booked");
    assert_eq!(body["data"]["notes"], "bound by carrier");

    // omitted notes are cleared, not kept
    let (_, body) = put_json(&app, "/api/policies/1/status", json!({ "status": "quoted" })).await;
    assert_eq!(body["data"]["notes"], "");

    let (status, _) =
        put_json(&app, "/api/policies/9999/status", json!({ "status": "booked" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn underwriting_approval_activates_policy() {
    let app = test_app().await;

    // POL004 is seeded pending/pending
    let (status, body) = put_json(
        &app,
        "/api/policies/4/underwriting",
        json!({ "underwriting_status": "approved", "risk_score": 2, "notes": "clean history" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Policy underwriting updated successfully");
    assert_eq!(body["data"]["underwriting_status"], "approved");
    assert_eq!(body["data"]["status"], "active");
    assert_eq!(body["data"]["risk_score"], 2);
}

#[tokio::test]
async fn underwriting_rejection_rejects_policy() {
    let app = test_app().await;
    let (_, body) = put_json(
        &app,
        "/api/policies/4/underwriting",
        json!({ "underwriting_status": "rejected" }),
    )
    .await;
    assert_eq!(body["data"]["underwriting_status"], "rejected");
    assert_eq!(body["data"]["status"], "rejected");
}

#[tokio::test]
async fn underwriting_review_leaves_status_untouched() {
    let app = test_app().await;
    let (_, body) = put_json(
        &app,
        "/api/policies/4/underwriting",
        json!({ "underwriting_status": "requires_review" }),
    )
    .await;
    assert_eq!(body["data"]["underwriting_status"], "requires_review");
    assert_eq!(body["data"]["status"], "pending");
}

#[tokio::test]
async fn underwriting_status_is_validated() {
    let app = test_app().await;
    let (status, body) = put_json(
        &app,
        "/api/policies/4/underwriting",
        json!({ "underwriting_status": "maybe" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Underwriting status must be one of: pending, approved, rejected, requires_review"
    );
}

#[tokio::test]
async fn delete_is_blocked_by_existing_claims() {
    let app = test_app().await;

    let (status, body) = delete(&app, "/api/policies/1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Cannot delete policy with existing claims. Please handle claims first."
    );

    // the policy row survives the refused delete
    let (status, _) = get(&app, "/api/policies/1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn delete_removes_policy_and_coverage_lines() {
    let app = test_app().await;

    // POL004 has no claims
    let (status, body) = delete(&app, "/api/policies/4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Policy deleted successfully");

    let (status, _) = get(&app, "/api/policies/4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = delete(&app, "/api/policies/4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Policy not found");
}

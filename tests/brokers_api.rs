//! Broker CRUD, search and the referenced-parent delete guard, plus the
//! read-only agent roster.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{delete, get, post_json, put_json, test_app};

#[tokio::test]
async fn list_returns_seeded_brokers_sorted_by_name() {
    let app = test_app().await;
    let (status, body) = get(&app, "/api/brokers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
    // ordered by last_name, first_name
    assert_eq!(body["data"][0]["last_name"], "Copperhill");
}

#[tokio::test]
async fn list_filters() {
    let app = test_app().await;

    let (_, body) = get(&app, "/api/brokers?territory=Northeast").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["broker_code"], "BRK001");

    let (_, body) = get(&app, "/api/brokers?specialization=auto").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["broker_code"], "BRK005");

    let (_, body) = get(&app, "/api/brokers?status=inactive").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn search_brokers() {
    let app = test_app().await;

    let (status, body) = get(&app, "/api/brokers/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Search query is required");

    let (status, body) = get(&app, "/api/brokers/search?q=goldsmith").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["company_name"], "Goldsmith Insurance Group");
}

#[tokio::test]
async fn get_broker() {
    let app = test_app().await;

    let (status, body) = get(&app, "/api/brokers/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["broker_code"], "BRK001");

    let (status, body) = get(&app, "/api/brokers/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Broker not found");
}

#[tokio::test]
async fn create_broker_validates_input() {
    let app = test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/brokers",
        json!({ "first_name": "Jane", "last_name": "Doe" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "First name, last name, email, and company name are required"
    );

    let (status, body) = post_json(
        &app,
        "/api/brokers",
        json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "not-an-email",
            "company_name": "Doe Brokers",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email format");
}

#[tokio::test]
async fn create_broker_assigns_code_and_default_commission() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app,
        "/api/brokers",
        json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "jane.doe@doe-brokers.com",
            "company_name": "Doe Brokers",
            "territory": "Alaska",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Broker created successfully");
    let data = &body["data"];
    assert!(data["broker_code"].as_str().unwrap().starts_with("BRK"));
    assert_eq!(data["commission_rate"], 0.05);
    assert_eq!(data["status"], "active");
}

#[tokio::test]
async fn create_broker_rejects_duplicate_email() {
    let app = test_app().await;
    let (status, body) = post_json(
        &app,
        "/api/brokers",
        json!({
            "first_name": "Marcus",
            "last_name": "Clone",
            "email": "marcus.silverstone@silverstone-insurance.com",
            "company_name": "Clone Brokers",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn update_broker() {
    let app = test_app().await;

    let update = json!({
        "first_name": "Marcus",
        "last_name": "Silverstone",
        "email": "marcus.silverstone@silverstone-insurance.com",
        "company_name": "Silverstone Insurance Brokers",
        "commission_rate": 0.09,
        "territory": "New England",
        "status": "inactive",
    });

    let (status, body) = put_json(&app, "/api/brokers/1", update.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Broker updated successfully");
    assert_eq!(body["data"]["commission_rate"], 0.09);
    assert_eq!(body["data"]["territory"], "New England");
    assert_eq!(body["data"]["status"], "inactive");

    let (status, body) = put_json(&app, "/api/brokers/9999", update).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Broker not found");

    let (status, body) = put_json(&app, "/api/brokers/1", json!({ "first_name": "x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "First name, last name, email, and company name are required"
    );
}

#[tokio::test]
async fn delete_is_blocked_while_policies_reference_broker() {
    let app = test_app().await;

    let (status, body) = delete(&app, "/api/brokers/1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Cannot delete broker. They have 1 associated policies. Please reassign policies first."
    );

    let (status, _) = get(&app, "/api/brokers/1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn delete_unreferenced_broker() {
    let app = test_app().await;

    let (_, body) = post_json(
        &app,
        "/api/brokers",
        json!({
            "first_name": "Temp",
            "last_name": "Broker",
            "email": "temp.broker@short-lived.com",
            "company_name": "Short Lived LLC",
        }),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = delete(&app, &format!("/api/brokers/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Broker deleted successfully");

    let (status, _) = delete(&app, &format!("/api/brokers/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn agents_lists_active_roster_only() {
    let app = test_app().await;
    let (status, body) = get(&app, "/api/agents").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
    // ordered by last_name, first_name
    assert_eq!(body["data"][0]["last_name"], "Brightforge");
    for agent in body["data"].as_array().unwrap() {
        assert_eq!(agent["status"], "active");
    }
}

//! Broker CRUD and search.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::errors::{is_unique_violation, AppError, ResultExt};
use crate::ids;
use crate::models::{Broker, BrokerFilter, BrokerPayload, SearchQuery};
use crate::query::FilterBuilder;
use crate::validators::is_valid_email;

use super::{ApiQuery, AppState};

/// GET /api/brokers
pub async fn list_brokers(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<BrokerFilter>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut f = FilterBuilder::new("SELECT * FROM brokers WHERE 1=1");
    f.like("broker_code", filter.broker_code.as_deref());
    f.like("first_name", filter.first_name.as_deref());
    f.like("last_name", filter.last_name.as_deref());
    f.like("email", filter.email.as_deref());
    f.like("phone", filter.phone.as_deref());
    f.like("company_name", filter.company_name.as_deref());
    f.like("territory", filter.territory.as_deref());
    f.like("specialization", filter.specialization.as_deref());
    f.eq("status", filter.status);
    f.order_by("last_name, first_name");

    let brokers: Vec<Broker> = f
        .build_query_as()
        .fetch_all(&state.db)
        .await
        .context("Failed to fetch brokers")?;

    Ok(Json(json!({
        "success": true,
        "data": brokers,
        "count": brokers.len(),
    })))
}

/// GET /api/brokers/search?q=
pub async fn search_brokers(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let q = params
        .q
        .ok_or_else(|| AppError::BadRequest("Search query is required".to_string()))?;

    let mut f = FilterBuilder::new("SELECT * FROM brokers WHERE 1=1");
    f.like_any(
        &[
            "broker_code",
            "first_name",
            "last_name",
            "email",
            "company_name",
            "territory",
        ],
        Some(&q),
    );
    f.order_by("last_name, first_name");

    let brokers: Vec<Broker> = f
        .build_query_as()
        .fetch_all(&state.db)
        .await
        .context("Broker search failed")?;

    Ok(Json(json!({
        "success": true,
        "data": brokers,
        "count": brokers.len(),
    })))
}

/// GET /api/brokers/:id
pub async fn get_broker(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let broker: Broker = sqlx::query_as("SELECT * FROM brokers WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await
        .context("Failed to fetch broker")?
        .ok_or_else(|| AppError::NotFound("Broker not found".to_string()))?;

    Ok(Json(json!({ "success": true, "data": broker })))
}

/// POST /api/brokers
pub async fn create_broker(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BrokerPayload>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let BrokerPayload {
        first_name,
        last_name,
        email,
        phone,
        license_number,
        company_name,
        commission_rate,
        territory,
        specialization,
        status: _,
    } = payload;

    let (Some(first_name), Some(last_name), Some(email), Some(company_name)) =
        (first_name, last_name, email, company_name)
    else {
        return Err(AppError::BadRequest(
            "First name, last name, email, and company name are required".to_string(),
        ));
    };

    if !is_valid_email(&email) {
        return Err(AppError::BadRequest("Invalid email format".to_string()));
    }

    let broker_code = ids::broker_code();

    let result = sqlx::query(
        r#"
        INSERT INTO brokers (
            broker_code, first_name, last_name, email, phone, license_number,
            company_name, commission_rate, territory, specialization
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&broker_code)
    .bind(&first_name)
    .bind(&last_name)
    .bind(&email)
    .bind(&phone)
    .bind(&license_number)
    .bind(&company_name)
    .bind(commission_rate.unwrap_or(0.05))
    .bind(&territory)
    .bind(&specialization)
    .execute(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::BadRequest("Email already exists".to_string())
        } else {
            AppError::DatabaseError(e)
        }
    })?;

    let new_broker: Broker = sqlx::query_as("SELECT * FROM brokers WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&state.db)
        .await
        .context("Failed to create broker")?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": new_broker,
            "message": "Broker created successfully",
        })),
    ))
}

/// PUT /api/brokers/:id
///
/// Full field replace with the same required-field rule as creation.
pub async fn update_broker(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<BrokerPayload>,
) -> Result<Json<serde_json::Value>, AppError> {
    let BrokerPayload {
        first_name,
        last_name,
        email,
        phone,
        license_number,
        company_name,
        commission_rate,
        territory,
        specialization,
        status,
    } = payload;

    let (Some(first_name), Some(last_name), Some(email), Some(company_name)) =
        (first_name, last_name, email, company_name)
    else {
        return Err(AppError::BadRequest(
            "First name, last name, email, and company name are required".to_string(),
        ));
    };

    if !is_valid_email(&email) {
        return Err(AppError::BadRequest("Invalid email format".to_string()));
    }

    let result = sqlx::query(
        r#"
        UPDATE brokers
        SET first_name = ?, last_name = ?, email = ?, phone = ?, license_number = ?,
            company_name = ?, commission_rate = ?, territory = ?, specialization = ?,
            status = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&first_name)
    .bind(&last_name)
    .bind(&email)
    .bind(&phone)
    .bind(&license_number)
    .bind(&company_name)
    .bind(commission_rate.unwrap_or(0.05))
    .bind(&territory)
    .bind(&specialization)
    .bind(status.as_deref().unwrap_or("active"))
    .bind(id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::BadRequest("Email already exists".to_string())
        } else {
            AppError::DatabaseError(e)
        }
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Broker not found".to_string()));
    }

    let updated: Broker = sqlx::query_as("SELECT * FROM brokers WHERE id = ?")
        .bind(id)
        .fetch_one(&state.db)
        .await
        .context("Failed to update broker")?;

    Ok(Json(json!({
        "success": true,
        "data": updated,
        "message": "Broker updated successfully",
    })))
}

/// DELETE /api/brokers/:id
///
/// Refused while any policy references the broker. Check and delete share a
/// transaction so a policy assigned in between cannot be orphaned.
pub async fn delete_broker(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut tx = state.db.begin().await.context("Failed to delete broker")?;

    let policy_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM policies WHERE broker_id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to delete broker")?;

    if policy_count > 0 {
        return Err(AppError::BadRequest(format!(
            "Cannot delete broker. They have {} associated policies. Please reassign policies first.",
            policy_count
        )));
    }

    let result = sqlx::query("DELETE FROM brokers WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete broker")?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Broker not found".to_string()));
    }

    tx.commit().await.context("Failed to delete broker")?;

    Ok(Json(json!({
        "success": true,
        "message": "Broker deleted successfully",
    })))
}

//! Claim intake and adjudication endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use sqlx::{QueryBuilder, Sqlite};
use std::sync::Arc;

use crate::errors::{AppError, ResultExt};
use crate::ids;
use crate::models::{
    ClaimDetailRow, ClaimDocument, ClaimFilter, ClaimListRow, ClaimStatusUpdate, NewClaim,
};
use crate::query::FilterBuilder;
use crate::validators::validate_claim_status;

use super::{ApiQuery, AppState};

const CLAIM_LIST_BASE: &str = "\
    SELECT cl.*, c.first_name, c.last_name, c.customer_number, \
           p.policy_number, p.product_name \
    FROM claims cl \
    JOIN customers c ON cl.customer_id = c.id \
    JOIN policies p ON cl.policy_id = p.id \
    WHERE 1=1";

/// GET /api/claims
pub async fn list_claims(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<ClaimFilter>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut f = FilterBuilder::new(CLAIM_LIST_BASE);
    f.eq("cl.customer_id", filter.customer_id);
    f.eq("cl.policy_id", filter.policy_id);
    f.eq("cl.status", filter.status);
    f.eq("cl.priority", filter.priority);
    f.order_by("cl.created_at DESC");

    let claims: Vec<ClaimListRow> = f
        .build_query_as()
        .fetch_all(&state.db)
        .await
        .context("Failed to fetch claims")?;

    Ok(Json(json!({
        "success": true,
        "data": claims,
        "count": claims.len(),
    })))
}

/// GET /api/claims/:id
///
/// Single claim with customer and policy context plus attached documents.
pub async fn get_claim(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let claim: ClaimDetailRow = sqlx::query_as(
        "SELECT cl.*, c.first_name, c.last_name, c.customer_number, c.email, \
                p.policy_number, p.product_name, p.coverage_amount \
         FROM claims cl \
         JOIN customers c ON cl.customer_id = c.id \
         JOIN policies p ON cl.policy_id = p.id \
         WHERE cl.id = ?",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await
    .context("Failed to fetch claim")?
    .ok_or_else(|| AppError::NotFound("Claim not found".to_string()))?;

    let documents: Vec<ClaimDocument> =
        sqlx::query_as("SELECT * FROM claim_documents WHERE claim_id = ?")
            .bind(id)
            .fetch_all(&state.db)
            .await
            .context("Failed to fetch claim")?;

    let mut data = serde_json::to_value(&claim)?;
    data["documents"] = json!(documents);

    Ok(Json(json!({ "success": true, "data": data })))
}

/// POST /api/claims
///
/// The policy must exist and belong to the claiming customer before a claim
/// number is issued.
pub async fn create_claim(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewClaim>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let NewClaim {
        policy_id,
        customer_id,
        claim_type,
        incident_date,
        claim_amount,
        description,
        incident_location,
        police_report_number,
        witness_info,
    } = payload;

    let (
        Some(policy_id),
        Some(customer_id),
        Some(claim_type),
        Some(incident_date),
        Some(claim_amount),
        Some(description),
    ) = (
        policy_id,
        customer_id,
        claim_type,
        incident_date,
        claim_amount,
        description,
    )
    else {
        return Err(AppError::BadRequest(
            "Policy ID, customer ID, claim type, incident date, claim amount, \
             and description are required"
                .to_string(),
        ));
    };

    let owned: Option<i64> =
        sqlx::query_scalar("SELECT id FROM policies WHERE id = ? AND customer_id = ?")
            .bind(policy_id)
            .bind(customer_id)
            .fetch_optional(&state.db)
            .await
            .context("Failed to submit claim")?;

    if owned.is_none() {
        return Err(AppError::BadRequest(
            "Policy not found or does not belong to customer".to_string(),
        ));
    }

    let claim_number = ids::record_number(ids::CLAIM_PREFIX);

    let result = sqlx::query(
        r#"
        INSERT INTO claims (
            claim_number, policy_id, customer_id, claim_type, incident_date,
            claim_amount, description, incident_location, police_report_number,
            witness_info
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&claim_number)
    .bind(policy_id)
    .bind(customer_id)
    .bind(&claim_type)
    .bind(&incident_date)
    .bind(claim_amount)
    .bind(&description)
    .bind(&incident_location)
    .bind(&police_report_number)
    .bind(&witness_info)
    .execute(&state.db)
    .await
    .context("Failed to submit claim")?;

    let new_claim: ClaimListRow = sqlx::query_as(&format!(
        "{} AND cl.id = ?",
        CLAIM_LIST_BASE
    ))
    .bind(result.last_insert_rowid())
    .fetch_one(&state.db)
    .await
    .context("Failed to submit claim")?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": new_claim,
            "message": "Claim submitted successfully",
        })),
    ))
}

/// PUT /api/claims/:id/status
///
/// approved_amount and notes are only written when present in the payload.
pub async fn update_claim_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<ClaimStatusUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status = validate_claim_status(payload.status.as_deref())?;

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE claims SET status = ");
    builder.push_bind(&status);
    if let Some(approved_amount) = payload.approved_amount {
        builder.push(", approved_amount = ");
        builder.push_bind(approved_amount);
    }
    if let Some(notes) = &payload.notes {
        builder.push(", notes = ");
        builder.push_bind(notes);
    }
    builder.push(", updated_at = CURRENT_TIMESTAMP WHERE id = ");
    builder.push_bind(id);

    let result = builder
        .build()
        .execute(&state.db)
        .await
        .context("Failed to update claim status")?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Claim not found".to_string()));
    }

    let updated: ClaimListRow = sqlx::query_as(&format!("{} AND cl.id = ?", CLAIM_LIST_BASE))
        .bind(id)
        .fetch_one(&state.db)
        .await
        .context("Failed to update claim status")?;

    Ok(Json(json!({
        "success": true,
        "data": updated,
        "message": "Claim status updated successfully",
    })))
}

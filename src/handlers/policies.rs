//! Policy lifecycle: filtered listing, quick search, create, full update,
//! status and underwriting transitions, guarded delete.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::errors::{AppError, ResultExt};
use crate::ids;
use crate::models::{
    CoverageDetail, NewPolicy, Policy, PolicyDetailRow, PolicyFilter, PolicyListRow,
    PolicySearchRow, PolicyStatusUpdate, SearchQuery, UnderwritingUpdate, UpdatePolicy,
};
use crate::query::FilterBuilder;
use crate::validators::{validate_policy_status, validate_underwriting_status};

use super::{ApiQuery, AppState};

const POLICY_LIST_BASE: &str = "\
    SELECT p.*, c.first_name, c.last_name, c.customer_number, \
           b.first_name AS broker_first_name, b.last_name AS broker_last_name, \
           b.company_name AS broker_company \
    FROM policies p \
    JOIN customers c ON p.customer_id = c.id \
    LEFT JOIN brokers b ON p.broker_id = b.id \
    WHERE 1=1";

const POLICY_JOINED: &str = "\
    SELECT p.*, c.first_name, c.last_name, c.customer_number \
    FROM policies p \
    JOIN customers c ON p.customer_id = c.id \
    WHERE p.id = ?";

/// GET /api/policies
pub async fn list_policies(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<PolicyFilter>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut f = FilterBuilder::new(POLICY_LIST_BASE);
    f.eq("p.customer_id", filter.customer_id);
    f.eq("p.policy_type", filter.policy_type);
    f.eq("p.status", filter.status);
    f.like("p.policy_number", filter.policy_number.as_deref());
    f.like_any(
        &[
            "c.first_name",
            "c.last_name",
            "c.first_name || ' ' || c.last_name",
        ],
        filter.customer_name.as_deref(),
    );
    f.like("p.product_name", filter.product_name.as_deref());
    f.gte("p.start_date", filter.date_from);
    f.lte("p.start_date", filter.date_to);
    f.gte("p.coverage_amount", filter.coverage_min);
    f.lte("p.coverage_amount", filter.coverage_max);
    f.order_by("p.created_at DESC");

    let policies: Vec<PolicyListRow> = f
        .build_query_as()
        .fetch_all(&state.db)
        .await
        .context("Failed to fetch policies")?;

    Ok(Json(json!({
        "success": true,
        "data": policies,
        "count": policies.len(),
    })))
}

/// GET /api/policies/search?q=
pub async fn search_policies(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let q = params
        .q
        .ok_or_else(|| AppError::BadRequest("Search query is required".to_string()))?;

    let mut f = FilterBuilder::new(
        "SELECT p.*, c.first_name, c.last_name, c.customer_number \
         FROM policies p \
         JOIN customers c ON p.customer_id = c.id \
         WHERE 1=1",
    );
    f.like_any(
        &["p.policy_number", "p.product_name", "c.first_name", "c.last_name"],
        Some(&q),
    );
    f.order_by("p.policy_number");

    let policies: Vec<PolicySearchRow> = f
        .build_query_as()
        .fetch_all(&state.db)
        .await
        .context("Policy search failed")?;

    Ok(Json(json!({
        "success": true,
        "data": policies,
        "count": policies.len(),
        "query": q,
    })))
}

/// GET /api/policies/:id
///
/// Single policy with its owner's identity columns and nested coverage lines.
pub async fn get_policy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let policy: PolicyDetailRow = sqlx::query_as(
        "SELECT p.*, c.first_name, c.last_name, c.customer_number, c.email \
         FROM policies p \
         JOIN customers c ON p.customer_id = c.id \
         WHERE p.id = ?",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await
    .context("Failed to fetch policy")?
    .ok_or_else(|| AppError::NotFound("Policy not found".to_string()))?;

    let coverage_details: Vec<CoverageDetail> =
        sqlx::query_as("SELECT * FROM coverage_details WHERE policy_id = ?")
            .bind(id)
            .fetch_all(&state.db)
            .await
            .context("Failed to fetch policy")?;

    let mut data = serde_json::to_value(&policy)?;
    data["coverage_details"] = json!(coverage_details);

    Ok(Json(json!({ "success": true, "data": data })))
}

/// POST /api/policies
///
/// broker_id is mandatory; the policy row and its coverage lines are written
/// in one transaction so a failed line insert never leaves a partial policy.
pub async fn create_policy(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewPolicy>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let NewPolicy {
        customer_id,
        broker_id,
        policy_type,
        product_name,
        coverage_amount,
        premium_amount,
        deductible,
        policy_term,
        start_date,
        end_date,
        coverage_details,
    } = payload;

    let (
        Some(customer_id),
        Some(broker_id),
        Some(policy_type),
        Some(product_name),
        Some(coverage_amount),
        Some(premium_amount),
        Some(start_date),
        Some(end_date),
    ) = (
        customer_id,
        broker_id,
        policy_type,
        product_name,
        coverage_amount,
        premium_amount,
        start_date,
        end_date,
    )
    else {
        return Err(AppError::BadRequest(
            "Customer ID, Broker ID, policy type, product name, coverage amount, \
             premium amount, start date, and end date are required"
                .to_string(),
        ));
    };

    let policy_number = ids::record_number(ids::POLICY_PREFIX);

    let mut tx = state.db.begin().await.context("Failed to create policy")?;

    let result = sqlx::query(
        r#"
        INSERT INTO policies (
            policy_number, customer_id, broker_id, policy_type, product_name,
            coverage_amount, premium_amount, deductible, policy_term,
            start_date, end_date
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&policy_number)
    .bind(customer_id)
    .bind(broker_id)
    .bind(&policy_type)
    .bind(&product_name)
    .bind(coverage_amount)
    .bind(premium_amount)
    .bind(deductible)
    .bind(policy_term)
    .bind(&start_date)
    .bind(&end_date)
    .execute(&mut *tx)
    .await
    .context("Failed to create policy")?;

    let policy_id = result.last_insert_rowid();

    for coverage in &coverage_details {
        sqlx::query(
            r#"
            INSERT INTO coverage_details (policy_id, coverage_type, coverage_limit, deductible, premium_portion)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(policy_id)
        .bind(&coverage.coverage_type)
        .bind(coverage.coverage_limit)
        .bind(coverage.deductible)
        .bind(coverage.premium_portion)
        .execute(&mut *tx)
        .await
        .context("Failed to create policy")?;
    }

    tx.commit().await.context("Failed to create policy")?;

    let new_policy: Policy = sqlx::query_as("SELECT * FROM policies WHERE id = ?")
        .bind(policy_id)
        .fetch_one(&state.db)
        .await
        .context("Failed to create policy")?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": new_policy,
            "message": "Policy created successfully",
        })),
    ))
}

/// PUT /api/policies/:id
///
/// Full field replace.
pub async fn update_policy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePolicy>,
) -> Result<Json<serde_json::Value>, AppError> {
    let UpdatePolicy {
        policy_type,
        product_name,
        coverage_amount,
        premium_amount,
        deductible,
        policy_term,
        start_date,
        end_date,
        notes,
    } = payload;

    let (
        Some(policy_type),
        Some(product_name),
        Some(coverage_amount),
        Some(premium_amount),
        Some(start_date),
        Some(end_date),
    ) = (
        policy_type,
        product_name,
        coverage_amount,
        premium_amount,
        start_date,
        end_date,
    )
    else {
        return Err(AppError::BadRequest(
            "Policy type, product name, coverage amount, premium amount, \
             start date, and end date are required"
                .to_string(),
        ));
    };

    let result = sqlx::query(
        r#"
        UPDATE policies
        SET policy_type = ?, product_name = ?, coverage_amount = ?, premium_amount = ?,
            deductible = ?, policy_term = ?, start_date = ?, end_date = ?, notes = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&policy_type)
    .bind(&product_name)
    .bind(coverage_amount)
    .bind(premium_amount)
    .bind(deductible)
    .bind(policy_term)
    .bind(&start_date)
    .bind(&end_date)
    .bind(&notes)
    .bind(id)
    .execute(&state.db)
    .await
    .context("Failed to update policy")?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Policy not found".to_string()));
    }

    let updated: PolicySearchRow = sqlx::query_as(POLICY_JOINED)
        .bind(id)
        .fetch_one(&state.db)
        .await
        .context("Failed to update policy")?;

    Ok(Json(json!({
        "success": true,
        "data": updated,
        "message": "Policy updated successfully",
    })))
}

/// PUT /api/policies/:id/status
///
/// Status must belong to the fixed enum; no partial update on rejection.
pub async fn update_policy_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<PolicyStatusUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status = validate_policy_status(payload.status.as_deref())?;

    let result = sqlx::query(
        "UPDATE policies SET status = ?, notes = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(&status)
    .bind(payload.notes.as_deref().unwrap_or(""))
    .bind(id)
    .execute(&state.db)
    .await
    .context("Failed to update policy status")?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Policy not found".to_string()));
    }

    let updated: PolicySearchRow = sqlx::query_as(POLICY_JOINED)
        .bind(id)
        .fetch_one(&state.db)
        .await
        .context("Failed to update policy status")?;

    Ok(Json(json!({
        "success": true,
        "data": updated,
        "message": "Policy status updated successfully",
    })))
}

/// PUT /api/policies/:id/underwriting
///
/// The status side effect (approved → active, rejected → rejected, anything
/// else leaves status alone) is evaluated inside the same UPDATE statement,
/// so no intermediate state is ever observable.
pub async fn update_underwriting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UnderwritingUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    let underwriting_status = validate_underwriting_status(payload.underwriting_status.as_deref())?;

    let result = sqlx::query(
        r#"
        UPDATE policies
        SET underwriting_status = ?, risk_score = ?, notes = ?,
            status = CASE WHEN ? = 'approved' THEN 'active'
                          WHEN ? = 'rejected' THEN 'rejected'
                          ELSE status END,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&underwriting_status)
    .bind(payload.risk_score)
    .bind(&payload.notes)
    .bind(&underwriting_status)
    .bind(&underwriting_status)
    .bind(id)
    .execute(&state.db)
    .await
    .context("Failed to update policy underwriting")?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Policy not found".to_string()));
    }

    let updated: Policy = sqlx::query_as("SELECT * FROM policies WHERE id = ?")
        .bind(id)
        .fetch_one(&state.db)
        .await
        .context("Failed to update policy underwriting")?;

    Ok(Json(json!({
        "success": true,
        "data": updated,
        "message": "Policy underwriting updated successfully",
    })))
}

/// DELETE /api/policies/:id
///
/// Blocked while claims reference the policy. The claim check, coverage-line
/// cleanup and delete run in one transaction so a concurrent claim insert
/// cannot slip between check and delete.
pub async fn delete_policy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut tx = state.db.begin().await.context("Failed to delete policy")?;

    let claim_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM claims WHERE policy_id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to delete policy")?;

    if claim_count > 0 {
        return Err(AppError::BadRequest(
            "Cannot delete policy with existing claims. Please handle claims first.".to_string(),
        ));
    }

    sqlx::query("DELETE FROM coverage_details WHERE policy_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete policy")?;

    let result = sqlx::query("DELETE FROM policies WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete policy")?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Policy not found".to_string()));
    }

    tx.commit().await.context("Failed to delete policy")?;

    Ok(Json(json!({
        "success": true,
        "message": "Policy deleted successfully",
    })))
}

//! Administrative customer management and the reset-database maintenance
//! endpoint.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use sqlx::{QueryBuilder, Sqlite};
use std::sync::Arc;

use crate::errors::{is_unique_violation, AppError, ResultExt};
use crate::ids;
use crate::models::{AdminCustomerRow, AdminNewCustomer, AdminUpdateCustomer, Customer};
use crate::password::hash_password;
use crate::seed;

use super::AppState;

/// POST /api/admin/reset-database
///
/// Wipes every table and reseeds the demo fixtures. The maintenance lock
/// serializes concurrent resets so two callers cannot interleave the wipe
/// and reseed phases.
pub async fn reset_database(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let _guard = state.reset_lock.lock().await;

    tracing::info!("Database reset requested");
    seed::reset_database(&state.db)
        .await
        .context("Failed to reset database")?;
    tracing::info!("Database reset and reseeded successfully");

    Ok(Json(json!({
        "success": true,
        "message": "Database has been reset and reseeded with fresh test data",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })))
}

/// GET /api/admin/customers
///
/// Listing with per-customer policy and claim counts. Counted via correlated
/// subqueries; a flat LEFT JOIN over both tables would multiply the counts.
pub async fn list_customers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let customers: Vec<AdminCustomerRow> = sqlx::query_as(
        "SELECT c.*, a.first_name AS agent_first_name, a.last_name AS agent_last_name, \
                (SELECT COUNT(*) FROM policies p WHERE p.customer_id = c.id) AS policy_count, \
                (SELECT COUNT(*) FROM claims cl WHERE cl.customer_id = c.id) AS claim_count \
         FROM customers c \
         LEFT JOIN agents a ON c.agent_id = a.id \
         ORDER BY c.created_at DESC",
    )
    .fetch_all(&state.db)
    .await
    .context("Failed to fetch customers")?;

    Ok(Json(json!({
        "success": true,
        "data": customers,
        "count": customers.len(),
    })))
}

/// POST /api/admin/customers
///
/// Like self-service registration but may also set credit_score, kyc_status
/// and agent assignment.
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AdminNewCustomer>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let AdminNewCustomer {
        email,
        password,
        first_name,
        last_name,
        date_of_birth,
        phone,
        address,
        city,
        state: customer_state,
        zip_code,
        ssn,
        employment_status,
        annual_income,
        credit_score,
        kyc_status,
        customer_type,
        agent_id,
    } = payload;

    let (Some(email), Some(password), Some(first_name), Some(last_name)) =
        (email, password, first_name, last_name)
    else {
        return Err(AppError::BadRequest(
            "Email, password, first name, and last name are required".to_string(),
        ));
    };

    let customer_number = ids::record_number(ids::CUSTOMER_PREFIX);
    let password_hash = hash_password(&password)?;

    let result = sqlx::query(
        r#"
        INSERT INTO customers (
            customer_number, email, password, first_name, last_name, date_of_birth,
            phone, address, city, state, zip_code, ssn, employment_status,
            annual_income, credit_score, kyc_status, customer_type, agent_id
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&customer_number)
    .bind(&email)
    .bind(&password_hash)
    .bind(&first_name)
    .bind(&last_name)
    .bind(&date_of_birth)
    .bind(&phone)
    .bind(&address)
    .bind(&city)
    .bind(&customer_state)
    .bind(&zip_code)
    .bind(&ssn)
    .bind(&employment_status)
    .bind(annual_income)
    .bind(credit_score)
    .bind(kyc_status.as_deref().unwrap_or("pending"))
    .bind(customer_type.as_deref().unwrap_or("individual"))
    .bind(agent_id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Customer with this email already exists".to_string())
        } else {
            AppError::DatabaseError(e)
        }
    })?;

    let new_customer: Customer = sqlx::query_as("SELECT * FROM customers WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&state.db)
        .await
        .context("Failed to create customer")?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": new_customer,
            "message": "Customer created successfully",
        })),
    ))
}

/// PUT /api/admin/customers/:id
///
/// Partial update restricted to the fields of [`AdminUpdateCustomer`];
/// absent fields stay untouched, a supplied password is re-hashed.
pub async fn update_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<AdminUpdateCustomer>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE customers SET updated_at = CURRENT_TIMESTAMP");

    macro_rules! set_field {
        ($column:literal, $value:expr) => {
            if let Some(value) = $value {
                builder.push(concat!(", ", $column, " = "));
                builder.push_bind(value);
            }
        };
    }

    set_field!("email", payload.email);
    if let Some(password) = payload.password {
        let hash = hash_password(&password)?;
        builder.push(", password = ");
        builder.push_bind(hash);
    }
    set_field!("first_name", payload.first_name);
    set_field!("last_name", payload.last_name);
    set_field!("date_of_birth", payload.date_of_birth);
    set_field!("phone", payload.phone);
    set_field!("address", payload.address);
    set_field!("city", payload.city);
    set_field!("state", payload.state);
    set_field!("zip_code", payload.zip_code);
    set_field!("ssn", payload.ssn);
    set_field!("employment_status", payload.employment_status);
    set_field!("annual_income", payload.annual_income);
    set_field!("credit_score", payload.credit_score);
    set_field!("kyc_status", payload.kyc_status);
    set_field!("customer_type", payload.customer_type);
    set_field!("agent_id", payload.agent_id);

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder
        .build()
        .execute(&state.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Customer with this email already exists".to_string())
            } else {
                AppError::DatabaseError(e)
            }
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Customer not found".to_string()));
    }

    let updated: Customer = sqlx::query_as("SELECT * FROM customers WHERE id = ?")
        .bind(id)
        .fetch_one(&state.db)
        .await
        .context("Failed to update customer")?;

    Ok(Json(json!({
        "success": true,
        "data": updated,
        "message": "Customer updated successfully",
    })))
}

/// DELETE /api/admin/customers/:id
///
/// Hard delete. Policies and claims referencing the customer are left in
/// place; referential integrity is not enforced at the storage layer.
pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("DELETE FROM customers WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await
        .context("Failed to delete customer")?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Customer not found".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Customer deleted successfully",
    })))
}

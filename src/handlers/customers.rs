//! Customer registration, lookup and filtered listing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::errors::{is_unique_violation, AppError, ResultExt};
use crate::ids;
use crate::models::{Claim, Customer, CustomerFilter, CustomerListRow, NewCustomer, Policy, SearchQuery};
use crate::password::hash_password;
use crate::query::FilterBuilder;
use crate::validators::is_valid_email;

use super::{ApiQuery, AppState};

const CUSTOMER_BASE: &str = "\
    SELECT c.*, a.first_name AS agent_first_name, a.last_name AS agent_last_name \
    FROM customers c \
    LEFT JOIN agents a ON c.agent_id = a.id \
    WHERE 1=1";

/// GET /api/customers
///
/// Filtered listing. Every present query parameter contributes one predicate;
/// age bounds are derived from date_of_birth at query time.
pub async fn list_customers(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<CustomerFilter>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut f = FilterBuilder::new(CUSTOMER_BASE);
    f.like("c.customer_number", filter.customer_number.as_deref());
    f.like("c.first_name", filter.first_name.as_deref());
    f.like("c.last_name", filter.last_name.as_deref());
    f.like("c.email", filter.email.as_deref());
    f.like("c.phone", filter.phone.as_deref());
    f.eq("c.agent_id", filter.agent_id);
    f.gte("c.annual_income", filter.income_min);
    f.lte("c.annual_income", filter.income_max);
    f.gte(
        "(julianday('now') - julianday(c.date_of_birth)) / 365.25",
        filter.age_min,
    );
    f.lte(
        "(julianday('now') - julianday(c.date_of_birth)) / 365.25",
        filter.age_max,
    );
    f.gte("c.credit_score", filter.credit_min);
    f.gte("c.created_at", filter.registration_from);
    f.eq("c.kyc_status", filter.customer_status);
    f.eq("c.customer_type", filter.customer_type);
    f.order_by("c.created_at DESC");

    let customers: Vec<CustomerListRow> = f
        .build_query_as()
        .fetch_all(&state.db)
        .await
        .context("Failed to fetch customers")?;

    Ok(Json(json!({
        "success": true,
        "data": customers,
        "count": customers.len(),
    })))
}

/// GET /api/customers/search?q=
///
/// Single-term OR-search across identity columns, including the concatenated
/// full name.
pub async fn search_customers(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let q = params
        .q
        .ok_or_else(|| AppError::BadRequest("Search query is required".to_string()))?;

    let mut f = FilterBuilder::new(CUSTOMER_BASE);
    f.like_any(
        &[
            "c.customer_number",
            "c.first_name",
            "c.last_name",
            "c.email",
            "c.phone",
            "c.first_name || ' ' || c.last_name",
        ],
        Some(&q),
    );
    f.order_by("c.customer_number");

    let customers: Vec<CustomerListRow> = f
        .build_query_as()
        .fetch_all(&state.db)
        .await
        .context("Customer search failed")?;

    Ok(Json(json!({
        "success": true,
        "data": customers,
        "count": customers.len(),
        "query": q,
    })))
}

/// GET /api/customers/:id
///
/// Single customer with nested policies and claims.
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let customer: CustomerListRow =
        sqlx::query_as(&format!("{} AND c.id = ?", CUSTOMER_BASE))
            .bind(id)
            .fetch_optional(&state.db)
            .await
            .context("Failed to fetch customer")?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

    let policies: Vec<Policy> = sqlx::query_as("SELECT * FROM policies WHERE customer_id = ?")
        .bind(id)
        .fetch_all(&state.db)
        .await
        .context("Failed to fetch customer")?;

    let claims: Vec<Claim> = sqlx::query_as("SELECT * FROM claims WHERE customer_id = ?")
        .bind(id)
        .fetch_all(&state.db)
        .await
        .context("Failed to fetch customer")?;

    let mut data = serde_json::to_value(&customer)?;
    data["policies"] = json!(policies);
    data["claims"] = json!(claims);

    Ok(Json(json!({ "success": true, "data": data })))
}

/// POST /api/customers
///
/// Self-service registration. Assigns the customer number at creation;
/// duplicate email maps to 409.
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewCustomer>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let NewCustomer {
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
        customer_type,
    } = payload;

    let (Some(email), Some(password), Some(first_name), Some(last_name)) =
        (email, password, first_name, last_name)
    else {
        return Err(AppError::BadRequest(
            "Email, password, first name, and last name are required".to_string(),
        ));
    };

    if !is_valid_email(&email) {
        return Err(AppError::BadRequest("Invalid email format".to_string()));
    }

    let customer_number = ids::record_number(ids::CUSTOMER_PREFIX);
    let password_hash = hash_password(&password)?;

    let result = sqlx::query(
        r#"
        INSERT INTO customers (
            customer_number, email, password, first_name, last_name,
            date_of_birth, phone, address, city, state, zip_code, ssn,
            employment_status, annual_income, customer_type
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
    .bind(customer_type.as_deref().unwrap_or("individual"))
    .execute(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Email already exists".to_string())
        } else {
            AppError::DatabaseError(e)
        }
    })?;

    let new_customer: Customer = sqlx::query_as("SELECT * FROM customers WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&state.db)
        .await
        .context("Failed to register customer")?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": new_customer,
            "message": "Customer registered successfully",
        })),
    ))
}

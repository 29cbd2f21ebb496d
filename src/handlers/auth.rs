//! Customer and admin credential checks.
//!
//! Both login endpoints fetch the stored Argon2 hash by identifier and verify
//! it; the same 401 message covers unknown identifier and wrong password so
//! the response does not reveal which part failed.

use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::errors::{AppError, ResultExt};
use crate::models::{Admin, AdminLoginPayload, Customer, LoginPayload};
use crate::password::verify_password;

use super::AppState;

/// POST /api/auth/login
pub async fn customer_login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    };

    let customer: Option<Customer> = sqlx::query_as("SELECT * FROM customers WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .context("Login failed")?;

    let customer = customer
        .filter(|c| verify_password(&password, &c.password))
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "customer": {
                "id": customer.id,
                "customer_number": customer.customer_number,
                "email": customer.email,
                "first_name": customer.first_name,
                "last_name": customer.last_name,
                "kyc_status": customer.kyc_status,
            },
            "token": format!("insurance-jwt-token-{}", Utc::now().timestamp_millis()),
        },
        "message": "Login successful",
    })))
}

/// POST /api/admin/login
///
/// Separate credential store from customers; inactive admins cannot log in.
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AdminLoginPayload>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    };

    let admin: Option<Admin> =
        sqlx::query_as("SELECT * FROM admins WHERE username = ? AND is_active = 1")
            .bind(&username)
            .fetch_optional(&state.db)
            .await
            .context("Login failed")?;

    let admin = admin
        .filter(|a| verify_password(&password, &a.password))
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "admin": {
                "id": admin.id,
                "username": admin.username,
                "email": admin.email,
                "first_name": admin.first_name,
                "last_name": admin.last_name,
                "role": admin.role,
                "is_super_admin": admin.is_super_admin,
            },
            "token": format!("admin-jwt-token-{}", Utc::now().timestamp_millis()),
        },
        "message": "Admin login successful",
    })))
}

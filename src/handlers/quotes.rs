//! Premium quote estimation. Quotes are computed on the fly and never
//! persisted.

use axum::{extract::State, Json};
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::json;
use std::sync::Arc;

use crate::errors::AppError;
use crate::ids;
use crate::models::QuoteParams;

use super::{ApiQuery, AppState};

/// Base monthly rate per policy type; unknown types fall back to the default.
fn base_rate(policy_type: Option<&str>) -> f64 {
    match policy_type {
        Some("auto") => 150.0,
        Some("home") => 120.0,
        Some("life") => 80.0,
        _ => 100.0,
    }
}

/// GET /api/quotes
///
/// Deterministic estimate: base rate scaled by the square root of coverage
/// relative to 100k, with a 1% adjustment per year of age away from 30.
pub async fn get_quote(
    State(_state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<QuoteParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let coverage_amount = params
        .coverage_amount
        .ok_or_else(|| AppError::BadRequest("Coverage amount is required".to_string()))?;

    let rate = base_rate(params.policy_type.as_deref());
    let coverage_multiplier = (coverage_amount / 100_000.0).sqrt();
    let age_multiplier = params
        .customer_age
        .map(|age| 1.0 + (age - 30.0) * 0.01)
        .unwrap_or(1.0);

    let estimated_premium = rate * coverage_multiplier * age_multiplier;
    let estimated_premium = (estimated_premium * 100.0).round() / 100.0;

    let valid_until = (Utc::now() + Duration::days(30)).to_rfc3339_opts(SecondsFormat::Millis, true);

    Ok(Json(json!({
        "success": true,
        "data": {
            "policy_type": params.policy_type,
            "coverage_amount": coverage_amount,
            "estimated_premium": estimated_premium,
            "quote_id": ids::record_number(ids::QUOTE_PREFIX),
            "valid_until": valid_until,
        },
    })))
}

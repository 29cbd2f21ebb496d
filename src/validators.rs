//! Fixed-enum and format validation applied before any write.

use crate::errors::AppError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Allowed policy lifecycle statuses.
pub const POLICY_STATUSES: &[&str] = &[
    "submission",
    "quoted",
    "booked",
    "declined",
    "cancelled",
    "expired",
];

/// Allowed underwriting statuses.
pub const UNDERWRITING_STATUSES: &[&str] =
    &["pending", "approved", "rejected", "requires_review"];

/// Allowed claim statuses.
pub const CLAIM_STATUSES: &[&str] = &[
    "submitted",
    "under_review",
    "approved",
    "denied",
    "paid",
    "closed",
];

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

fn check_enum(value: Option<&str>, allowed: &[&str], label: &str) -> Result<String, AppError> {
    match value {
        Some(v) if allowed.contains(&v) => Ok(v.to_string()),
        _ => Err(AppError::BadRequest(format!(
            "{} must be one of: {}",
            label,
            allowed.join(", ")
        ))),
    }
}

/// Validates a policy status, returning the 400 message listing allowed values.
pub fn validate_policy_status(value: Option<&str>) -> Result<String, AppError> {
    check_enum(value, POLICY_STATUSES, "Status")
}

/// Validates an underwriting status.
pub fn validate_underwriting_status(value: Option<&str>) -> Result<String, AppError> {
    check_enum(value, UNDERWRITING_STATUSES, "Underwriting status")
}

/// Validates a claim status.
pub fn validate_claim_status(value: Option<&str>) -> Result<String, AppError> {
    check_enum(value, CLAIM_STATUSES, "Status")
}

/// Email format check shared by customer and broker creation.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

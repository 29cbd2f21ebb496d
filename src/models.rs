use chrono::{NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

// ============ Database Models ============

/// A registered customer. The `password` column stores an Argon2 hash and is
/// never serialized into responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: i64,
    pub customer_number: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub ssn: Option<String>,
    pub employment_status: Option<String>,
    pub annual_income: Option<f64>,
    pub credit_score: Option<i64>,
    pub kyc_status: String,
    pub customer_type: String,
    pub agent_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// An in-house sales agent. Seed-only; the API surface is read-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Agent {
    pub id: i64,
    pub agent_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub commission_rate: Option<f64>,
    pub territory: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// An external broker. Every policy references one.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Broker {
    pub id: i64,
    pub broker_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub company_name: Option<String>,
    pub commission_rate: Option<f64>,
    pub territory: Option<String>,
    pub specialization: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// An insurance policy. `status` and `underwriting_status` are tracked
/// independently; underwriting approval/rejection side-effects `status`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Policy {
    pub id: i64,
    pub policy_number: String,
    pub customer_id: i64,
    pub broker_id: i64,
    pub policy_type: String,
    pub product_name: String,
    pub coverage_amount: f64,
    pub premium_amount: f64,
    pub deductible: Option<f64>,
    pub policy_term: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub underwriting_status: String,
    pub risk_score: Option<i64>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// An insurance claim filed against a policy.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Claim {
    pub id: i64,
    pub claim_number: String,
    pub policy_id: i64,
    pub customer_id: i64,
    pub claim_type: String,
    pub incident_date: NaiveDate,
    pub reported_date: Option<NaiveDate>,
    pub claim_amount: f64,
    pub approved_amount: Option<f64>,
    pub status: String,
    pub priority: String,
    pub adjuster_id: Option<i64>,
    pub description: String,
    pub incident_location: Option<String>,
    pub police_report_number: Option<String>,
    pub witness_info: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A coverage line item owned by exactly one policy.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CoverageDetail {
    pub id: i64,
    pub policy_id: i64,
    pub coverage_type: String,
    pub coverage_limit: f64,
    pub deductible: Option<f64>,
    pub premium_portion: Option<f64>,
    pub is_active: bool,
}

/// A document attached to a claim.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClaimDocument {
    pub id: i64,
    pub claim_id: i64,
    pub document_type: String,
    pub file_name: String,
    pub file_path: Option<String>,
    pub file_size: Option<i64>,
    pub uploaded_at: NaiveDateTime,
}

/// An administrator, in a credential store separate from customers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_super_admin: bool,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// ============ Joined Rows ============
//
// The list and detail endpoints return parent-entity columns alongside each
// row, mirroring the JOINs in the SQL. `#[sqlx(flatten)]` maps the shared
// columns, serde `flatten` keeps the JSON shape flat.

#[derive(Debug, FromRow, Serialize)]
pub struct CustomerListRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub customer: Customer,
    pub agent_first_name: Option<String>,
    pub agent_last_name: Option<String>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct AdminCustomerRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub customer: Customer,
    pub agent_first_name: Option<String>,
    pub agent_last_name: Option<String>,
    pub policy_count: i64,
    pub claim_count: i64,
}

#[derive(Debug, FromRow, Serialize)]
pub struct PolicyListRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub policy: Policy,
    pub first_name: String,
    pub last_name: String,
    pub customer_number: String,
    pub broker_first_name: Option<String>,
    pub broker_last_name: Option<String>,
    pub broker_company: Option<String>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct PolicySearchRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub policy: Policy,
    pub first_name: String,
    pub last_name: String,
    pub customer_number: String,
}

#[derive(Debug, FromRow, Serialize)]
pub struct PolicyDetailRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub policy: Policy,
    pub first_name: String,
    pub last_name: String,
    pub customer_number: String,
    pub email: String,
}

#[derive(Debug, FromRow, Serialize)]
pub struct ClaimListRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub claim: Claim,
    pub first_name: String,
    pub last_name: String,
    pub customer_number: String,
    pub policy_number: String,
    pub product_name: String,
}

#[derive(Debug, FromRow, Serialize)]
pub struct ClaimDetailRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub claim: Claim,
    pub first_name: String,
    pub last_name: String,
    pub customer_number: String,
    pub email: String,
    pub policy_number: String,
    pub product_name: String,
    pub coverage_amount: f64,
}

// ============ Request Payloads ============
//
// Required fields are `Option` on purpose: presence is validated in the
// handlers so missing fields produce the API's 400 messages instead of a
// deserialization rejection.

#[derive(Debug, Deserialize)]
pub struct NewCustomer {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub ssn: Option<String>,
    pub employment_status: Option<String>,
    pub annual_income: Option<f64>,
    pub customer_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminNewCustomer {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub ssn: Option<String>,
    pub employment_status: Option<String>,
    pub annual_income: Option<f64>,
    pub credit_score: Option<i64>,
    pub kyc_status: Option<String>,
    pub customer_type: Option<String>,
    pub agent_id: Option<i64>,
}

/// Partial update for the admin customer endpoint. Absent fields are left
/// untouched; only whitelisted columns can change.
#[derive(Debug, Deserialize)]
pub struct AdminUpdateCustomer {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub ssn: Option<String>,
    pub employment_status: Option<String>,
    pub annual_income: Option<f64>,
    pub credit_score: Option<i64>,
    pub kyc_status: Option<String>,
    pub customer_type: Option<String>,
    pub agent_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginPayload {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewPolicy {
    pub customer_id: Option<i64>,
    pub broker_id: Option<i64>,
    pub policy_type: Option<String>,
    pub product_name: Option<String>,
    pub coverage_amount: Option<f64>,
    pub premium_amount: Option<f64>,
    pub deductible: Option<f64>,
    pub policy_term: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub coverage_details: Vec<NewCoverageDetail>,
}

#[derive(Debug, Deserialize)]
pub struct NewCoverageDetail {
    pub coverage_type: Option<String>,
    pub coverage_limit: Option<f64>,
    pub deductible: Option<f64>,
    pub premium_portion: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePolicy {
    pub policy_type: Option<String>,
    pub product_name: Option<String>,
    pub coverage_amount: Option<f64>,
    pub premium_amount: Option<f64>,
    pub deductible: Option<f64>,
    pub policy_term: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PolicyStatusUpdate {
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UnderwritingUpdate {
    pub underwriting_status: Option<String>,
    pub risk_score: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewClaim {
    pub policy_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub claim_type: Option<String>,
    pub incident_date: Option<String>,
    pub claim_amount: Option<f64>,
    pub description: Option<String>,
    pub incident_location: Option<String>,
    pub police_report_number: Option<String>,
    pub witness_info: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClaimStatusUpdate {
    pub status: Option<String>,
    pub approved_amount: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BrokerPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub company_name: Option<String>,
    pub commission_rate: Option<f64>,
    pub territory: Option<String>,
    pub specialization: Option<String>,
    pub status: Option<String>,
}

// ============ Filter Parameters ============
//
// One struct per filtered list endpoint. Every field is optional; empty
// strings are treated as absent so they never produce a `LIKE '%%'` trap,
// and malformed numeric values reject the request with a 400 instead of
// being coerced.

fn empty_str_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}

fn empty_f64_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid numeric value: {}", s))),
    }
}

fn empty_i64_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid integer value: {}", s))),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomerFilter {
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub customer_number: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_i64_as_none")]
    pub agent_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_f64_as_none")]
    pub income_min: Option<f64>,
    #[serde(default, deserialize_with = "empty_f64_as_none")]
    pub income_max: Option<f64>,
    #[serde(default, deserialize_with = "empty_i64_as_none")]
    pub age_min: Option<i64>,
    #[serde(default, deserialize_with = "empty_i64_as_none")]
    pub age_max: Option<i64>,
    #[serde(default, deserialize_with = "empty_i64_as_none")]
    pub credit_min: Option<i64>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub registration_from: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub customer_status: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub customer_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PolicyFilter {
    #[serde(default, deserialize_with = "empty_i64_as_none")]
    pub customer_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub policy_type: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub policy_number: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub date_from: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub date_to: Option<String>,
    #[serde(default, deserialize_with = "empty_f64_as_none")]
    pub coverage_min: Option<f64>,
    #[serde(default, deserialize_with = "empty_f64_as_none")]
    pub coverage_max: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClaimFilter {
    #[serde(default, deserialize_with = "empty_i64_as_none")]
    pub customer_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_i64_as_none")]
    pub policy_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub priority: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BrokerFilter {
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub broker_code: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub territory: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub specialization: Option<String>,
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    #[serde(default, deserialize_with = "empty_str_as_none")]
    pub policy_type: Option<String>,
    #[serde(default, deserialize_with = "empty_f64_as_none")]
    pub coverage_amount: Option<f64>,
    #[serde(default, deserialize_with = "empty_f64_as_none")]
    pub customer_age: Option<f64>,
}

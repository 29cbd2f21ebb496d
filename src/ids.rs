//! Human-readable record numbers.
//!
//! Identifiers concatenate a fixed entity prefix with the wall-clock
//! millisecond timestamp (`CUST1700000000000`). Broker codes keep only the
//! last six digits to stay short. Uniqueness is backstopped by the UNIQUE
//! constraints on the record-number columns; a collision surfaces to the
//! caller as a conflict response. Adequate for this test system's request
//! rate, not a production identifier scheme.

use chrono::Utc;

pub const CUSTOMER_PREFIX: &str = "CUST";
pub const POLICY_PREFIX: &str = "POL";
pub const CLAIM_PREFIX: &str = "CLM";
pub const QUOTE_PREFIX: &str = "QTE";
pub const BROKER_PREFIX: &str = "BRK";

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// `<prefix><millisecond timestamp>`, e.g. `POL1700000000000`.
pub fn record_number(prefix: &str) -> String {
    format!("{}{}", prefix, now_millis())
}

/// `BRK<last six digits of the millisecond timestamp>`.
pub fn broker_code() -> String {
    let millis = now_millis().to_string();
    let tail = &millis[millis.len().saturating_sub(6)..];
    format!("{}{}", BROKER_PREFIX, tail)
}

//! Positional decoders for the four channel kinds.
//!
//! Each decoder is a pure function from a data frame's payload (everything
//! after the channel id) to a tagged decode result. Snapshot and incremental
//! shapes are matched explicitly, snapshot first; payloads matching neither
//! decode to `None` and are dropped by the dispatcher (unknown shapes are
//! treated as forward-compatible noise, not corruption).

pub mod book;
pub mod ticker;
pub mod trades;
pub mod user;

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Extract a decimal from a positional field.
///
/// Goes through the number's literal form so precision survives regardless of
/// how serde_json represents the value internally.
pub(crate) fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s).ok(),
        _ => None,
    }
}

/// Extract an opaque identifier from a positional field.
///
/// The wire sends identifiers as numbers in snapshots and strings in
/// incremental updates; both are carried as strings and never parsed
/// numerically.
pub(crate) fn as_opaque_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract a timestamp from a positional field.
pub(crate) fn as_timestamp(value: &Value) -> Option<i64> {
    value.as_i64()
}

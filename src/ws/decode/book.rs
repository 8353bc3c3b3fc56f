//! Order book frame decoder.
//!
//! Field order depends on the subscription's precision: raw (`R0`) levels are
//! `[order_id, price, amount]`, aggregated levels are `[price, count, amount]`.

use serde_json::Value;

use crate::ws::decode::as_decimal;
use crate::ws::events::{BookLevel, BookUpdate};
use crate::ws::registry::Precision;

/// Decode a book channel payload.
///
/// A snapshot is a non-empty nested sequence of exactly-3-field entries; a
/// flat payload of at least 3 fields is a single incremental level. Any other
/// shape decodes to `None`.
pub fn decode(payload: &[Value], precision: Precision) -> Option<BookUpdate> {
    match payload.first() {
        Some(Value::Array(entries)) => {
            if entries.is_empty() {
                return None;
            }
            let levels: Option<Vec<BookLevel>> = entries
                .iter()
                .map(|entry| {
                    let fields = entry.as_array()?;
                    if fields.len() != 3 {
                        return None;
                    }
                    decode_level(fields, precision)
                })
                .collect();
            levels.map(BookUpdate::Snapshot)
        }
        Some(_) if payload.len() > 2 => {
            decode_level(&payload[..3], precision).map(BookUpdate::Entry)
        }
        _ => None,
    }
}

fn decode_level(fields: &[Value], precision: Precision) -> Option<BookLevel> {
    if precision.is_raw() {
        Some(BookLevel::Raw {
            order_id: fields[0].as_u64()?,
            price: as_decimal(&fields[1])?,
            amount: as_decimal(&fields[2])?,
        })
    } else {
        Some(BookLevel::Aggregated {
            price: as_decimal(&fields[0])?,
            count: fields[1].as_u64()?,
            amount: as_decimal(&fields[2])?,
        })
    }
}

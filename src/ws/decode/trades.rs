//! Trade tape frame decoder.

use serde_json::Value;

use crate::ws::decode::{as_decimal, as_opaque_id, as_timestamp};
use crate::ws::events::{TradeEvent, TradeUpdate};

/// Tag for a new execution.
const EXECUTED: &str = "te";
/// Tag for a correction to a prior execution.
const UPDATED: &str = "tu";

/// Decode a trades channel payload.
///
/// A snapshot is a nested sequence of 4-tuples `[seq, timestamp, price,
/// amount]`; incremental frames are tagged `"te"` (execution) or `"tu"`
/// (correction, with an extra correction id before the timestamp). Unknown
/// tags and shapes decode to `None`.
pub fn decode(payload: &[Value]) -> Option<TradeUpdate> {
    match payload.first()? {
        Value::Array(entries) => {
            let trades: Option<Vec<TradeEvent>> = entries
                .iter()
                .map(|entry| {
                    let fields = entry.as_array()?;
                    if fields.len() != 4 {
                        return None;
                    }
                    Some(TradeEvent {
                        seq: as_opaque_id(&fields[0])?,
                        id: None,
                        timestamp: as_timestamp(&fields[1])?,
                        price: as_decimal(&fields[2])?,
                        amount: as_decimal(&fields[3])?,
                    })
                })
                .collect();
            trades.map(TradeUpdate::Snapshot)
        }
        Value::String(tag) if tag == EXECUTED && payload.len() > 4 => Some(TradeUpdate::Executed(
            TradeEvent {
                seq: as_opaque_id(&payload[1])?,
                id: None,
                timestamp: as_timestamp(&payload[2])?,
                price: as_decimal(&payload[3])?,
                amount: as_decimal(&payload[4])?,
            },
        )),
        Value::String(tag) if tag == UPDATED && payload.len() > 5 => Some(TradeUpdate::Updated(
            TradeEvent {
                seq: as_opaque_id(&payload[1])?,
                id: Some(as_opaque_id(&payload[2])?),
                timestamp: as_timestamp(&payload[3])?,
                price: as_decimal(&payload[4])?,
                amount: as_decimal(&payload[5])?,
            },
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    fn payload(v: Value) -> Vec<Value> {
        v.as_array().unwrap().clone()
    }

    #[test]
    fn test_single_element_snapshot_stays_a_snapshot() {
        // An array-of-arrays is a snapshot even with one element; it must not
        // collapse into a bare incremental.
        let frames = payload(json!([[[1, 1610000000, 100, 0.5]]]));
        let update = decode(&frames).unwrap();

        match update {
            TradeUpdate::Snapshot(trades) => {
                assert_eq!(trades.len(), 1);
                assert_eq!(trades[0].seq, "1");
                assert_eq!(trades[0].id, None);
                assert_eq!(trades[0].timestamp, 1610000000);
                assert_eq!(trades[0].price, Decimal::from(100));
                assert_eq!(trades[0].amount, Decimal::from_str("0.5").unwrap());
            }
            other => panic!("expected snapshot, got {other:?}"),
        }
    }

    #[test]
    fn test_executed_trade() {
        let frames = payload(json!(["te", "1", 1610000001, 101, 0.3]));
        let update = decode(&frames).unwrap();

        match update {
            TradeUpdate::Executed(trade) => {
                assert_eq!(trade.seq, "1");
                assert_eq!(trade.id, None);
                assert_eq!(trade.timestamp, 1610000001);
                assert_eq!(trade.price, Decimal::from(101));
                assert_eq!(trade.amount, Decimal::from_str("0.3").unwrap());
            }
            other => panic!("expected execution, got {other:?}"),
        }
    }

    #[test]
    fn test_updated_trade_carries_correction_id() {
        let frames = payload(json!(["tu", "1", "c1", 1610000002, 101, 0.3]));
        let update = decode(&frames).unwrap();

        match update {
            TradeUpdate::Updated(trade) => {
                assert_eq!(trade.seq, "1");
                assert_eq!(trade.id.as_deref(), Some("c1"));
                assert_eq!(trade.timestamp, 1610000002);
            }
            other => panic!("expected correction, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_tag_is_dropped() {
        let frames = payload(json!(["tx", "1", 1610000001, 101, 0.3]));
        assert_eq!(decode(&frames), None);
    }

    #[test]
    fn test_short_executed_payload_is_dropped() {
        let frames = payload(json!(["te", "1", 1610000001]));
        assert_eq!(decode(&frames), None);
    }

    #[test]
    fn test_snapshot_with_wrong_tuple_arity_is_dropped() {
        let frames = payload(json!([[[1, 1610000000, 100]]]));
        assert_eq!(decode(&frames), None);
    }

    #[test]
    fn test_seq_is_never_parsed_numerically() {
        let frames = payload(json!(["te", "0012", 1610000001, 101, 0.3]));
        match decode(&frames).unwrap() {
            TradeUpdate::Executed(trade) => assert_eq!(trade.seq, "0012"),
            other => panic!("expected execution, got {other:?}"),
        }
    }
}

//! Account stream frame decoder.
//!
//! Account frames are `[event_type, data]`. The core only distinguishes a
//! single event from a batch; the entries themselves stay opaque JSON.

use serde_json::Value;

use crate::ws::events::UserUpdate;

/// Decode an account channel payload into its event-type tag and payload.
///
/// A nested first element of `data` marks a batch; non-empty `data` is a
/// single event; empty `data` decodes to `None`.
pub fn decode(payload: &[Value]) -> Option<(String, UserUpdate)> {
    let event_type = payload.first()?.as_str()?.to_string();
    let data = payload.get(1)?;

    let update = match data {
        Value::Array(items) if items.is_empty() => return None,
        Value::Array(items) if items[0].is_array() => UserUpdate::Batch(items.clone()),
        Value::Null => return None,
        other => UserUpdate::Single(other.clone()),
    };

    Some((event_type, update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(v: Value) -> Vec<Value> {
        v.as_array().unwrap().clone()
    }

    #[test]
    fn test_batch_shape() {
        let frames = payload(json!([
            "os",
            [[448411153, "BTCUSD", 0.05], [448411154, "BTCUSD", -0.02]]
        ]));
        let (event_type, update) = decode(&frames).unwrap();

        assert_eq!(event_type, "os");
        match update {
            UserUpdate::Batch(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0][0], json!(448411153));
            }
            other => panic!("expected batch, got {other:?}"),
        }
    }

    #[test]
    fn test_single_event_shape() {
        let frames = payload(json!(["wu", ["exchange", "USD", 1000.0]]));
        let (event_type, update) = decode(&frames).unwrap();

        assert_eq!(event_type, "wu");
        assert_eq!(update, UserUpdate::Single(json!(["exchange", "USD", 1000.0])));
    }

    #[test]
    fn test_empty_data_is_dropped() {
        let frames = payload(json!(["os", []]));
        assert_eq!(decode(&frames), None);
    }

    #[test]
    fn test_missing_data_is_dropped() {
        let frames = payload(json!(["os"]));
        assert_eq!(decode(&frames), None);
    }

    #[test]
    fn test_batch_order_is_preserved() {
        let frames = payload(json!(["ps", [[1], [2], [3]]]));
        let (_, update) = decode(&frames).unwrap();

        match update {
            UserUpdate::Batch(items) => {
                assert_eq!(items, vec![json!([1]), json!([2]), json!([3])]);
            }
            other => panic!("expected batch, got {other:?}"),
        }
    }
}

//! Ticker frame decoder.

use serde_json::Value;

use crate::ws::decode::as_decimal;
use crate::ws::events::TickerUpdate;

/// Decode a ticker channel payload into the fixed 10-field snapshot.
///
/// Payloads with 9 or fewer fields are dropped, not errored: the protocol
/// occasionally sends short updates that are not meaningful ticker states.
/// Possibly a protocol-version edge case rather than intentional behavior.
pub fn decode(payload: &[Value]) -> Option<TickerUpdate> {
    if payload.len() <= 9 {
        return None;
    }

    Some(TickerUpdate {
        bid: as_decimal(&payload[0])?,
        bid_size: as_decimal(&payload[1])?,
        ask: as_decimal(&payload[2])?,
        ask_size: as_decimal(&payload[3])?,
        daily_change: as_decimal(&payload[4])?,
        daily_change_perc: as_decimal(&payload[5])?,
        last_price: as_decimal(&payload[6])?,
        volume: as_decimal(&payload[7])?,
        high: as_decimal(&payload[8])?,
        low: as_decimal(&payload[9])?,
    })
}

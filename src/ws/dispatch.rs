//! Frame classification and dispatch.
//!
//! The dispatcher is the single entry point for inbound frames. Every frame
//! is re-emitted raw as [`StreamEvent::Message`] for observability, then
//! classified: keyed objects are control frames routed on their `event`
//! field, positional arrays are channel data routed through the registry to
//! the matching channel decoder. Nothing here is fatal: failures are local
//! drop-or-signal, never an unwind.

use serde_json::{Map, Value};

use crate::ws::decode;
use crate::ws::events::StreamEvent;
use crate::ws::messages::{AuthEvent, SubscribedEvent, UnsubscribedEvent};
use crate::ws::registry::{ChannelKind, ChannelRegistry, ChannelSubscription, Precision};

/// Heartbeat sentinel carried as the first payload element of liveness frames.
const HEARTBEAT: &str = "hb";

/// Stateful translator from raw frames to typed events for the lifetime of
/// one connection.
///
/// The dispatcher exclusively owns the channel registry; frames are handled
/// strictly one at a time and decoding is pure given fixed registry state.
///
/// # Example
///
/// ```rust
/// use bitfinex_ws_client::ws::{Dispatcher, StreamEvent};
/// use serde_json::json;
///
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.connection_opened();
///
/// let events = dispatcher.dispatch(json!({
///     "event": "subscribed", "channel": "trades", "chanId": 2, "pair": "BTCUSD"
/// }));
/// assert!(matches!(events[1], StreamEvent::Subscribed(_)));
/// ```
#[derive(Debug, Default)]
pub struct Dispatcher {
    registry: ChannelRegistry,
    connected: bool,
}

impl Dispatcher {
    /// Create a dispatcher with an empty registry.
    ///
    /// No frames are accepted until [`connection_opened`](Self::connection_opened)
    /// signals a live connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal connection establishment.
    ///
    /// Clears the registry so channel ids from a previous connection can
    /// never be observed by the new one, and starts accepting frames.
    pub fn connection_opened(&mut self) -> StreamEvent {
        self.registry.clear();
        self.connected = true;
        StreamEvent::Open
    }

    /// Signal connection teardown.
    ///
    /// Frames arriving after this are dropped until the next
    /// [`connection_opened`](Self::connection_opened).
    pub fn connection_closed(&mut self) -> StreamEvent {
        self.connected = false;
        StreamEvent::Close
    }

    /// Whether a connection is currently live.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The current channel bindings, e.g. for constructing unsubscribe
    /// requests.
    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Dispatch one raw text frame.
    ///
    /// Unparseable text is a non-fatal error: an [`StreamEvent::Error`] is
    /// emitted and the frame dropped, the connection stays open.
    pub fn dispatch_text(&mut self, text: &str) -> Vec<StreamEvent> {
        match serde_json::from_str(text) {
            Ok(frame) => self.dispatch(frame),
            Err(e) => {
                tracing::warn!("Failed to parse frame: {e}");
                if !self.connected {
                    return Vec::new();
                }
                vec![StreamEvent::Error {
                    message: format!("malformed frame: {e}"),
                    payload: None,
                }]
            }
        }
    }

    /// Dispatch one parsed frame, returning the events it produced in order.
    pub fn dispatch(&mut self, frame: Value) -> Vec<StreamEvent> {
        if !self.connected {
            tracing::trace!("Dropping frame received while disconnected");
            return Vec::new();
        }

        let mut events = vec![StreamEvent::Message(frame.clone())];
        match &frame {
            Value::Object(object) => self.handle_control(object, &frame, &mut events),
            Value::Array(items) => self.handle_data(items, &mut events),
            _ => {
                tracing::debug!("Dropping frame with unrecognized top-level shape");
            }
        }
        events
    }

    /// Handle a keyed control frame, routing on its `event` field.
    fn handle_control(
        &mut self,
        object: &Map<String, Value>,
        frame: &Value,
        events: &mut Vec<StreamEvent>,
    ) {
        let Some(event) = object.get("event").and_then(Value::as_str) else {
            tracing::debug!("Dropping control frame without an event field");
            return;
        };

        match event {
            "subscribed" => match serde_json::from_value::<SubscribedEvent>(frame.clone()) {
                Ok(ack) => {
                    self.registry.register(ack.to_subscription());
                    events.push(StreamEvent::Subscribed(ack));
                }
                Err(e) => tracing::debug!("Dropping unrecognized subscription ack: {e}"),
            },
            "unsubscribed" => match serde_json::from_value::<UnsubscribedEvent>(frame.clone()) {
                Ok(ack) => {
                    self.registry.unregister(ack.channel_id);
                    events.push(StreamEvent::Unsubscribed(ack));
                }
                Err(e) => tracing::debug!("Dropping unrecognized unsubscription ack: {e}"),
            },
            "auth" => {
                let status = object.get("status").and_then(Value::as_str);
                if status != Some("OK") {
                    events.push(StreamEvent::Error {
                        message: format!(
                            "authentication failed: {}",
                            status.unwrap_or("missing status")
                        ),
                        payload: Some(frame.clone()),
                    });
                    return;
                }
                match serde_json::from_value::<AuthEvent>(frame.clone()) {
                    Ok(ack) => {
                        self.registry
                            .register(ChannelSubscription::auth(ack.channel_id));
                        events.push(StreamEvent::AuthSuccess(ack));
                    }
                    Err(e) => tracing::debug!("Dropping unrecognized auth ack: {e}"),
                }
            }
            // Connection-level signals (info, pong, ...) are forwarded
            // verbatim under the event's own name.
            other => events.push(StreamEvent::Control {
                event: other.to_string(),
                payload: frame.clone(),
            }),
        }
    }

    /// Handle a positional data frame: element 0 is the channel id, the rest
    /// is the channel payload.
    fn handle_data(&self, items: &[Value], events: &mut Vec<StreamEvent>) {
        let Some(channel_id) = items.first().and_then(Value::as_u64) else {
            tracing::debug!("Dropping data frame without a numeric channel id");
            return;
        };
        let payload = &items[1..];

        // Heartbeats confirm liveness on every channel kind and short-circuit
        // decoding, including on the trades channel.
        if payload.first().and_then(Value::as_str) == Some(HEARTBEAT) {
            tracing::trace!(channel_id, "Heartbeat");
            events.push(StreamEvent::Heartbeat { channel_id });
            return;
        }

        // Data can outrun a slow subscription ack; unknown ids are dropped
        // silently, without an error signal.
        let Some(subscription) = self.registry.lookup(channel_id) else {
            tracing::trace!(channel_id, "Dropping data frame for unknown channel");
            return;
        };

        match subscription.kind {
            ChannelKind::Book => {
                let precision = subscription.precision.unwrap_or(Precision::P0);
                if let Some(update) = decode::book::decode(payload, precision) {
                    events.push(StreamEvent::OrderBook {
                        pair: subscription.pair.clone().unwrap_or_default(),
                        update,
                    });
                }
            }
            ChannelKind::Trades => {
                if let Some(update) = decode::trades::decode(payload) {
                    events.push(StreamEvent::Trade {
                        pair: subscription.pair.clone().unwrap_or_default(),
                        update,
                    });
                }
            }
            ChannelKind::Ticker => {
                if let Some(ticker) = decode::ticker::decode(payload) {
                    events.push(StreamEvent::Ticker {
                        pair: subscription.pair.clone().unwrap_or_default(),
                        ticker,
                    });
                }
            }
            ChannelKind::Auth => {
                if let Some((event_type, update)) = decode::user::decode(payload) {
                    events.push(StreamEvent::User { event_type, update });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::events::{BookLevel, BookUpdate, TradeUpdate, UserUpdate};
    use serde_json::json;

    fn open_dispatcher() -> Dispatcher {
        let mut dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.connection_opened(), StreamEvent::Open);
        dispatcher
    }

    fn subscribe_trades(dispatcher: &mut Dispatcher, channel_id: u64, pair: &str) {
        dispatcher.dispatch(json!({
            "event": "subscribed", "channel": "trades",
            "chanId": channel_id, "pair": pair,
        }));
    }

    #[test]
    fn test_every_frame_reemits_raw_message_first() {
        let mut dispatcher = open_dispatcher();
        let frame = json!({"event": "info", "version": 1.1});
        let events = dispatcher.dispatch(frame.clone());

        assert_eq!(events[0], StreamEvent::Message(frame));
    }

    #[test]
    fn test_subscribed_ack_registers_channel() {
        let mut dispatcher = open_dispatcher();
        let events = dispatcher.dispatch(json!({
            "event": "subscribed", "channel": "book", "chanId": 67,
            "pair": "BTCUSD", "prec": "P0", "freq": "F0", "len": "25",
        }));

        assert!(matches!(events[1], StreamEvent::Subscribed(_)));
        let sub = dispatcher.registry().lookup(67).unwrap();
        assert_eq!(sub.kind, ChannelKind::Book);
        assert_eq!(sub.precision, Some(Precision::P0));
    }

    #[test]
    fn test_unsubscribed_ack_removes_binding() {
        let mut dispatcher = open_dispatcher();
        subscribe_trades(&mut dispatcher, 2, "BTCUSD");

        let events =
            dispatcher.dispatch(json!({"event": "unsubscribed", "status": "OK", "chanId": 2}));

        assert!(matches!(events[1], StreamEvent::Unsubscribed(_)));
        assert!(dispatcher.registry().lookup(2).is_none());
    }

    #[test]
    fn test_auth_failure_is_nonfatal_error_signal() {
        let mut dispatcher = open_dispatcher();
        let frame = json!({"event": "auth", "status": "FAILED", "code": 10100});
        let events = dispatcher.dispatch(frame.clone());

        match &events[1] {
            StreamEvent::Error { payload, .. } => assert_eq!(payload.as_ref(), Some(&frame)),
            other => panic!("expected error signal, got {other:?}"),
        }
        assert!(dispatcher.is_connected());
        assert!(dispatcher.registry().is_empty());
    }

    #[test]
    fn test_auth_success_registers_account_stream() {
        let mut dispatcher = open_dispatcher();
        let events =
            dispatcher.dispatch(json!({"event": "auth", "status": "OK", "chanId": 0, "userId": 7}));

        assert!(matches!(events[1], StreamEvent::AuthSuccess(_)));
        assert_eq!(dispatcher.registry().lookup(0).unwrap().kind, ChannelKind::Auth);
    }

    #[test]
    fn test_unknown_control_event_passes_through() {
        let mut dispatcher = open_dispatcher();
        let events = dispatcher.dispatch(json!({"event": "info", "code": 20051}));

        match &events[1] {
            StreamEvent::Control { event, .. } => assert_eq!(event, "info"),
            other => panic!("expected pass-through, got {other:?}"),
        }
    }

    #[test]
    fn test_heartbeat_never_produces_domain_event() {
        let mut dispatcher = open_dispatcher();
        subscribe_trades(&mut dispatcher, 2, "BTCUSD");

        let events = dispatcher.dispatch(json!([2, "hb"]));
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], StreamEvent::Heartbeat { channel_id: 2 });

        // Heartbeats short-circuit even on channels with no registry entry.
        let events = dispatcher.dispatch(json!([99, "hb"]));
        assert_eq!(events[1], StreamEvent::Heartbeat { channel_id: 99 });
    }

    #[test]
    fn test_unknown_channel_id_is_dropped_silently() {
        let mut dispatcher = open_dispatcher();
        let events = dispatcher.dispatch(json!([42, "te", "1", 1610000001, 101, 0.3]));

        // Only the raw message signal, no domain event and no error.
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_trade_frame_routes_to_registered_pair() {
        let mut dispatcher = open_dispatcher();
        subscribe_trades(&mut dispatcher, 2, "BTCUSD");

        let events = dispatcher.dispatch(json!([2, "te", "1", 1610000001, 101, 0.3]));
        match &events[1] {
            StreamEvent::Trade { pair, update } => {
                assert_eq!(pair, "BTCUSD");
                assert!(matches!(update, TradeUpdate::Executed(_)));
            }
            other => panic!("expected trade, got {other:?}"),
        }
    }

    #[test]
    fn test_single_element_trade_snapshot_is_a_snapshot() {
        let mut dispatcher = open_dispatcher();
        subscribe_trades(&mut dispatcher, 2, "BTCUSD");

        let events = dispatcher.dispatch(json!([2, [[1, 1610000000, 100, 0.5]]]));
        match &events[1] {
            StreamEvent::Trade { update: TradeUpdate::Snapshot(trades), .. } => {
                assert_eq!(trades.len(), 1);
                assert_eq!(trades[0].seq, "1");
            }
            other => panic!("expected one-element snapshot, got {other:?}"),
        }
    }

    #[test]
    fn test_book_frame_uses_subscription_precision() {
        let mut dispatcher = open_dispatcher();
        dispatcher.dispatch(json!({
            "event": "subscribed", "channel": "book", "chanId": 5,
            "pair": "BTCUSD", "prec": "R0",
        }));

        let events = dispatcher.dispatch(json!([5, [[123456, 100.5, 1.2]]]));
        match &events[1] {
            StreamEvent::OrderBook { update: BookUpdate::Snapshot(levels), .. } => {
                assert!(matches!(levels[0], BookLevel::Raw { order_id: 123456, .. }));
            }
            other => panic!("expected raw book snapshot, got {other:?}"),
        }
    }

    #[test]
    fn test_user_frame_routes_through_auth_channel() {
        let mut dispatcher = open_dispatcher();
        dispatcher.dispatch(json!({"event": "auth", "status": "OK", "chanId": 0}));

        let events = dispatcher.dispatch(json!([0, "ws", [["exchange", "USD", 1000.0]]]));
        match &events[1] {
            StreamEvent::User { event_type, update } => {
                assert_eq!(event_type, "ws");
                assert!(matches!(update, UserUpdate::Batch(_)));
            }
            other => panic!("expected user event, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_text_is_nonfatal() {
        let mut dispatcher = open_dispatcher();
        let events = dispatcher.dispatch_text("{not json");

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], StreamEvent::Error { .. }));
        assert!(dispatcher.is_connected());

        // The connection keeps working afterwards.
        subscribe_trades(&mut dispatcher, 2, "BTCUSD");
        assert!(dispatcher.registry().lookup(2).is_some());
    }

    #[test]
    fn test_reconnect_clears_old_channel_ids() {
        let mut dispatcher = open_dispatcher();
        subscribe_trades(&mut dispatcher, 2, "BTCUSD");

        assert_eq!(dispatcher.connection_closed(), StreamEvent::Close);
        // Frames are not accepted while disconnected.
        assert!(dispatcher.dispatch(json!([2, "te", "1", 1610000001, 101, 0.3])).is_empty());

        assert_eq!(dispatcher.connection_opened(), StreamEvent::Open);
        // The old channel id is unknown until re-subscribed.
        let events = dispatcher.dispatch(json!([2, "te", "1", 1610000001, 101, 0.3]));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], StreamEvent::Message(_)));
    }

    #[test]
    fn test_redecoding_same_frame_is_idempotent() {
        let mut dispatcher = open_dispatcher();
        subscribe_trades(&mut dispatcher, 2, "BTCUSD");

        let frame = json!([2, "tu", "1", "c1", 1610000002, 101, 0.3]);
        let first = dispatcher.dispatch(frame.clone());
        let second = dispatcher.dispatch(frame);
        assert_eq!(first, second);
    }
}

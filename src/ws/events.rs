//! Typed events emitted by the dispatcher.
//!
//! The protocol's positional arrays are decoded into a closed union of event
//! types; listeners match on [`StreamEvent`] rather than string channels.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::ws::messages::{AuthEvent, SubscribedEvent, UnsubscribedEvent};

/// One order book level.
///
/// The sign of `amount` encodes the side: positive is a bid, negative an ask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookLevel {
    /// A price-bucketed level (precisions `P0`-`P3`).
    Aggregated {
        /// Price bucket.
        price: Decimal,
        /// Number of orders at this price; zero signals level removal.
        count: u64,
        /// Total amount at this price, signed by side.
        amount: Decimal,
    },
    /// A raw per-order level (precision `R0`).
    Raw {
        /// Server-assigned order id.
        order_id: u64,
        /// Order price.
        price: Decimal,
        /// Order amount, signed by side.
        amount: Decimal,
    },
}

impl BookLevel {
    /// Price of this level.
    pub fn price(&self) -> Decimal {
        match self {
            BookLevel::Aggregated { price, .. } | BookLevel::Raw { price, .. } => *price,
        }
    }

    /// Signed amount of this level.
    pub fn amount(&self) -> Decimal {
        match self {
            BookLevel::Aggregated { amount, .. } | BookLevel::Raw { amount, .. } => *amount,
        }
    }

    /// Whether this level sits on the bid side.
    pub fn is_bid(&self) -> bool {
        self.amount() > Decimal::ZERO
    }

    /// Whether this aggregated level signals removal of its price bucket.
    pub fn is_removal(&self) -> bool {
        matches!(self, BookLevel::Aggregated { count: 0, .. })
    }
}

/// A decoded order book frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookUpdate {
    /// Initial complete listing of book levels, in source order.
    Snapshot(Vec<BookLevel>),
    /// A single incremental level change.
    Entry(BookLevel),
}

/// One execution or correction on the trade tape.
///
/// `seq` and `id` are opaque identifiers; the wire sends them as numbers in
/// snapshots and strings in incremental updates, so they are carried as
/// strings and never parsed numerically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeEvent {
    /// Opaque sequence identifier.
    pub seq: String,
    /// Correction id, only present on trade updates.
    pub id: Option<String>,
    /// Execution timestamp (seconds since epoch).
    pub timestamp: i64,
    /// Execution price.
    pub price: Decimal,
    /// Executed amount.
    pub amount: Decimal,
}

/// A decoded trade tape frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeUpdate {
    /// Initial listing of recent trades, in source order.
    Snapshot(Vec<TradeEvent>),
    /// A new execution (`"te"`).
    Executed(TradeEvent),
    /// A correction to a prior execution (`"tu"`).
    Updated(TradeEvent),
}

/// Fixed 10-field ticker snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerUpdate {
    /// Best bid price.
    pub bid: Decimal,
    /// Size at the best bid.
    pub bid_size: Decimal,
    /// Best ask price.
    pub ask: Decimal,
    /// Size at the best ask.
    pub ask_size: Decimal,
    /// Absolute change over the last 24h.
    pub daily_change: Decimal,
    /// Relative change over the last 24h.
    pub daily_change_perc: Decimal,
    /// Last trade price.
    pub last_price: Decimal,
    /// 24h volume.
    pub volume: Decimal,
    /// 24h high.
    pub high: Decimal,
    /// 24h low.
    pub low: Decimal,
}

/// A decoded account stream payload.
///
/// The shape of individual entries is not validated beyond distinguishing a
/// single event from a batch; callers deserialize the parts they care about.
#[derive(Debug, Clone, PartialEq)]
pub enum UserUpdate {
    /// One event.
    Single(Value),
    /// A batch of events, in source order.
    Batch(Vec<Value>),
}

/// An event emitted by the [`Dispatcher`](crate::ws::Dispatcher).
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Raw inbound frame, re-emitted before classification for observability.
    Message(Value),
    /// Connection established; the channel registry has been reset.
    Open,
    /// Connection torn down; no further frames are accepted.
    Close,
    /// Non-fatal error: auth failure or malformed frame.
    Error {
        /// Human-readable description.
        message: String,
        /// The raw control payload, when one exists.
        payload: Option<Value>,
    },
    /// A subscription was acknowledged and registered.
    Subscribed(SubscribedEvent),
    /// A subscription was removed.
    Unsubscribed(UnsubscribedEvent),
    /// Authentication succeeded; the account stream is registered.
    AuthSuccess(AuthEvent),
    /// Pass-through for control frames the core does not decode, re-emitted
    /// verbatim under the event's own name.
    Control {
        /// The control frame's `event` value.
        event: String,
        /// The raw frame.
        payload: Value,
    },
    /// Channel liveness heartbeat; carries no domain data.
    Heartbeat {
        /// Channel the heartbeat arrived on.
        channel_id: u64,
    },
    /// Order book snapshot or level change.
    OrderBook {
        /// Trading pair of the subscription.
        pair: String,
        /// Decoded book payload.
        update: BookUpdate,
    },
    /// Trade tape snapshot, execution or correction.
    Trade {
        /// Trading pair of the subscription.
        pair: String,
        /// Decoded trade payload.
        update: TradeUpdate,
    },
    /// Ticker snapshot.
    Ticker {
        /// Trading pair of the subscription.
        pair: String,
        /// Decoded ticker fields.
        ticker: TickerUpdate,
    },
    /// Account stream event, tagged with the frame's event type (e.g. `"os"`,
    /// `"wu"`, `"ps"`).
    User {
        /// Event-type tag from the wire.
        event_type: String,
        /// Decoded payload.
        update: UserUpdate,
    },
}

//! Channel registry: connection-scoped channel id to subscription bindings.
//!
//! The Bitfinex v1 feed multiplexes every subscribed channel over one
//! connection and tags data frames with an integer channel id assigned at
//! subscription time. Those ids are connection-scoped: after a reconnect the
//! server assigns fresh ids, so the registry is cleared on every connection
//! open and must never leak bindings across connections.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The kind of a multiplexed channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Order book channel.
    Book,
    /// Trade tape channel.
    Trades,
    /// Ticker channel.
    Ticker,
    /// Authenticated account stream.
    Auth,
}

/// Order book precision / aggregation level.
///
/// `P0`-`P3` report levels aggregated into price buckets of increasing
/// coarseness; `R0` reports raw per-order levels keyed by order id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    /// Most granular aggregated precision.
    P0,
    P1,
    P2,
    /// Coarsest aggregated precision.
    P3,
    /// Raw per-order book levels.
    R0,
}

impl Precision {
    /// Whether this precision reports raw per-order levels.
    pub fn is_raw(&self) -> bool {
        matches!(self, Precision::R0)
    }
}

/// Metadata for one subscribed channel, copied verbatim from the
/// subscription-acknowledgment control frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSubscription {
    /// Connection-scoped channel id assigned by the server.
    pub channel_id: u64,
    /// What kind of channel this id carries.
    pub kind: ChannelKind,
    /// Trading pair, absent for the account stream.
    pub pair: Option<String>,
    /// Book precision, only present for book channels.
    pub precision: Option<Precision>,
}

impl ChannelSubscription {
    /// Create a book channel subscription.
    pub fn book(channel_id: u64, pair: impl Into<String>, precision: Precision) -> Self {
        Self {
            channel_id,
            kind: ChannelKind::Book,
            pair: Some(pair.into()),
            precision: Some(precision),
        }
    }

    /// Create a trades channel subscription.
    pub fn trades(channel_id: u64, pair: impl Into<String>) -> Self {
        Self {
            channel_id,
            kind: ChannelKind::Trades,
            pair: Some(pair.into()),
            precision: None,
        }
    }

    /// Create a ticker channel subscription.
    pub fn ticker(channel_id: u64, pair: impl Into<String>) -> Self {
        Self {
            channel_id,
            kind: ChannelKind::Ticker,
            pair: Some(pair.into()),
            precision: None,
        }
    }

    /// Create the authenticated account stream subscription.
    pub fn auth(channel_id: u64) -> Self {
        Self {
            channel_id,
            kind: ChannelKind::Auth,
            pair: None,
            precision: None,
        }
    }
}

/// Mapping from channel id to subscription metadata.
///
/// Owned exclusively by the dispatcher; mutated only by control frames
/// (subscription ack, auth ack, unsubscribe ack), never by data frames.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: HashMap<u64, ChannelSubscription>,
}

impl ChannelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a channel id to its subscription metadata.
    ///
    /// A later `register` for the same id overwrites the previous binding.
    pub fn register(&mut self, subscription: ChannelSubscription) {
        self.channels
            .insert(subscription.channel_id, subscription);
    }

    /// Look up the subscription for a channel id.
    pub fn lookup(&self, channel_id: u64) -> Option<&ChannelSubscription> {
        self.channels.get(&channel_id)
    }

    /// Remove a channel binding, returning it if present.
    pub fn unregister(&mut self, channel_id: u64) -> Option<ChannelSubscription> {
        self.channels.remove(&channel_id)
    }

    /// Drop every binding. Invoked once per connection lifecycle, on
    /// connection open.
    pub fn clear(&mut self) {
        self.channels.clear();
    }

    /// Number of registered channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether the registry holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Iterate over all registered subscriptions.
    pub fn iter(&self) -> impl Iterator<Item = &ChannelSubscription> {
        self.channels.values()
    }
}

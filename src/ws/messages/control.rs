//! Inbound control frames (subscription acks, auth acks).
//!
//! Control frames are keyed JSON objects carrying an `event` field, unlike
//! data frames which are positional arrays.

use serde::Deserialize;

use crate::ws::registry::{ChannelKind, ChannelSubscription, Precision};

/// Subscription acknowledgment (`event == "subscribed"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubscribedEvent {
    /// Channel id assigned by the server for this connection.
    #[serde(rename = "chanId")]
    pub channel_id: u64,
    /// Channel kind.
    pub channel: ChannelKind,
    /// Trading pair, absent for the account stream.
    #[serde(default)]
    pub pair: Option<String>,
    /// Book precision, only sent for book channels.
    #[serde(default)]
    pub prec: Option<Precision>,
    /// Update frequency, only sent for book channels.
    #[serde(default)]
    pub freq: Option<String>,
    /// Book depth, only sent for book channels.
    #[serde(default)]
    pub len: Option<String>,
}

impl SubscribedEvent {
    /// Build the registry binding for this ack, copying the channel kind and
    /// channel-specific parameters verbatim.
    pub fn to_subscription(&self) -> ChannelSubscription {
        ChannelSubscription {
            channel_id: self.channel_id,
            kind: self.channel,
            pair: self.pair.clone(),
            precision: self.prec,
        }
    }
}

/// Unsubscription acknowledgment (`event == "unsubscribed"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnsubscribedEvent {
    /// Channel id whose binding is removed.
    #[serde(rename = "chanId")]
    pub channel_id: u64,
    /// Server-reported status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Authentication acknowledgment (`event == "auth"`, `status == "OK"`).
///
/// Failed auth acks are surfaced as an error signal with the raw payload
/// instead of being deserialized into this type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthEvent {
    /// Server-reported status, `"OK"` on success.
    pub status: String,
    /// Channel id reserved for the account stream (0 in practice).
    #[serde(rename = "chanId", default)]
    pub channel_id: u64,
    /// Authenticated user id.
    #[serde(rename = "userId", default)]
    pub user_id: Option<u64>,
}

//! Outbound request messages (subscribe, unsubscribe, auth, ping).
//!
//! These are the trivial counterparts of the decoding core: plain serde
//! serialization of the v1 wire shapes, constructible from registry state.

use serde::Serialize;

use crate::auth::{sign_auth_payload, Credentials};
use crate::error::BitfinexError;
use crate::ws::registry::{ChannelKind, ChannelSubscription, Precision};

/// Channel subscription request (`event == "subscribe"`).
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeRequest {
    event: &'static str,
    /// Channel to subscribe to.
    pub channel: ChannelKind,
    /// Trading pair.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair: Option<String>,
    /// Book precision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prec: Option<Precision>,
    /// Book depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub len: Option<u32>,
}

impl SubscribeRequest {
    /// Subscribe to the order book for a pair.
    pub fn book(pair: impl Into<String>, precision: Precision) -> Self {
        Self {
            event: "subscribe",
            channel: ChannelKind::Book,
            pair: Some(pair.into()),
            prec: Some(precision),
            len: None,
        }
    }

    /// Subscribe to the trade tape for a pair.
    pub fn trades(pair: impl Into<String>) -> Self {
        Self {
            event: "subscribe",
            channel: ChannelKind::Trades,
            pair: Some(pair.into()),
            prec: None,
            len: None,
        }
    }

    /// Subscribe to the ticker for a pair.
    pub fn ticker(pair: impl Into<String>) -> Self {
        Self {
            event: "subscribe",
            channel: ChannelKind::Ticker,
            pair: Some(pair.into()),
            prec: None,
            len: None,
        }
    }

    /// Set the requested book depth.
    pub fn with_length(mut self, len: u32) -> Self {
        self.len = Some(len);
        self
    }
}

/// Channel unsubscription request (`event == "unsubscribe"`).
#[derive(Debug, Clone, Serialize)]
pub struct UnsubscribeRequest {
    event: &'static str,
    /// Channel id to unsubscribe.
    #[serde(rename = "chanId")]
    pub channel_id: u64,
}

impl UnsubscribeRequest {
    /// Unsubscribe a channel by id.
    pub fn new(channel_id: u64) -> Self {
        Self {
            event: "unsubscribe",
            channel_id,
        }
    }

    /// Unsubscribe the channel behind a registry binding.
    pub fn from_subscription(subscription: &ChannelSubscription) -> Self {
        Self::new(subscription.channel_id)
    }
}

/// Authentication request (`event == "auth"`).
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest {
    event: &'static str,
    /// The API key.
    #[serde(rename = "apiKey")]
    pub api_key: String,
    /// Hex-encoded HMAC-SHA384 of the payload.
    #[serde(rename = "authSig")]
    pub auth_sig: String,
    /// The signed payload ("AUTH" + nonce).
    #[serde(rename = "authPayload")]
    pub auth_payload: String,
}

impl AuthRequest {
    /// Build a signed auth request for the given nonce.
    pub fn new(credentials: &Credentials, nonce: u64) -> Result<Self, BitfinexError> {
        let signed = sign_auth_payload(credentials, nonce)?;
        Ok(Self {
            event: "auth",
            api_key: credentials.api_key.clone(),
            auth_sig: signed.signature,
            auth_payload: signed.payload,
        })
    }
}

/// Ping request (`event == "ping"`).
#[derive(Debug, Clone, Serialize)]
pub struct PingRequest {
    event: &'static str,
}

impl PingRequest {
    /// Create a new ping request.
    pub fn new() -> Self {
        Self { event: "ping" }
    }
}

impl Default for PingRequest {
    fn default() -> Self {
        Self::new()
    }
}

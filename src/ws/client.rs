//! WebSocket client implementation.

use crate::error::BitfinexError;
use crate::ws::stream::BitfinexStream;

/// WebSocket endpoint URLs.
pub mod endpoints {
    /// Bitfinex v1 WebSocket endpoint.
    pub const WS_URL: &str = "wss://api.bitfinex.com/ws";
}

/// Bitfinex WebSocket client.
///
/// Connects to the v1 feed and returns a [`BitfinexStream`] that decodes
/// every inbound frame through the channel dispatcher. There is no
/// reconnection policy: when the connection drops the stream emits `Close`
/// and ends, and the caller decides whether to connect again.
#[derive(Debug, Clone)]
pub struct BitfinexWsClient {
    /// WebSocket URL.
    url: String,
}

impl BitfinexWsClient {
    /// Create a new client for the production endpoint.
    pub fn new() -> Self {
        Self {
            url: endpoints::WS_URL.to_string(),
        }
    }

    /// Create a client with a custom URL (useful for testing).
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Get the WebSocket URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Connect and return the decoded event stream.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use bitfinex_ws_client::ws::{BitfinexWsClient, StreamEvent};
    /// use bitfinex_ws_client::ws::messages::SubscribeRequest;
    /// use futures_util::StreamExt;
    ///
    /// let client = BitfinexWsClient::new();
    /// let mut stream = client.connect().await?;
    /// stream.subscribe(SubscribeRequest::ticker("BTCUSD")).await?;
    ///
    /// while let Some(event) = stream.next().await {
    ///     println!("{:?}", event?);
    /// }
    /// ```
    pub async fn connect(&self) -> Result<BitfinexStream, BitfinexError> {
        let url = url::Url::parse(&self.url)?;
        BitfinexStream::connect(url.as_str()).await
    }
}

impl Default for BitfinexWsClient {
    fn default() -> Self {
        Self::new()
    }
}

//! Bitfinex v1 WebSocket feed: channel multiplexing and event decoding.
//!
//! The v1 feed carries every subscribed channel over one connection. Control
//! frames are keyed objects; data frames are positional arrays whose leading
//! element is a connection-scoped channel id. This module provides:
//!
//! - [`Dispatcher`] - the stateful frame-to-event translator, for callers
//!   that bring their own transport
//! - [`BitfinexWsClient`] / [`BitfinexStream`] - a `tokio-tungstenite` based
//!   transport that feeds every frame through the dispatcher
//! - [`messages`] - outbound request and inbound control frame types
//! - [`decode`] - the per-channel positional decoders
//!
//! # Example
//!
//! ```rust
//! use bitfinex_ws_client::ws::{Dispatcher, StreamEvent, TradeUpdate};
//! use serde_json::json;
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.connection_opened();
//!
//! dispatcher.dispatch(json!({
//!     "event": "subscribed", "channel": "trades", "chanId": 2, "pair": "BTCUSD"
//! }));
//!
//! let events = dispatcher.dispatch(json!([2, "te", "1", 1610000001, 101, 0.3]));
//! assert!(matches!(
//!     events[1],
//!     StreamEvent::Trade { ref update, .. } if matches!(update, TradeUpdate::Executed(_))
//! ));
//! ```

mod client;
pub mod decode;
mod dispatch;
mod events;
pub mod messages;
mod registry;
mod stream;

pub use client::{endpoints, BitfinexWsClient};
pub use dispatch::Dispatcher;
pub use events::{
    BookLevel, BookUpdate, StreamEvent, TickerUpdate, TradeEvent, TradeUpdate, UserUpdate,
};
pub use registry::{ChannelKind, ChannelRegistry, ChannelSubscription, Precision};
pub use stream::BitfinexStream;

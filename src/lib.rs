//! # Bitfinex WebSocket Client
//!
//! An async Rust client for the Bitfinex v1 multiplexed market-data WebSocket
//! feed.
//!
//! ## Features
//!
//! - Channel-multiplexed frame dispatch: order book, trades, ticker and the
//!   authenticated account stream over one connection
//! - Typed domain events decoded from the protocol's positional arrays
//! - Bring-your-own-transport [`ws::Dispatcher`] or the batteries-included
//!   [`ws::BitfinexWsClient`] stream
//! - Financial precision with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bitfinex_ws_client::ws::{BitfinexWsClient, StreamEvent};
//! use bitfinex_ws_client::ws::messages::SubscribeRequest;
//! use futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BitfinexWsClient::new();
//!     let mut stream = client.connect().await?;
//!     stream.subscribe(SubscribeRequest::trades("BTCUSD")).await?;
//!
//!     while let Some(event) = stream.next().await {
//!         if let StreamEvent::Trade { pair, update } = event? {
//!             println!("{pair}: {update:?}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod ws;

// Re-export commonly used types at crate root
pub use error::BitfinexError;
pub use ws::{Dispatcher, StreamEvent};

/// Result type alias using BitfinexError
pub type Result<T> = std::result::Result<T, BitfinexError>;

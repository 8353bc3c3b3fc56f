//! WebSocket message types for the Bitfinex v1 API.

mod control;
mod requests;

pub use control::*;
pub use requests::*;

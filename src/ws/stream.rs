//! WebSocket stream implementation.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, Stream, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::auth::{Credentials, NonceProvider};
use crate::error::BitfinexError;
use crate::ws::dispatch::Dispatcher;
use crate::ws::events::StreamEvent;
use crate::ws::messages::{AuthRequest, PingRequest, SubscribeRequest, UnsubscribeRequest};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;
type WsReceiver = SplitStream<WsStream>;

/// A stream of decoded events from one Bitfinex WebSocket connection.
///
/// Every inbound text frame goes through the [`Dispatcher`]; one frame may
/// produce several events (the raw `Message` signal plus a domain event),
/// which are drained in order before the socket is polled again. The stream
/// ends after emitting [`StreamEvent::Close`] when the connection drops.
pub struct BitfinexStream {
    /// WebSocket sink for sending requests.
    sink: Option<Arc<Mutex<WsSink>>>,
    /// WebSocket receiver for incoming frames.
    receiver: Option<WsReceiver>,
    /// Channel dispatcher holding the connection-scoped registry.
    dispatcher: Dispatcher,
    /// Decoded events not yet handed to the caller.
    pending: VecDeque<StreamEvent>,
    /// URL this stream is connected to.
    url: String,
}

impl std::fmt::Debug for BitfinexStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitfinexStream")
            .field("url", &self.url)
            .field("connected", &self.dispatcher.is_connected())
            .field("channels", &self.dispatcher.registry().len())
            .finish()
    }
}

impl BitfinexStream {
    /// Connect to the WebSocket server.
    pub(crate) async fn connect(url: &str) -> Result<Self, BitfinexError> {
        let (ws_stream, _) = connect_async(url).await.map_err(|e| {
            BitfinexError::WebSocketMsg(format!("Failed to connect to {url}: {e}"))
        })?;

        let (sink, receiver) = ws_stream.split();
        let mut dispatcher = Dispatcher::new();
        let mut pending = VecDeque::new();
        pending.push_back(dispatcher.connection_opened());

        Ok(Self {
            sink: Some(Arc::new(Mutex::new(sink))),
            receiver: Some(receiver),
            dispatcher,
            pending,
            url: url.to_string(),
        })
    }

    /// Subscribe to a channel.
    pub async fn subscribe(&mut self, request: SubscribeRequest) -> Result<(), BitfinexError> {
        self.send_json(&request).await
    }

    /// Unsubscribe from a channel by its connection-scoped id.
    pub async fn unsubscribe(&mut self, channel_id: u64) -> Result<(), BitfinexError> {
        self.send_json(&UnsubscribeRequest::new(channel_id)).await
    }

    /// Authenticate the connection to receive the account stream.
    pub async fn auth(
        &mut self,
        credentials: &Credentials,
        nonce_provider: &dyn NonceProvider,
    ) -> Result<(), BitfinexError> {
        let request = AuthRequest::new(credentials, nonce_provider.next_nonce())?;
        self.send_json(&request).await
    }

    /// Send a ping message.
    pub async fn ping(&mut self) -> Result<(), BitfinexError> {
        self.send_json(&PingRequest::new()).await
    }

    /// Access the dispatcher's channel registry, e.g. to find the channel id
    /// for an unsubscribe request.
    pub fn registry(&self) -> &crate::ws::registry::ChannelRegistry {
        self.dispatcher.registry()
    }

    /// Check if the connection is open.
    pub fn is_connected(&self) -> bool {
        self.dispatcher.is_connected()
    }

    /// Close the connection gracefully.
    pub async fn close(&mut self) -> Result<(), BitfinexError> {
        if let Some(sink) = self.sink.take() {
            let mut sink = sink.lock().await;
            let _ = sink.send(WsMessage::Close(None)).await;
        }
        self.receiver = None;
        if self.dispatcher.is_connected() {
            self.pending.push_back(self.dispatcher.connection_closed());
        }
        Ok(())
    }

    /// Send a JSON message.
    async fn send_json<T: serde::Serialize>(&self, msg: &T) -> Result<(), BitfinexError> {
        let sink = self
            .sink
            .as_ref()
            .ok_or_else(|| BitfinexError::WebSocketMsg("Not connected".into()))?;

        let json = serde_json::to_string(msg)?;

        let mut sink = sink.lock().await;
        sink.send(WsMessage::Text(json.into()))
            .await
            .map_err(|e| BitfinexError::WebSocketMsg(format!("Failed to send message: {e}")))
    }

    /// Mark the connection as torn down and queue the close signal.
    fn teardown(&mut self) {
        if self.dispatcher.is_connected() {
            self.pending.push_back(self.dispatcher.connection_closed());
        }
        self.sink = None;
        self.receiver = None;
    }
}

impl Stream for BitfinexStream {
    type Item = Result<StreamEvent, BitfinexError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(event) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }

            let Some(receiver) = this.receiver.as_mut() else {
                return Poll::Ready(None);
            };

            match Pin::new(receiver).poll_next(cx) {
                Poll::Ready(Some(Ok(msg))) => match msg {
                    WsMessage::Text(text) => {
                        this.pending.extend(this.dispatcher.dispatch_text(&text));
                    }
                    WsMessage::Binary(data) => {
                        // Some proxies deliver JSON text as binary frames.
                        if let Ok(text) = String::from_utf8(data.to_vec()) {
                            this.pending.extend(this.dispatcher.dispatch_text(&text));
                        }
                    }
                    WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => {
                        // Handled automatically by tungstenite.
                    }
                    WsMessage::Close(_) => {
                        this.teardown();
                    }
                },
                Poll::Ready(Some(Err(e))) => {
                    tracing::warn!("WebSocket error: {e}");
                    this.teardown();
                    return Poll::Ready(Some(Err(BitfinexError::WebSocket(e))));
                }
                Poll::Ready(None) => {
                    this.teardown();
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

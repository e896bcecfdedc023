//! WebSocket client transport to the device
//!
//! Opens one client connection per `open()` call and relays text messages
//! bidirectionally between the socket and the session's channels.
//!
//! Architecture:
//! ```text
//! Session ──TransportChannels──► client task ──WebSocket──► device (/ws)
//! ```

use super::{Transport, TransportChannels, TransportEvent};
use crate::constants::CHANNEL_CAPACITY;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// WebSocket client transport
///
/// # Example
///
/// ```ignore
/// let mut transport = WebSocketTransport::new("ws://lumifera.local/ws");
/// let mut channels = transport.open();
///
/// // Opened / Message / Closed events come through channels.events
/// // Text sent to channels.tx goes to the device once opened
/// ```
pub struct WebSocketTransport {
    url: String,
}

impl WebSocketTransport {
    /// Create a transport for the given `ws://` or `wss://` endpoint
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Transport for WebSocketTransport {
    fn open(&mut self) -> TransportChannels {
        let (event_tx, event_rx) = mpsc::channel::<TransportEvent>(CHANNEL_CAPACITY);
        let (out_tx, out_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);

        tokio::spawn(run_websocket_client(self.url.clone(), event_tx, out_rx));

        TransportChannels {
            events: event_rx,
            tx: out_tx,
        }
    }
}

/// Run one client connection until either side closes it
async fn run_websocket_client(
    url: String,
    event_tx: mpsc::Sender<TransportEvent>,
    mut out_rx: mpsc::Receiver<String>,
) {
    // Abandon the attempt if the session drops the link while connecting
    let connected = tokio::select! {
        result = connect_async(url.as_str()) => result,
        _ = event_tx.closed() => {
            debug!("Connect to {} abandoned", url);
            return;
        }
    };

    let socket = match connected {
        Ok((socket, _response)) => socket,
        Err(e) => {
            warn!("Cannot connect to {}: {}", url, e);
            let _ = event_tx.send(TransportEvent::Closed).await;
            return;
        }
    };

    info!("WebSocket connected: {}", url);
    if event_tx.send(TransportEvent::Opened).await.is_err() {
        return;
    }

    let (mut ws_sink, mut ws_stream) = socket.split();

    loop {
        tokio::select! {
            // Session -> device
            outgoing = out_rx.recv() => {
                match outgoing {
                    Some(text) => {
                        if let Err(e) = ws_sink.send(Message::Text(text.into())).await {
                            debug!("WebSocket send error: {}", e);
                            break;
                        }
                    }
                    None => {
                        // Session released the link
                        let _ = ws_sink.close().await;
                        info!("WebSocket closed: {}", url);
                        return;
                    }
                }
            }

            // Device -> session
            incoming = ws_stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if event_tx.send(TransportEvent::Message(text.to_string())).await.is_err() {
                            let _ = ws_sink.close().await;
                            return;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // Ignore binary, ping, pong
                    Some(Err(e)) => {
                        debug!("WebSocket receive error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    info!("WebSocket disconnected: {}", url);
    let _ = event_tx.send(TransportEvent::Closed).await;
}

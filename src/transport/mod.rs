//! Transport abstraction for text-message I/O with the device
//!
//! Separates I/O concerns from session logic:
//! - **Transport**: how messages flow (WebSocket, in-memory mock for tests)
//! - **Session**: what the messages mean (handled separately)
//!
//! A transport does NOT handle:
//! - Message encoding (that's the protocol module's job)
//! - Reconnection (the session decides when to open a new transport)
//! - Queueing while closed (sends on a closed link are simply lost)

#[cfg(test)]
pub mod mock;
pub mod websocket;

pub use websocket::WebSocketTransport;

use tokio::sync::mpsc;

/// Lifecycle and data events reported by an open transport
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Connection established; sends are now delivered
    Opened,
    /// Text message received from the device
    Message(String),
    /// Connection failed or closed; no further events follow
    Closed,
}

/// Channels for bidirectional communication with one transport instance
///
/// Dropping `tx` asks the transport to close the connection. When the
/// transport stops it closes `events` (after a final `Closed`).
pub struct TransportChannels {
    /// Receive lifecycle events and inbound messages
    pub events: mpsc::Receiver<TransportEvent>,

    /// Send outbound text messages
    pub tx: mpsc::Sender<String>,
}

/// Trait for transports the session can open
///
/// # Lifecycle
///
/// 1. Session calls `open()`; the transport starts connecting in background
/// 2. `Opened` arrives once the connection is up
/// 3. Messages flow until the peer closes, an error occurs, or the session
///    drops the channels
/// 4. `Closed` is reported (unless the session dropped the channels first)
///
/// Each call creates a fresh underlying connection.
pub trait Transport: Send + 'static {
    fn open(&mut self) -> TransportChannels;
}

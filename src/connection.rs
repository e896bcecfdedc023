//! Connection manager
//!
//! Owns the single transport link to the device and its lifecycle:
//! `disconnected -> connecting -> connected -> disconnected`. Only this type
//! opens or closes the link; everyone else asks it to send.
//!
//! There is no retry loop. After a close the state stays `disconnected`
//! until `connect()` is called again.

use crate::transport::{Transport, TransportChannels, TransportEvent};
use std::fmt;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Connection status as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }

    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a send attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    /// Link not open; message dropped
    NotConnected,
    /// Link open but its queue is full or gone; message dropped
    LinkUnavailable,
}

pub struct ConnectionManager<T: Transport> {
    transport: T,
    link: Option<TransportChannels>,
    state: ConnectionState,
    /// Number of transport instances opened so far
    opened: u64,
}

impl<T: Transport> ConnectionManager<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            link: None,
            state: ConnectionState::Disconnected,
            opened: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn opened(&self) -> u64 {
        self.opened
    }

    /// Open a new transport unless one is already open or opening
    ///
    /// Returns `true` if a new transport was opened.
    pub fn connect(&mut self) -> bool {
        if self.link.is_some() {
            debug!("connect() ignored while {}", self.state);
            return false;
        }
        self.link = Some(self.transport.open());
        self.opened += 1;
        self.state = ConnectionState::Connecting;
        true
    }

    /// Close the transport, if any
    ///
    /// Dropping the channels tells the transport task to close the socket.
    pub fn disconnect(&mut self) {
        if self.link.take().is_some() {
            debug!("Transport released");
        }
        self.state = ConnectionState::Disconnected;
    }

    /// Wait for the next event from the open transport
    ///
    /// Never resolves while there is no link. A closed event channel is
    /// reported as `Closed`.
    pub async fn next_event(&mut self) -> TransportEvent {
        match self.link.as_mut() {
            Some(link) => link.events.recv().await.unwrap_or(TransportEvent::Closed),
            None => std::future::pending().await,
        }
    }

    /// Apply a lifecycle event; returns the payload of a `Message`
    pub fn handle_event(&mut self, event: TransportEvent) -> Option<String> {
        match event {
            TransportEvent::Opened => {
                self.state = ConnectionState::Connected;
                None
            }
            TransportEvent::Message(text) => Some(text),
            TransportEvent::Closed => {
                self.link = None;
                self.state = ConnectionState::Disconnected;
                None
            }
        }
    }

    /// Fire-and-forget send, only while connected
    pub fn send(&self, text: String) -> SendOutcome {
        let Some(link) = self.link.as_ref().filter(|_| self.state.is_connected()) else {
            return SendOutcome::NotConnected;
        };
        match link.tx.try_send(text) {
            Ok(()) => SendOutcome::Sent,
            Err(TrySendError::Full(_)) => {
                warn!("Transport queue full, message dropped");
                SendOutcome::LinkUnavailable
            }
            Err(TrySendError::Closed(_)) => SendOutcome::LinkUnavailable,
        }
    }
}

//! In-memory transport for tests
//!
//! Each `open()` creates a channel pair and parks the device-side half so
//! a test can play the device: push `TransportEvent`s and read what the
//! session sent.

use super::{Transport, TransportChannels, TransportEvent};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Device side of one mock connection
pub struct MockPeer {
    pub events: mpsc::Sender<TransportEvent>,
    pub sent: mpsc::Receiver<String>,
}

#[derive(Clone, Default)]
pub struct MockTransport {
    peers: Arc<Mutex<Vec<Option<MockPeer>>>>,
}

impl MockTransport {
    /// Number of transport instances opened
    pub fn opened(&self) -> usize {
        self.peers.lock().unwrap().len()
    }

    /// Take the device side of the `index`-th connection
    pub fn take_peer(&self, index: usize) -> MockPeer {
        self.peers.lock().unwrap()[index]
            .take()
            .expect("peer already taken")
    }
}

impl Transport for MockTransport {
    fn open(&mut self) -> TransportChannels {
        let (event_tx, event_rx) = mpsc::channel(16);
        let (out_tx, out_rx) = mpsc::channel(16);
        self.peers.lock().unwrap().push(Some(MockPeer {
            events: event_tx,
            sent: out_rx,
        }));
        TransportChannels {
            events: event_rx,
            tx: out_tx,
        }
    }
}

//! Message counters for a session
//!
//! Thread-safe counters readable from any handle while the session task
//! updates them. Uses lock-free atomics for all operations.

use std::sync::atomic::{AtomicU64, Ordering};

/// Message counters (fully lock-free)
#[derive(Debug, Default)]
pub struct Stats {
    /// Messages handed to an open transport
    sent: AtomicU64,
    /// Messages received from the device
    received: AtomicU64,
    /// Outbound messages dropped (not connected, or link backed up)
    dropped: AtomicU64,
    /// Inbound messages discarded as malformed
    malformed: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub sent: u64,
    pub received: u64,
    pub dropped: u64,
    pub malformed: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_sent(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_malformed(&self) {
        self.malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            sent: self.sent.load(Ordering::Relaxed),
            received: self.received.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
        }
    }
}

//! Session activity records for front ends
//!
//! Every entry carries the local wall-clock time it was created at.

use crate::connection::ConnectionState;
use chrono::{DateTime, Local};
use std::fmt;

/// Which way a message travelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Device to remote
    In,
    /// Remote to device
    Out,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogKind {
    /// Parameter message on the wire
    Traffic {
        direction: Direction,
        /// Comma-separated parameter keys carried by the message
        keys: String,
        size: usize,
    },
    /// Outbound change lost because the link was not open
    Dropped { keys: String },
    /// Inbound message that could not be used
    Discarded { reason: String },
    Connection(ConnectionState),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub kind: LogKind,
}

impl LogEntry {
    fn new(kind: LogKind) -> Self {
        Self {
            at: Local::now(),
            kind,
        }
    }

    pub fn received(keys: impl Into<String>, size: usize) -> Self {
        Self::new(LogKind::Traffic {
            direction: Direction::In,
            keys: keys.into(),
            size,
        })
    }

    pub fn sent(keys: impl Into<String>, size: usize) -> Self {
        Self::new(LogKind::Traffic {
            direction: Direction::Out,
            keys: keys.into(),
            size,
        })
    }

    pub fn dropped(keys: impl Into<String>) -> Self {
        Self::new(LogKind::Dropped { keys: keys.into() })
    }

    pub fn discarded(reason: impl fmt::Display) -> Self {
        Self::new(LogKind::Discarded {
            reason: reason.to_string(),
        })
    }

    pub fn connection(state: ConnectionState) -> Self {
        Self::new(LogKind::Connection(state))
    }
}

/// `12:04:31.250 -> bpm,brightness (31 B)`
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.at.format("%H:%M:%S%.3f"))?;
        match &self.kind {
            LogKind::Traffic {
                direction: Direction::In,
                keys,
                size,
            } => write!(f, "<- {} ({} B)", keys, size),
            LogKind::Traffic {
                direction: Direction::Out,
                keys,
                size,
            } => write!(f, "-> {} ({} B)", keys, size),
            LogKind::Dropped { keys } => write!(f, "xx {} (not connected)", keys),
            LogKind::Discarded { reason } => write!(f, "!! discarded: {}", reason),
            LogKind::Connection(state) => write!(f, "== {}", state),
        }
    }
}

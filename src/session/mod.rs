//! Parameter synchronization session
//!
//! The session is the explicit context object for one remote-control
//! session. It runs as a single tokio task that owns every piece of mutable
//! state, so all mutations are serialized:
//!
//! ```text
//! SessionHandle ──Command──►┐
//! transport events ────────►├─ session task ──SessionState──► watch subscribers
//! progress ticks ──────────►┤      │
//! initial connect delay ───►┘      └──text──► transport ──► device
//! ```
//!
//! After every wake-up the task flushes pending single-key changes and then
//! publishes one atomic `SessionState` snapshot.
//!
//! The session does NOT:
//! - retry or queue edits made while offline (they are dropped)
//! - reconnect on its own after the initial delayed attempt
//! - validate values against firmware ranges

mod handle;

pub use handle::SessionHandle;

use crate::config::Config;
use crate::connection::{ConnectionManager, ConnectionState, SendOutcome};
use crate::constants::CHANNEL_CAPACITY;
use crate::logging::{self, LogEntry};
use crate::outbox::Outbox;
use crate::params::{ParamKey, ParamPatch, ParamValue, ParameterSet};
use crate::protocol::{self, describe_keys};
use crate::stats::Stats;
use crate::store::ParameterStore;
use crate::transition::{TransitionState, TransitionTracker};
use crate::transport::{Transport, TransportEvent};
use std::future::pending;
use std::ops::ControlFlow;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, Sleep};
use tracing::{debug, info, warn};

// =============================================================================
// Public state
// =============================================================================

/// Everything a front end renders, published atomically
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub connection: ConnectionState,
    pub params: ParameterSet,
    pub transition: TransitionState,
}

/// Session timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Delay before the single automatic connect; `None` disables it
    pub connect_delay: Option<Duration>,
    /// Progress recompute interval while a transition runs
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        Self {
            connect_delay: config
                .device
                .auto_connect
                .then(|| Duration::from_millis(config.device.connect_delay_ms)),
            tick_interval: Duration::from_millis(config.transition.tick_interval_ms.max(1)),
        }
    }
}

/// Requests from handles to the session task
#[derive(Debug)]
enum Command {
    Connect,
    Disconnect,
    UpdateParam(ParamKey, ParamValue),
    UpdateParams(ParamPatch),
    Shutdown,
}

// =============================================================================
// Session task
// =============================================================================

pub struct Session<T: Transport> {
    config: SessionConfig,
    connection: ConnectionManager<T>,
    store: ParameterStore,
    outbox: Outbox,
    tracker: TransitionTracker,
    /// Progress tick while a transition runs; replacing it cancels the old one
    ticker: Option<Interval>,
    commands: mpsc::Receiver<Command>,
    state_tx: watch::Sender<SessionState>,
    stats: Arc<Stats>,
    log_tx: Option<mpsc::Sender<LogEntry>>,
}

impl<T: Transport> Session<T> {
    /// Start a session task on the current runtime
    ///
    /// The task runs until [`SessionHandle::shutdown`] is called or every
    /// handle is dropped; either way the transport is closed on exit.
    pub fn spawn(
        transport: T,
        config: SessionConfig,
        log_tx: Option<mpsc::Sender<LogEntry>>,
    ) -> (SessionHandle, JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(SessionState::default());
        let stats = Arc::new(Stats::new());

        let session = Self {
            config,
            connection: ConnectionManager::new(transport),
            store: ParameterStore::new(),
            outbox: Outbox::new(),
            tracker: TransitionTracker::new(),
            ticker: None,
            commands: cmd_rx,
            state_tx,
            stats: stats.clone(),
            log_tx,
        };

        let task = tokio::spawn(session.run());
        (SessionHandle::new(cmd_tx, state_rx, stats), task)
    }

    async fn run(mut self) {
        let mut auto_connect: Option<Pin<Box<Sleep>>> = self
            .config
            .connect_delay
            .map(|delay| Box::pin(tokio::time::sleep(delay)));

        loop {
            tokio::select! {
                cmd = self.commands.recv() => {
                    let Some(cmd) = cmd else {
                        debug!("All session handles dropped");
                        break;
                    };
                    if self.handle_commands(cmd).is_break() {
                        self.flush();
                        break;
                    }
                }

                event = self.connection.next_event() => self.on_transport_event(event),

                _ = next_tick(&mut self.ticker) => self.on_tick(),

                _ = elapsed(&mut auto_connect) => {
                    auto_connect = None;
                    self.connect();
                }
            }

            self.flush();
            self.publish();
        }

        self.teardown();
    }

    /// Apply `first` and everything already queued behind it
    ///
    /// Draining before the flush is what coalesces rapid edits of one key.
    fn handle_commands(&mut self, first: Command) -> ControlFlow<()> {
        let mut next = Some(first);
        while let Some(cmd) = next {
            match cmd {
                Command::Connect => self.connect(),
                Command::Disconnect => self.disconnect(),
                Command::UpdateParam(key, value) => self.update_param(key, value),
                Command::UpdateParams(patch) => self.update_params(patch),
                Command::Shutdown => return ControlFlow::Break(()),
            }
            next = self.commands.try_recv().ok();
        }
        ControlFlow::Continue(())
    }

    // =========================================================================
    // Connection
    // =========================================================================

    fn connect(&mut self) {
        if self.connection.connect() {
            info!("Connecting (transport #{})", self.connection.opened());
            logging::try_log(
                &self.log_tx,
                LogEntry::connection(ConnectionState::Connecting),
                "connecting",
            );
        }
    }

    fn disconnect(&mut self) {
        if self.connection.state() != ConnectionState::Disconnected {
            info!("Disconnecting");
            logging::try_log(
                &self.log_tx,
                LogEntry::connection(ConnectionState::Disconnected),
                "disconnect",
            );
        }
        self.connection.disconnect();
    }

    fn on_transport_event(&mut self, event: TransportEvent) {
        let was = self.connection.state();
        let Some(text) = self.connection.handle_event(event) else {
            let now = self.connection.state();
            if now != was {
                info!("Connection {} -> {}", was, now);
                logging::try_log(&self.log_tx, LogEntry::connection(now), "connection_state");
            }
            return;
        };

        self.stats.add_received();
        match protocol::decode_inbound(&text) {
            Ok(inbound) => {
                if !inbound.skipped.is_empty() {
                    debug!("Ignored inbound keys: {}", inbound.skipped.join(","));
                }
                logging::try_log(
                    &self.log_tx,
                    LogEntry::received(describe_keys(&inbound.patch), text.len()),
                    "protocol_in",
                );
                self.store.merge_inbound(&inbound.patch);
            }
            Err(e) => {
                self.stats.add_malformed();
                warn!("Discarding inbound message: {}", e);
                logging::try_log(&self.log_tx, LogEntry::discarded(&e), "inbound_malformed");
            }
        }
    }

    // =========================================================================
    // Outbound dispatch
    // =========================================================================

    fn update_param(&mut self, key: ParamKey, value: ParamValue) {
        // A new blendTime times its own feedback bar
        let blend_ms = match (key, value.as_f64()) {
            (ParamKey::BlendTime, Some(ms)) => ms.max(0.0) as u64,
            _ => self.store.blend_time_ms(),
        };

        self.store.apply_local(key, value.clone());
        self.outbox.mark(key, value);
        self.start_transition(Duration::from_millis(blend_ms));
    }

    fn update_params(&mut self, patch: ParamPatch) {
        let blend_ms = self.store.blend_time_ms();

        // Earlier single-key edits go out first
        self.flush();

        self.store.apply_local_batch(&patch);
        if !patch.is_empty() {
            self.transmit(protocol::encode_patch(&patch), describe_keys(&patch));
        }
        self.start_transition(Duration::from_millis(blend_ms));
    }

    /// Send or drop every pending single-key change
    fn flush(&mut self) {
        if self.outbox.is_empty() {
            return;
        }
        for (key, value) in self.outbox.drain() {
            self.transmit(protocol::encode_change(key, &value), key.to_string());
        }
    }

    fn transmit(&mut self, text: String, keys: String) {
        let size = text.len();
        match self.connection.send(text) {
            SendOutcome::Sent => {
                self.stats.add_sent();
                debug!("Sent {} ({} bytes)", keys, size);
                logging::try_log(&self.log_tx, LogEntry::sent(keys, size), "protocol_out");
            }
            SendOutcome::NotConnected | SendOutcome::LinkUnavailable => {
                self.stats.add_dropped();
                debug!("Dropped {} while {}", keys, self.connection.state());
                logging::try_log(&self.log_tx, LogEntry::dropped(keys), "dropped");
            }
        }
    }

    // =========================================================================
    // Transition
    // =========================================================================

    fn start_transition(&mut self, duration: Duration) {
        self.tracker.start(duration, Instant::now());
        self.ticker = self.tracker.is_running().then(|| {
            let mut ticker = tokio::time::interval(self.config.tick_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker
        });
    }

    fn on_tick(&mut self) {
        self.tracker.tick(Instant::now());
        if !self.tracker.is_running() {
            self.ticker = None;
        }
    }

    // =========================================================================
    // Output
    // =========================================================================

    fn publish(&self) {
        let next = SessionState {
            connection: self.connection.state(),
            params: self.store.params().clone(),
            transition: self.tracker.state(),
        };
        self.state_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn teardown(&mut self) {
        self.ticker = None;
        self.tracker.cancel();
        self.disconnect();
        self.publish();
        info!("Session closed");
    }
}

/// Wait for the next progress tick; never resolves without a ticker
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => pending().await,
    }
}

/// Wait for a one-shot delay; never resolves once consumed
async fn elapsed(delay: &mut Option<Pin<Box<Sleep>>>) {
    match delay {
        Some(sleep) => sleep.as_mut().await,
        None => pending().await,
    }
}

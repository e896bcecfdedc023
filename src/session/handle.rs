//! Front-end facing handle to a running session
//!
//! This is the whole surface a front end consumes: connection state,
//! parameters, transition progress, `connect()`, `update_param()` and
//! `update_params()`. Handles are cheap to clone; no front end talks to the
//! transport directly.

use super::{Command, SessionState};
use crate::connection::ConnectionState;
use crate::error::{RemoteError, Result};
use crate::params::{ParamKey, ParamPatch, ParamValue, ParameterSet};
use crate::stats::Stats;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<SessionState>,
    stats: Arc<Stats>,
}

impl SessionHandle {
    pub(super) fn new(
        commands: mpsc::Sender<Command>,
        state: watch::Receiver<SessionState>,
        stats: Arc<Stats>,
    ) -> Self {
        Self {
            commands,
            state,
            stats,
        }
    }

    async fn send(&self, cmd: Command) -> Result<()> {
        self.commands
            .send(cmd)
            .await
            .map_err(|_| RemoteError::SessionClosed)
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Open the device connection; no-op while connecting or connected
    pub async fn connect(&self) -> Result<()> {
        self.send(Command::Connect).await
    }

    /// Close the device connection
    pub async fn disconnect(&self) -> Result<()> {
        self.send(Command::Disconnect).await
    }

    /// Set one parameter (optimistic), send it if connected, start a transition
    pub async fn update_param(&self, key: ParamKey, value: impl Into<ParamValue>) -> Result<()> {
        self.send(Command::UpdateParam(key, value.into())).await
    }

    /// Set several parameters at once and send them as one message
    pub async fn update_params(&self, patch: ParamPatch) -> Result<()> {
        self.send(Command::UpdateParams(patch)).await
    }

    /// Stop the session after flushing already-queued changes
    pub async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }

    // =========================================================================
    // State queries
    // =========================================================================

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state.borrow().connection
    }

    pub fn params(&self) -> ParameterSet {
        self.state.borrow().params.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().transition.is_busy
    }

    pub fn progress_percent(&self) -> f64 {
        self.state.borrow().transition.progress_percent
    }

    /// New receiver for state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Wait until the published state satisfies `predicate`
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&SessionState) -> bool,
    ) -> Result<SessionState> {
        let mut rx = self.state.clone();
        let state = rx
            .wait_for(|s| predicate(s))
            .await
            .map_err(|_| RemoteError::SessionClosed)?;
        Ok(state.clone())
    }

    pub fn stats(&self) -> &Arc<Stats> {
        &self.stats
    }
}

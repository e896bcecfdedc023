//! Terminal UI application state
//!
//! Holds what only the UI cares about (selection, command line, activity
//! pane). Session state is read from the handle as one snapshot per frame.

mod commands;

pub use commands::{next_crossfade, stepped};

use crate::console::Console;
use crate::constants::MAX_ACTIVITY_LINES;
use crate::error::Result;
use crate::input::{self, InputMode};
use crate::logging::LogEntry;
use crate::params::ParamKey;
use crate::presets::PresetStore;
use crate::session::{SessionHandle, SessionState};
use crate::stats::StatsSnapshot;
use crossterm::event::KeyEvent;
use std::collections::VecDeque;
use tokio::sync::mpsc;

/// One line of the activity pane
#[derive(Debug, Clone, PartialEq)]
pub enum Activity {
    Session(LogEntry),
    /// Command line echo and command output
    Output(String),
}

pub struct App {
    device_url: String,
    handle: SessionHandle,
    console: Console,
    log_rx: Option<mpsc::Receiver<LogEntry>>,

    // UI state
    activity: VecDeque<Activity>,
    selected: usize,
    mode: InputMode,
    input: String,
}

impl App {
    pub fn new(
        device_url: impl Into<String>,
        handle: SessionHandle,
        presets: PresetStore,
        log_rx: Option<mpsc::Receiver<LogEntry>>,
    ) -> Self {
        let console = Console::new(handle.clone(), presets);
        let mut app = Self {
            device_url: device_url.into(),
            handle,
            console,
            log_rx,
            activity: VecDeque::new(),
            selected: 0,
            mode: InputMode::Keys,
            input: String::new(),
        };
        app.push(Activity::Output("Press : and type help for commands".into()));
        app
    }

    /// Move pending session activity into the pane
    pub fn poll(&mut self) {
        while let Some(entry) = self.log_rx.as_mut().and_then(|rx| rx.try_recv().ok()) {
            self.push(Activity::Session(entry));
        }
    }

    /// Handle a key press. Returns true if the app should quit.
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        let cmd = input::translate_key(key, self.mode);
        self.execute_command(cmd).await
    }

    fn push(&mut self, line: Activity) {
        if self.activity.len() >= MAX_ACTIVITY_LINES {
            self.activity.pop_front();
        }
        self.activity.push_back(line);
    }

    // =========================================================================
    // Accessors for UI
    // =========================================================================

    pub fn device_url(&self) -> &str {
        &self.device_url
    }

    pub fn state(&self) -> SessionState {
        self.handle.state()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.handle.stats().snapshot()
    }

    pub fn activity(&self) -> &VecDeque<Activity> {
        &self.activity
    }

    pub fn selected_key(&self) -> ParamKey {
        ParamKey::ALL[self.selected]
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

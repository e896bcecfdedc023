//! Command execution for App

use super::{Activity, App};
use crate::console::{parse_line, ConsoleCommand};
use crate::constants::{CROSSFADE_OPTIONS_MS, SYSTEM_PRESETS};
use crate::error::Result;
use crate::input::{AppCommand, InputMode};
use crate::params::{FixMode, ParamKey, ParamValue};

impl App {
    /// Execute an app command. Returns true if app should quit.
    pub(super) async fn execute_command(&mut self, cmd: AppCommand) -> Result<bool> {
        match cmd {
            AppCommand::Quit => return Ok(true),

            // Connection
            AppCommand::Connect => return self.run_console(ConsoleCommand::Connect).await,
            AppCommand::Disconnect => return self.run_console(ConsoleCommand::Disconnect).await,

            // Parameter list
            AppCommand::SelectPrev => {
                self.selected = (self.selected + ParamKey::COUNT - 1) % ParamKey::COUNT;
            }
            AppCommand::SelectNext => {
                self.selected = (self.selected + 1) % ParamKey::COUNT;
            }
            AppCommand::Adjust(steps) => {
                let key = self.selected_key();
                let current = self.handle.params().get(key).clone();
                if let Some(value) = stepped(key, &current, steps) {
                    if value != current {
                        self.handle.update_param(key, value).await?;
                    }
                }
            }

            // Shortcuts
            AppCommand::TogglePower => return self.run_console(ConsoleCommand::TogglePower).await,
            AppCommand::NextPalette => return self.run_console(ConsoleCommand::NextPalette).await,
            AppCommand::CycleCrossfade => {
                let current = self.handle.params().blend_time_ms() as i64;
                let next = next_crossfade(current);
                return self.run_console(ConsoleCommand::Crossfade(Some(next))).await;
            }
            AppCommand::SystemPreset(index) => {
                return self.run_console(ConsoleCommand::SystemPreset(index)).await
            }

            // Command line
            AppCommand::OpenCommandLine => {
                self.mode = InputMode::CommandLine;
                self.input.clear();
            }
            AppCommand::InputChar(c) => self.input.push(c),
            AppCommand::InputBackspace => {
                self.input.pop();
            }
            AppCommand::CancelInput => {
                self.mode = InputMode::Keys;
                self.input.clear();
            }
            AppCommand::SubmitInput => {
                self.mode = InputMode::Keys;
                let line = std::mem::take(&mut self.input);
                let cmd = parse_line(&line);
                if cmd != ConsoleCommand::None {
                    self.push(Activity::Output(format!(": {}", line.trim())));
                }
                return self.run_console(cmd).await;
            }

            AppCommand::None => {}
        }
        Ok(false)
    }

    /// Run a console command and move its output into the activity pane
    async fn run_console(&mut self, cmd: ConsoleCommand) -> Result<bool> {
        let mut out = Vec::new();
        let quit = self.console.execute(cmd, &mut out).await?;
        for line in String::from_utf8_lossy(&out).lines() {
            self.push(Activity::Output(line.to_string()));
        }
        Ok(quit)
    }
}

/// Value of `key` moved `steps` notches away from `current`
///
/// Ranged keys clamp to their range, `fixMode` cycles, `blendTime` walks
/// the crossfade options and `preset` the system presets. `None` for
/// triggers and non-numeric values.
pub fn stepped(key: ParamKey, current: &ParamValue, steps: i64) -> Option<ParamValue> {
    match key {
        ParamKey::NextPalette => None,
        ParamKey::FixMode => {
            let mode: FixMode = current.as_str()?.parse().ok()?;
            let index = FixMode::ALL.iter().position(|m| *m == mode)? as i64;
            let len = FixMode::ALL.len() as i64;
            Some(FixMode::ALL[(index + steps).rem_euclid(len) as usize].into())
        }
        ParamKey::BlendTime => {
            let current = current.as_i64()?;
            let next = match steps {
                0 => return Some(ParamValue::Int(current)),
                s if s > 0 => CROSSFADE_OPTIONS_MS
                    .iter()
                    .filter(|&&ms| ms > current)
                    .nth(s as usize - 1)
                    .or(CROSSFADE_OPTIONS_MS.last()),
                s => CROSSFADE_OPTIONS_MS
                    .iter()
                    .rev()
                    .filter(|&&ms| ms < current)
                    .nth(s.unsigned_abs() as usize - 1)
                    .or(CROSSFADE_OPTIONS_MS.first()),
            };
            next.map(|&ms| ParamValue::Int(ms))
        }
        _ => {
            let (min, max) = match key {
                ParamKey::Preset => (0, SYSTEM_PRESETS.len() as i64 - 1),
                _ => match key.range() {
                    Some((min, max)) => (min as i64, max as i64),
                    None => (0, i64::MAX),
                },
            };
            let value = current.as_f64()?.round() as i64;
            Some(ParamValue::Int(value.saturating_add(steps).clamp(min, max)))
        }
    }
}

/// Crossfade option after `current_ms`, wrapping to the shortest
pub fn next_crossfade(current_ms: i64) -> i64 {
    CROSSFADE_OPTIONS_MS
        .iter()
        .copied()
        .find(|&ms| ms > current_ms)
        .unwrap_or(CROSSFADE_OPTIONS_MS[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionState;
    use crate::logging::{LogEntry, LogKind};
    use crate::presets::PresetStore;
    use crate::session::{Session, SessionConfig};
    use crate::transport::mock::MockTransport;
    use crate::transport::TransportEvent;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn manual_config() -> SessionConfig {
        SessionConfig {
            connect_delay: None,
            tick_interval: Duration::from_millis(16),
        }
    }

    fn int(v: i64) -> ParamValue {
        ParamValue::Int(v)
    }

    fn temp_presets(name: &str) -> PresetStore {
        let dir = std::env::temp_dir().join(format!(
            "lumifera-remote-app-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        PresetStore::load(dir.join("presets.json"))
    }

    fn outputs(app: &App) -> Vec<String> {
        app.activity()
            .iter()
            .filter_map(|line| match line {
                Activity::Output(text) => Some(text.clone()),
                Activity::Session(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_stepped_clamps_to_range() {
        assert_eq!(stepped(ParamKey::Brightness, &int(250), 10), Some(int(255)));
        assert_eq!(stepped(ParamKey::Bpm, &int(0), -1), Some(int(0)));
        assert_eq!(stepped(ParamKey::Bpm, &int(26), 1), Some(int(27)));
        assert_eq!(stepped(ParamKey::Direction, &int(1), 1), Some(int(1)));
        assert_eq!(stepped(ParamKey::Direction, &int(1), -10), Some(int(-1)));
        assert_eq!(
            stepped(ParamKey::PowerState, &int(1), -1),
            Some(int(0))
        );
        // Unranged numeric keys stop at zero
        assert_eq!(stepped(ParamKey::BgPaletteIndex, &int(0), -1), Some(int(0)));
        assert_eq!(stepped(ParamKey::FgPaletteIndex, &int(5), 1), Some(int(6)));
    }

    #[test]
    fn test_stepped_special_keys() {
        assert_eq!(stepped(ParamKey::NextPalette, &int(0), 1), None);
        assert_eq!(stepped(ParamKey::Preset, &int(6), 1), Some(int(6)));
        assert_eq!(stepped(ParamKey::Preset, &int(0), 2), Some(int(2)));

        assert_eq!(
            stepped(ParamKey::FixMode, &FixMode::None.into(), 1),
            Some(FixMode::Pause.into())
        );
        assert_eq!(
            stepped(ParamKey::FixMode, &FixMode::Pause.into(), -1),
            Some(FixMode::None.into())
        );

        assert_eq!(stepped(ParamKey::BlendTime, &int(4000), 1), Some(int(8000)));
        assert_eq!(stepped(ParamKey::BlendTime, &int(8000), 1), Some(int(8000)));
        assert_eq!(stepped(ParamKey::BlendTime, &int(3000), -1), Some(int(2000)));
        assert_eq!(stepped(ParamKey::BlendTime, &int(200), -10), Some(int(200)));
    }

    #[test]
    fn test_next_crossfade_wraps() {
        assert_eq!(next_crossfade(200), 500);
        assert_eq!(next_crossfade(3000), 4000);
        assert_eq!(next_crossfade(8000), 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_drive_session() {
        let transport = MockTransport::default();
        let (log_tx, log_rx) = mpsc::channel(64);
        let (handle, task) = Session::spawn(transport.clone(), manual_config(), Some(log_tx));
        let mut app = App::new(
            "ws://test/ws",
            handle.clone(),
            temp_presets("keys"),
            Some(log_rx),
        );

        assert!(!app.handle_key(key(KeyCode::Char('c'))).await.unwrap());
        handle
            .wait_for(|s| s.connection == ConnectionState::Connecting)
            .await
            .unwrap();
        let mut peer = transport.take_peer(0);
        peer.events.send(TransportEvent::Opened).await.unwrap();
        handle
            .wait_for(|s| s.connection.is_connected())
            .await
            .unwrap();

        // Brightness is second in the list; PageUp from 150 to 160
        app.handle_key(key(KeyCode::Down)).await.unwrap();
        assert_eq!(app.selected_key(), ParamKey::Brightness);
        app.handle_key(key(KeyCode::PageUp)).await.unwrap();
        assert_eq!(peer.sent.recv().await.unwrap(), r#"{"brightness":160}"#);

        app.handle_key(key(KeyCode::Char('p'))).await.unwrap();
        assert_eq!(peer.sent.recv().await.unwrap(), r#"{"powerState":0}"#);

        app.handle_key(key(KeyCode::Char('x'))).await.unwrap();
        assert_eq!(peer.sent.recv().await.unwrap(), r#"{"blendTime":8000}"#);

        app.poll();
        assert!(app.activity().iter().any(|line| matches!(
            line,
            Activity::Session(LogEntry {
                kind: LogKind::Connection(ConnectionState::Connected),
                ..
            })
        )));
        assert!(outputs(&app).contains(&"power off".to_string()));

        assert!(app.handle_key(key(KeyCode::Char('q'))).await.unwrap());

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_command_line_rejects_out_of_range() {
        let transport = MockTransport::default();
        let (handle, task) = Session::spawn(transport, manual_config(), None);
        let mut app = App::new("ws://test/ws", handle.clone(), temp_presets("cmdline"), None);

        app.handle_key(key(KeyCode::Char(':'))).await.unwrap();
        assert_eq!(app.mode(), InputMode::CommandLine);
        for c in "set bpm 999".chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
        assert_eq!(app.input(), "set bpm 999");
        app.handle_key(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.mode(), InputMode::Keys);
        assert_eq!(app.input(), "");
        let out = outputs(&app);
        assert!(out.contains(&": set bpm 999".to_string()));
        assert!(out.contains(&"error: bpm must be within 0..=180 (got 999)".to_string()));
        assert_eq!(app.state().params.get(ParamKey::Bpm), &int(26));

        // Esc leaves the command line without running anything
        app.handle_key(key(KeyCode::Char(':'))).await.unwrap();
        app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
        assert!(!app.handle_key(key(KeyCode::Esc)).await.unwrap());
        assert_eq!(app.mode(), InputMode::Keys);

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }
}

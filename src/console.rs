//! Text commands and the `watch` printer
//!
//! The terminal UI's command line is parsed and executed here. Like any
//! other front end it only uses the `SessionHandle` surface: state
//! snapshots, `connect()`, `update_param()` and `update_params()`.

use crate::constants::{CROSSFADE_OPTIONS_MS, SYSTEM_PRESETS};
use crate::error::Result;
use crate::logging::LogEntry;
use crate::params::{ParamKey, ParamPatch, ParamValue};
use crate::presets::{system_preset_index, PresetStore};
use crate::session::{SessionHandle, SessionState};
use std::io::Write;
use tokio::sync::mpsc;

const HELP: &str = "\
Commands:
  status                 connection, transition and traffic counters
  get [KEY]              show one or all parameters
  set KEY VALUE          change one parameter
  batch KEY=VALUE ...    change several parameters in one message
  connect | reconnect    open the device connection
  disconnect             close the device connection
  power                  toggle powerState
  next                   advance to the next palette
  system NAME|INDEX      select a firmware preset
  crossfade [MS]         set blendTime (no argument lists the options)
  presets                list saved presets
  save NAME              save the current look as a preset
  load NAME              send a saved preset
  delete NAME            delete a saved preset
  help                   this text
  quit                   leave";

/// One parsed console line
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Quit,
    Help,
    Status,
    Get(Option<ParamKey>),

    // Connection
    Connect,
    Disconnect,

    // Parameters
    Set(ParamKey, ParamValue),
    Batch(ParamPatch),
    TogglePower,
    NextPalette,
    SystemPreset(usize),
    Crossfade(Option<i64>),

    // User presets
    ListPresets,
    SavePreset(String),
    LoadPreset(String),
    DeletePreset(String),

    /// Unusable input, with the reason
    Invalid(String),
    None,
}

/// Translate one input line into a ConsoleCommand
pub fn parse_line(line: &str) -> ConsoleCommand {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return ConsoleCommand::None;
    };
    let args: Vec<&str> = words.collect();

    match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("quit" | "exit" | "q", []) => ConsoleCommand::Quit,
        ("help" | "?", _) => ConsoleCommand::Help,
        ("status", []) => ConsoleCommand::Status,
        ("get", []) => ConsoleCommand::Get(None),
        ("get", [key]) => match key.parse() {
            Ok(key) => ConsoleCommand::Get(Some(key)),
            Err(e) => ConsoleCommand::Invalid(e.to_string()),
        },

        ("connect" | "reconnect", []) => ConsoleCommand::Connect,
        ("disconnect", []) => ConsoleCommand::Disconnect,

        ("set", [key, value]) => match parse_assignment(key, value) {
            Ok((key, value)) => ConsoleCommand::Set(key, value),
            Err(reason) => ConsoleCommand::Invalid(reason),
        },
        ("batch", pairs) if !pairs.is_empty() => parse_batch(pairs),
        ("power", []) => ConsoleCommand::TogglePower,
        ("next", []) => ConsoleCommand::NextPalette,
        ("system", [query]) => match system_preset_index(query) {
            Some(index) => ConsoleCommand::SystemPreset(index),
            None => ConsoleCommand::Invalid(format!(
                "unknown system preset '{}' (one of: {})",
                query,
                SYSTEM_PRESETS.join(", ")
            )),
        },
        ("crossfade", []) => ConsoleCommand::Crossfade(None),
        ("crossfade", [ms]) => match ms.parse::<i64>() {
            Ok(ms) if ms >= 0 => ConsoleCommand::Crossfade(Some(ms)),
            _ => ConsoleCommand::Invalid(format!("'{}' is not a duration in ms", ms)),
        },

        ("presets", []) => ConsoleCommand::ListPresets,
        ("save", name) if !name.is_empty() => ConsoleCommand::SavePreset(name.join(" ")),
        ("load", name) if !name.is_empty() => ConsoleCommand::LoadPreset(name.join(" ")),
        ("delete", name) if !name.is_empty() => ConsoleCommand::DeletePreset(name.join(" ")),

        _ => ConsoleCommand::Invalid(format!("unrecognized command '{}' (try help)", line.trim())),
    }
}

fn parse_assignment(
    key: &str,
    value: &str,
) -> std::result::Result<(ParamKey, ParamValue), String> {
    let key: ParamKey = key.parse().map_err(|e: crate::error::RemoteError| e.to_string())?;
    let value = ParamValue::parse(key, value).map_err(|e| e.to_string())?;
    if let (Some((min, max)), Some(number)) = (key.range(), value.as_f64()) {
        if number < min || number > max {
            return Err(format!(
                "{} must be within {} (got {})",
                key,
                range_label(min, max),
                value
            ));
        }
    }
    Ok((key, value))
}

/// `0..=255`
pub fn range_label(min: f64, max: f64) -> String {
    format!("{}..={}", min, max)
}

fn parse_batch(pairs: &[&str]) -> ConsoleCommand {
    let mut patch = ParamPatch::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return ConsoleCommand::Invalid(format!("expected KEY=VALUE, got '{}'", pair));
        };
        match parse_assignment(key, value) {
            Ok((key, value)) => patch.insert(key, value),
            Err(reason) => return ConsoleCommand::Invalid(reason),
        }
    }
    ConsoleCommand::Batch(patch)
}

// =============================================================================
// Rendering
// =============================================================================

/// One status line for a session snapshot
pub fn render_status(state: &SessionState) -> String {
    let transition = if state.transition.is_busy {
        format!("transition {:.0}%", state.transition.progress_percent)
    } else {
        "idle".to_string()
    };
    format!(
        "{} | power {} | blend {} ms | {}",
        state.connection,
        if state.params.power_on() { "on" } else { "off" },
        state.params.blend_time_ms(),
        transition
    )
}

// =============================================================================
// Console
// =============================================================================

pub struct Console {
    handle: SessionHandle,
    presets: PresetStore,
}

impl Console {
    pub fn new(handle: SessionHandle, presets: PresetStore) -> Self {
        Self { handle, presets }
    }

    /// Execute a console command. Returns true if the console should quit.
    ///
    /// Only a stopped session is an error; everything else is reported on
    /// `out`.
    pub async fn execute(&mut self, cmd: ConsoleCommand, out: &mut impl Write) -> Result<bool> {
        match cmd {
            ConsoleCommand::Quit => return Ok(true),
            ConsoleCommand::Help => writeln!(out, "{}", HELP)?,
            ConsoleCommand::Status => {
                let stats = self.handle.stats().snapshot();
                writeln!(out, "{}", render_status(&self.handle.state()))?;
                writeln!(
                    out,
                    "sent {} | received {} | dropped {} | malformed {}",
                    stats.sent, stats.received, stats.dropped, stats.malformed
                )?;
            }
            ConsoleCommand::Get(Some(key)) => {
                let value = self.handle.params().get(key).clone();
                match key.range() {
                    Some((min, max)) => {
                        writeln!(out, "{} = {} ({})", key, value, range_label(min, max))?
                    }
                    None => writeln!(out, "{} = {}", key, value)?,
                }
            }
            ConsoleCommand::Get(None) => {
                for (key, value) in self.handle.params().iter() {
                    writeln!(out, "{:<20} {}", key, value)?;
                }
            }

            ConsoleCommand::Connect => self.handle.connect().await?,
            ConsoleCommand::Disconnect => self.handle.disconnect().await?,

            ConsoleCommand::Set(key, value) => self.handle.update_param(key, value).await?,
            ConsoleCommand::Batch(patch) => self.handle.update_params(patch).await?,
            ConsoleCommand::TogglePower => {
                let next = if self.handle.params().power_on() { 0 } else { 1 };
                self.handle.update_param(ParamKey::PowerState, next).await?;
                writeln!(out, "power {}", if next == 1 { "on" } else { "off" })?;
            }
            ConsoleCommand::NextPalette => {
                self.handle.update_param(ParamKey::NextPalette, 1).await?;
            }
            ConsoleCommand::SystemPreset(index) => {
                self.handle
                    .update_param(ParamKey::Preset, index as i64)
                    .await?;
                writeln!(out, "system preset {}", SYSTEM_PRESETS[index])?;
            }
            ConsoleCommand::Crossfade(Some(ms)) => {
                self.handle.update_param(ParamKey::BlendTime, ms).await?;
            }
            ConsoleCommand::Crossfade(None) => {
                let current = self.handle.params().blend_time_ms();
                for ms in CROSSFADE_OPTIONS_MS {
                    let marker = if ms as u64 == current { "*" } else { " " };
                    writeln!(out, "{} {} ms", marker, ms)?;
                }
            }

            ConsoleCommand::ListPresets => {
                if self.presets.is_empty() {
                    writeln!(out, "no saved presets")?;
                }
                for preset in self.presets.list() {
                    writeln!(out, "{}", preset.name)?;
                }
            }
            ConsoleCommand::SavePreset(name) => {
                let params = self.handle.params();
                match self.presets.capture(&name, &params) {
                    Ok(preset) => writeln!(out, "saved '{}'", preset.name)?,
                    Err(e) => writeln!(out, "error: {}", e)?,
                }
            }
            ConsoleCommand::LoadPreset(name) => match self.presets.find(&name) {
                Some(preset) => {
                    let patch = preset.params.clone();
                    self.handle.update_params(patch).await?;
                    writeln!(out, "loaded '{}'", name.trim())?;
                }
                None => writeln!(out, "error: no preset named '{}'", name.trim())?,
            },
            ConsoleCommand::DeletePreset(name) => match self.presets.remove(&name) {
                Ok(removed) => writeln!(out, "deleted '{}'", removed.name)?,
                Err(e) => writeln!(out, "error: {}", e)?,
            },

            ConsoleCommand::Invalid(reason) => writeln!(out, "error: {}", reason)?,
            ConsoleCommand::None => {}
        }
        Ok(false)
    }
}

async fn next_log(log_rx: &mut Option<mpsc::Receiver<LogEntry>>) -> Option<LogEntry> {
    match log_rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Print state changes until Ctrl-C or the session stops
pub async fn watch(
    handle: &SessionHandle,
    mut log_rx: Option<mpsc::Receiver<LogEntry>>,
) -> Result<()> {
    let mut states = handle.subscribe();
    let mut last_line = String::new();
    let mut last_params = None;
    let mut stdout = std::io::stdout();

    loop {
        let state = states.borrow_and_update().clone();
        let line = render_status(&state);
        if line != last_line {
            writeln!(stdout, "{}", line)?;
            last_line = line;
        }
        if last_params.as_ref() != Some(&state.params) {
            let line: Vec<String> = state
                .params
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            writeln!(stdout, "  {}", line.join(" "))?;
            last_params = Some(state.params);
        }

        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            Some(entry) = next_log(&mut log_rx) => {
                writeln!(stdout, "{}", entry)?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionState;
    use crate::params::FixMode;
    use crate::session::{Session, SessionConfig};
    use crate::transport::mock::MockTransport;
    use crate::transport::TransportEvent;
    use std::path::PathBuf;
    use std::time::Duration;

    fn temp_presets(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lumifera-remote-console-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("presets.json")
    }

    fn manual_config() -> SessionConfig {
        SessionConfig {
            connect_delay: None,
            tick_interval: Duration::from_millis(16),
        }
    }

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse_line(""), ConsoleCommand::None);
        assert_eq!(parse_line("   "), ConsoleCommand::None);
        assert_eq!(parse_line("quit"), ConsoleCommand::Quit);
        assert_eq!(parse_line("EXIT"), ConsoleCommand::Quit);
        assert_eq!(parse_line("status"), ConsoleCommand::Status);
        assert_eq!(parse_line("reconnect"), ConsoleCommand::Connect);
        assert_eq!(parse_line("disconnect"), ConsoleCommand::Disconnect);
        assert_eq!(parse_line("power"), ConsoleCommand::TogglePower);
        assert_eq!(parse_line("next"), ConsoleCommand::NextPalette);
        assert_eq!(parse_line("presets"), ConsoleCommand::ListPresets);
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(
            parse_line("set brightness 200"),
            ConsoleCommand::Set(ParamKey::Brightness, ParamValue::Int(200))
        );
        assert_eq!(
            parse_line("set fixMode radar"),
            ConsoleCommand::Set(ParamKey::FixMode, FixMode::Radar.into())
        );
        assert!(matches!(
            parse_line("set sparkle 3"),
            ConsoleCommand::Invalid(_)
        ));
        assert!(matches!(
            parse_line("set bpm fast"),
            ConsoleCommand::Invalid(_)
        ));
        assert!(matches!(parse_line("set bpm"), ConsoleCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_get() {
        assert_eq!(parse_line("get"), ConsoleCommand::Get(None));
        assert_eq!(
            parse_line("get blendTime"),
            ConsoleCommand::Get(Some(ParamKey::BlendTime))
        );
        assert!(matches!(parse_line("get nope"), ConsoleCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_batch() {
        let expected = ParamPatch::new()
            .with(ParamKey::Bpm, 60)
            .with(ParamKey::Direction, -1);
        assert_eq!(
            parse_line("batch bpm=60 direction=-1"),
            ConsoleCommand::Batch(expected)
        );
        assert!(matches!(
            parse_line("batch bpm 60"),
            ConsoleCommand::Invalid(_)
        ));
        assert!(matches!(parse_line("batch"), ConsoleCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_presets_and_crossfade() {
        assert_eq!(parse_line("system slow"), ConsoleCommand::SystemPreset(1));
        assert_eq!(parse_line("system 5"), ConsoleCommand::SystemPreset(5));
        assert!(matches!(parse_line("system 9"), ConsoleCommand::Invalid(_)));

        assert_eq!(parse_line("crossfade"), ConsoleCommand::Crossfade(None));
        assert_eq!(
            parse_line("crossfade 500"),
            ConsoleCommand::Crossfade(Some(500))
        );
        assert!(matches!(
            parse_line("crossfade -5"),
            ConsoleCommand::Invalid(_)
        ));

        assert_eq!(
            parse_line("save Late Night"),
            ConsoleCommand::SavePreset("Late Night".into())
        );
        assert_eq!(
            parse_line("load Late Night"),
            ConsoleCommand::LoadPreset("Late Night".into())
        );
        assert!(matches!(parse_line("save"), ConsoleCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_rejects_out_of_range_values() {
        assert!(matches!(
            parse_line("set brightness 9000"),
            ConsoleCommand::Invalid(reason) if reason.contains("0..=255")
        ));
        assert!(matches!(
            parse_line("set bpm -40"),
            ConsoleCommand::Invalid(reason) if reason.contains("0..=180")
        ));
        assert!(matches!(
            parse_line("set direction 2"),
            ConsoleCommand::Invalid(_)
        ));
        assert!(matches!(
            parse_line("batch bpm=60 brightness=256"),
            ConsoleCommand::Invalid(_)
        ));
    }

    #[test]
    fn test_parse_accepts_range_endpoints() {
        assert_eq!(
            parse_line("set bpm 0"),
            ConsoleCommand::Set(ParamKey::Bpm, ParamValue::Int(0))
        );
        assert_eq!(
            parse_line("set bpm 180"),
            ConsoleCommand::Set(ParamKey::Bpm, ParamValue::Int(180))
        );
        assert_eq!(
            parse_line("set direction -1"),
            ConsoleCommand::Set(ParamKey::Direction, ParamValue::Int(-1))
        );
        assert_eq!(
            parse_line("set brightness 255"),
            ConsoleCommand::Set(ParamKey::Brightness, ParamValue::Int(255))
        );
        // Keys without a range take any number
        assert_eq!(
            parse_line("set blendTime 60000"),
            ConsoleCommand::Set(ParamKey::BlendTime, ParamValue::Int(60000))
        );
    }

    #[test]
    fn test_render_status_busy() {
        let mut state = SessionState::default();
        state.transition.is_busy = true;
        state.transition.progress_percent = 42.4;
        assert_eq!(
            render_status(&state),
            "disconnected | power on | blend 4000 ms | transition 42%"
        );
    }

    #[test]
    fn test_render_status_default() {
        let line = render_status(&SessionState::default());
        assert_eq!(line, "disconnected | power on | blend 4000 ms | idle");
    }

    #[tokio::test(start_paused = true)]
    async fn test_console_drives_session() {
        let transport = MockTransport::default();
        let (handle, task) = Session::spawn(transport.clone(), manual_config(), None);
        let mut console = Console::new(handle.clone(), PresetStore::load(temp_presets("drive")));
        let mut out = Vec::new();

        console
            .execute(ConsoleCommand::Connect, &mut out)
            .await
            .unwrap();
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

        console
            .execute(ConsoleCommand::TogglePower, &mut out)
            .await
            .unwrap();
        assert_eq!(peer.sent.recv().await.unwrap(), r#"{"powerState":0}"#);

        console
            .execute(ConsoleCommand::SystemPreset(2), &mut out)
            .await
            .unwrap();
        assert_eq!(peer.sent.recv().await.unwrap(), r#"{"preset":2}"#);

        console
            .execute(ConsoleCommand::NextPalette, &mut out)
            .await
            .unwrap();
        assert_eq!(peer.sent.recv().await.unwrap(), r#"{"nextPalette":1}"#);

        let quit = console.execute(ConsoleCommand::Quit, &mut out).await.unwrap();
        assert!(quit);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("power off"));
        assert!(text.contains("system preset Rotate"));

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_console_save_and_load_preset() {
        let transport = MockTransport::default();
        let (handle, task) = Session::spawn(transport.clone(), manual_config(), None);
        let path = temp_presets("save-load");
        let mut console = Console::new(handle.clone(), PresetStore::load(&path));
        let mut out = Vec::new();

        console
            .execute(ConsoleCommand::Set(ParamKey::Bpm, 77.into()), &mut out)
            .await
            .unwrap();
        handle
            .wait_for(|s| s.params.get(ParamKey::Bpm) == &ParamValue::Int(77))
            .await
            .unwrap();
        console
            .execute(ConsoleCommand::Get(Some(ParamKey::Bpm)), &mut out)
            .await
            .unwrap();
        console
            .execute(ConsoleCommand::Get(Some(ParamKey::BlendTime)), &mut out)
            .await
            .unwrap();
        console
            .execute(ConsoleCommand::SavePreset("Groove".into()), &mut out)
            .await
            .unwrap();
        assert_eq!(PresetStore::load(&path).len(), 1);

        console
            .execute(ConsoleCommand::Connect, &mut out)
            .await
            .unwrap();
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

        console
            .execute(ConsoleCommand::LoadPreset("Groove".into()), &mut out)
            .await
            .unwrap();
        let sent: serde_json::Value =
            serde_json::from_str(&peer.sent.recv().await.unwrap()).unwrap();
        assert_eq!(sent["bpm"], 77);
        assert_eq!(sent.as_object().unwrap().len(), crate::presets::PRESET_KEYS.len());

        console
            .execute(ConsoleCommand::LoadPreset("Missing".into()), &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("bpm = 77 (0..=180)\n"));
        assert!(text.contains("blendTime = 4000\n"));
        assert!(text.contains("saved 'Groove'"));
        assert!(text.contains("error: no preset named 'Missing'"));

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }
}

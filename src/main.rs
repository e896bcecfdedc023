//! Lumifera Remote - terminal remote control for a Lumifera LED installation
//!
//! Usage:
//!   lumifera-remote                      Terminal UI
//!   lumifera-remote set brightness 200   Send one change and exit
//!   lumifera-remote watch                Follow device state
//!   lumifera-remote presets list         Manage saved presets

use clap::Parser;
use lumifera_remote::app::App;
use lumifera_remote::cli::{Cli, Command, PresetAction};
use lumifera_remote::config::{self, Config};
use lumifera_remote::console;
use lumifera_remote::constants::CHANNEL_CAPACITY;
use lumifera_remote::error::{RemoteError, Result};
use lumifera_remote::logging::{self, LogEntry};
use lumifera_remote::params::{ParamKey, ParamValue};
use lumifera_remote::presets::PresetStore;
use lumifera_remote::session::{Session, SessionConfig, SessionHandle};
use lumifera_remote::transport::WebSocketTransport;
use lumifera_remote::ui;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

fn main() -> ExitCode {
    let cli = Cli::parse();
    // stderr output would tear the terminal UI
    if !matches!(cli.command, None | Some(Command::Console)) {
        logging::init_tracing(cli.verbose);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let (mut config, config_path) = match &cli.config {
        Some(path) => (config::load_from(path), path.clone()),
        None => config::load(),
    };
    if let Some(url) = &cli.url {
        config.device.url = url.clone();
    }
    config.validate()?;
    let preset_path = config.preset_path(&config_path);

    // Preset management needs no device
    let command = match cli.command.unwrap_or(Command::Console) {
        Command::Presets { action } => {
            return run_presets(action, PresetStore::load(preset_path));
        }
        command => command,
    };

    // Create tokio runtime
    let rt = tokio::runtime::Runtime::new().map_err(|e| RemoteError::Runtime { source: e })?;
    rt.block_on(run_session(command, config, preset_path, cli.trace_traffic))
}

async fn run_session(
    command: Command,
    config: Config,
    preset_path: PathBuf,
    trace_traffic: bool,
) -> Result<()> {
    // The terminal UI always shows session activity
    let (log_tx, log_rx) = if trace_traffic || command == Command::Console {
        let (tx, rx) = mpsc::channel::<LogEntry>(CHANNEL_CAPACITY);
        (Some(tx), Some(rx))
    } else {
        (None, None)
    };

    let mut session_config = SessionConfig::from(&config);
    let transport = WebSocketTransport::new(config.device.url.clone());
    info!("Device: {}", config.device.url);

    match command {
        Command::Set {
            key,
            value,
            timeout,
        } => {
            let key: ParamKey = key.parse()?;
            let value = ParamValue::parse(key, &value)?;

            // Connect right away instead of after the startup delay
            session_config.connect_delay = None;
            let (handle, task) = Session::spawn(transport, session_config, log_tx);

            let result = set_once(&handle, &config.device.url, key, value, timeout).await;
            stop(&handle, task).await;
            result
        }

        Command::Watch => {
            let (handle, task) = Session::spawn(transport, session_config, log_tx);
            let result = console::watch(&handle, log_rx).await;
            stop(&handle, task).await;
            result
        }

        Command::Console | Command::Presets { .. } => {
            let (handle, task) = Session::spawn(transport, session_config, log_tx);
            let mut app = App::new(
                config.device.url.clone(),
                handle.clone(),
                PresetStore::load(preset_path),
                log_rx,
            );
            let result = ui::run(&mut app).await;
            stop(&handle, task).await;
            result
        }
    }
}

/// Connect, send one change, and let shutdown flush it
async fn set_once(
    handle: &SessionHandle,
    url: &str,
    key: ParamKey,
    value: ParamValue,
    timeout_secs: u64,
) -> Result<()> {
    handle.connect().await?;

    let connected = handle.wait_for(|s| s.connection.is_connected());
    tokio::time::timeout(Duration::from_secs(timeout_secs), connected)
        .await
        .map_err(|_| RemoteError::ConnectTimeout {
            url: url.to_string(),
        })??;

    handle.update_param(key, value.clone()).await?;
    println!("{} = {}", key, value);
    Ok(())
}

/// Tear the session down and wait for the transport to close
async fn stop(handle: &SessionHandle, task: JoinHandle<()>) {
    if handle.shutdown().await.is_err() {
        warn!("Session already stopped");
    }
    if let Err(e) = task.await {
        warn!("Session task failed: {}", e);
    }
}

fn run_presets(action: PresetAction, mut presets: PresetStore) -> Result<()> {
    match action {
        PresetAction::List => {
            if presets.is_empty() {
                println!("No presets in {}", presets.path().display());
            }
            for preset in presets.list() {
                println!("{}", preset.name);
            }
        }
        PresetAction::Show { name } => {
            let preset = presets.find(&name).ok_or_else(|| RemoteError::Preset {
                reason: format!("no preset named '{}'", name),
            })?;
            for (key, value) in preset.params.iter() {
                println!("{:<20} {}", key, value);
            }
        }
        PresetAction::Delete { name } => {
            let removed = presets.remove(&name)?;
            println!("Deleted '{}'", removed.name);
        }
    }
    Ok(())
}

//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// =============================================================================
// CLI Definition
// =============================================================================

/// Remote control for a Lumifera LED installation
#[derive(Parser, Debug, Default)]
#[command(name = "lumifera-remote")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Device WebSocket URL (overrides config)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print every protocol message and connection event (`watch`, `set`)
    #[arg(long)]
    pub trace_traffic: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive terminal UI (default)
    Console,

    /// Connect, send one parameter change, and exit
    Set {
        /// Parameter key, e.g. brightness or fixMode
        key: String,

        /// New value, e.g. 200 or RADAR
        value: String,

        /// Seconds to wait for the device
        #[arg(long, value_name = "SECS", default_value_t = crate::constants::ONE_SHOT_CONNECT_TIMEOUT_SECS)]
        timeout: u64,
    },

    /// Print connection state, device parameters and transition progress
    Watch,

    /// Manage saved user presets
    Presets {
        #[command(subcommand)]
        action: PresetAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum PresetAction {
    /// List saved presets
    List,

    /// Show the values stored in a preset
    Show { name: String },

    /// Delete a preset
    Delete { name: String },
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::parse_from(["lumifera-remote"]);
        assert!(!cli.verbose);
        assert!(!cli.trace_traffic);
        assert!(cli.url.is_none());
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["lumifera-remote", "-v"]);
        assert!(cli.verbose);

        let cli = Cli::parse_from(["lumifera-remote", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_overrides() {
        let cli = Cli::parse_from([
            "lumifera-remote",
            "--url",
            "ws://192.168.4.1/ws",
            "--config",
            "/tmp/remote.toml",
        ]);
        assert_eq!(cli.url, Some("ws://192.168.4.1/ws".to_string()));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/remote.toml")));
    }

    #[test]
    fn test_cli_parse_set() {
        let cli = Cli::parse_from(["lumifera-remote", "set", "brightness", "200"]);
        match cli.command {
            Some(Command::Set {
                key,
                value,
                timeout,
            }) => {
                assert_eq!(key, "brightness");
                assert_eq!(value, "200");
                assert_eq!(timeout, crate::constants::ONE_SHOT_CONNECT_TIMEOUT_SECS);
            }
            _ => panic!("Expected Set command"),
        }

        let cli = Cli::parse_from(["lumifera-remote", "set", "fixMode", "RADAR", "--timeout", "2"]);
        assert!(matches!(cli.command, Some(Command::Set { timeout: 2, .. })));
    }

    #[test]
    fn test_cli_parse_presets() {
        let cli = Cli::parse_from(["lumifera-remote", "presets", "list"]);
        assert_eq!(
            cli.command,
            Some(Command::Presets {
                action: PresetAction::List
            })
        );

        let cli = Cli::parse_from(["lumifera-remote", "presets", "delete", "Night"]);
        assert_eq!(
            cli.command,
            Some(Command::Presets {
                action: PresetAction::Delete {
                    name: "Night".into()
                }
            })
        );
    }

    #[test]
    fn test_cli_parse_watch_with_trace() {
        let cli = Cli::parse_from(["lumifera-remote", "--trace-traffic", "watch"]);
        assert!(cli.trace_traffic);
        assert_eq!(cli.command, Some(Command::Watch));
    }
}

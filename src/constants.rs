//! Application-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Network
// =============================================================================

/// Default device endpoint (mDNS hostname on the installation's network)
pub const DEFAULT_DEVICE_URL: &str = "ws://lumifera.local/ws";

// =============================================================================
// Timing
// =============================================================================

/// Delay before the single automatic connect attempt (milliseconds)
pub const INITIAL_CONNECT_DELAY_MS: u64 = 1000;

/// Transition progress tick interval (milliseconds, ~60 FPS)
pub const PROGRESS_TICK_MS: u64 = 16;

/// Terminal UI frame duration (milliseconds, ~30 FPS)
pub const FRAME_DURATION_MS: u64 = 33;

/// Default time for `set` to wait for the device before giving up (seconds)
pub const ONE_SHOT_CONNECT_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// Buffers
// =============================================================================

/// Channel capacity for async message passing
pub const CHANNEL_CAPACITY: usize = 256;

/// Activity lines kept by the terminal UI
pub const MAX_ACTIVITY_LINES: usize = 500;

// =============================================================================
// Terminal UI
// =============================================================================

/// Step for PageUp/PageDown on the selected parameter
pub const PAGE_STEP: i64 = 10;

/// Width of the parameter list pane
pub const PARAMS_PANE_WIDTH: u16 = 44;

// =============================================================================
// Presets
// =============================================================================

/// Default preset file name (next to the config file)
pub const DEFAULT_PRESET_FILE: &str = "presets.json";

/// Presets built into the device firmware, selected by index via `preset`
pub const SYSTEM_PRESETS: [&str; 7] = [
    "Default",
    "Slow",
    "Rotate",
    "Pulsate",
    "Random",
    "Fullscreen",
    "Simmering",
];

/// Crossfade durations offered for `blendTime` (milliseconds)
pub const CROSSFADE_OPTIONS_MS: [i64; 6] = [200, 500, 1000, 2000, 4000, 8000];

//! UI theme constants - Minimalist dark theme

use ratatui::style::Color;

// Base colors - muted grays
pub const COLOR_DIM: Color = Color::Rgb(80, 80, 80); // Borders, secondary
pub const COLOR_MUTED: Color = Color::Rgb(120, 120, 120); // Labels
pub const COLOR_TEXT: Color = Color::Rgb(180, 180, 180); // Normal text
pub const COLOR_BRIGHT: Color = Color::Rgb(220, 220, 220); // Emphasis

// Accent colors - used sparingly
pub const COLOR_ACCENT: Color = Color::Rgb(100, 180, 220); // Keys, inbound, gauge
pub const COLOR_SUCCESS: Color = Color::Rgb(100, 180, 100); // Connected, outbound
pub const COLOR_WARNING: Color = Color::Yellow;
pub const COLOR_ERROR: Color = Color::Red;

// Semantic aliases
pub const COLOR_BORDER: Color = COLOR_DIM;
pub const COLOR_TITLE: Color = COLOR_BRIGHT;
pub const COLOR_LABEL: Color = COLOR_MUTED;
pub const COLOR_VALUE: Color = COLOR_TEXT;
pub const COLOR_SELECTED: Color = COLOR_BRIGHT;

// Connection states
pub const COLOR_CONNECTED: Color = COLOR_SUCCESS;
pub const COLOR_DISCONNECTED: Color = COLOR_MUTED;
pub const COLOR_CONNECTING: Color = COLOR_WARNING;

// Activity colors
pub const COLOR_LOG_TX: Color = COLOR_SUCCESS;
pub const COLOR_LOG_RX: Color = COLOR_ACCENT;
pub const COLOR_LOG_SYSTEM: Color = COLOR_MUTED;

// Action bar
pub const COLOR_KEY: Color = COLOR_ACCENT;
pub const COLOR_ACTION: Color = COLOR_MUTED;

// Symbols
pub const SYMBOL_CONNECTED: &str = "●";
pub const SYMBOL_DISCONNECTED: &str = "○";
pub const SYMBOL_CONNECTING: &str = "◐";
pub const SYMBOL_IN: &str = "←";
pub const SYMBOL_OUT: &str = "→";
pub const SYMBOL_DROPPED: &str = "✖";
pub const SYMBOL_SELECTED: &str = "▸";

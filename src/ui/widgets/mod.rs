//! Widgets drawn by the terminal UI

pub mod actions;
pub mod activity;
pub mod params;
pub mod status;

//! Lumifera Remote
//!
//! Parameter synchronization between a remote-control front end and a
//! Lumifera LED installation over WebSocket/JSON. A [`session::Session`]
//! owns the connection, the client-side parameter set, outbound dispatch
//! and the transition progress timer; front ends drive it through a
//! [`session::SessionHandle`].

pub mod app;
pub mod cli;
pub mod config;
pub mod connection;
pub mod console;
pub mod constants;
pub mod error;
pub mod input;
pub mod logging;
pub mod outbox;
pub mod params;
pub mod presets;
pub mod protocol;
pub mod session;
pub mod stats;
pub mod store;
pub mod transition;
pub mod transport;
pub mod ui;

//! Integration tests for parameter synchronization
//!
//! Runs a real session with the WebSocket transport against an in-process
//! device stub speaking the JSON protocol.

use futures_util::{SinkExt, StreamExt};
use lumifera_remote::connection::ConnectionState;
use lumifera_remote::params::{FixMode, ParamKey, ParamPatch, ParamValue};
use lumifera_remote::session::{Session, SessionConfig, SessionHandle, SessionState};
use lumifera_remote::transport::WebSocketTransport;
use serde_json::json;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// Device stub
// =============================================================================

type DeviceSocket = WebSocketStream<TcpStream>;

/// Start a session that auto-connects to a fresh local listener
async fn start() -> (SessionHandle, JoinHandle<()>, TcpListener) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/ws", listener.local_addr().unwrap());

    let config = SessionConfig {
        connect_delay: Some(Duration::from_millis(10)),
        tick_interval: Duration::from_millis(16),
    };
    let (handle, task) = Session::spawn(WebSocketTransport::new(url), config, None);
    (handle, task, listener)
}

async fn accept_device(listener: &TcpListener) -> DeviceSocket {
    let (stream, _) = timeout(TEST_TIMEOUT, listener.accept())
        .await
        .expect("timeout waiting for client")
        .unwrap();
    accept_async(stream).await.expect("handshake failed")
}

/// Start a session and wait until it is connected to the stub
async fn connected() -> (SessionHandle, JoinHandle<()>, DeviceSocket) {
    let (handle, task, listener) = start().await;
    let device = accept_device(&listener).await;
    wait_state(&handle, |s| s.connection == ConnectionState::Connected).await;
    (handle, task, device)
}

async fn wait_state(
    handle: &SessionHandle,
    predicate: impl FnMut(&SessionState) -> bool,
) -> SessionState {
    timeout(TEST_TIMEOUT, handle.wait_for(predicate))
        .await
        .expect("timeout waiting for state")
        .unwrap()
}

/// Next text frame from the session, skipping control frames
async fn next_text(device: &mut DeviceSocket) -> String {
    loop {
        let msg = timeout(TEST_TIMEOUT, device.next())
            .await
            .expect("timeout waiting for message")
            .expect("socket ended")
            .unwrap();
        if let Message::Text(text) = msg {
            return text.to_string();
        }
    }
}

async fn send_text(device: &mut DeviceSocket, text: &str) {
    device.send(Message::Text(text.into())).await.unwrap();
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_auto_connect_and_inbound_snapshot() {
    let (handle, task, mut device) = connected().await;

    send_text(
        &mut device,
        r#"{"bpm":60,"fixMode":"RADAR","brightness":90,"sparkle":3}"#,
    )
    .await;

    let state = wait_state(&handle, |s| s.params.get(ParamKey::Bpm) == &ParamValue::Int(60)).await;
    assert_eq!(state.params.fix_mode(), Some(FixMode::Radar));
    assert_eq!(state.params.get(ParamKey::Brightness), &ParamValue::Int(90));
    // Untouched keys keep their defaults
    assert_eq!(state.params.get(ParamKey::BlendTime), &ParamValue::Int(4000));
    assert!(!state.transition.is_busy);

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_update_param_sends_single_key() {
    let (handle, task, mut device) = connected().await;

    handle
        .update_param(ParamKey::Brightness, 200)
        .await
        .unwrap();

    assert_eq!(next_text(&mut device).await, r#"{"brightness":200}"#);
    let state = handle.state();
    assert_eq!(state.params.get(ParamKey::Brightness), &ParamValue::Int(200));
    assert!(state.transition.is_busy);

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_update_params_sends_one_message() {
    let (handle, task, mut device) = connected().await;

    let patch = ParamPatch::new()
        .with(ParamKey::Bpm, 120)
        .with(ParamKey::FixMode, FixMode::Pause)
        .with(ParamKey::Direction, -1);
    handle.update_params(patch).await.unwrap();

    let sent: serde_json::Value = serde_json::from_str(&next_text(&mut device).await).unwrap();
    assert_eq!(
        sent,
        json!({"bpm": 120, "fixMode": "PAUSE", "direction": -1})
    );

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_malformed_inbound_keeps_connection() {
    let (handle, task, mut device) = connected().await;

    send_text(&mut device, "not json").await;
    send_text(&mut device, "[1,2,3]").await;
    send_text(&mut device, r#"{"brightness":10}"#).await;

    let state = wait_state(&handle, |s| {
        s.params.get(ParamKey::Brightness) == &ParamValue::Int(10)
    })
    .await;
    assert_eq!(state.connection, ConnectionState::Connected);

    let stats = handle.stats().snapshot();
    assert_eq!(stats.received, 3);
    assert_eq!(stats.malformed, 2);

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_shutdown_flushes_then_closes_socket() {
    let (handle, task, mut device) = connected().await;

    handle.update_param(ParamKey::Bpm, 42).await.unwrap();
    handle.shutdown().await.unwrap();

    assert_eq!(next_text(&mut device).await, r#"{"bpm":42}"#);

    // The client closes its side after the flush
    let closed = timeout(TEST_TIMEOUT, async {
        loop {
            match device.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            }
        }
    })
    .await;
    assert!(closed.is_ok());

    task.await.unwrap();
    assert_eq!(handle.connection_state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_device_close_goes_disconnected_and_reconnects_manually() {
    let (handle, task, listener) = start().await;
    let mut device = accept_device(&listener).await;
    wait_state(&handle, |s| s.connection.is_connected()).await;

    device.close(None).await.unwrap();
    wait_state(&handle, |s| s.connection == ConnectionState::Disconnected).await;

    // Offline edits are applied locally but never sent
    handle.update_param(ParamKey::Bpm, 99).await.unwrap();
    wait_state(&handle, |s| s.params.get(ParamKey::Bpm) == &ParamValue::Int(99)).await;

    handle.connect().await.unwrap();
    let mut device = accept_device(&listener).await;
    wait_state(&handle, |s| s.connection.is_connected()).await;

    handle.update_param(ParamKey::Brightness, 5).await.unwrap();
    assert_eq!(next_text(&mut device).await, r#"{"brightness":5}"#);
    assert_eq!(handle.stats().snapshot().dropped, 1);

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

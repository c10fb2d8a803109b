//! Shared test helpers to reduce duplication across integration tests.

#![allow(dead_code)]

#[allow(clippy::duplicate_mod)]
#[path = "fixtures/mod.rs"]
mod fixtures;

pub use fixtures::{
    DRIVER_NORMALIZED, LinkDown, MockRadar, MockTransport, RAW_SCALE, capture_logs, take_logs,
};
use x4_vcom::config::{DefaultConfig, ServerConfig};
use x4_vcom::Server;

/// Server type used by most tests.
pub type TestServer<C = DefaultConfig> = Server<MockRadar, MockTransport, C>;

// ============================================================================
// Server Creation Helpers
// ============================================================================

/// Create a server over a default mock radar, session closed.
pub fn create_test_server() -> TestServer {
    create_server_with(MockRadar::new())
}

/// Create a server over the given mock radar, session closed.
pub fn create_server_with<C: ServerConfig>(radar: MockRadar) -> TestServer<C> {
    Server::new(radar, MockTransport::new())
}

/// Create a server with an open session and no captured output.
pub fn create_open_server() -> TestServer {
    open(create_test_server())
}

/// Open the session of `server` and clear captured output.
pub fn open<C: ServerConfig>(mut server: TestServer<C>) -> TestServer<C> {
    assert_eq!(send(&mut server, "OpenRadar"), b"<ACK>");
    server.transport_mut().clear();
    server
}

// ============================================================================
// Request Helpers
// ============================================================================

/// Send one request and return the frame written in response.
pub fn send<C: ServerConfig>(server: &mut TestServer<C>, request: &str) -> Vec<u8> {
    send_bytes(server, request.as_bytes())
}

/// Send one raw request and return the frame written in response.
pub fn send_bytes<C: ServerConfig>(server: &mut TestServer<C>, request: &[u8]) -> Vec<u8> {
    let before = server.transport().frames.len();
    server.handle_request(request);
    let frames = &server.transport().frames;
    assert_eq!(frames.len(), before + 1, "exactly one frame per request");
    frames[before].clone()
}

/// Send one request and return the frame as text.
pub fn send_text<C: ServerConfig>(server: &mut TestServer<C>, request: &str) -> String {
    String::from_utf8_lossy(&send(server, request)).into_owned()
}

/// Read a variable, expecting a data frame; returns the value text.
pub fn get_var<C: ServerConfig>(server: &mut TestServer<C>, name: &str) -> String {
    let text = send_text(server, &format!("VarGetValue_ByName({})", name));
    data_payload(&text).to_string()
}

/// Payload of a data frame, panicking on anything else.
pub fn data_payload(frame: &str) -> &str {
    assert!(!frame.starts_with("<ERR>"), "unexpected error frame {:?}", frame);
    assert!(!frame.starts_with("<WRN>"), "unexpected warning frame {:?}", frame);
    frame
        .strip_suffix("<ACK>")
        .unwrap_or_else(|| panic!("frame not terminated: {:?}", frame))
}

/// Assert `frame` is an error frame carrying `message`.
pub fn assert_error(frame: &[u8], message: &str) {
    assert_eq!(
        String::from_utf8_lossy(frame),
        format!("<ERR>{}<ACK>", message)
    );
}

// ============================================================================
// Frame Decoding Helpers
// ============================================================================

/// Split a length-prefixed frame into its prefix value and body.
pub fn split_prefix(frame: &[u8]) -> (u32, &[u8]) {
    assert!(frame.len() >= 4, "frame shorter than prefix");
    let (prefix, body) = frame.split_at(4);
    (u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]), body)
}

/// Decode a binary sample frame (without prefix).
pub fn decode_samples(frame: &[u8]) -> Vec<f32> {
    let payload = frame
        .strip_suffix(b"<ACK>")
        .unwrap_or_else(|| panic!("frame not terminated"));
    assert_eq!(payload.len() % 4, 0, "payload not a whole number of samples");
    payload
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

//! Configuration traits and implementations for buffer sizing and acquisition.
//!
//! The `ServerConfig` trait allows compile-time configuration of buffer sizes,
//! the sweep-completion poll budget and the normalization path without runtime
//! overhead.

/// Largest frame the X4 produces: 768 bins, doubled when down-conversion
/// interleaves I/Q samples.
pub const FRAME_CAPACITY: usize = 1536;

/// Transmit scratch size: length prefix + largest binary frame + `<ACK>`.
pub const PACKET_CAPACITY: usize = 4 + FRAME_CAPACITY * 4 + 5;

/// Per-token byte cap of the command parser.
pub const TOKEN_CAPACITY: usize = 100;

/// Server configuration trait.
///
/// All values are const (zero runtime cost).
pub trait ServerConfig {
    /// Maximum bytes kept per parsed token (default: 100)
    const MAX_TOKEN: usize;

    /// Maximum samples acquired per frame (default: 1536)
    const MAX_FRAME_SAMPLES: usize;

    /// Maximum encoded frame size in bytes (default: 6153)
    const MAX_PACKET: usize;

    /// Sweep-done polls before the device is declared unresponsive (default: 100000)
    const SWEEP_POLL_LIMIT: u32;

    /// Normalize frames on the host from a raw read instead of using the
    /// driver's normalized read (default: false)
    const POST_NORMALIZE: bool;
}

/// Default configuration.
///
/// - MAX_TOKEN: 100 bytes
/// - MAX_FRAME_SAMPLES: 1536 samples
/// - MAX_PACKET: 6153 bytes
/// - SWEEP_POLL_LIMIT: 100000 polls
/// - POST_NORMALIZE: false (driver normalization)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DefaultConfig;

impl ServerConfig for DefaultConfig {
    const MAX_TOKEN: usize = TOKEN_CAPACITY;
    const MAX_FRAME_SAMPLES: usize = FRAME_CAPACITY;
    const MAX_PACKET: usize = PACKET_CAPACITY;
    const SWEEP_POLL_LIMIT: u32 = 100_000;
    const POST_NORMALIZE: bool = false;
}

/// Host-side normalization configuration.
///
/// Same limits as `DefaultConfig`, but `GetFrameNormalized` reads a raw frame
/// and scales it with the factors captured from the live radar settings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PostNormConfig;

impl ServerConfig for PostNormConfig {
    const MAX_TOKEN: usize = TOKEN_CAPACITY;
    const MAX_FRAME_SAMPLES: usize = FRAME_CAPACITY;
    const MAX_PACKET: usize = PACKET_CAPACITY;
    const SWEEP_POLL_LIMIT: u32 = 100_000;
    const POST_NORMALIZE: bool = true;
}

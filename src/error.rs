//! Error types for command processing.
//!
//! The `ServerError` enum represents every failure a request can produce.
//! Its `Display` output is the exact text carried in the `<ERR>` frame sent
//! back to the client.

use crate::device::DeviceError;
use core::fmt;

/// Server error type.
///
/// Session-state, unknown-name and device failures are reported to the client
/// as error frames; the server keeps serving subsequent requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// Operation needs an open radar session
    RadarClosed,

    /// `OpenRadar` while a session is already open
    AlreadyOpen,

    /// Radar initialization failed
    InitFailed {
        /// Driver status of the failed init
        status: i32,
        /// Driver's configuration check result
        reason: i32,
    },

    /// Variable name not in the registry (get)
    UnknownVariable,

    /// Variable name not in the registry, or not writable (set)
    InvalidVariable,

    /// Command name not in the command table
    UnknownCommand,

    /// Device failed while reading a variable
    GetFailed(i32),

    /// Device failed while writing a variable
    SetFailed(i32),

    /// Device failed while reading a raw SPI register
    RegisterReadFailed,

    /// Sweep never reported completion
    DeviceNotResponding,

    /// Other device failure (sweep, frame read, reset)
    Device(i32),

    /// Frame does not fit the acquisition buffer
    FrameTooLarge,

    /// Encoded response does not fit the transmit buffer
    BufferFull,
}

impl From<DeviceError> for ServerError {
    fn from(err: DeviceError) -> Self {
        ServerError::Device(err.status)
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::RadarClosed => write!(f, "ERROR: Radar is closed"),
            ServerError::AlreadyOpen => write!(f, "Connection already open"),
            ServerError::InitFailed { status, reason } => {
                write!(f, "x4driver_init() error {}, check config = {}", status, reason)
            }
            ServerError::UnknownVariable => write!(f, "Unknown Variable Name"),
            ServerError::InvalidVariable => write!(f, "Unknown/Invalid Variable Name"),
            ServerError::UnknownCommand => write!(f, "Invalid and/or Unimplemented Command"),
            ServerError::GetFailed(status) => write!(f, "ERROR: Get var error code = {}", status),
            ServerError::SetFailed(status) => write!(f, "ERROR: Set var error code = {}", status),
            ServerError::RegisterReadFailed => write!(f, "Cannot read register"),
            ServerError::DeviceNotResponding => write!(f, "ERROR: Radar not responding"),
            ServerError::Device(status) => write!(f, "ERROR: Radar error code = {}", status),
            ServerError::FrameTooLarge => write!(f, "ERROR: Frame exceeds buffer"),
            ServerError::BufferFull => write!(f, "Buffer full"),
        }
    }
}

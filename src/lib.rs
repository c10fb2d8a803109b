//! # x4-vcom
//!
//! Command server for X4 pulsed-radar boards driven over a virtual serial
//! port, with zero heap allocation.
//!
//! **Key features:**
//! - **Text command protocol** - `Name(arg1,arg2,arg3)` requests, one
//!   `<ACK>`-terminated frame per request, optional length prefixes
//! - **Variable registry** - Named radar settings with aliases, generated at
//!   compile time by `#[derive(NameTable)]`
//! - **Frame acquisition** - Raw or normalized frames as little-endian `f32`
//! - **Normalization engine** - Host-side normalization matching the driver
//! - **Pluggable I/O** - `RadarDevice` and `Transport` traits
//!
//! ## Optional Features
//!
//! - `offline` - The `x4-norm` binary, normalizing recorded frames on a host
//!
//! Logging goes through the `log` facade; the integrator installs the logger.
//!
//! This library is `no_std` compatible.

#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

extern crate heapless;

// Lets the derive macro's `::x4_vcom::...` paths resolve inside this crate.
extern crate self as x4_vcom;

// Re-export derive macro (always available)
pub use x4_vcom_macros::NameTable;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod device;
pub mod error;
pub mod io;
pub mod names;
pub mod norm;
pub mod registry;
pub mod response;
pub mod server;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Configuration
pub use config::{DefaultConfig, PostNormConfig, ServerConfig};

// Collaborator seams
pub use device::{DacStep, DeviceError, RadarDevice, TxCenterFrequency, TxPower};
pub use io::Transport;

// Error types
pub use error::ServerError;

// Name tables (trait; the derive macro of the same name is exported above)
pub use names::NameTable;

// Normalization
pub use norm::{NormConfig, NormFactors};

// Registry
pub use registry::{Descriptor, SetOutcome, ValueKind, Variable};

// Response types
pub use response::{Frame, Response};

// Server types
pub use server::{CONNECTOR_VERSION, Command, CommandId, Server, Session};

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

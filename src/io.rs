//! Byte transport abstraction for the command channel.
//!
//! The `Transport` trait is the outbound half of the virtual serial port: the
//! server hands it one fully encoded frame per request. The inbound half is
//! owned by the integrator, who passes each received request buffer to
//! `Server::handle_request()`.

/// Platform-agnostic outbound byte transport (USB CDC, UART, TCP, ...).
///
/// Implementations should queue or send the whole buffer and report how many
/// bytes were accepted. A count lower than `buf.len()` is a short write; the
/// server logs it and moves on, it never retries a partially sent frame.
pub trait Transport {
    /// Platform-specific error type
    type Error: core::fmt::Debug;

    /// Write one encoded frame.
    ///
    /// Returns:
    /// - `Ok(n)` with the number of bytes accepted
    /// - `Err(Self::Error)` on transport failure
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        (**self).write(buf)
    }
}

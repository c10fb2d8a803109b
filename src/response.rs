//! Response types and wire framing.
//!
//! `Response` is what a command produces on success. `Frame` is what goes on
//! the wire: every frame ends with the `<ACK>` token, warnings and errors are
//! tagged with `<WRN>`/`<ERR>`, and when length-prefix mode is enabled a
//! little-endian `u32` holding the byte count of the rest of the frame comes
//! first.
//!
//! ```text
//! Data     [len] payload <ACK>
//! Ack      [len] <ACK>
//! Warning  [len] <WRN> payload <ACK>
//! Error    [len] <ERR> payload <ACK>
//! Binary   [len] bytes <ACK>
//! ```

use crate::error::ServerError;

/// Frame terminator, present on every frame.
pub const ACK_TOKEN: &[u8; 5] = b"<ACK>";

/// Warning tag.
pub const WARNING_TAG: &[u8; 5] = b"<WRN>";

/// Error tag.
pub const ERROR_TAG: &[u8; 5] = b"<ERR>";

/// Size of the optional length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Text payload capacity of a `Response`.
pub const MAX_MESSAGE: usize = 512;

/// Successful command outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Empty acknowledgement
    Ack,

    /// Text payload
    Data(heapless::String<MAX_MESSAGE>),

    /// Operation completed, with a non-fatal advisory
    Warning(heapless::String<MAX_MESSAGE>),

    /// Binary frame of this many samples from the server's frame buffer
    Samples(usize),
}

impl Response {
    /// Text response. Messages over capacity are truncated.
    pub fn data(message: &str) -> Self {
        Response::Data(bounded(message))
    }

    /// Warning response. Messages over capacity are truncated.
    pub fn warning(message: &str) -> Self {
        Response::Warning(bounded(message))
    }
}

fn bounded(message: &str) -> heapless::String<MAX_MESSAGE> {
    let mut out = heapless::String::new();
    for c in message.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// One encoded message on the wire.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Frame<'a> {
    /// Text payload
    Data(&'a str),

    /// Acknowledgement (empty data)
    Ack,

    /// Tagged warning text
    Warning(&'a str),

    /// Tagged error text
    Error(&'a str),

    /// Raw bytes
    Binary(&'a [u8]),

    /// Binary payload of little-endian `f32` samples
    Samples(&'a [f32]),
}

impl Frame<'_> {
    fn tag(&self) -> Option<&'static [u8; 5]> {
        match self {
            Frame::Warning(_) => Some(WARNING_TAG),
            Frame::Error(_) => Some(ERROR_TAG),
            _ => None,
        }
    }

    fn payload_len(&self) -> usize {
        match self {
            Frame::Data(text) | Frame::Warning(text) | Frame::Error(text) => text.len(),
            Frame::Ack => 0,
            Frame::Binary(bytes) => bytes.len(),
            Frame::Samples(samples) => samples.len() * core::mem::size_of::<f32>(),
        }
    }

    /// Byte count after the length prefix: tag, payload and `<ACK>`.
    pub fn body_len(&self) -> usize {
        let tag = if self.tag().is_some() { WARNING_TAG.len() } else { 0 };
        tag + self.payload_len() + ACK_TOKEN.len()
    }

    /// Total encoded size.
    pub fn encoded_len(&self, length_prefix: bool) -> usize {
        let prefix = if length_prefix { LENGTH_PREFIX_SIZE } else { 0 };
        prefix + self.body_len()
    }

    /// Encode into `out`, replacing its contents.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - `out` holds exactly `encoded_len(length_prefix)` bytes
    /// * `Err(ServerError::BufferFull)` - frame exceeds `N`; `out` is left empty
    pub fn encode<const N: usize>(
        &self,
        length_prefix: bool,
        out: &mut heapless::Vec<u8, N>,
    ) -> Result<(), ServerError> {
        out.clear();

        if self.encoded_len(length_prefix) > N {
            return Err(ServerError::BufferFull);
        }

        let result = self.write_into(length_prefix, out);
        if result.is_err() {
            out.clear();
        }
        result
    }

    fn write_into<const N: usize>(
        &self,
        length_prefix: bool,
        out: &mut heapless::Vec<u8, N>,
    ) -> Result<(), ServerError> {
        if length_prefix {
            let body_len = u32::try_from(self.body_len()).map_err(|_| ServerError::BufferFull)?;
            push(out, &body_len.to_le_bytes())?;
        }

        if let Some(tag) = self.tag() {
            push(out, tag)?;
        }

        match self {
            Frame::Data(text) | Frame::Warning(text) | Frame::Error(text) => {
                push(out, text.as_bytes())?
            }
            Frame::Ack => {}
            Frame::Binary(bytes) => push(out, bytes)?,
            Frame::Samples(samples) => {
                for sample in samples.iter() {
                    push(out, &sample.to_le_bytes())?;
                }
            }
        }

        push(out, ACK_TOKEN)
    }
}

fn push<const N: usize>(out: &mut heapless::Vec<u8, N>, bytes: &[u8]) -> Result<(), ServerError> {
    out.extend_from_slice(bytes)
        .map_err(|_| ServerError::BufferFull)
}

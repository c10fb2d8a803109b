//! Request processing.
//!
//! `Server` owns the radar, the transport and the session state. Each call to
//! `handle_request()` parses one command, runs it to completion and writes
//! exactly one `<ACK>`-terminated frame back.

use core::fmt::Write;
use core::marker::PhantomData;

use crate::config::{FRAME_CAPACITY, PACKET_CAPACITY, ServerConfig};
use crate::device::RadarDevice;
use crate::error::ServerError;
use crate::io::Transport;
use crate::names::NameTable;
use crate::norm::{NormConfig, NormFactors};
use crate::registry::{self, SetOutcome, parse_int};
use crate::response::{Frame, MAX_MESSAGE, Response};

// Sub-modules
pub mod handlers;
pub mod parser;

// Re-export key types
pub use handlers::{CommandId, SessionGate};
pub use parser::Command;

/// Protocol version reported by `ConnectorVersion`.
pub const CONNECTOR_VERSION: &str = "1.0.0";

/// Per-connection state.
///
/// The session starts closed with length prefixes off.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Session {
    is_open: bool,
    length_prefix: bool,
}

impl Session {
    /// A radar session is open.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Frames carry a 4-byte length prefix.
    pub fn length_prefix(&self) -> bool {
        self.length_prefix
    }
}

/// Command server for one X4 radar.
///
/// Generic over:
/// - `D`: RadarDevice implementation
/// - `T`: Transport implementation
/// - `C`: ServerConfig implementation
pub struct Server<D, T, C>
where
    D: RadarDevice,
    T: Transport,
    C: ServerConfig,
{
    /// Radar driver
    device: D,

    /// Outbound byte channel
    transport: T,

    /// Session state
    session: Session,

    /// Acquisition buffer (TODO: use C::MAX_FRAME_SAMPLES when const generics stabilize)
    frame: heapless::Vec<f32, FRAME_CAPACITY>,

    /// Encoded frame scratch (TODO: use C::MAX_PACKET when const generics stabilize)
    tx: heapless::Vec<u8, PACKET_CAPACITY>,

    /// Config type marker (zero-size)
    _config: PhantomData<C>,
}

impl<D, T, C> core::fmt::Debug for Server<D, T, C>
where
    D: RadarDevice,
    T: Transport,
    C: ServerConfig,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Server")
            .field("session", &self.session)
            .field("frame_len", &self.frame.len())
            .finish_non_exhaustive()
    }
}

impl<D, T, C> Server<D, T, C>
where
    D: RadarDevice,
    T: Transport,
    C: ServerConfig,
{
    /// Create a server with a closed session.
    pub fn new(device: D, transport: T) -> Self {
        Self {
            device,
            transport,
            session: Session::default(),
            frame: heapless::Vec::new(),
            tx: heapless::Vec::new(),
            _config: PhantomData,
        }
    }

    /// Current session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The radar driver.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The radar driver, mutably.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The transport, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Process one request and write its response frame.
    ///
    /// Command failures are reported to the client as error frames. Transport
    /// failures are logged and otherwise ignored; the next request is served
    /// normally.
    pub fn handle_request(&mut self, buf: &[u8]) {
        let cmd = Command::parse_with_limit(buf, C::MAX_TOKEN);
        let result = self.execute(&cmd);
        self.respond(result);
    }

    /// Run a parsed command.
    fn execute(&mut self, cmd: &Command) -> Result<Response, ServerError> {
        let Some(id) = CommandId::from_name(cmd.name()) else {
            log::debug!("unknown command {:?}", cmd.name());
            return Err(ServerError::UnknownCommand);
        };
        log::debug!("command {}({}, {}, {})", id.name(), cmd.arg(0), cmd.arg(1), cmd.arg(2));

        match id.gate() {
            SessionGate::Open if !self.session.is_open => return Err(ServerError::RadarClosed),
            SessionGate::Closed if self.session.is_open => return Err(ServerError::AlreadyOpen),
            _ => {}
        }

        match id {
            CommandId::CreateHandle
            | CommandId::GetRegisterProperties
            | CommandId::SetIoPinDirection
            | CommandId::WriteIoPin
            | CommandId::ReadIoPin => Ok(Response::Ack),

            CommandId::OpenRadar => self.open(),

            CommandId::Close => {
                self.session.is_open = false;
                log::info!("radar session closed");
                Ok(Response::Ack)
            }

            CommandId::GetFrameRaw => self.acquire(false),
            CommandId::GetFrameNormalized => self.acquire(true),

            CommandId::VarGet => {
                let text = registry::get(&mut self.device, cmd.arg(0))?;
                Ok(Response::data(&text))
            }

            CommandId::VarSet => match registry::set(&mut self.device, cmd.arg(0), cmd.arg(1))? {
                SetOutcome::Applied => Ok(Response::Ack),
                SetOutcome::AppliedWithWarning(message) => Ok(Response::warning(&message)),
            },

            CommandId::ListVariables => Ok(Response::data(&registry::list_names())),

            CommandId::RegisterRead => {
                let address = parse_int(cmd.arg(0)) as u8;
                let value = self
                    .device
                    .spi_register(address)
                    .map_err(|_| ServerError::RegisterReadFailed)?;
                let mut text: heapless::String<8> = heapless::String::new();
                let _ = write!(text, "{}", value);
                Ok(Response::data(&text))
            }

            CommandId::ResetToDefaults => {
                self.device.setup_default()?;
                Ok(Response::Ack)
            }

            CommandId::ConnectorVersion => Ok(Response::data(CONNECTOR_VERSION)),

            CommandId::SendPacketLengths => {
                self.session.length_prefix = parse_int(cmd.arg(0)) != 0;
                Ok(Response::Ack)
            }
        }
    }

    fn open(&mut self) -> Result<Response, ServerError> {
        if let Err(err) = self.device.init() {
            let reason = self.device.check_configuration();
            self.session.is_open = false;
            log::warn!("radar init failed: {}, check config = {}", err, reason);
            return Err(ServerError::InitFailed {
                status: err.status,
                reason,
            });
        }

        self.session.is_open = true;
        log::info!("radar session opened");
        Ok(Response::Ack)
    }

    /// Sweep once and read the frame into the acquisition buffer.
    ///
    /// With down-conversion the frame holds interleaved I/Q, twice the bin
    /// count.
    fn acquire(&mut self, normalized: bool) -> Result<Response, ServerError> {
        let ddc_enabled = self.device.downconversion()? != 0;
        let bins = self.device.frame_bin_count()? as usize;
        let samples = if ddc_enabled { bins.checked_mul(2) } else { Some(bins) };
        let samples = samples
            .filter(|&n| n <= C::MAX_FRAME_SAMPLES)
            .ok_or(ServerError::FrameTooLarge)?;

        self.frame.clear();
        self.frame
            .resize(samples, 0.0)
            .map_err(|_| ServerError::FrameTooLarge)?;

        self.device.start_sweep()?;
        self.wait_for_sweep()?;

        if normalized && !C::POST_NORMALIZE {
            self.device.read_frame_normalized(&mut self.frame)?;
        } else {
            self.device.read_frame_raw(&mut self.frame)?;
            if normalized {
                let config = NormConfig::capture(&mut self.device)?;
                NormFactors::from_config(&config).apply(&mut self.frame);
            }
        }

        Ok(Response::Samples(samples))
    }

    fn wait_for_sweep(&mut self) -> Result<(), ServerError> {
        for _ in 0..C::SWEEP_POLL_LIMIT {
            if self.device.sweep_done()? {
                return Ok(());
            }
        }

        log::warn!("sweep not done after {} polls", C::SWEEP_POLL_LIMIT);
        Err(ServerError::DeviceNotResponding)
    }

    /// Encode the outcome as one frame and write it.
    fn respond(&mut self, result: Result<Response, ServerError>) {
        let length_prefix = self.session.length_prefix;
        let mut error_text: heapless::String<MAX_MESSAGE> = heapless::String::new();

        let frame = match &result {
            Ok(Response::Ack) => Frame::Ack,
            Ok(Response::Data(text)) => Frame::Data(text),
            Ok(Response::Warning(text)) => Frame::Warning(text),
            Ok(Response::Samples(n)) => Frame::Samples(&self.frame[..(*n).min(self.frame.len())]),
            Err(err) => {
                log::warn!("request failed: {}", err);
                let _ = write!(error_text, "{}", err);
                Frame::Error(&error_text)
            }
        };

        if let Err(err) = encode_bounded(&frame, length_prefix, C::MAX_PACKET, &mut self.tx) {
            log::warn!("response not encoded: {}", err);
            let mut fallback: heapless::String<32> = heapless::String::new();
            let _ = write!(fallback, "{}", err);
            if encode_bounded(&Frame::Error(&fallback), length_prefix, C::MAX_PACKET, &mut self.tx)
                .is_err()
            {
                return;
            }
        }

        match self.transport.write(&self.tx) {
            Ok(written) if written == self.tx.len() => {}
            Ok(written) => log::warn!("short write: {} of {} bytes", written, self.tx.len()),
            Err(err) => log::warn!("transport error: {:?}", err),
        }
    }
}

fn encode_bounded<const N: usize>(
    frame: &Frame<'_>,
    length_prefix: bool,
    max: usize,
    out: &mut heapless::Vec<u8, N>,
) -> Result<(), ServerError> {
    if frame.encoded_len(length_prefix) > max {
        out.clear();
        return Err(ServerError::BufferFull);
    }
    frame.encode(length_prefix, out)
}

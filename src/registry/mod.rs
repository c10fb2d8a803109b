//! Radar variable registry.
//!
//! Maps the variable names clients use (`"DACMin"`, `"pps"`, `"frame_start"`,
//! ...) onto typed `RadarDevice` accessors. Every variable carries a static
//! descriptor (value kind, writable); lookups go through the
//! derived `NameTable` so aliases resolve to the same variant.
//!
//! Integer and enumerated values are formatted as decimal, physical
//! quantities as C `%e`.

use core::fmt::Write;

use crate::device::{
    DacStep, DeviceError, PIF_NOISELESS_GHOST_ADDR, PIF_TRX_AUTO_BIDIR_ADDR, RadarDevice,
    SPEED_OF_LIGHT, TxCenterFrequency, TxPower, X4_FIXED_PLL_HZ,
};
use crate::error::ServerError;
use crate::names::NameTable;

pub mod value;

pub use value::{MAX_VALUE_TEXT, Value, format_scientific, parse_float, parse_int};

/// Capacity of the `ListVariables` payload.
pub const MAX_LIST: usize = 512;

/// Capacity of a set warning.
pub const MAX_WARNING: usize = 128;

/// Radar variable addressable by name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, crate::NameTable)]
pub enum Variable {
    /// Lower DAC sweep bound
    #[names("DACMin", "dac_min")]
    DacMin,
    /// Upper DAC sweep bound
    #[names("DACMax", "dac_max")]
    DacMax,
    /// DAC step selector
    #[names("DACStep", "dac_step")]
    DacStep,
    /// Pulses per DAC step
    #[names("PPS", "pps")]
    PulsesPerStep,
    /// Sweep iterations
    #[names("Iterations", "iterations")]
    Iterations,
    /// Pulse repetition frequency (Hz)
    #[names("PRF", "prf")]
    Prf,
    /// Pulse repetition frequency divider
    #[names("prf_div")]
    PrfDiv,
    /// Sampler frequency (Hz)
    #[names("SamplingRate", "fs")]
    SamplingRate,
    /// Range bins per frame
    #[names("SamplersPerFrame", "num_samples")]
    SamplersPerFrame,
    /// Frame length in sampler cycles
    #[names("frame_length")]
    FrameLength,
    /// Receiver wait states
    #[names("RxWait", "rx_wait")]
    RxWait,
    /// Transmitter region code
    #[names("tx_region", "TxRegion")]
    TxRegion,
    /// Transmitter power code
    #[names("tx_power")]
    TxPower,
    /// Digital down-conversion enable
    #[names("DownConvert", "ddc_en")]
    DownConvert,
    /// Frame area range offset (m)
    #[names("frame_offset")]
    FrameOffset,
    /// Frame area start (m)
    #[names("frame_start")]
    FrameStart,
    /// Frame area end (m)
    #[names("frame_end")]
    FrameEnd,
    /// Sweep duration (s)
    #[names("sweep_time")]
    SweepTime,
    /// Unambiguous range at the current PRF (m)
    #[names("unambiguous_range", "ur")]
    UnambiguousRange,
    /// Range per bin (m)
    #[names("res")]
    Resolution,
    /// RF sampler frequency (Hz)
    #[names("fs_rf")]
    SamplingRateRf,
}

/// How a variable's value is parsed and formatted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Plain integer, decimal on the wire
    Integer,
    /// Register code selected from a fixed set, decimal on the wire
    Enumerated,
    /// Physical quantity, `%e` on the wire
    Float,
}

/// Static description of a variable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// The variable
    pub variable: Variable,
    /// Canonical wire name
    pub name: &'static str,
    /// Value representation
    pub kind: ValueKind,
    /// Accepted by `set`
    pub writable: bool,
}

/// Result of a successful `set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// Value written
    Applied,
    /// Value written, with an advisory for the client
    AppliedWithWarning(heapless::String<MAX_WARNING>),
}

impl Variable {
    /// Value representation of this variable.
    pub fn kind(self) -> ValueKind {
        match self {
            Variable::DacStep | Variable::TxRegion | Variable::TxPower => ValueKind::Enumerated,
            Variable::Prf
            | Variable::SamplingRate
            | Variable::FrameOffset
            | Variable::FrameStart
            | Variable::FrameEnd
            | Variable::SweepTime
            | Variable::UnambiguousRange
            | Variable::Resolution
            | Variable::SamplingRateRf => ValueKind::Float,
            _ => ValueKind::Integer,
        }
    }

    /// Whether `set` accepts this variable.
    pub fn is_writable(self) -> bool {
        !matches!(
            self,
            Variable::Prf
                | Variable::SamplingRate
                | Variable::SamplersPerFrame
                | Variable::SweepTime
                | Variable::UnambiguousRange
                | Variable::Resolution
                | Variable::SamplingRateRf
        )
    }

    /// Static descriptor of this variable.
    pub fn descriptor(self) -> Descriptor {
        Descriptor {
            variable: self,
            name: self.name(),
            kind: self.kind(),
            writable: self.is_writable(),
        }
    }

    /// Read the current value from the radar.
    pub fn read<D: RadarDevice + ?Sized>(self, device: &mut D) -> Result<Value, DeviceError> {
        let value = match self {
            Variable::DacMin => Value::Int(device.dac_min()?.into()),
            Variable::DacMax => Value::Int(device.dac_max()?.into()),
            Variable::DacStep => Value::Int(device.dac_step()?.code().into()),
            Variable::PulsesPerStep => Value::Int(device.pulses_per_step()?.into()),
            Variable::Iterations => Value::Int(device.iterations()?.into()),
            Variable::Prf => Value::Float(X4_FIXED_PLL_HZ / f64::from(device.prf_div()?)),
            Variable::PrfDiv => Value::Int(device.prf_div()?.into()),
            Variable::SamplingRate => Value::Float(device.sampler_frequency()?.into()),
            Variable::SamplersPerFrame => Value::Int(device.frame_bin_count()?.into()),
            Variable::FrameLength => Value::Int(device.frame_length()?.into()),
            Variable::RxWait => Value::Int(device.rx_wait()?.into()),
            Variable::TxRegion => Value::Int(device.tx_center_frequency()?.code().into()),
            Variable::TxPower => Value::Int(device.tx_power()?.code().into()),
            Variable::DownConvert => Value::Int(device.downconversion()?.into()),
            Variable::FrameOffset => Value::Float(device.frame_area_offset()?.into()),
            Variable::FrameStart => Value::Float(device.frame_area()?.0.into()),
            Variable::FrameEnd => Value::Float(device.frame_area()?.1.into()),
            Variable::SweepTime => Value::Float(device.sweep_time()?.into()),
            Variable::UnambiguousRange => {
                // The PRF is held in single precision before the range is derived.
                let prf = (X4_FIXED_PLL_HZ / f64::from(device.prf_div()?)) as f32;
                Value::Float(SPEED_OF_LIGHT / (2.0 * f64::from(prf)))
            }
            Variable::Resolution => Value::Float(device.bin_length()?.into()),
            Variable::SamplingRateRf => Value::Float(device.sampler_frequency_rf()?.into()),
        };
        Ok(value)
    }

    /// Parse `text` per this variable's value kind.
    pub fn parse(self, text: &str) -> Value {
        match self.kind() {
            ValueKind::Float => Value::Float(parse_float(text).into()),
            ValueKind::Integer | ValueKind::Enumerated => Value::Int(parse_int(text).into()),
        }
    }

    /// Parse `text` and write it to the radar.
    ///
    /// Read-only variables are rejected with `InvalidVariable`. Narrowing to
    /// the register width truncates, as the driver's setters do.
    pub fn write<D: RadarDevice + ?Sized>(
        self,
        device: &mut D,
        text: &str,
    ) -> Result<SetOutcome, ServerError> {
        if !self.is_writable() {
            return Err(ServerError::InvalidVariable);
        }
        self.write_value(device, self.parse(text))
    }

    fn write_value<D: RadarDevice + ?Sized>(
        self,
        device: &mut D,
        value: Value,
    ) -> Result<SetOutcome, ServerError> {
        let set_failed = |err: DeviceError| ServerError::SetFailed(err.status);
        let (int, float) = (value.as_int(), value.as_float());

        let result = match self {
            Variable::DacMin => device.set_dac_min(int as u16),
            Variable::DacMax => device.set_dac_max(int as u16),
            Variable::DacStep => device.set_dac_step(DacStep::from_selector(int)),
            Variable::PulsesPerStep => device.set_pulses_per_step(int as u16),
            Variable::Iterations => return set_iterations(device, int),
            Variable::PrfDiv => device.set_prf_div(int as u8),
            Variable::FrameLength => device.set_frame_length(int as u8),
            Variable::RxWait => device.set_rx_wait(int as u8),
            Variable::TxRegion => {
                device.set_tx_center_frequency(TxCenterFrequency::from_selector(int))
            }
            Variable::TxPower => device.set_tx_power(TxPower::from_selector(int)),
            Variable::DownConvert => device.set_downconversion(int as u8),
            Variable::FrameOffset => device.set_frame_area_offset(float),
            Variable::FrameStart => {
                let (_, end) = device.frame_area().map_err(set_failed)?;
                device.set_frame_area(float, end)
            }
            Variable::FrameEnd => {
                let (start, _) = device.frame_area().map_err(set_failed)?;
                device.set_frame_area(start, float)
            }
            _ => return Err(ServerError::InvalidVariable),
        };
        result.map_err(set_failed)?;

        Ok(SetOutcome::Applied)
    }
}

/// Iterations are written as requested, with a warning when the value is not
/// a multiple of what the current bidirectional sweep and noiseless ghost
/// settings need.
fn set_iterations<D: RadarDevice + ?Sized>(
    device: &mut D,
    requested: i32,
) -> Result<SetOutcome, ServerError> {
    let set_failed = |err: DeviceError| ServerError::SetFailed(err.status);

    let bidir = (device.pif_register(PIF_TRX_AUTO_BIDIR_ADDR).map_err(set_failed)? >> 5) & 0x01;
    let ghost = (device.pif_register(PIF_NOISELESS_GHOST_ADDR).map_err(set_failed)? >> 4) & 0x07;
    let multiple = (1i32 << ghost) * (1i32 << bidir);

    device.set_iterations(requested as u8).map_err(set_failed)?;

    if requested % multiple == 0 {
        return Ok(SetOutcome::Applied);
    }

    let mut message = heapless::String::new();
    let _ = write!(
        message,
        "It is recommended to set iterations to a multiple of {} with these radar settings",
        multiple
    );
    log::warn!("iterations {}: {}", requested, message);
    Ok(SetOutcome::AppliedWithWarning(message))
}

/// Look up the descriptor of a variable by any of its names.
pub fn descriptor(name: &str) -> Option<Descriptor> {
    Variable::from_name(name).map(Variable::descriptor)
}

/// Read a variable by name and format it for the wire.
///
/// # Returns
///
/// * `Ok(text)` - Decimal or `%e` formatted value
/// * `Err(ServerError::UnknownVariable)` - No variable has this name
/// * `Err(ServerError::GetFailed(status))` - The device read failed
pub fn get<D: RadarDevice + ?Sized>(
    device: &mut D,
    name: &str,
) -> Result<heapless::String<MAX_VALUE_TEXT>, ServerError> {
    let variable = Variable::from_name(name).ok_or(ServerError::UnknownVariable)?;
    let value = variable
        .read(device)
        .map_err(|err| ServerError::GetFailed(err.status))?;
    Ok(value.format())
}

/// Parse `value` and write it to the variable called `name`.
///
/// # Returns
///
/// * `Ok(SetOutcome)` - Written, possibly with an advisory
/// * `Err(ServerError::InvalidVariable)` - Unknown or read-only name
/// * `Err(ServerError::SetFailed(status))` - The device write failed
pub fn set<D: RadarDevice + ?Sized>(
    device: &mut D,
    name: &str,
    value: &str,
) -> Result<SetOutcome, ServerError> {
    let descriptor = descriptor(name)
        .filter(|d| d.writable)
        .ok_or(ServerError::InvalidVariable)?;
    log::debug!("set {} = {:?} ({:?})", descriptor.name, value, descriptor.kind);
    descriptor.variable.write(device, value)
}

/// Every accepted variable name, comma separated, in table order.
pub fn list_names() -> heapless::String<MAX_LIST> {
    let mut out = heapless::String::new();
    for (i, name) in Variable::NAMES.iter().enumerate() {
        if i > 0 {
            let _ = out.push(',');
        }
        let _ = out.push_str(name);
    }
    out
}

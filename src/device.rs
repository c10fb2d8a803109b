//! Radar device seam.
//!
//! `RadarDevice` is the typed register interface of the X4 driver consumed by
//! the server. The driver itself (SPI transactions, PIF/XIF register maps,
//! sweep controller programming) is supplied by the integrator.

use core::fmt;

/// Failure reported by the radar driver, carrying its nonzero status code.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeviceError {
    /// Driver status code
    pub status: i32,
}

impl DeviceError {
    /// Wrap a driver status code.
    pub const fn new(status: i32) -> Self {
        Self { status }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device status {}", self.status)
    }
}

/// PIF register holding `trx_auto_bidir_enable` in bit 5.
pub const PIF_TRX_AUTO_BIDIR_ADDR: u8 = 0x34;

/// PIF register holding `noiseless_ghost_order` in bits 4..6.
pub const PIF_NOISELESS_GHOST_ADDR: u8 = 0x3e;

/// X4 PLL frequency the pulse repetition divider is applied to (Hz).
pub const X4_FIXED_PLL_HZ: f64 = 243e6;

/// Speed of light (m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Sweep controller DAC step size.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DacStep {
    /// Step of 1 DAC count
    Step1 = 0,
    /// Step of 2 DAC counts
    Step2 = 1,
    /// Step of 4 DAC counts
    Step4 = 2,
    /// Step of 8 DAC counts
    Step8 = 3,
}

impl DacStep {
    /// Map a user selector 0..=3 to a step; anything else selects `Step1`.
    pub fn from_selector(selector: i32) -> Self {
        match selector {
            1 => Self::Step2,
            2 => Self::Step4,
            3 => Self::Step8,
            _ => Self::Step1,
        }
    }

    /// Register code of this step.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Step size in DAC counts (`1 << code`).
    pub fn step_size(self) -> u16 {
        1 << self.code()
    }
}

/// Transmitter center frequency (regulatory region).
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TxCenterFrequency {
    /// EU band, 7.290 GHz
    Eu7_290GHz = 3,
    /// KCC band, 8.748 GHz
    Kcc8_748GHz = 4,
}

impl TxCenterFrequency {
    /// Map a user selector to a region; anything but 4 selects the EU band.
    pub fn from_selector(selector: i32) -> Self {
        match selector {
            4 => Self::Kcc8_748GHz,
            _ => Self::Eu7_290GHz,
        }
    }

    /// Register code of this region.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Transmitter output power.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TxPower {
    /// Transmitter off
    Off = 0,
    /// Low power
    Low = 1,
    /// Medium power
    Medium = 2,
    /// High power
    High = 3,
}

impl TxPower {
    /// Map a user selector 0..=3 to a power level; anything else selects `Medium`.
    pub fn from_selector(selector: i32) -> Self {
        match selector {
            0 => Self::Off,
            1 => Self::Low,
            3 => Self::High,
            _ => Self::Medium,
        }
    }

    /// Register code of this power level.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Typed access to an X4 radar through its driver.
///
/// Every accessor is a blocking bus transaction and may fail with the
/// driver's status code.
pub trait RadarDevice {
    /// Initialize the radar (power-up, firmware upload, default sweep setup).
    fn init(&mut self) -> Result<(), DeviceError>;

    /// Diagnose why `init()` failed. Returns the driver's reason code.
    fn check_configuration(&mut self) -> i32;

    /// Restore every register to the driver defaults.
    fn setup_default(&mut self) -> Result<(), DeviceError>;

    /// Lower DAC sweep bound.
    fn dac_min(&mut self) -> Result<u16, DeviceError>;
    /// Set the lower DAC sweep bound.
    fn set_dac_min(&mut self, value: u16) -> Result<(), DeviceError>;

    /// Upper DAC sweep bound.
    fn dac_max(&mut self) -> Result<u16, DeviceError>;
    /// Set the upper DAC sweep bound.
    fn set_dac_max(&mut self, value: u16) -> Result<(), DeviceError>;

    /// DAC sweep step.
    fn dac_step(&mut self) -> Result<DacStep, DeviceError>;
    /// Set the DAC sweep step.
    fn set_dac_step(&mut self, step: DacStep) -> Result<(), DeviceError>;

    /// Pulses integrated per DAC step.
    fn pulses_per_step(&mut self) -> Result<u16, DeviceError>;
    /// Set pulses per DAC step.
    fn set_pulses_per_step(&mut self, value: u16) -> Result<(), DeviceError>;

    /// Sweep iterations per frame.
    fn iterations(&mut self) -> Result<u8, DeviceError>;
    /// Set sweep iterations per frame.
    fn set_iterations(&mut self, value: u8) -> Result<(), DeviceError>;

    /// Pulse repetition frequency divider.
    fn prf_div(&mut self) -> Result<u8, DeviceError>;
    /// Set the pulse repetition frequency divider.
    fn set_prf_div(&mut self, value: u8) -> Result<(), DeviceError>;

    /// Sampler frequency (Hz).
    fn sampler_frequency(&mut self) -> Result<f32, DeviceError>;

    /// RF sampler frequency (Hz).
    fn sampler_frequency_rf(&mut self) -> Result<f32, DeviceError>;

    /// Number of range bins in a frame.
    fn frame_bin_count(&mut self) -> Result<u32, DeviceError>;

    /// Frame length in sampler cycles.
    fn frame_length(&mut self) -> Result<u32, DeviceError>;
    /// Set the frame length in sampler cycles.
    fn set_frame_length(&mut self, cycles: u8) -> Result<(), DeviceError>;

    /// Receiver wait states.
    fn rx_wait(&mut self) -> Result<u8, DeviceError>;
    /// Set receiver wait states.
    fn set_rx_wait(&mut self, value: u8) -> Result<(), DeviceError>;

    /// Transmitter center frequency.
    fn tx_center_frequency(&mut self) -> Result<TxCenterFrequency, DeviceError>;
    /// Set the transmitter center frequency.
    fn set_tx_center_frequency(&mut self, region: TxCenterFrequency) -> Result<(), DeviceError>;

    /// Transmitter power.
    fn tx_power(&mut self) -> Result<TxPower, DeviceError>;
    /// Set the transmitter power.
    fn set_tx_power(&mut self, power: TxPower) -> Result<(), DeviceError>;

    /// Digital down-conversion enable (nonzero = I/Q output).
    fn downconversion(&mut self) -> Result<u8, DeviceError>;
    /// Enable or disable digital down-conversion.
    fn set_downconversion(&mut self, enable: u8) -> Result<(), DeviceError>;

    /// Range offset applied to the frame area (m).
    fn frame_area_offset(&mut self) -> Result<f32, DeviceError>;
    /// Set the frame area range offset (m).
    fn set_frame_area_offset(&mut self, offset: f32) -> Result<(), DeviceError>;

    /// Frame area as `(start, end)` range (m).
    fn frame_area(&mut self) -> Result<(f32, f32), DeviceError>;
    /// Set the frame area range (m).
    fn set_frame_area(&mut self, start: f32, end: f32) -> Result<(), DeviceError>;

    /// Duration of one sweep (s).
    fn sweep_time(&mut self) -> Result<f32, DeviceError>;

    /// Range covered by one bin (m).
    fn bin_length(&mut self) -> Result<f32, DeviceError>;

    /// Read a PIF register.
    fn pif_register(&mut self, address: u8) -> Result<u8, DeviceError>;

    /// Read an SPI register.
    fn spi_register(&mut self, address: u8) -> Result<u8, DeviceError>;

    /// Trigger one sweep.
    fn start_sweep(&mut self) -> Result<(), DeviceError>;

    /// Poll the sweep controller's done flag.
    fn sweep_done(&mut self) -> Result<bool, DeviceError>;

    /// Read the last swept frame as raw samples into `frame`.
    ///
    /// Returns the driver's frame counter.
    fn read_frame_raw(&mut self, frame: &mut [f32]) -> Result<u32, DeviceError>;

    /// Read the last swept frame normalized by the driver into `frame`.
    ///
    /// Returns the driver's frame counter.
    fn read_frame_normalized(&mut self, frame: &mut [f32]) -> Result<u32, DeviceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    extern crate std;
    use std::format;

    #[test]
    fn test_dac_step_selector() {
        let cases = [
            (0, DacStep::Step1, 1),
            (1, DacStep::Step2, 2),
            (2, DacStep::Step4, 4),
            (3, DacStep::Step8, 8),
            (5, DacStep::Step1, 1),
            (-1, DacStep::Step1, 1),
        ];

        for (selector, step, size) in cases {
            assert_eq!(DacStep::from_selector(selector), step, "selector {}", selector);
            assert_eq!(step.step_size(), size);
        }
    }

    #[test]
    fn test_tx_center_frequency_selector() {
        assert_eq!(TxCenterFrequency::from_selector(3), TxCenterFrequency::Eu7_290GHz);
        assert_eq!(TxCenterFrequency::from_selector(4), TxCenterFrequency::Kcc8_748GHz);
        assert_eq!(TxCenterFrequency::from_selector(0), TxCenterFrequency::Eu7_290GHz);
        assert_eq!(TxCenterFrequency::Kcc8_748GHz.code(), 4);
    }

    #[test]
    fn test_tx_power_selector() {
        assert_eq!(TxPower::from_selector(0), TxPower::Off);
        assert_eq!(TxPower::from_selector(1), TxPower::Low);
        assert_eq!(TxPower::from_selector(2), TxPower::Medium);
        assert_eq!(TxPower::from_selector(3), TxPower::High);
        assert_eq!(TxPower::from_selector(9), TxPower::Medium);
    }

    #[test]
    fn test_device_error_display() {
        assert_eq!(format!("{}", DeviceError::new(-7)), "device status -7");
    }
}

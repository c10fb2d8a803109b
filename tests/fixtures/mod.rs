//! Test fixtures for x4-vcom testing.
//!
//! Provides:
//! - `MockRadar`: In-memory register model implementing `RadarDevice`
//! - `MockTransport`: Frame-capturing `Transport` with fault injection
//! - `CaptureLogger`: Per-thread `log` record capture

#![allow(dead_code)]

use std::cell::RefCell;

use x4_vcom::{DacStep, DeviceError, RadarDevice, Transport, TxCenterFrequency, TxPower};

// ============================================================================
// MockRadar - Test Radar Implementation
// ============================================================================

/// Value every raw sample `i` reads as: `RAW_SCALE * i`.
pub const RAW_SCALE: f32 = 100.0;

/// Value every sample reads as from the driver's normalized path.
pub const DRIVER_NORMALIZED: f32 = 0.25;

/// Mock radar with plain fields for every register.
///
/// Uses `std` types since tests run with std support.
#[derive(Debug, Clone)]
pub struct MockRadar {
    pub dac_min: u16,
    pub dac_max: u16,
    pub dac_step: DacStep,
    pub pps: u16,
    pub iterations: u8,
    pub prf_div: u8,
    pub sampler_frequency: f32,
    pub sampler_frequency_rf: f32,
    pub bins: u32,
    pub frame_length: u32,
    pub rx_wait: u8,
    pub tx_region: TxCenterFrequency,
    pub tx_power: TxPower,
    pub ddc: u8,
    pub frame_offset: f32,
    pub frame_area: (f32, f32),
    pub sweep_time: f32,
    pub bin_length: f32,
    pub pif: [u8; 256],
    pub spi: [u8; 256],

    /// `init()` fails with this status
    pub init_failure: Option<i32>,
    /// Returned by `check_configuration()`
    pub config_reason: i32,
    /// Every register access fails with this status
    pub register_failure: Option<i32>,
    /// The sweep done flag never rises
    pub sweep_stuck: bool,

    /// Calls to `init()`
    pub inits: u32,
    /// Calls to `setup_default()`
    pub resets: u32,
    /// Register writes performed
    pub writes: u32,
    /// Calls to `start_sweep()`
    pub sweeps: u32,
    /// Calls to `sweep_done()`
    pub polls: u32,
}

impl MockRadar {
    /// Radar with typical X4 settings, DDC off.
    pub fn new() -> Self {
        Self {
            dac_min: 949,
            dac_max: 1100,
            dac_step: DacStep::Step1,
            pps: 16,
            iterations: 16,
            prf_div: 16,
            sampler_frequency: 23.328e9,
            sampler_frequency_rf: 23.328e9,
            bins: 188,
            frame_length: 8,
            rx_wait: 0,
            tx_region: TxCenterFrequency::Eu7_290GHz,
            tx_power: TxPower::High,
            ddc: 0,
            frame_offset: 0.18,
            frame_area: (0.5, 5.0),
            sweep_time: 0.002,
            bin_length: 0.0064,
            pif: [0; 256],
            spi: [0; 256],
            init_failure: None,
            config_reason: 0,
            register_failure: None,
            sweep_stuck: false,
            inits: 0,
            resets: 0,
            writes: 0,
            sweeps: 0,
            polls: 0,
        }
    }

    fn access(&self) -> Result<(), DeviceError> {
        match self.register_failure {
            Some(status) => Err(DeviceError::new(status)),
            None => Ok(()),
        }
    }

    fn write(&mut self) -> Result<(), DeviceError> {
        self.access()?;
        self.writes += 1;
        Ok(())
    }
}

impl Default for MockRadar {
    fn default() -> Self {
        Self::new()
    }
}

impl RadarDevice for MockRadar {
    fn init(&mut self) -> Result<(), DeviceError> {
        self.inits += 1;
        match self.init_failure {
            Some(status) => Err(DeviceError::new(status)),
            None => Ok(()),
        }
    }

    fn check_configuration(&mut self) -> i32 {
        self.config_reason
    }

    fn setup_default(&mut self) -> Result<(), DeviceError> {
        self.access()?;
        let (pif, spi) = (self.pif, self.spi);
        *self = Self {
            pif,
            spi,
            inits: self.inits,
            resets: self.resets + 1,
            ..Self::new()
        };
        Ok(())
    }

    fn dac_min(&mut self) -> Result<u16, DeviceError> {
        self.access().map(|_| self.dac_min)
    }
    fn set_dac_min(&mut self, value: u16) -> Result<(), DeviceError> {
        self.write()?;
        self.dac_min = value;
        Ok(())
    }

    fn dac_max(&mut self) -> Result<u16, DeviceError> {
        self.access().map(|_| self.dac_max)
    }
    fn set_dac_max(&mut self, value: u16) -> Result<(), DeviceError> {
        self.write()?;
        self.dac_max = value;
        Ok(())
    }

    fn dac_step(&mut self) -> Result<DacStep, DeviceError> {
        self.access().map(|_| self.dac_step)
    }
    fn set_dac_step(&mut self, step: DacStep) -> Result<(), DeviceError> {
        self.write()?;
        self.dac_step = step;
        Ok(())
    }

    fn pulses_per_step(&mut self) -> Result<u16, DeviceError> {
        self.access().map(|_| self.pps)
    }
    fn set_pulses_per_step(&mut self, value: u16) -> Result<(), DeviceError> {
        self.write()?;
        self.pps = value;
        Ok(())
    }

    fn iterations(&mut self) -> Result<u8, DeviceError> {
        self.access().map(|_| self.iterations)
    }
    fn set_iterations(&mut self, value: u8) -> Result<(), DeviceError> {
        self.write()?;
        self.iterations = value;
        Ok(())
    }

    fn prf_div(&mut self) -> Result<u8, DeviceError> {
        self.access().map(|_| self.prf_div)
    }
    fn set_prf_div(&mut self, value: u8) -> Result<(), DeviceError> {
        self.write()?;
        self.prf_div = value;
        Ok(())
    }

    fn sampler_frequency(&mut self) -> Result<f32, DeviceError> {
        self.access().map(|_| self.sampler_frequency)
    }

    fn sampler_frequency_rf(&mut self) -> Result<f32, DeviceError> {
        self.access().map(|_| self.sampler_frequency_rf)
    }

    fn frame_bin_count(&mut self) -> Result<u32, DeviceError> {
        self.access().map(|_| self.bins)
    }

    fn frame_length(&mut self) -> Result<u32, DeviceError> {
        self.access().map(|_| self.frame_length)
    }
    fn set_frame_length(&mut self, cycles: u8) -> Result<(), DeviceError> {
        self.write()?;
        self.frame_length = cycles.into();
        Ok(())
    }

    fn rx_wait(&mut self) -> Result<u8, DeviceError> {
        self.access().map(|_| self.rx_wait)
    }
    fn set_rx_wait(&mut self, value: u8) -> Result<(), DeviceError> {
        self.write()?;
        self.rx_wait = value;
        Ok(())
    }

    fn tx_center_frequency(&mut self) -> Result<TxCenterFrequency, DeviceError> {
        self.access().map(|_| self.tx_region)
    }
    fn set_tx_center_frequency(&mut self, region: TxCenterFrequency) -> Result<(), DeviceError> {
        self.write()?;
        self.tx_region = region;
        Ok(())
    }

    fn tx_power(&mut self) -> Result<TxPower, DeviceError> {
        self.access().map(|_| self.tx_power)
    }
    fn set_tx_power(&mut self, power: TxPower) -> Result<(), DeviceError> {
        self.write()?;
        self.tx_power = power;
        Ok(())
    }

    fn downconversion(&mut self) -> Result<u8, DeviceError> {
        self.access().map(|_| self.ddc)
    }
    fn set_downconversion(&mut self, enable: u8) -> Result<(), DeviceError> {
        self.write()?;
        self.ddc = enable;
        Ok(())
    }

    fn frame_area_offset(&mut self) -> Result<f32, DeviceError> {
        self.access().map(|_| self.frame_offset)
    }
    fn set_frame_area_offset(&mut self, offset: f32) -> Result<(), DeviceError> {
        self.write()?;
        self.frame_offset = offset;
        Ok(())
    }

    fn frame_area(&mut self) -> Result<(f32, f32), DeviceError> {
        self.access().map(|_| self.frame_area)
    }
    fn set_frame_area(&mut self, start: f32, end: f32) -> Result<(), DeviceError> {
        self.write()?;
        self.frame_area = (start, end);
        Ok(())
    }

    fn sweep_time(&mut self) -> Result<f32, DeviceError> {
        self.access().map(|_| self.sweep_time)
    }

    fn bin_length(&mut self) -> Result<f32, DeviceError> {
        self.access().map(|_| self.bin_length)
    }

    fn pif_register(&mut self, address: u8) -> Result<u8, DeviceError> {
        self.access().map(|_| self.pif[usize::from(address)])
    }

    fn spi_register(&mut self, address: u8) -> Result<u8, DeviceError> {
        self.access().map(|_| self.spi[usize::from(address)])
    }

    fn start_sweep(&mut self) -> Result<(), DeviceError> {
        self.access()?;
        self.sweeps += 1;
        Ok(())
    }

    fn sweep_done(&mut self) -> Result<bool, DeviceError> {
        self.access()?;
        self.polls += 1;
        // Completes on the third poll unless stuck.
        Ok(!self.sweep_stuck && self.polls % 3 == 0)
    }

    fn read_frame_raw(&mut self, frame: &mut [f32]) -> Result<u32, DeviceError> {
        self.access()?;
        for (i, x) in frame.iter_mut().enumerate() {
            *x = RAW_SCALE * i as f32;
        }
        Ok(self.sweeps)
    }

    fn read_frame_normalized(&mut self, frame: &mut [f32]) -> Result<u32, DeviceError> {
        self.access()?;
        frame.fill(DRIVER_NORMALIZED);
        Ok(self.sweeps)
    }
}

// ============================================================================
// MockTransport - Test Transport Implementation
// ============================================================================

/// Error reported by `MockTransport` when failing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LinkDown;

/// Transport that records every frame handed to it.
#[derive(Debug, Default)]
pub struct MockTransport {
    /// Every buffer passed to `write()`, in order
    pub frames: Vec<Vec<u8>>,
    /// Accept at most this many bytes per write
    pub accept_limit: Option<usize>,
    /// Fail every write
    pub link_down: bool,
}

impl MockTransport {
    /// Create transport accepting every byte.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent frame, empty when nothing was written.
    pub fn last_frame(&self) -> Vec<u8> {
        self.frames.last().cloned().unwrap_or_default()
    }

    /// Forget captured frames.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Transport for MockTransport {
    type Error = LinkDown;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.frames.push(buf.to_vec());
        if self.link_down {
            return Err(LinkDown);
        }
        Ok(self.accept_limit.map_or(buf.len(), |limit| limit.min(buf.len())))
    }
}

// ============================================================================
// CaptureLogger - Test Logger
// ============================================================================

/// Logger that keeps records per thread, so parallel tests stay separate.
#[derive(Debug)]
pub struct CaptureLogger;

static LOGGER: CaptureLogger = CaptureLogger;

thread_local! {
    static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        RECORDS.with(|records| {
            records
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

/// Install the capturing logger (once per process) and clear this thread's records.
pub fn capture_logs() {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(log::LevelFilter::Trace);
    RECORDS.with(|records| records.borrow_mut().clear());
}

/// Drain the records logged on this thread since `capture_logs()`.
pub fn take_logs() -> Vec<(log::Level, String)> {
    RECORDS.with(|records| records.borrow_mut().drain(..).collect())
}

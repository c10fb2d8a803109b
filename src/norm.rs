//! Post-normalization of X4 radar frames.
//!
//! Converts raw sampler output into the same physical units the X4 driver's
//! own normalized read produces, so frames can be normalized on the host
//! (live, or offline from a recording whose header carries the radar
//! settings).
//!
//! With down-conversion enabled the frame holds interleaved I/Q pairs and is
//! scaled by `nregion * nfactor` with the imaginary parts conjugated. Without
//! it the frame holds real samples and is mapped through `x / nfactor +
//! noffset`. All arithmetic is `f32`, like the driver.

use crate::device::{DacStep, DeviceError, RadarDevice, TxCenterFrequency};

/// Region factor: `1/306` for TX region 3, `1/316` otherwise.
pub fn nregion(tx_region: u8) -> f32 {
    if tx_region == 3 {
        1.0 / 306.0
    } else {
        1.0 / 316.0
    }
}

/// Gain factor `1024 * iterations * pps / dac_step`, inverted when DDC is on.
///
/// `dac_step` is the step size in DAC counts (1, 2, 4 or 8), not the register
/// code.
pub fn nfactor(ddc_enabled: bool, dac_step: u16, pulses_per_step: u16, iterations: u8) -> f32 {
    let integrations = u32::from(iterations) * u32::from(pulses_per_step);
    let base = 1024.0 * integrations as f32 / f32::from(dac_step);

    if ddc_enabled { 1.0 / base } else { base }
}

/// Offset `(2048 - dac_max + dac_min) / 2` for raw frames.
pub fn noffset(dac_min: u16, dac_max: u16) -> f32 {
    (2048.0 - f32::from(dac_max) + f32::from(dac_min)) / 2.0
}

/// Scale interleaved I/Q samples and conjugate the odd (imaginary) entries.
pub fn apply_ddc_normalization(samples: &mut [f32], nregion: f32, nfactor: f32) {
    let scale = nregion * nfactor;
    for (i, x) in samples.iter_mut().enumerate() {
        *x *= scale;
        if i % 2 == 1 {
            *x = -*x;
        }
    }
}

/// Map raw samples through `x / nfactor + noffset`.
pub fn apply_raw_normalization(samples: &mut [f32], noffset: f32, nfactor: f32) {
    for x in samples.iter_mut() {
        *x = *x / nfactor + noffset;
    }
}

/// Radar settings that determine the normalization factors.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NormConfig {
    /// Digital down-conversion enabled (I/Q frames)
    pub ddc_enabled: bool,
    /// Transmitter region
    pub tx_region: TxCenterFrequency,
    /// Lower DAC sweep bound
    pub dac_min: u16,
    /// Upper DAC sweep bound
    pub dac_max: u16,
    /// DAC sweep step
    pub dac_step: DacStep,
    /// Pulses per DAC step
    pub pulses_per_step: u16,
    /// Sweep iterations
    pub iterations: u8,
}

impl NormConfig {
    /// Read the current settings from a live radar.
    pub fn capture<D: RadarDevice + ?Sized>(device: &mut D) -> Result<Self, DeviceError> {
        Ok(Self {
            ddc_enabled: device.downconversion()? != 0,
            tx_region: device.tx_center_frequency()?,
            dac_step: device.dac_step()?,
            dac_min: device.dac_min()?,
            dac_max: device.dac_max()?,
            pulses_per_step: device.pulses_per_step()?,
            iterations: device.iterations()?,
        })
    }
}

/// Normalization factors derived from a `NormConfig`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NormFactors {
    /// Frames are interleaved I/Q
    pub ddc_enabled: bool,
    /// Region factor (DDC frames)
    pub nregion: f32,
    /// Gain factor
    pub nfactor: f32,
    /// Offset (raw frames)
    pub noffset: f32,
}

impl NormFactors {
    /// Compute every factor; which ones apply depends on `ddc_enabled`.
    pub fn from_config(config: &NormConfig) -> Self {
        Self {
            ddc_enabled: config.ddc_enabled,
            nregion: nregion(config.tx_region.code()),
            nfactor: nfactor(
                config.ddc_enabled,
                config.dac_step.step_size(),
                config.pulses_per_step,
                config.iterations,
            ),
            noffset: noffset(config.dac_min, config.dac_max),
        }
    }

    /// Normalize a frame in place along the DDC or raw path.
    pub fn apply(&self, samples: &mut [f32]) {
        if self.ddc_enabled {
            apply_ddc_normalization(samples, self.nregion, self.nfactor);
        } else {
            apply_raw_normalization(samples, self.noffset, self.nfactor);
        }
    }
}

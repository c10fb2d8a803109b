//! Offline frame normalizer.
//!
//! Normalizes a recorded raw X4 frame on a host, producing the same values the
//! driver's normalized read would have returned. The radar settings come from
//! the recording header.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin x4-norm --features offline -- header.toml frame.f32 out.f32
//! ```
//!
//! # Header Format
//!
//! ```toml
//! ddc_en = true
//! tx_region = 3
//! dac_min = 949
//! dac_max = 1100
//! dac_step = 1      # step size in DAC counts: 1, 2, 4 or 8
//! pps = 16
//! iterations = 16
//! ```
//!
//! Frames are little-endian `f32` samples, interleaved I/Q when `ddc_en` is set.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::process::ExitCode;
use x4_vcom::NormFactors;
use x4_vcom::norm::{nfactor, noffset, nregion};

#[derive(Debug, Deserialize)]
struct RecordingHeader {
    ddc_en: bool,
    tx_region: u8,
    dac_min: u16,
    dac_max: u16,
    dac_step: u16,
    pps: u16,
    iterations: u8,
}

impl RecordingHeader {
    fn factors(&self) -> NormFactors {
        NormFactors {
            ddc_enabled: self.ddc_en,
            nregion: nregion(self.tx_region),
            nfactor: nfactor(self.ddc_en, self.dac_step, self.pps, self.iterations),
            noffset: noffset(self.dac_min, self.dac_max),
        }
    }
}

#[derive(Debug)]
enum NormError {
    Usage,
    Io(String, std::io::Error),
    Header(toml::de::Error),
    ZeroStep,
    Truncated(usize),
}

impl fmt::Display for NormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormError::Usage => write!(f, "usage: x4-norm <header.toml> <frame.f32> <out.f32>"),
            NormError::Io(path, err) => write!(f, "{}: {}", path, err),
            NormError::Header(err) => write!(f, "invalid header: {}", err),
            NormError::ZeroStep => write!(f, "invalid header: dac_step must be nonzero"),
            NormError::Truncated(len) => {
                write!(f, "frame length {} is not a multiple of 4 bytes", len)
            }
        }
    }
}

fn read(path: &str) -> Result<Vec<u8>, NormError> {
    fs::read(path).map_err(|err| NormError::Io(path.to_string(), err))
}

fn parse_header(text: &str) -> Result<RecordingHeader, NormError> {
    let header: RecordingHeader = toml::from_str(text).map_err(NormError::Header)?;
    if header.dac_step == 0 {
        return Err(NormError::ZeroStep);
    }
    Ok(header)
}

fn decode_samples(bytes: &[u8]) -> Result<Vec<f32>, NormError> {
    if bytes.len() % 4 != 0 {
        return Err(NormError::Truncated(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn encode_samples(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

fn run(args: &[String]) -> Result<usize, NormError> {
    let [header_path, frame_path, out_path] = args else {
        return Err(NormError::Usage);
    };

    let header_bytes = read(header_path)?;
    let header = parse_header(&String::from_utf8_lossy(&header_bytes))?;
    let mut samples = decode_samples(&read(frame_path)?)?;

    header.factors().apply(&mut samples);

    fs::write(out_path, encode_samples(&samples))
        .map_err(|err| NormError::Io(out_path.to_string(), err))?;
    Ok(samples.len())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(&args) {
        Ok(count) => {
            println!("normalized {} samples", count);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("x4-norm: {}", err);
            ExitCode::FAILURE
        }
    }
}

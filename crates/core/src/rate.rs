//! Rate profiles: the fixed table of supported link rates.
//!
//! Every derivation in this module (phase count, sample rate, strobe pattern,
//! oversampling factor) is a closed lookup over the six supported rate codes.
//! There is no computed fallback: an out-of-enumeration code is a
//! configuration error.
//!
//! # Strobe patterns
//!
//! The bus clock runs at 491.52 MHz. Rates below the clock rate carry data
//! only on a subset of a repeating 4-cycle period; the two fastest rates keep
//! the bus full by running two interleaved phases instead.
//!
//! ```text
//! 122.88 MSps : 1 0 0 0
//! 245.76 MSps : 1 0 1 0
//! 368.64 MSps : 1 1 1 0
//! 491.52 MSps : 1 1 1 1
//! 737.28 MSps : 1 1 1 0   (dual phase)
//! 983.04 MSps : 1 1 1 1   (dual phase)
//! ```

use crate::error::{ConfigError, Result};

/// Bus clock rate in MHz. Strobe patterns repeat within a 4-cycle period of
/// this clock regardless of the programmed sample rate.
pub const CLOCK_RATE_MHZ: f64 = 491.52;

/// Length of the repeating strobe period in bus cycles.
pub const STROBE_PERIOD: usize = 4;

/// A supported rate code.
///
/// The discriminant is the raw code as programmed into the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateCode {
    /// 122.88 MSps
    R1 = 1,
    /// 245.76 MSps
    R2 = 2,
    /// 368.64 MSps
    R3 = 3,
    /// 491.52 MSps
    R4 = 4,
    /// 737.28 MSps, dual phase
    R6 = 6,
    /// 983.04 MSps, dual phase
    R8 = 8,
}

impl RateCode {
    /// Every supported code, in ascending rate order.
    pub const ALL: [RateCode; 6] = [
        RateCode::R1,
        RateCode::R2,
        RateCode::R3,
        RateCode::R4,
        RateCode::R6,
        RateCode::R8,
    ];

    /// Look up a raw rate code.
    ///
    /// # Errors
    /// `ConfigError::UnsupportedRate` for anything outside {1, 2, 3, 4, 6, 8}.
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            1 => Ok(RateCode::R1),
            2 => Ok(RateCode::R2),
            3 => Ok(RateCode::R3),
            4 => Ok(RateCode::R4),
            6 => Ok(RateCode::R6),
            8 => Ok(RateCode::R8),
            _ => Err(ConfigError::UnsupportedRate(code).into()),
        }
    }

    /// The raw code.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Number of interleaved parallel data paths: 2 for the two rates above
    /// the bus clock, 1 otherwise.
    pub fn phases(self) -> u32 {
        match self {
            RateCode::R6 | RateCode::R8 => 2,
            _ => 1,
        }
    }

    /// The programmed sample rate in MSps.
    pub fn sample_rate_msps(self) -> f64 {
        match self {
            RateCode::R1 => 122.88,
            RateCode::R2 => 245.76,
            RateCode::R3 => 368.64,
            RateCode::R4 => 491.52,
            RateCode::R6 => 737.28,
            RateCode::R8 => 983.04,
        }
    }

    /// Cycle offsets within the 4-cycle period that carry real data.
    pub fn strobe_offsets(self) -> &'static [u32] {
        match self {
            RateCode::R1 => &[0],
            RateCode::R2 => &[0, 2],
            RateCode::R3 | RateCode::R6 => &[0, 1, 2],
            RateCode::R4 | RateCode::R8 => &[0, 1, 2, 3],
        }
    }

    /// Whether bus cycle `cycle` carries real data at this rate.
    pub fn carries_data(self, cycle: usize) -> bool {
        let offset = (cycle % STROBE_PERIOD) as u32;
        self.strobe_offsets().contains(&offset)
    }

    /// Number of bus cycles needed so that `samples` true samples each land
    /// on a strobe-valid cycle: 4N at the sparsest rate, 2N at the next,
    /// 4N/3 (truncated) at the 3-of-4 rates, N when the bus is full.
    pub fn oversampled_cycles(self, samples: u32) -> usize {
        let n = samples as usize;
        match self {
            RateCode::R1 => 4 * n,
            RateCode::R2 => 2 * n,
            RateCode::R3 | RateCode::R6 => (4 * n) / 3,
            RateCode::R4 | RateCode::R8 => n,
        }
    }

    /// Number of data-carrying cycles strictly before `cycle`.
    ///
    /// Closed form over the strobe table, which is what keeps row generation
    /// pure and restartable: the true-sample index of any cycle can be
    /// recomputed without walking the stream.
    pub fn valid_cycles_before(self, cycle: usize) -> usize {
        let strobes = self.strobe_offsets();
        let full_periods = cycle / STROBE_PERIOD;
        let rem = (cycle % STROBE_PERIOD) as u32;
        full_periods * strobes.len() + strobes.iter().filter(|&&o| o < rem).count()
    }
}

/// Frame size in octets per lane per frame clock: M * P * Np / 8 / L.
///
/// Fractional values are legal for odd precisions; callers report, they do
/// not allocate by this.
pub fn frame_octets(converters: u32, rate: RateCode, precision_bits: u32, lanes: u32) -> f64 {
    (converters * rate.phases() * precision_bits) as f64 / 8.0 / lanes as f64
}

/// Serialized line rate per lane in Gbps, including 64b/66b line coding
/// overhead.
pub fn lane_rate_gbps(converters: u32, rate: RateCode, precision_bits: u32, lanes: u32) -> f64 {
    let f = frame_octets(converters, rate, precision_bits, lanes);
    f * 8.0 * rate.sample_rate_msps() * (66.0 / 64.0) / 1000.0
}

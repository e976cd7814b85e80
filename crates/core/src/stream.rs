//! Sample stream generation: the labeled wide-bus cycles feeding the lanes.
//!
//! The generator models the parallel output interface of a converter bank
//! running at a programmed rate. The logical sample count is expanded to an
//! oversampled cycle count so that every strobe-valid bus cycle carries
//! exactly one true sample per converter phase; strobe-gated cycles emit a
//! full row of no-data sentinels.
//!
//! Generation is pure: `row` recomputes any cycle from the configuration
//! alone, so the sequence may be restarted and re-iterated freely, and two
//! generators with identical parameters produce identical rows.

use crate::error::{ConfigError, Result};
use crate::label::{row_width, BusRow, NibbleLabel, NIBBLE_BITS};
use crate::rate::RateCode;

/// Converter counts the link supports.
pub const SUPPORTED_CONVERTERS: [u32; 4] = [2, 4, 8, 16];

/// Converter word sizes the link supports, all nibble-divisible.
pub const SUPPORTED_PRECISIONS: [u32; 5] = [12, 16, 24, 32, 48];

/// Generator for the ordered, finite sequence of wide-bus cycles a converter
/// bank produces at a given rate.
///
/// Construction validates the configuration; generation itself cannot fail.
#[derive(Debug, Clone)]
pub struct SampleStream {
    converters: u32,
    rate: RateCode,
    precision_bits: u32,
    cycles: usize,
}

impl SampleStream {
    /// Create a generator for `samples` true samples.
    ///
    /// # Errors
    /// `ConfigError::UnsupportedConverters` / `UnsupportedPrecision` for
    /// values outside the supported sets. The rate is already a validated
    /// `RateCode`.
    pub fn new(
        samples: u32,
        converters: u32,
        rate: RateCode,
        precision_bits: u32,
    ) -> Result<Self> {
        if !SUPPORTED_CONVERTERS.contains(&converters) {
            return Err(ConfigError::UnsupportedConverters(converters).into());
        }
        if !SUPPORTED_PRECISIONS.contains(&precision_bits) {
            return Err(ConfigError::UnsupportedPrecision(precision_bits).into());
        }

        Ok(Self {
            converters,
            rate,
            precision_bits,
            cycles: rate.oversampled_cycles(samples),
        })
    }

    /// Number of wide-bus cycles the stream spans.
    pub fn cycle_count(&self) -> usize {
        self.cycles
    }

    /// Width of each generated row in nibble slots.
    pub fn row_width(&self) -> usize {
        row_width(self.converters, self.rate, self.precision_bits)
    }

    pub fn converters(&self) -> u32 {
        self.converters
    }

    pub fn rate(&self) -> RateCode {
        self.rate
    }

    pub fn precision_bits(&self) -> u32 {
        self.precision_bits
    }

    /// Build the row for one bus cycle.
    ///
    /// A strobe-valid cycle emits one label per (converter, phase, nibble),
    /// iterated most significant first: converter descending, then phase
    /// descending, then nibble descending. Every label carries the cycle's
    /// true-sample index, which counts valid cycles only — the first valid
    /// cycle is sample 0. A gated cycle emits a full row of sentinels.
    pub fn row(&self, cycle: usize) -> BusRow {
        let width = self.row_width();
        if !self.rate.carries_data(cycle) {
            return vec![NibbleLabel::Idle; width];
        }

        let sample = self.rate.valid_cycles_before(cycle) as u32;
        let nibbles = self.precision_bits / NIBBLE_BITS;
        let mut row = Vec::with_capacity(width);
        for converter in (0..self.converters).rev() {
            for phase in (0..self.rate.phases()).rev() {
                for nibble in (0..nibbles).rev() {
                    row.push(NibbleLabel::Sample {
                        converter: converter as u8,
                        phase: phase as u8,
                        sample,
                        nibble: nibble as u8,
                    });
                }
            }
        }
        row
    }

    /// Iterate the full row sequence. The iterator borrows the stream and may
    /// be re-created to restart from the first cycle.
    pub fn rows(&self) -> impl Iterator<Item = BusRow> + '_ {
        (0..self.cycles).map(move |cycle| self.row(cycle))
    }
}

//! Error types for the lane simulator.
//!
//! All operations return structured errors rather than panicking. Every
//! failure here means the configuration (or the row stream built from it) is
//! wrong; nothing is auto-corrected or retried, since the computation is pure
//! and deterministic. A failed run always means "fix the configuration and
//! rerun".

use thiserror::Error;

/// Top-level error type for all operations in the simulator.
///
/// Each variant corresponds to a specific failure domain:
/// - Config: link configuration rejected at validation time
/// - Sequence: a row stream that does not match the configured bus shape
#[derive(Debug, Error)]
pub enum Error {
    /// Link configuration rejected before any row was produced or consumed
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Row stream handed to the sequencer does not match the bus shape
    #[error("sequencing error: {0}")]
    Sequence(#[from] SequenceError),
}

/// Link configuration errors.
///
/// All rate/phase/strobe derivations are closed lookups over a small fixed
/// enumeration, so any out-of-enumeration value lands here.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Rate code outside the fixed enumeration
    #[error("unsupported rate code {0}: must be one of 1, 2, 3, 4, 6, 8")]
    UnsupportedRate(u32),

    /// Converter count outside the supported set
    #[error("unsupported converter count {0}: must be one of 2, 4, 8, 16")]
    UnsupportedConverters(u32),

    /// Precision is not a supported converter word size
    #[error("unsupported precision {0} bits: must be one of 12, 16, 24, 32, 48")]
    UnsupportedPrecision(u32),

    /// Lane count of zero
    #[error("lane count must be at least 1")]
    NoLanes,

    /// Bus width does not split into equal per-lane sub-rows
    #[error("bus width of {row_width} nibbles does not divide evenly across {lanes} lanes")]
    UnevenLaneSplit { row_width: usize, lanes: u32 },
}

/// Row stream shape errors.
#[derive(Debug, Error)]
pub enum SequenceError {
    /// A pushed row does not have the configured bus width
    #[error("row width mismatch: expected {expected} nibbles, got {actual}")]
    RowWidthMismatch { expected: usize, actual: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;

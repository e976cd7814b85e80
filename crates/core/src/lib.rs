//! lane-sim-core: Symbolic lane packing simulator for a multi-gigabit
//! converter link
//!
//! This library models the transport stage that packs converter samples into
//! fixed-width serialized lane words, so a (converter count, lane count,
//! rate, precision) configuration can be checked for lossless, correctly
//! ordered, bit-exact packing before any hardware exists — including the
//! irregular cases introduced by fractional oversampling ratios.
//!
//! # Architecture
//!
//! Data flows one way through clear module boundaries:
//! - `rate`: closed lookup tables for the six supported rate codes
//! - `label`: the symbolic nibble labels rows and words are made of
//! - `stream`: generator of labeled wide-bus cycles
//! - `sequencer`: per-lane repacking into 64-bit words with carry state
//! - `metrics`: observable run behavior
//!
//! # Design Principles
//!
//! - **No panics**: configuration problems are structured, recoverable errors
//! - **Deterministic**: identical inputs always produce identical sequences
//! - **Symbolic**: no numeric sample values, only ordering and completeness
//! - **Single-threaded**: carry state makes row order a correctness
//!   requirement, so rows are consumed strictly in sequence

pub mod error;
pub mod label;
pub mod metrics;
pub mod rate;
pub mod sequencer;
pub mod stream;

// Re-export commonly used types
pub use error::{Error, Result};

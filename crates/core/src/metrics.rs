//! Metrics collection and reporting for simulator runs.
//!
//! This module provides observable insight into a run:
//! - How many bus cycles were generated, and how many carried data
//! - How many labels entered the lanes and how many came out packed
//! - Word-level accounting per run: data words, idle pass-throughs, the
//!   trailing partial fill
//!
//! # Design
//!
//! Metrics live in a simple struct with explicit updates after each pipeline
//! stage. The conservation check (labels on the bus == labels packed) is the
//! run-level pass/fail signal.
//!
//! # Thread Safety
//!
//! `RunMetrics` is NOT thread-safe; the simulator is a single-threaded batch
//! computation and its metrics follow suit.

use std::time::{Duration, Instant};

use crate::label::{BusRow, NIBBLE_BITS};
use crate::sequencer::{LaneWord, WORD_NIBBLES};

/// Counters for one generate-and-sequence run.
#[derive(Debug, Clone)]
pub struct RunMetrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Generation ===
    /// Wide-bus rows generated
    pub rows_generated: u64,

    /// Rows carrying sample data
    pub valid_rows: u64,

    /// Strobe-gated rows (all sentinels)
    pub idle_rows: u64,

    /// Sample nibbles placed on the bus
    pub bus_labels: u64,

    // === Sequencing ===
    /// Lane words emitted across all lanes
    pub words_emitted: u64,

    /// Words carrying at least one sample nibble
    pub data_words: u64,

    /// All-sentinel pass-through words
    pub idle_words: u64,

    /// Data words with unfilled slots (at most one per lane, at stream end)
    pub partial_words: u64,

    /// Bits accumulated in trailing partial words across all lanes
    pub trailing_fill_bits: u64,

    /// Sample nibbles packed into lane words
    pub packed_labels: u64,
}

impl RunMetrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            rows_generated: 0,
            valid_rows: 0,
            idle_rows: 0,
            bus_labels: 0,
            words_emitted: 0,
            data_words: 0,
            idle_words: 0,
            partial_words: 0,
            trailing_fill_bits: 0,
            packed_labels: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Account for the generated row stream.
    pub fn record_rows(&mut self, rows: &[BusRow]) {
        for row in rows {
            self.rows_generated += 1;
            let samples = row.iter().filter(|s| s.is_sample()).count() as u64;
            if samples == 0 {
                self.idle_rows += 1;
            } else {
                self.valid_rows += 1;
                self.bus_labels += samples;
            }
        }
    }

    /// Account for the sequenced per-lane word streams.
    pub fn record_lanes(&mut self, lanes: &[Vec<LaneWord>]) {
        for words in lanes {
            for word in words {
                self.words_emitted += 1;
                let samples = word.sample_labels().count() as u64;
                if samples == 0 {
                    self.idle_words += 1;
                } else {
                    self.data_words += 1;
                    self.packed_labels += samples;
                    if (samples as usize) < WORD_NIBBLES {
                        self.partial_words += 1;
                        self.trailing_fill_bits += samples * NIBBLE_BITS as u64;
                    }
                }
            }
        }
    }

    /// True when every label generated onto the bus came out packed.
    pub fn is_conserved(&self) -> bool {
        self.bus_labels == self.packed_labels
    }

    /// Fraction of data-word slots actually holding sample nibbles.
    pub fn occupancy(&self) -> f64 {
        if self.data_words == 0 {
            0.0
        } else {
            self.packed_labels as f64 / (self.data_words * WORD_NIBBLES as u64) as f64
        }
    }

    /// Fraction of bus cycles carrying data.
    pub fn strobe_density(&self) -> f64 {
        if self.rows_generated == 0 {
            0.0
        } else {
            self.valid_rows as f64 / self.rows_generated as f64
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Run Summary ===");
        println!("Duration: {} us", self.duration().as_micros());
        println!();

        println!("=== Generation ===");
        println!("Bus rows: {}", self.rows_generated);
        println!(
            "Valid rows: {} ({:.1}% strobe density)",
            self.valid_rows,
            self.strobe_density() * 100.0
        );
        println!("Idle rows: {}", self.idle_rows);
        println!("Sample nibbles on bus: {}", self.bus_labels);
        println!();

        println!("=== Sequencing ===");
        println!("Lane words emitted: {}", self.words_emitted);
        println!("Data words: {}", self.data_words);
        println!("Idle pass-through words: {}", self.idle_words);
        println!(
            "Partial trailing words: {} ({} bits of carry)",
            self.partial_words, self.trailing_fill_bits
        );
        println!("Sample nibbles packed: {}", self.packed_labels);
        println!("Data word occupancy: {:.1}%", self.occupancy() * 100.0);
        println!();

        if self.is_conserved() {
            println!("Conservation: PASSED ({} nibbles in, {} out)", self.bus_labels, self.packed_labels);
        } else {
            println!(
                "Conservation: FAILED ({} nibbles in, {} out)",
                self.bus_labels, self.packed_labels
            );
        }
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_us={}\n\
             rows_generated={}\n\
             valid_rows={}\n\
             idle_rows={}\n\
             bus_labels={}\n\
             words_emitted={}\n\
             data_words={}\n\
             idle_words={}\n\
             partial_words={}\n\
             packed_labels={}\n\
             occupancy={:.4}\n\
             conserved={}\n",
            self.duration().as_micros(),
            self.rows_generated,
            self.valid_rows,
            self.idle_rows,
            self.bus_labels,
            self.words_emitted,
            self.data_words,
            self.idle_words,
            self.partial_words,
            self.packed_labels,
            self.occupancy(),
            self.is_conserved(),
        )
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}

//! Lane sequencing: repacking wide-bus rows into per-lane 64-bit words.
//!
//! Each incoming row splits into one contiguous sub-row per lane, big-endian
//! order preserved. A lane accumulates sub-row nibbles into a word buffer,
//! carrying any partial fill into the next row: row boundaries are a
//! scheduling artifact, not an alignment boundary. The moment the buffer
//! reaches 64 bits the word is emitted and the buffer resets, and insertion
//! continues with whatever the sub-row still holds — a sub-row wider than one
//! word emits several.
//!
//! A sub-row that is entirely no-data sentinels marks a drained bus cycle: it
//! passes through as an all-idle word and never touches the fill state.
//!
//! # Invariants
//!
//! - `fill_bits` stays below [`WORD_BITS`] between calls; reaching the full
//!   width emits and resets inside the same insertion step
//! - per lane, valid labels are emitted exactly once, in consumption order
//! - sentinels never advance the fill accounting

use crate::error::{ConfigError, Result, SequenceError};
use crate::label::{row_width, BusRow, NibbleLabel, NIBBLE_BITS};
use crate::rate::RateCode;

/// Lane word width in bits.
pub const WORD_BITS: u32 = 64;

/// Number of nibble slots in a lane word.
pub const WORD_NIBBLES: usize = (WORD_BITS / NIBBLE_BITS) as usize;

/// One packed 64-bit lane word: 16 nibble slots, slot 0 covering bits 63:60.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneWord {
    slots: [NibbleLabel; WORD_NIBBLES],
}

impl LaneWord {
    /// A word whose every slot holds the no-data sentinel.
    pub fn idle() -> Self {
        Self {
            slots: [NibbleLabel::Idle; WORD_NIBBLES],
        }
    }

    /// Slot contents, most significant first.
    pub fn slots(&self) -> &[NibbleLabel] {
        &self.slots
    }

    /// True if no slot carries sample data.
    pub fn is_idle(&self) -> bool {
        self.slots.iter().all(|s| s.is_idle())
    }

    /// Only the slots carrying sample data, most significant first.
    pub fn sample_labels(&self) -> impl Iterator<Item = NibbleLabel> + '_ {
        self.slots.iter().copied().filter(|s| s.is_sample())
    }
}

/// Fill state for one lane's in-progress word.
///
/// Owned exclusively by the sequencer for the duration of one run: reset
/// whenever a word completes, discarded when the run finishes. The insertion
/// cursor is `fill_bits / 4`, walking down from the most-significant slot as
/// the word fills.
#[derive(Debug, Clone)]
struct LaneState {
    /// Bits accumulated toward the current word (always < WORD_BITS between
    /// insertions)
    fill_bits: u32,
    /// In-progress word buffer; slots past the cursor still hold the sentinel
    word: [NibbleLabel; WORD_NIBBLES],
}

impl LaneState {
    fn new() -> Self {
        Self {
            fill_bits: 0,
            word: [NibbleLabel::Idle; WORD_NIBBLES],
        }
    }

    /// Insert one nibble at the cursor. When the fill reaches the word width
    /// the completed word is copied out of the buffer before the reset and
    /// returned.
    fn insert(&mut self, label: NibbleLabel) -> Option<LaneWord> {
        let slot = (self.fill_bits / NIBBLE_BITS) as usize;
        self.word[slot] = label;
        self.fill_bits += NIBBLE_BITS;

        if self.fill_bits == WORD_BITS {
            let completed = LaneWord { slots: self.word };
            self.word = [NibbleLabel::Idle; WORD_NIBBLES];
            self.fill_bits = 0;
            Some(completed)
        } else {
            None
        }
    }

    /// Give up whatever has accumulated, if anything. Never-reached slots
    /// keep the sentinel, modeling a drained pipeline.
    fn drain(self) -> Option<LaneWord> {
        if self.fill_bits == 0 {
            None
        } else {
            Some(LaneWord { slots: self.word })
        }
    }
}

/// Repacks a row stream into per-lane word sequences, one call per row.
///
/// Rows must be pushed in bus-cycle order: the carry state makes ordering a
/// correctness requirement, not an implementation detail.
pub struct LaneSequencer {
    bus_width: usize,
    sub_width: usize,
    states: Vec<LaneState>,
    output: Vec<Vec<LaneWord>>,
}

impl LaneSequencer {
    /// Create a sequencer for the given link shape.
    ///
    /// # Errors
    /// `ConfigError::NoLanes` or `ConfigError::UnevenLaneSplit` if the bus
    /// width cannot be partitioned into equal per-lane sub-rows. Raised here,
    /// before any row is processed.
    pub fn new(
        lanes: u32,
        converters: u32,
        rate: RateCode,
        precision_bits: u32,
    ) -> Result<Self> {
        if lanes == 0 {
            return Err(ConfigError::NoLanes.into());
        }
        let bus_width = row_width(converters, rate, precision_bits);
        if bus_width % lanes as usize != 0 {
            return Err(ConfigError::UnevenLaneSplit {
                row_width: bus_width,
                lanes,
            }
            .into());
        }

        let lanes = lanes as usize;
        Ok(Self {
            bus_width,
            sub_width: bus_width / lanes,
            states: vec![LaneState::new(); lanes],
            output: vec![Vec::new(); lanes],
        })
    }

    /// Number of lanes being fed.
    pub fn lanes(&self) -> usize {
        self.states.len()
    }

    /// Bits accumulated toward lane `lane`'s next word.
    pub fn fill_bits(&self, lane: usize) -> u32 {
        self.states[lane].fill_bits
    }

    /// Consume one bus row, appending any completed words to the lane
    /// outputs.
    ///
    /// # Errors
    /// `SequenceError::RowWidthMismatch` if the row does not have the
    /// configured bus width.
    pub fn push_row(&mut self, row: &[NibbleLabel]) -> Result<()> {
        if row.len() != self.bus_width {
            return Err(SequenceError::RowWidthMismatch {
                expected: self.bus_width,
                actual: row.len(),
            }
            .into());
        }

        for (lane, sub_row) in row.chunks(self.sub_width).enumerate() {
            if sub_row.iter().all(|s| s.is_idle()) {
                // Drained bus cycle: pass through, fill state untouched.
                self.output[lane].push(LaneWord::idle());
                continue;
            }

            for &label in sub_row {
                if label.is_idle() {
                    continue;
                }
                if let Some(word) = self.states[lane].insert(label) {
                    self.output[lane].push(word);
                }
            }
        }

        Ok(())
    }

    /// End the run and take the per-lane word sequences. A lane holding a
    /// partial word emits it with sentinels in the unreached slots; there is
    /// no mid-run flush.
    pub fn finish(mut self) -> Vec<Vec<LaneWord>> {
        for (lane, state) in self.states.drain(..).enumerate() {
            if let Some(word) = state.drain() {
                self.output[lane].push(word);
            }
        }
        self.output
    }
}

/// Run a complete row stream through a fresh sequencer.
pub fn sequence<I>(
    rows: I,
    lanes: u32,
    converters: u32,
    rate: RateCode,
    precision_bits: u32,
) -> Result<Vec<Vec<LaneWord>>>
where
    I: IntoIterator<Item = BusRow>,
{
    let mut sequencer = LaneSequencer::new(lanes, converters, rate, precision_bits)?;
    for row in rows {
        sequencer.push_row(&row)?;
    }
    Ok(sequencer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::stream::SampleStream;

    fn label(converter: u8, sample: u32, nibble: u8) -> NibbleLabel {
        NibbleLabel::Sample {
            converter,
            phase: 0,
            sample,
            nibble,
        }
    }

    #[test]
    fn test_uneven_split_rejected_before_any_row() {
        // Row width 8 over 3 lanes
        let result = LaneSequencer::new(3, 2, RateCode::R4, 16);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::UnevenLaneSplit {
                row_width: 8,
                lanes: 3
            }))
        ));
    }

    #[test]
    fn test_zero_lanes_rejected() {
        let result = LaneSequencer::new(0, 2, RateCode::R4, 16);
        assert!(matches!(result, Err(Error::Config(ConfigError::NoLanes))));
    }

    #[test]
    fn test_row_width_mismatch() {
        let mut sequencer = LaneSequencer::new(2, 2, RateCode::R4, 16).unwrap();
        let short_row = vec![NibbleLabel::Idle; 5];
        let result = sequencer.push_row(&short_row);
        assert!(matches!(
            result,
            Err(Error::Sequence(SequenceError::RowWidthMismatch {
                expected: 8,
                actual: 5
            }))
        ));
    }

    #[test]
    fn test_full_bus_fills_one_word_in_four_rows() {
        // 2 converters, 2 lanes, full-rate, 16-bit: 4-nibble sub-rows, so
        // each lane completes exactly one word after 4 rows with zero carry.
        let stream = SampleStream::new(4, 2, RateCode::R4, 16).unwrap();
        let mut sequencer = LaneSequencer::new(2, 2, RateCode::R4, 16).unwrap();

        for row in stream.rows() {
            sequencer.push_row(&row).unwrap();
        }
        assert_eq!(sequencer.fill_bits(0), 0);
        assert_eq!(sequencer.fill_bits(1), 0);

        let lanes = sequencer.finish();
        for words in &lanes {
            assert_eq!(words.len(), 1);
            assert!(!words[0].is_idle());
            assert!(words[0].slots().iter().all(|s| s.is_sample()));
        }

        // Lane 0 carries the upper half of the bus: converter 1.
        for slot in lanes[0][0].slots() {
            match *slot {
                NibbleLabel::Sample { converter, .. } => assert_eq!(converter, 1),
                NibbleLabel::Idle => unreachable!(),
            }
        }
    }

    #[test]
    fn test_carry_across_rows() {
        // 24-bit samples over 2 lanes: 6-nibble sub-rows. The first word
        // completes 4 nibbles into the third row, so labels from samples 0,
        // 1, and 2 share a word.
        let stream = SampleStream::new(8, 2, RateCode::R4, 24).unwrap();
        let mut sequencer = LaneSequencer::new(2, 2, RateCode::R4, 24).unwrap();

        let rows: Vec<_> = stream.rows().collect();
        sequencer.push_row(&rows[0]).unwrap();
        assert_eq!(sequencer.fill_bits(0), 24);
        sequencer.push_row(&rows[1]).unwrap();
        assert_eq!(sequencer.fill_bits(0), 48);
        sequencer.push_row(&rows[2]).unwrap();
        // 72 bits seen: one word out, 8 bits carried.
        assert_eq!(sequencer.fill_bits(0), 8);

        let lanes = sequencer.finish();
        let word = &lanes[0][0];
        let samples: Vec<u32> = word
            .sample_labels()
            .map(|l| match l {
                NibbleLabel::Sample { sample, .. } => sample,
                NibbleLabel::Idle => unreachable!(),
            })
            .collect();
        assert_eq!(samples, vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn test_sub_row_wider_than_word_emits_multiple() {
        // Single lane, 16 converters at 32-bit precision: 128-nibble rows,
        // 8 complete words from every row.
        let stream = SampleStream::new(1, 16, RateCode::R4, 32).unwrap();
        let mut sequencer = LaneSequencer::new(1, 16, RateCode::R4, 32).unwrap();

        let row = stream.row(0);
        sequencer.push_row(&row).unwrap();
        assert_eq!(sequencer.fill_bits(0), 0);

        let lanes = sequencer.finish();
        assert_eq!(lanes[0].len(), 8);

        // Words preserve the row's own order.
        let emitted: Vec<NibbleLabel> = lanes[0]
            .iter()
            .flat_map(|w| w.slots().iter().copied())
            .collect();
        assert_eq!(emitted, row);
    }

    #[test]
    fn test_idle_sub_row_passes_through_without_touching_fill() {
        let mut sequencer = LaneSequencer::new(2, 2, RateCode::R4, 16).unwrap();

        // Partially fill both lanes.
        let data_row: Vec<NibbleLabel> = (0..8).map(|i| label(i / 4, 0, 3 - (i % 4))).collect();
        sequencer.push_row(&data_row).unwrap();
        assert_eq!(sequencer.fill_bits(0), 16);

        // A fully drained cycle.
        let idle_row = vec![NibbleLabel::Idle; 8];
        sequencer.push_row(&idle_row).unwrap();
        assert_eq!(sequencer.fill_bits(0), 16);
        assert_eq!(sequencer.fill_bits(1), 16);

        let lanes = sequencer.finish();
        // Each lane: one pass-through idle word, then the drained partial.
        assert_eq!(lanes[0].len(), 2);
        assert!(lanes[0][0].is_idle());
        assert!(!lanes[0][1].is_idle());
    }

    #[test]
    fn test_mixed_sub_row_packs_only_data_slots() {
        let mut sequencer = LaneSequencer::new(1, 2, RateCode::R4, 16).unwrap();

        let mut row = vec![NibbleLabel::Idle; 8];
        row[0] = label(1, 0, 3);
        row[5] = label(0, 0, 2);
        sequencer.push_row(&row).unwrap();

        // Two data nibbles inserted, sentinels skipped.
        assert_eq!(sequencer.fill_bits(0), 8);

        let lanes = sequencer.finish();
        let word = &lanes[0][0];
        assert_eq!(word.slots()[0], label(1, 0, 3));
        assert_eq!(word.slots()[1], label(0, 0, 2));
        assert!(word.slots()[2..].iter().all(|s| s.is_idle()));
    }

    #[test]
    fn test_trailing_partial_word_drains_with_sentinels() {
        let stream = SampleStream::new(1, 2, RateCode::R4, 16).unwrap();
        let mut sequencer = LaneSequencer::new(2, 2, RateCode::R4, 16).unwrap();
        sequencer.push_row(&stream.row(0)).unwrap();

        let lanes = sequencer.finish();
        for words in &lanes {
            assert_eq!(words.len(), 1);
            let word = &words[0];
            assert_eq!(word.slots().len(), WORD_NIBBLES);
            assert!(word.slots()[..4].iter().all(|s| s.is_sample()));
            assert!(word.slots()[4..].iter().all(|s| s.is_idle()));
        }
    }

    #[test]
    fn test_empty_stream_emits_nothing() {
        let sequencer = LaneSequencer::new(2, 2, RateCode::R4, 16).unwrap();
        let lanes = sequencer.finish();
        assert!(lanes.iter().all(|words| words.is_empty()));
    }

    #[test]
    fn test_sequence_convenience_matches_manual_run() {
        let stream = SampleStream::new(6, 2, RateCode::R3, 16).unwrap();

        let via_fn = sequence(stream.rows(), 2, 2, RateCode::R3, 16).unwrap();

        let mut sequencer = LaneSequencer::new(2, 2, RateCode::R3, 16).unwrap();
        for row in stream.rows() {
            sequencer.push_row(&row).unwrap();
        }
        let manual = sequencer.finish();

        assert_eq!(via_fn, manual);
    }
}

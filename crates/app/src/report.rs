//! Plain-text rendering of simulator output.
//!
//! The core hands back per-lane word sequences; this module renders them the
//! way the waveform tables in the link documentation read: columns are bit
//! ranges with the most significant on the left, one row per emitted word.
//! The generator's input bus can be rendered the same way, one column per
//! (converter, phase, nibble) position.

use lane_sim_core::label::NIBBLE_BITS;
use lane_sim_core::rate::{frame_octets, lane_rate_gbps, RateCode, CLOCK_RATE_MHZ};
use lane_sim_core::sequencer::{LaneWord, WORD_BITS, WORD_NIBBLES};
use lane_sim_core::stream::SampleStream;

/// Print the resolved link parameter block.
pub fn print_parameters(
    converters: u32,
    lanes: u32,
    rate: RateCode,
    precision_bits: u32,
    samples: u32,
) {
    println!("=== Link Parameters ===");
    println!("Converters: {}", converters);
    println!("Phases: {}", rate.phases());
    println!("Lanes: {}", lanes);
    println!("Precision: {} bits", precision_bits);
    println!("Samples: {}", samples);
    println!("Sample rate: {} MSps", rate.sample_rate_msps());
    println!("Clock rate: {} MHz", CLOCK_RATE_MHZ);
    println!(
        "Frame size: {} octets/lane",
        frame_octets(converters, rate, precision_bits, lanes)
    );
    println!(
        "Lane rate: {:.5} Gbps",
        lane_rate_gbps(converters, rate, precision_bits, lanes)
    );
    println!();
}

/// Print the generator's bus table: one column per slot position, one row
/// per cycle.
pub fn print_input_table(stream: &SampleStream) {
    let nibbles = stream.precision_bits() / NIBBLE_BITS;
    let mut headers = Vec::with_capacity(stream.row_width());
    for converter in (0..stream.converters()).rev() {
        for phase in (0..stream.rate().phases()).rev() {
            for nibble in (0..nibbles).rev() {
                headers.push(format!("M{converter}_P{phase}_N{nibble}"));
            }
        }
    }

    let rows: Vec<Vec<String>> = stream
        .rows()
        .map(|row| row.iter().map(|slot| slot.to_string()).collect())
        .collect();

    println!("=== Generated bus cycles ===");
    print!("{}", render_table(&headers, &rows));
    println!();
}

/// Print one lane's word sequence as a bit-range table.
pub fn print_lane_words(lane: usize, words: &[LaneWord]) {
    let headers = bit_range_headers();
    let rows: Vec<Vec<String>> = words
        .iter()
        .map(|word| word.slots().iter().map(|slot| slot.to_string()).collect())
        .collect();

    println!("=== Lane {} output ===", lane);
    print!("{}", render_table(&headers, &rows));
    println!();
}

/// Column headers for a 64-bit word, most significant nibble first:
/// `63:60` down to `3:0`.
fn bit_range_headers() -> Vec<String> {
    (0..WORD_NIBBLES)
        .map(|slot| {
            let hi = WORD_BITS - NIBBLE_BITS * slot as u32 - 1;
            let lo = hi + 1 - NIBBLE_BITS;
            format!("{hi}:{lo}")
        })
        .collect()
}

/// Render an ASCII table with `+---+` borders and centered-ish cells. Column
/// widths adapt to the widest cell.
fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (col, cell) in row.iter().enumerate() {
            if cell.len() > widths[col] {
                widths[col] = cell.len();
            }
        }
    }

    let mut out = String::new();
    let border = {
        let mut b = String::from("+");
        for w in &widths {
            b.push_str(&"-".repeat(w + 2));
            b.push('+');
        }
        b.push('\n');
        b
    };

    let render_row = |cells: &[String], widths: &[usize]| {
        let mut line = String::from("|");
        for (cell, w) in cells.iter().zip(widths) {
            line.push_str(&format!(" {:^width$} |", cell, width = *w));
        }
        line.push('\n');
        line
    };

    out.push_str(&border);
    out.push_str(&render_row(headers, &widths));
    out.push_str(&border);
    for row in rows {
        out.push_str(&render_row(row, &widths));
    }
    out.push_str(&border);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_range_headers() {
        let headers = bit_range_headers();
        assert_eq!(headers.len(), WORD_NIBBLES);
        assert_eq!(headers[0], "63:60");
        assert_eq!(headers[1], "59:56");
        assert_eq!(headers[15], "3:0");
    }

    #[test]
    fn test_render_table_alignment() {
        let headers = vec!["a".to_string(), "bb".to_string()];
        let rows = vec![vec!["xxx".to_string(), "y".to_string()]];
        let table = render_table(&headers, &rows);

        let lines: Vec<&str> = table.lines().collect();
        // border, header, border, row, border
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "+-----+----+");
        // All lines are the same width.
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
    }
}

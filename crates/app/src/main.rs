//! lane-sim: symbolic lane packing simulator.
//!
//! Drives the core pipeline end to end: resolve a configuration, generate
//! the labeled bus cycles, sequence them into per-lane 64-bit words, render
//! the tables, and print the run metrics.

mod config;
mod report;

use config::Config;
use lane_sim_core::metrics::RunMetrics;
use lane_sim_core::rate::RateCode;
use lane_sim_core::sequencer::sequence;
use lane_sim_core::stream::SampleStream;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("run with --help for usage");
            std::process::exit(2);
        }
    };

    if config.print_config {
        config.print();
    }

    if let Err(e) = run(&config) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config) -> lane_sim_core::Result<()> {
    let rate = RateCode::from_code(config.rate_code)?;
    let mut metrics = RunMetrics::new();

    let stream = SampleStream::new(
        config.samples,
        config.converters,
        rate,
        config.precision_bits,
    )?;
    let rows: Vec<_> = stream.rows().collect();
    metrics.record_rows(&rows);

    let lanes = sequence(
        rows,
        config.lanes,
        config.converters,
        rate,
        config.precision_bits,
    )?;
    metrics.record_lanes(&lanes);
    metrics.complete();

    report::print_parameters(
        config.converters,
        config.lanes,
        rate,
        config.precision_bits,
        config.samples,
    );

    if config.print_input {
        report::print_input_table(&stream);
    }

    if config.print_tables {
        for (lane, words) in lanes.iter().enumerate() {
            report::print_lane_words(lane, words);
        }
    }

    if config.print_metrics {
        metrics.print_summary();
    }

    Ok(())
}

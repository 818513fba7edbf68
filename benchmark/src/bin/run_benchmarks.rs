// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Runs the full value-vs-reference benchmark and prints a report per scenario.

use std::path::PathBuf;

use clap::Parser;
use valref_benchmark::{BenchmarkReport, Driver, JsonReporter, Measurement, MeasurementRunner};
use valref_core::TrackingAllocator;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

#[derive(Parser)]
#[command(name = "run_benchmarks")]
#[command(about = "Compare value and reference aggregates under allocation, access and copy")]
struct Args {
    /// Also save a JSON report into this directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let mut runner = MeasurementRunner::stdout();
    let report = Driver::standard().run(&mut runner)?;

    if let Some(dir) = &args.output {
        let reporter = JsonReporter::new(dir)?;
        let path = reporter.save(&report)?;
        tracing::info!(path = %path.display(), "Benchmark report saved");

        if let Some(previous) = reporter.previous_report(&path)? {
            tracing::info!(path = %previous.display(), "Previous report available for comparison");
        }
    }

    log_summary(&report);
    Ok(())
}

fn log_summary(report: &BenchmarkReport) {
    for summary in &report.summaries {
        tracing::info!(
            scenario = %summary.name,
            runs = summary.runs,
            min = %Measurement::format_elapsed(summary.min_ns),
            mean = %Measurement::format_elapsed(summary.mean_ns as u64),
            max = %Measurement::format_elapsed(summary.max_ns),
            "Summary"
        );
    }
}

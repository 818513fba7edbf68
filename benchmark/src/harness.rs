// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Measurement runner.
//!
//! Wraps one workload in the statistics gatherer and a wall-clock timer and
//! writes the per-scenario console block:
//!
//! ```text
//! Memory Consumed - <MB>MB
//! Accumulator - <checksum>
//! Measured '<name>' - <elapsed>ms
//! Mem before: <kb>KB; Mem after: <kb>KB; Allocs - <n>; Frees - <n>; Reallocs - <n>; RSS delta - <kb>KB
//!
//! ```

use std::io::{self, Write};
use std::time::{Duration, Instant};

use thiserror::Error;
use valref_core::{ScenarioOutcome, StatsError, StatsGatherer};

use crate::metrics::Measurement;

/// Errors raised while measuring.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Failed to write report: {0}")]
    Output(#[from] io::Error),

    #[error("Statistics gathering failed: {0}")]
    Stats(#[from] StatsError),
}

/// Runs workloads one at a time and reports each to `out`.
pub struct MeasurementRunner<W: Write> {
    out: W,
    gatherer: StatsGatherer,
}

impl MeasurementRunner<io::StdoutLock<'static>> {
    /// A runner that reports to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout().lock())
    }
}

impl<W: Write> MeasurementRunner<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            gatherer: StatsGatherer::new(),
        }
    }

    /// Measure one workload.
    ///
    /// The gatherer starts right before the timer and stops right after the
    /// checksum and timing lines are written. The workload runs to
    /// completion on the calling thread.
    pub fn measure<F>(&mut self, name: &str, workload: F) -> Result<Measurement, HarnessError>
    where
        F: FnOnce() -> ScenarioOutcome,
    {
        self.gatherer.start_gathering();

        let timer = Timer::start();
        let outcome = workload();
        let elapsed = timer.elapsed();

        writeln!(
            self.out,
            "Memory Consumed - {}MB",
            outcome.memory_consumed_mb()
        )?;
        writeln!(self.out, "Accumulator - {}", outcome.checksum)?;
        writeln!(self.out, "Measured '{}' - {}ms", name, elapsed.as_millis())?;

        let stats = self.gatherer.stop_gathering()?;
        self.gatherer.print_stats(&mut self.out)?;
        writeln!(self.out)?;
        self.out.flush()?;

        tracing::debug!(
            scenario = name,
            elapsed_ms = elapsed.as_millis() as u64,
            checksum = outcome.checksum,
            "Measured scenario"
        );

        Ok(Measurement::new(
            name,
            outcome,
            elapsed.as_nanos() as u64,
            stats,
        ))
    }

    /// Write the header that opens one outer repetition.
    pub fn begin_repetition(&mut self, repetition: usize) -> Result<(), HarnessError> {
        writeln!(self.out)?;
        writeln!(self.out, "Iteration - {}", repetition)?;
        Ok(())
    }

    /// Give back the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Timer for measuring individual operations.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed duration.
    pub fn elapsed(self) -> Duration {
        self.start.elapsed()
    }
}

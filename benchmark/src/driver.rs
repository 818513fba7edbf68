// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Driver loop.
//!
//! Runs the scenario catalogue, in order, a fixed number of times. Nothing
//! is reset between scenarios or repetitions: each run sees whatever heap
//! state the previous ones left behind.

use std::io::Write;

use valref_core::{catalogue, Scenario, ScenarioParams};

use crate::harness::{HarnessError, MeasurementRunner};
use crate::metrics::{BenchmarkReport, ScenarioResult};

/// Outer repetitions of the whole catalogue.
pub const REPETITIONS: usize = 5;

pub struct Driver {
    params: ScenarioParams,
    repetitions: usize,
    scenarios: Vec<Scenario>,
}

impl Driver {
    /// The fixed configuration: full catalogue, standard params, five rounds.
    pub fn standard() -> Self {
        Self::new(ScenarioParams::standard(), REPETITIONS)
    }

    /// Full catalogue with explicit params, for scaled-down runs.
    pub fn new(params: ScenarioParams, repetitions: usize) -> Self {
        Self {
            params,
            repetitions,
            scenarios: catalogue(),
        }
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Run every repetition through `runner` and collect the results.
    pub fn run<W: Write>(
        &self,
        runner: &mut MeasurementRunner<W>,
    ) -> Result<BenchmarkReport, HarnessError> {
        let mut report = BenchmarkReport::new(self.params, self.repetitions);

        tracing::info!(
            scenarios = self.scenarios.len(),
            repetitions = self.repetitions,
            iterations = self.params.iterations(),
            copy_count = self.params.copy_count(),
            "Starting benchmark run"
        );

        for repetition in 0..self.repetitions {
            runner.begin_repetition(repetition)?;

            for (position, scenario) in self.scenarios.iter().enumerate() {
                let params = self.params;
                let measurement = runner.measure(scenario.name, || scenario.run(&params))?;

                report.add_result(ScenarioResult {
                    repetition,
                    position,
                    workload: scenario.workload,
                    shape: scenario.shape,
                    measurement,
                });
            }

            tracing::info!(repetition, "Finished repetition");
        }

        report.finish();
        Ok(report)
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_driver_configuration() {
        let driver = Driver::standard();
        assert_eq!(driver.repetitions, 5);
        assert_eq!(driver.params, ScenarioParams::standard());
        assert_eq!(driver.scenarios().len(), 20);
    }

    #[test]
    fn test_run_prints_every_scenario_in_order() {
        let params = ScenarioParams::scaled(10, 2).unwrap();
        let driver = Driver::new(params, 2);
        let mut runner = MeasurementRunner::new(Vec::new());

        let report = driver.run(&mut runner).unwrap();
        let text = String::from_utf8(runner.into_inner()).unwrap();

        assert!(text.starts_with("\nIteration - 0\n"));
        assert!(text.contains("\nIteration - 1\n"));
        assert_eq!(text.matches("Measured '").count(), 40);

        let first = text.find("Measured 'Point Struct 2'").unwrap();
        let last = text.find("Measured 'Copy Class With Refs'").unwrap();
        assert!(first < last);

        assert_eq!(report.results.len(), 40);
        assert_eq!(report.results[0].repetition, 0);
        assert_eq!(report.results[20].repetition, 1);
        assert_eq!(report.results[20].position, 0);
        assert_eq!(report.summaries.len(), 20);
        assert!(report.summaries.iter().all(|s| s.runs == 2));
    }

    #[test]
    fn test_run_reports_same_checksum_each_repetition() {
        let params = ScenarioParams::scaled(100, 1).unwrap();
        let driver = Driver::new(params, 2);
        let mut runner = MeasurementRunner::new(std::io::sink());

        let report = driver.run(&mut runner).unwrap();
        let (first, second) = report.results.split_at(20);
        for (a, b) in first.iter().zip(second) {
            assert_eq!(a.measurement.name, b.measurement.name);
            assert_eq!(a.measurement.checksum, b.measurement.checksum);
        }
        assert_eq!(report.results[0].measurement.checksum, 20_000);
    }
}

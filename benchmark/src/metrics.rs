// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Measurement records and the serialisable run report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sysinfo::System;
use valref_core::{ScenarioOutcome, ScenarioParams, ShapeInfo, StatsReport, Workload};

/// One timed scenario invocation as seen by the measurement runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    /// Scenario name as printed
    pub name: String,
    /// Checksum the scenario returned
    pub checksum: i64,
    /// Wall-clock time of the workload in nanoseconds
    pub elapsed_ns: u64,
    /// Live heap bytes sampled at the end of the workload
    pub memory_consumed_bytes: u64,
    /// Allocator statistics for the interval
    pub stats: StatsReport,
}

impl Measurement {
    pub fn new(
        name: impl Into<String>,
        outcome: ScenarioOutcome,
        elapsed_ns: u64,
        stats: StatsReport,
    ) -> Self {
        Self {
            name: name.into(),
            checksum: outcome.checksum,
            elapsed_ns,
            memory_consumed_bytes: outcome.memory_consumed_bytes,
            stats,
        }
    }

    /// Whole milliseconds, truncated, as the console report prints them.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }

    /// Format a duration in human-readable form (auto-selects ns/μs/ms/s).
    pub fn format_elapsed(ns: u64) -> String {
        if ns < 1_000 {
            format!("{}ns", ns)
        } else if ns < 1_000_000 {
            format!("{:.2}μs", ns as f64 / 1_000.0)
        } else if ns < 1_000_000_000 {
            format!("{:.2}ms", ns as f64 / 1_000_000.0)
        } else {
            format!("{:.2}s", ns as f64 / 1_000_000_000.0)
        }
    }
}

/// A measurement placed in the driver loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Outer repetition, zero based
    pub repetition: usize,
    /// Position in the catalogue
    pub position: usize,
    pub workload: Workload,
    pub shape: ShapeInfo,
    #[serde(flatten)]
    pub measurement: Measurement,
}

/// Elapsed-time spread of one scenario across repetitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub runs: usize,
    pub min_ns: u64,
    pub max_ns: u64,
    pub mean_ns: f64,
}

/// System information captured at benchmark time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name
    pub os: String,
    /// OS version
    pub os_version: String,
    /// Kernel version (Linux)
    pub kernel_version: Option<String>,
    /// CPU model name
    pub cpu_model: String,
    /// Number of CPU cores
    pub cpu_cores: usize,
    /// Total system memory in bytes
    pub memory_bytes: u64,
    /// Hostname
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Complete report of one driver run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Suite identifier
    pub benchmark_suite: String,
    /// Framework version
    pub version: String,
    /// Timestamp when the run started
    pub timestamp: DateTime<Utc>,
    /// System information
    pub system_info: SystemInfo,
    /// Array size and copy repetition used for every scenario
    pub params: ScenarioParams,
    /// Outer repetitions of the catalogue
    pub repetitions: usize,
    /// Every measurement in run order
    pub results: Vec<ScenarioResult>,
    /// Per-scenario spread, filled in by [`BenchmarkReport::finish`]
    #[serde(default)]
    pub summaries: Vec<ScenarioSummary>,
}

impl BenchmarkReport {
    pub fn new(params: ScenarioParams, repetitions: usize) -> Self {
        Self {
            benchmark_suite: "valref-benchmarks".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            params,
            repetitions,
            results: Vec::new(),
            summaries: Vec::new(),
        }
    }

    /// Add a result to the report.
    pub fn add_result(&mut self, result: ScenarioResult) {
        self.results.push(result);
    }

    /// Compute the per-scenario summaries, keeping catalogue order.
    pub fn finish(&mut self) {
        let mut summaries: Vec<ScenarioSummary> = Vec::new();
        for result in &self.results {
            let elapsed = result.measurement.elapsed_ns;
            match summaries
                .iter()
                .position(|s| s.name == result.measurement.name)
            {
                Some(index) => {
                    let summary = &mut summaries[index];
                    summary.mean_ns = (summary.mean_ns * summary.runs as f64 + elapsed as f64)
                        / (summary.runs + 1) as f64;
                    summary.runs += 1;
                    summary.min_ns = summary.min_ns.min(elapsed);
                    summary.max_ns = summary.max_ns.max(elapsed);
                }
                None => summaries.push(ScenarioSummary {
                    name: result.measurement.name.clone(),
                    runs: 1,
                    min_ns: elapsed,
                    max_ns: elapsed,
                    mean_ns: elapsed as f64,
                }),
            }
        }
        self.summaries = summaries;
    }
}

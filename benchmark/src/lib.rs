// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! valref benchmark harness
//!
//! Measures value-semantics against reference-semantics aggregates under
//! allocation, field access and bulk copy.
//!
//! # Components
//!
//! - **Measurement runner**: times one scenario between two statistics
//!   snapshots and prints its console block
//! - **Driver**: runs the fixed scenario catalogue five times in order
//! - **Reports**: every measurement can be saved as JSON for later comparison

pub mod driver;
pub mod harness;
pub mod metrics;
pub mod reporter;

pub use driver::{Driver, REPETITIONS};
pub use harness::{HarnessError, MeasurementRunner};
pub use metrics::{BenchmarkReport, Measurement, ScenarioResult, ScenarioSummary, SystemInfo};
pub use reporter::{JsonReporter, ReporterError};

#[cfg(test)]
#[global_allocator]
static GLOBAL: valref_core::TrackingAllocator = valref_core::TrackingAllocator;

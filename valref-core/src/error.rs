// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Error types for the valref harness.
//!
//! Scenario arithmetic over the fixed constants cannot fail. The only
//! recoverable failures are misuse of the statistics gatherer and invalid
//! scaled-down parameters handed in by tests or benches. Allocation failure
//! is not represented here: it aborts the process.

use thiserror::Error;

/// Invalid scenario parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("Iteration count must be positive")]
    ZeroIterations,

    #[error("Copy count must be positive")]
    ZeroCopyCount,
}

/// Statistics gatherer used out of order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("stop_gathering called before start_gathering")]
    NotStarted,
}
